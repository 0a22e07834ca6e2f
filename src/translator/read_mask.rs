//! Display-flag to backend field-path tables.
//!
//! Each method owns a table of entries evaluated in order. An entry either
//! always applies or applies when its flag is enabled; the union of the
//! selected paths, deduplicated in first-seen order, is the read mask.

use std::collections::HashMap;

use indexmap::IndexSet;
use serde_json::Value;

use crate::sui::ReadMask;

/// When a table entry contributes its paths.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    Always,
    Flag(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct MaskEntry {
    pub trigger: Trigger,
    pub paths: &'static [&'static str],
}

const fn always(paths: &'static [&'static str]) -> MaskEntry {
    MaskEntry { trigger: Trigger::Always, paths }
}

const fn flag(name: &'static str, paths: &'static [&'static str]) -> MaskEntry {
    MaskEntry { trigger: Trigger::Flag(name), paths }
}

pub const TRANSACTION_BLOCK_MASK: &[MaskEntry] = &[
    always(&["digest"]),
    flag("showInput", &["transaction"]),
    flag("showRawInput", &["transaction", "transaction.bcs"]),
    always(&["signatures"]),
    flag("showEffects", &["effects"]),
    flag("showRawEffects", &["effects", "effects.bcs"]),
    flag("showEvents", &["events"]),
    flag("showObjectChanges", &["objects"]),
    flag("showBalanceChanges", &["balance_changes"]),
    always(&["checkpoint", "timestamp"]),
];

/// `showDisplay` is accepted but has no backend field.
pub const OBJECT_MASK: &[MaskEntry] = &[
    always(&["object_id", "version", "digest"]),
    flag("showType", &["object_type"]),
    flag("showOwner", &["owner"]),
    flag("showPreviousTransaction", &["previous_transaction"]),
    flag("showDisplay", &[]),
    flag("showContent", &["contents", "json"]),
    flag("showBcs", &["bcs"]),
    flag("showStorageRebate", &["storage_rebate"]),
];

pub const CHECKPOINT_MASK: &[MaskEntry] = &[always(&[
    "digest",
    "sequence_number",
    "summary",
    "summary.epoch",
    "summary.total_network_transactions",
    "summary.previous_digest",
    "summary.epoch_rolling_gas_cost_summary",
    "summary.timestamp",
    "summary.commitments",
    "contents",
    "contents.transactions",
    "signature",
    "signature.signature",
    "signature.bitmap",
    "signature.epoch",
])];

static METHOD_MASKS: &[(&str, &[MaskEntry])] = &[
    ("sui_getTransactionBlock", TRANSACTION_BLOCK_MASK),
    ("sui_executeTransactionBlock", TRANSACTION_BLOCK_MASK),
    ("sui_tryGetPastObject", OBJECT_MASK),
    ("sui_getObject", OBJECT_MASK),
    ("sui_getCheckpoint", CHECKPOINT_MASK),
    ("sui_getCheckpoints", CHECKPOINT_MASK),
];

/// Boolean display options as sent by the caller.
///
/// Flags the caller omitted take the default (`true` for every method that
/// accepts options). Non-boolean values follow JavaScript truthiness, which
/// is what legacy clients expect.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    flags: HashMap<String, bool>,
    default: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            flags: HashMap::new(),
            default: true,
        }
    }
}

impl DisplayOptions {
    /// Options with every flag forced to `value`.
    pub fn all(value: bool) -> Self {
        Self {
            flags: HashMap::new(),
            default: value,
        }
    }

    /// Parse an options record. `None` or `null` yields the defaults;
    /// anything other than a record is rejected.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value {
            None | Some(Value::Null) => Some(Self::default()),
            Some(Value::Object(fields)) => Some(Self {
                flags: fields
                    .iter()
                    .map(|(name, value)| (name.clone(), truthy(value)))
                    .collect(),
                default: true,
            }),
            Some(_) => None,
        }
    }

    pub fn with(mut self, name: &str, enabled: bool) -> Self {
        self.flags.insert(name.to_string(), enabled);
        self
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(self.default)
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Evaluate a mask table against the caller's options.
pub fn build(table: &[MaskEntry], options: &DisplayOptions) -> ReadMask {
    let mut paths: IndexSet<&'static str> = IndexSet::new();
    for entry in table {
        let selected = match entry.trigger {
            Trigger::Always => true,
            Trigger::Flag(name) => options.is_enabled(name),
        };
        if selected {
            paths.extend(entry.paths.iter().copied());
        }
    }
    ReadMask::new(paths)
}

/// Read mask for `method`, empty for methods without a table.
pub fn build_read_mask(method: &str, options: &DisplayOptions) -> ReadMask {
    METHOD_MASKS
        .iter()
        .find(|(name, _)| *name == method)
        .map(|(_, table)| build(table, options))
        .unwrap_or_default()
}
