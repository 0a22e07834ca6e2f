use serde_json::Value;
use tracing::debug;

use super::params::{display_options, parse_u64, required, required_str};
use super::MethodResult;
use crate::sui::{BackendError, LedgerBackend, ObjectLookup};
use crate::translator::{build_read_mask, object_to_legacy, PastObject, Record};

/// Handler for sui_tryGetPastObject
///
/// Absence in any form the backend reports it becomes `ObjectDeleted`.
/// Other backend errors propagate.
pub async fn try_get_past_object(backend: &dyn LedgerBackend, params: &[Value]) -> MethodResult {
    let object_id = required_str(params, 0, "id")?;
    let version = parse_u64(required(params, 1, "version")?, "version")?;
    let options = display_options(params, 2)?;
    let mask = build_read_mask("sui_tryGetPastObject", &options);

    debug!(
        "sui_tryGetPastObject: id={}, version={}, mask={:?}",
        object_id, version, mask.paths
    );

    let lookup = backend.get_object(object_id, Some(version), &mask).await;
    let past = match absent_as_missing(lookup)? {
        ObjectLookup::Found(object) => PastObject::VersionFound(object),
        ObjectLookup::Failed(status) => {
            debug!(
                "sui_tryGetPastObject: {}@{} reported as {}: {}",
                object_id, version, status.code, status.message
            );
            deleted(object_id, version)
        }
        ObjectLookup::Missing => deleted(object_id, version),
    };

    Ok(past.into())
}

/// Handler for sui_getObject
pub async fn get_object(backend: &dyn LedgerBackend, params: &[Value]) -> MethodResult {
    let object_id = required_str(params, 0, "id")?;
    let options = display_options(params, 1)?;
    let mask = build_read_mask("sui_getObject", &options);

    debug!("sui_getObject: id={}, mask={:?}", object_id, mask.paths);

    let lookup = backend.get_object(object_id, None, &mask).await;
    let result = match absent_as_missing(lookup)? {
        ObjectLookup::Found(object) => Record::new().field("data", object_to_legacy(object)),
        ObjectLookup::Failed(_) | ObjectLookup::Missing => Record::new().field(
            "error",
            Record::new()
                .field("code", "notExists")
                .field("object_id", object_id),
        ),
    };

    Ok(result.into())
}

fn absent_as_missing(
    lookup: Result<ObjectLookup, BackendError>,
) -> Result<ObjectLookup, BackendError> {
    match lookup {
        Err(e) if e.indicates_absence() => {
            debug!("Object lookup reported absence: {}", e);
            Ok(ObjectLookup::Missing)
        }
        other => other,
    }
}

fn deleted(object_id: &str, version: u64) -> PastObject {
    PastObject::ObjectDeleted {
        object_id: object_id.to_string(),
        version,
    }
}
