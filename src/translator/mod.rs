//! Translation between backend messages and the legacy JSON shapes.
//!
//! `normalize` owns the value model every adapter result is built in;
//! the remaining modules reshape specific backend messages.

pub mod checkpoint;
pub mod coin_type;
pub mod normalize;
pub mod object;
pub mod read_mask;
pub mod transaction;

pub use checkpoint::checkpoint_to_legacy;
pub use coin_type::{canonicalize, coin_type_from_object_type, SUI_COIN_TYPE};
pub use normalize::{normalize, Native, Record};
pub use object::{coin_to_legacy, object_to_legacy, PastObject};
pub use read_mask::{build_read_mask, DisplayOptions};
pub use transaction::transaction_to_legacy;
