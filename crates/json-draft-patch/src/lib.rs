//! Patch-side building blocks for json-draft.
//!
//! - [`value`]: the immutable value model drafts read from and patches carry.
//! - [`types`]: [`PatchOp`] and [`PatchRecord`].
//! - [`log`]: the shared, append-only [`PatchLog`].
//! - [`path`]: slash-joined path construction.
//! - [`codec`]: conversion of records to and from RFC 6902 style JSON.
//!
//! # Example
//!
//! ```
//! use json_draft_patch::{PatchLog, PatchRecord, codec::json::to_json_patch};
//! use serde_json::json;
//!
//! let log = PatchLog::new();
//! log.append(PatchRecord::replace("$/a", 2));
//! log.append(PatchRecord::remove("$/list/-"));
//!
//! assert_eq!(
//!     to_json_patch(&log.records()),
//!     json!([
//!         {"op": "replace", "path": "$/a", "value": 2},
//!         {"op": "remove", "path": "$/list/-"},
//!     ])
//! );
//! ```

pub mod codec;
pub mod log;
pub mod path;
pub mod types;
pub mod value;

pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use log::PatchLog;
pub use types::{PatchError, PatchOp, PatchRecord};
pub use value::{Literal, StructMap, Value, ValueKind};
