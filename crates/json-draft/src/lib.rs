//! Live draft handles over immutable nested values.
//!
//! Wrap a struct or sequence [`Value`] and read it through the returned
//! handle as if it were the value itself. Writes never touch the source:
//! they are staged on the handle and recorded as `add`/`remove`/`replace`
//! [`PatchRecord`]s in a caller-owned [`PatchLog`], ready to be applied to a
//! canonical copy elsewhere.
//!
//! Nested structs and sequences are wrapped lazily, on first read, and
//! registered in the session's [`Registry`], which keeps their identity
//! stable: reading the same field twice yields the same handle.
//!
//! # Example
//!
//! ```
//! use json_draft::{wrap_struct, PatchLog, Registry, Value};
//! use json_draft_patch::to_json_patch;
//! use serde_json::json;
//!
//! let registry = Registry::new();
//! let log = PatchLog::new();
//! let source = Value::from(json!({"i": {"j": 1, "k": 2, "l": 3}}));
//! let root = wrap_struct(&registry, &log, registry.next_id(), source, "$").unwrap();
//!
//! root.set("i", json!({"j": 3, "k": 2, "l": 1})).unwrap();
//! let i = root.get("i").unwrap().into_struct().unwrap();
//! i.set("j", 4).unwrap();
//!
//! assert_eq!(
//!     to_json_patch(&log.records()),
//!     json!([
//!         {"op": "replace", "path": "$/i", "value": {"j": 3, "k": 2, "l": 1}},
//!         {"op": "replace", "path": "$/i/j", "value": 4},
//!     ])
//! );
//! ```
//!
//! # Concurrency
//!
//! Everything here is single-threaded and synchronous. Registry, log and
//! staging are shared without locking; use one session per logical
//! transaction and discard it afterwards.

pub mod error;
pub mod handle;
pub mod options;
pub mod registry;
pub mod staging;
pub mod wrap;

pub use error::DraftError;
pub use handle::{Entry, Handle, Input, SequenceHandle, SequenceIter, StructHandle};
pub use options::DraftOptions;
pub use registry::{ReferenceId, Registry};
pub use staging::StagingEntry;
pub use wrap::{wrap, wrap_sequence, wrap_struct};

pub use json_draft_patch::{Literal, PatchLog, PatchOp, PatchRecord, Value, ValueKind};
