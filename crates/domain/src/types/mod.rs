//! Typed fragments of ArchivesSpace records
//!
//! Most payloads flow through the client as opaque [`serde_json::Value`]s;
//! the types here cover only the fields the client itself reads or builds.

pub mod digital_object;
pub mod records;
pub mod tree;

pub use digital_object::{DigitalObjectInstance, FileVersion, NewDigitalObject};
pub use records::{FindByIdResults, RecordRef, UnpublishedRestriction};
pub use tree::TreeNode;
