//! Client constants
//!
//! Centralized location for constants shared between the domain and
//! client crates.

/// Header carrying the session token on every authenticated request.
pub const SESSION_HEADER: &str = "X-ArchivesSpace-Session";

/// Repository used when a configuration does not name one.
pub const DEFAULT_REPOSITORY: u32 = 2;

/// Default request timeout for API calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Ref-id values exported by ArchivesSpace EADs carry this prefix.
pub const REF_ID_PREFIX: &str = "aspace_";

/// JSON model type posted when reordering archival object children.
pub const CHILDREN_JSONMODEL_TYPE: &str = "archival_record_children";
