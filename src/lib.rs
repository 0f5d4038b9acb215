//! Upspin-style Access files
//!
//! Every directory of a path-addressed storage namespace may hold a file
//! named `Access` that declares which users or groups hold which rights over
//! the directory and its descendants.
//!
//! ## Features
//!
//! - **Pure access core** - parse, merge grant/revoke edits, and serialize to canonical text
//! - **Name validation** - users, the `*` wildcard, and group paths
//! - **Safe editing** - read-modify-write with compare-and-swap and retry
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Access File Format
//!
//! ```text
//! # Everyone in the family can read; only I can change things.
//! read, list: me@example.com/Group/family
//! write, create, delete: me@example.com
//! *: me@example.com
//! ```
//!
//! After an edit the file is rewritten in canonical form:
//!
//! ```text
//! read: me@example.com, me@example.com/Group/family
//! write: me@example.com
//! list: me@example.com, me@example.com/Group/family
//! create: me@example.com
//! delete: me@example.com
//! own: me@example.com
//! ```

pub mod access;
pub mod config;
pub mod editor;
pub mod error;
pub mod store;

// Re-export main types
pub use access::{RightKind, RightsDelta, RightsModel, marshal, merge, parse};
pub use config::{AppConfig, load_config};
pub use editor::{EditOutcome, edit_access_file, preview_access_edit};
pub use error::{AppError, Result};
