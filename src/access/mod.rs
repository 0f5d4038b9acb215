//! Access file core
//!
//! Parses, edits and canonicalizes the per-directory Access files that
//! declare who holds which rights over a directory and its descendants.
//!
//! ## Rights
//!
//! `read`, `write`, `list`, `create`, `delete`, `own`. In input, `*` or
//! `all` stands for every right.
//!
//! ## Pipeline
//!
//! ```text
//! bytes → parse → RightsModel → merge(delta) → RightsModel → marshal → bytes
//! ```
//!
//! Every step is a pure function over its inputs; no I/O happens here.
//!
//! ## Example
//!
//! ```
//! use upspin_access::access::{RightKind, RightSpec, RightsDelta, marshal, merge, parse};
//!
//! let model = parse("me@example.com/Access", b"read: ann@example.com\n").unwrap();
//! let delta = RightsDelta::grant(&[RightSpec::One(RightKind::List)], ["bob@example.com"]);
//! let text = String::from_utf8(marshal(&merge(&model, &delta).unwrap())).unwrap();
//! assert!(text.contains("list: bob@example.com\n"));
//! ```

pub mod check;
pub mod marshal;
pub mod merge;
pub mod names;
pub mod parser;
pub mod types;

pub use check::{AccessDecision, GroupMembers, NoGroups};
pub use marshal::marshal;
pub use merge::merge;
pub use names::{GranteeKind, is_access_file_name};
pub use parser::{AccessClause, parse};
pub use types::{Grantee, Operation, RightKind, RightSpec, RightsDelta, RightsModel};
