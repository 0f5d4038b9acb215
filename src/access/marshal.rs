//! Canonical serialization
//!
//! Every right is written on its own line in the fixed order
//! `read, write, list, create, delete, own`, including rights nobody holds.
//! Grantees are sorted by their string value and joined with `", "`.

use crate::access::types::RightsModel;
use std::fmt;

/// Serialize `model` to the canonical bytes of an Access file.
pub fn marshal(model: &RightsModel) -> Vec<u8> {
    model.to_string().into_bytes()
}

impl fmt::Display for RightsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (right, grantees) in self.iter() {
            write!(f, "{right}:")?;
            for (i, grantee) in grantees.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{sep}{grantee}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
