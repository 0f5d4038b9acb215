//! Access file types
//!
//! Core types used by the parser, merger and serializer.

use crate::access::names::{self, GranteeKind};
use crate::error::{MergeError, NameError};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A right that can be granted over a directory
///
/// Variants are declared in canonical serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RightKind {
    Read,
    Write,
    List,
    Create,
    Delete,
    Own,
}

impl RightKind {
    /// Get the canonical right name
    pub const fn as_str(&self) -> &'static str {
        match self {
            RightKind::Read => "read",
            RightKind::Write => "write",
            RightKind::List => "list",
            RightKind::Create => "create",
            RightKind::Delete => "delete",
            RightKind::Own => "own",
        }
    }

    /// Try to parse a right name, ignoring ASCII case
    pub fn try_parse(s: &str) -> Option<Self> {
        RightKind::all()
            .iter()
            .copied()
            .find(|right| right.as_str().eq_ignore_ascii_case(s))
    }

    /// Get all rights in canonical order
    pub const fn all() -> &'static [RightKind] {
        &[
            RightKind::Read,
            RightKind::Write,
            RightKind::List,
            RightKind::Create,
            RightKind::Delete,
            RightKind::Own,
        ]
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A right as written in input: a single right, or `*`/`all` for every right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RightSpec {
    All,
    One(RightKind),
}

impl RightSpec {
    /// Try to parse a right name or one of the `*`/`all` aliases
    pub fn try_parse(s: &str) -> Option<Self> {
        if s == "*" || s.eq_ignore_ascii_case("all") {
            return Some(RightSpec::All);
        }
        RightKind::try_parse(s).map(RightSpec::One)
    }

    /// The concrete rights this stands for
    pub fn kinds(&self) -> &[RightKind] {
        match self {
            RightSpec::All => RightKind::all(),
            RightSpec::One(right) => std::slice::from_ref(right),
        }
    }
}

/// A validated grantee name.
///
/// Compared and ordered as an exact, case-sensitive string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Grantee(String);

impl Grantee {
    /// Validate and trim a grantee token
    pub fn new(token: &str) -> Result<Self, NameError> {
        names::validate(token)?;
        Ok(Self(token.trim().to_string()))
    }

    /// The `*` grantee
    pub fn everyone() -> Self {
        Self(names::EVERYONE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Syntactic class of this grantee
    pub fn kind(&self) -> GranteeKind {
        if self.0 == names::EVERYONE {
            GranteeKind::Everyone
        } else if self.0.contains('/') {
            GranteeKind::Group
        } else {
            GranteeKind::User
        }
    }
}

impl fmt::Display for Grantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Grantee {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Ordering and equality are those of the inner string.
impl Borrow<str> for Grantee {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for Grantee {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grantee::new(s)
    }
}

impl TryFrom<String> for Grantee {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Grantee::new(&value)
    }
}

impl From<Grantee> for String {
    fn from(grantee: Grantee) -> Self {
        grantee.0
    }
}

/// The normalized contents of an Access file: for every right, the set of
/// grantees holding it.
///
/// All six rights are always present; a right nobody holds has an empty set.
/// Values are never edited in place by callers; [`merge`](crate::access::merge::merge)
/// returns a new model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RightsModel {
    grants: [BTreeSet<Grantee>; 6],
}

impl RightsModel {
    /// Create a model in which no right is held by anyone
    pub fn new() -> Self {
        Self::default()
    }

    /// Grantees holding `right`, in canonical order
    pub fn grantees(&self, right: RightKind) -> &BTreeSet<Grantee> {
        &self.grants[right.index()]
    }

    /// Names of the grantees holding `right`
    pub fn users_with(&self, right: RightKind) -> Vec<&str> {
        self.grantees(right).iter().map(Grantee::as_str).collect()
    }

    pub fn contains(&self, right: RightKind, grantee: &str) -> bool {
        self.grantees(right).contains(grantee)
    }

    /// True if no right is held by anyone
    pub fn is_empty(&self) -> bool {
        self.grants.iter().all(BTreeSet::is_empty)
    }

    /// Iterate over every right in canonical order with its grantee set
    pub fn iter(&self) -> impl Iterator<Item = (RightKind, &BTreeSet<Grantee>)> {
        RightKind::all()
            .iter()
            .map(|&right| (right, self.grantees(right)))
    }

    pub(crate) fn insert(&mut self, right: RightKind, grantee: Grantee) -> bool {
        self.grants[right.index()].insert(grantee)
    }

    pub(crate) fn remove(&mut self, right: RightKind, grantee: &Grantee) -> bool {
        self.grants[right.index()].remove(grantee)
    }
}

impl FromIterator<(RightKind, Grantee)> for RightsModel {
    fn from_iter<I: IntoIterator<Item = (RightKind, Grantee)>>(iter: I) -> Self {
        let mut model = RightsModel::new();
        for (right, grantee) in iter {
            model.insert(right, grantee);
        }
        model
    }
}

/// Whether a delta adds or removes grantees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Grant,
    Revoke,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Grant => "grant",
            Operation::Revoke => "revoke",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single grant-or-revoke edit request.
///
/// Rights are already expanded from `*`. Grantee tokens stay raw until the
/// merge validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RightsDelta {
    pub operation: Operation,
    pub rights: BTreeSet<RightKind>,
    pub grantees: Vec<String>,
}

impl RightsDelta {
    pub fn new<G, S>(operation: Operation, rights: &[RightSpec], grantees: G) -> Self
    where
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation,
            rights: rights
                .iter()
                .flat_map(|spec| spec.kinds().iter().copied())
                .collect(),
            grantees: grantees.into_iter().map(Into::into).collect(),
        }
    }

    pub fn grant<G, S>(rights: &[RightSpec], grantees: G) -> Self
    where
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Operation::Grant, rights, grantees)
    }

    pub fn revoke<G, S>(rights: &[RightSpec], grantees: G) -> Self
    where
        G: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Operation::Revoke, rights, grantees)
    }

    /// Build a delta from command-line style arguments: a comma-separated
    /// right list and user arguments which may each hold a comma-separated
    /// list. Empty list entries are skipped.
    pub fn from_args<S: AsRef<str>>(
        operation: Operation,
        rights: &str,
        users: &[S],
    ) -> Result<Self, MergeError> {
        let mut specs = Vec::new();
        for name in split_list(rights) {
            let spec =
                RightSpec::try_parse(name).ok_or_else(|| MergeError::UnknownRight(name.into()))?;
            specs.push(spec);
        }
        if specs.is_empty() {
            return Err(MergeError::NoRights);
        }

        let grantees: Vec<&str> = users
            .iter()
            .flat_map(|arg| split_list(arg.as_ref()))
            .collect();
        if grantees.is_empty() {
            return Err(MergeError::NoGrantees);
        }

        Ok(Self::new(operation, &specs, grantees))
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub(crate) fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|item| !item.is_empty())
}
