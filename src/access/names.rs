//! Name validation
//!
//! Syntax checks for grantee tokens and namespace paths. A grantee is one of:
//! - `*`, every user
//! - a user name, `local@domain`
//! - a group reference, an absolute path such as `me@example.com/Group/friends`
//!
//! Groups are never opened here; they are only checked for path syntax.

use crate::error::NameError;
use regex::Regex;
use std::sync::LazyLock;

/// Reserved final path component of an Access file
pub const ACCESS_FILE: &str = "Access";

/// The grantee token meaning "all users"
pub const EVERYONE: &str = "*";

/// Characters that would collide with the Access file grammar
const RESERVED: &[char] = &[',', ':', '#'];

static USER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@/\s]+@[^@/\s]+$").expect("user name regex is valid"));

/// Syntactic class of a valid grantee token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GranteeKind {
    /// The `*` wildcard
    Everyone,
    /// A single user name
    User,
    /// A path naming a group file
    Group,
}

/// Validate a grantee token, returning its syntactic class.
///
/// Surrounding whitespace is ignored.
pub fn validate(token: &str) -> Result<GranteeKind, NameError> {
    let name = token.trim();
    if name.is_empty() {
        return Err(NameError::malformed(token, "empty name"));
    }
    if name == EVERYONE {
        return Ok(GranteeKind::Everyone);
    }
    if name.contains('/') {
        validate_path(name)?;
        Ok(GranteeKind::Group)
    } else {
        validate_user(name)?;
        Ok(GranteeKind::User)
    }
}

/// Validate a user name of the form `local@domain`.
pub fn validate_user(name: &str) -> Result<(), NameError> {
    if name.contains(RESERVED) {
        return Err(NameError::malformed(name, "contains a reserved character"));
    }
    if !USER_NAME.is_match(name) {
        return Err(NameError::malformed(
            name,
            "expected a user name of the form local@domain",
        ));
    }
    Ok(())
}

/// Validate an absolute namespace path: a user root followed by one or more
/// non-empty `/`-separated components.
pub fn validate_path(path: &str) -> Result<(), NameError> {
    let Some((root, rest)) = path.split_once('/') else {
        return Err(NameError::malformed(path, "path has no components after the root"));
    };
    validate_user(root).map_err(|_| NameError::malformed(path, "path root is not a user name"))?;

    for component in rest.split('/') {
        if component.is_empty() {
            return Err(NameError::malformed(path, "empty path component"));
        }
        if component == "." || component == ".." {
            return Err(NameError::malformed(path, "relative path component"));
        }
        if component.contains(char::is_whitespace) || component.contains(RESERVED) {
            return Err(NameError::malformed(
                path,
                "path component contains whitespace or a reserved character",
            ));
        }
    }
    Ok(())
}

/// Report whether `path` names an Access file: a valid namespace path whose
/// final component is exactly `Access`.
pub fn is_access_file_name(path: &str) -> bool {
    validate_path(path).is_ok() && path.rsplit('/').next() == Some(ACCESS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everyone() {
        assert_eq!(validate("*").unwrap(), GranteeKind::Everyone);
        assert_eq!(validate("  *  ").unwrap(), GranteeKind::Everyone);
    }

    #[test]
    fn test_user_names() {
        assert_eq!(validate("ann@example.com").unwrap(), GranteeKind::User);
        assert_eq!(validate("a@b").unwrap(), GranteeKind::User);

        assert!(validate("ann").is_err());
        assert!(validate("@example.com").is_err());
        assert!(validate("ann@").is_err());
        assert!(validate("ann@@example.com").is_err());
        assert!(validate("ann smith@example.com").is_err());
        assert!(validate("ann@example.com:x").is_err());
    }

    #[test]
    fn test_group_paths() {
        assert_eq!(
            validate("me@example.com/Group/friends").unwrap(),
            GranteeKind::Group
        );

        assert!(validate("me@example.com/").is_err());
        assert!(validate("me@example.com//friends").is_err());
        assert!(validate("me@example.com/../friends").is_err());
        assert!(validate("example.com/Group/friends").is_err());
        assert!(validate("/Group/friends").is_err());
    }

    #[test]
    fn test_empty_token() {
        let err = validate("   ").unwrap_err();
        assert!(matches!(err, NameError::Malformed { .. }));
    }

    #[test]
    fn test_is_access_file_name() {
        assert!(is_access_file_name("me@example.com/Access"));
        assert!(is_access_file_name("me@example.com/photos/Access"));

        assert!(!is_access_file_name("me@example.com/photos/notAccess"));
        assert!(!is_access_file_name("me@example.com/photos/access"));
        assert!(!is_access_file_name("me@example.com/Access/photo.jpg"));
        assert!(!is_access_file_name("Access"));
        assert!(!is_access_file_name("me@example.com/photos//Access"));
    }
}
