//! Access file parser
//!
//! The grammar is line oriented:
//!
//! ```text
//! # comment
//! read, list: ann@example.com, me@example.com/Group/friends
//! write: bob@example.com
//! *: me@example.com
//! ```
//!
//! Right names are case-insensitive, `*` and `all` stand for every right,
//! and a `#` starts a comment running to the end of the line. Repeated rights
//! are unioned. Parsing stops at the first malformed line.

use crate::access::types::{Grantee, RightKind, RightSpec, RightsModel, split_list};
use crate::error::{ParseError, ParseErrorKind};
use tracing::{debug, trace};

/// One non-blank line of an Access file, before grantee validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessClause<'a> {
    /// 1-based line number
    pub line: usize,
    pub rights: Vec<RightSpec>,
    pub grantees: Vec<&'a str>,
}

/// Parse the bytes of the Access file at `path` into a rights model.
///
/// Each line is decoded, split and has its grantees validated before the
/// next line is looked at, so the reported error is always the first one.
pub fn parse(path: &str, bytes: &[u8]) -> Result<RightsModel, ParseError> {
    let mut model = RightsModel::new();

    for clause in lex(path, bytes) {
        let clause = clause?;
        let rights: Vec<RightKind> = clause
            .rights
            .iter()
            .flat_map(|spec| spec.kinds().iter().copied())
            .collect();

        for token in clause.grantees {
            let grantee = Grantee::new(token).map_err(|reason| {
                ParseError::new(
                    path,
                    clause.line,
                    ParseErrorKind::InvalidGrantee {
                        token: token.to_string(),
                        reason,
                    },
                )
            })?;
            for &right in &rights {
                model.insert(right, grantee.clone());
            }
        }
    }

    debug!(
        path,
        grantees = model.iter().map(|(_, set)| set.len()).sum::<usize>(),
        "Parsed Access file"
    );
    Ok(model)
}

/// Split an Access file into clauses, skipping blank and comment lines.
///
/// Grantee tokens are returned as written; only `parse` validates them.
pub fn clauses<'a>(path: &str, bytes: &'a [u8]) -> Result<Vec<AccessClause<'a>>, ParseError> {
    lex(path, bytes).collect()
}

fn lex<'a, 'p>(
    path: &'p str,
    bytes: &'a [u8],
) -> impl Iterator<Item = Result<AccessClause<'a>, ParseError>> + use<'a, 'p> {
    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .filter_map(move |(index, raw)| {
            let line = index + 1;
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let result = std::str::from_utf8(raw)
                .map_err(|_| ParseErrorKind::InvalidUtf8)
                .and_then(parse_line);
            match result {
                Ok(Some((rights, grantees))) => {
                    trace!(path, line, ?rights, "Access clause");
                    Some(Ok(AccessClause {
                        line,
                        rights,
                        grantees,
                    }))
                }
                Ok(None) => None,
                Err(kind) => Some(Err(ParseError::new(path, line, kind))),
            }
        })
}

type Clause<'a> = (Vec<RightSpec>, Vec<&'a str>);

fn parse_line(raw: &str) -> Result<Option<Clause<'_>>, ParseErrorKind> {
    let content = raw.split_once('#').map_or(raw, |(before, _)| before).trim();
    if content.is_empty() {
        return Ok(None);
    }

    let (names, list) = content
        .split_once(':')
        .ok_or(ParseErrorKind::MissingColon)?;

    let rights = names
        .split(',')
        .map(str::trim)
        .map(|name| {
            RightSpec::try_parse(name).ok_or_else(|| ParseErrorKind::UnknownRight(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some((rights, split_list(list).collect())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "me@example.com/Access";

    #[test]
    fn test_parse_simple() {
        let model = parse(PATH, b"read: ann@example.com\nwrite: bob@example.com\n").unwrap();
        assert_eq!(model.users_with(RightKind::Read), vec!["ann@example.com"]);
        assert_eq!(model.users_with(RightKind::Write), vec!["bob@example.com"]);
        assert!(model.grantees(RightKind::Own).is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let text = "# who can see this\n\n   # indented comment\nlist: ann@example.com # trailing\n";
        let model = parse(PATH, text.as_bytes()).unwrap();
        assert_eq!(model.users_with(RightKind::List), vec!["ann@example.com"]);
    }

    #[test]
    fn test_empty_list_is_legal() {
        let model = parse(PATH, b"read:\ndelete:   \n").unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn test_missing_colon() {
        let err = parse(PATH, b"read ann@example.com\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.kind, ParseErrorKind::MissingColon);
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let err = parse(PATH, b"read: ann@example.com\nwrite: \xff\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
    }

    #[test]
    fn test_clauses_keep_raw_tokens() {
        let text = b"read, LIST: ann@example.com , bob\n";
        let clauses = clauses(PATH, text).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(
            clauses[0].rights,
            vec![
                RightSpec::One(RightKind::Read),
                RightSpec::One(RightKind::List)
            ]
        );
        assert_eq!(clauses[0].grantees, vec!["ann@example.com", "bob"]);
    }

    #[test]
    fn test_grantee_checked_before_later_lines() {
        let err = parse(PATH, b"read: bob\nfoo: carl@example.com\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(matches!(
            err.kind,
            ParseErrorKind::InvalidGrantee { ref token, .. } if token == "bob"
        ));
    }

    #[test]
    fn test_unknown_right_before_later_bad_utf8() {
        let err = parse(PATH, b"owner: ann@example.com\nread: \xff\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.kind, ParseErrorKind::UnknownRight("owner".into()));
    }

    #[test]
    fn test_clauses_stop_at_first_bad_line() {
        let err = clauses(PATH, b"read: ann@example.com\nwrite ann\n\xff\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, ParseErrorKind::MissingColon);
    }

    #[test]
    fn test_crlf_line_endings() {
        let model = parse(PATH, b"read: ann@example.com\r\nwrite: bob@example.com\r\n").unwrap();
        assert!(model.contains(RightKind::Write, "bob@example.com"));
    }
}
