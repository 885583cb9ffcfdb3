//! Request item classification.
//!
//! A request item is one freeform command-line token after the URL:
//!
//! ```text
//! key=value     body field
//! Name:Value    header assignment (empty Value removes the header)
//! ```
//!
//! The first `:` or `=` in the token decides its kind. The other delimiter
//! may then appear freely in the value (`url=http://host:8080/`,
//! `X-Query:a=b`), but a second occurrence of the deciding delimiter makes
//! the token ambiguous and it is rejected. A token therefore yields at most
//! one item, never both a header and a body field.

use serde::{Deserialize, Serialize};

use crate::error::{GurlError, Result};

/// Outcome of classifying one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedItem {
    Header { name: String, value: String },
    Body { key: String, value: String },
    Invalid,
}

/// A token that classified cleanly: what the request builder consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Header { name: String, value: String },
    Body { key: String, value: String },
}

impl From<Assignment> for ParsedItem {
    fn from(assignment: Assignment) -> Self {
        match assignment {
            Assignment::Header { name, value } => ParsedItem::Header { name, value },
            Assignment::Body { key, value } => ParsedItem::Body { key, value },
        }
    }
}

/// Classify a single token. Never fails; use [`parse_item`] to turn
/// `Invalid` into an error.
pub fn classify(token: &str) -> ParsedItem {
    // `@` passes the gate but file fields are not supported, so a token
    // whose only delimiter is `@` falls through to Invalid below.
    if !token.contains([':', '@', '=']) {
        return ParsedItem::Invalid;
    }
    let Some(at) = token.find([':', '=']) else {
        return ParsedItem::Invalid;
    };
    let delimiter = token.as_bytes()[at] as char;
    let (name, value) = (&token[..at], &token[at + 1..]);
    if name.is_empty() || value.contains(delimiter) {
        return ParsedItem::Invalid;
    }

    if delimiter == ':' {
        if !is_header_name(name) || value.contains(['\r', '\n']) {
            return ParsedItem::Invalid;
        }
        ParsedItem::Header {
            name: name.to_string(),
            value: value.to_string(),
        }
    } else {
        ParsedItem::Body {
            key: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Classify a token, failing with a usage error that names it.
pub fn parse_item(token: &str) -> Result<Assignment> {
    match classify(token) {
        ParsedItem::Header { name, value } => Ok(Assignment::Header { name, value }),
        ParsedItem::Body { key, value } => Ok(Assignment::Body { key, value }),
        ParsedItem::Invalid if !token.contains([':', '=']) && token.contains('@') => Err(
            GurlError::usage(format!("file fields are not supported: {token}")),
        ),
        ParsedItem::Invalid => Err(GurlError::usage(format!("invalid request item {token}"))),
    }
}

/// Classify every token in order, stopping at the first invalid one.
pub fn parse_items<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Assignment>> {
    tokens.iter().map(|t| parse_item(t.as_ref())).collect()
}

/// RFC 9110 token characters.
fn is_header_name(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={}";
    name.bytes()
        .all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(key: &str, value: &str) -> ParsedItem {
        ParsedItem::Body {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn header(name: &str, value: &str) -> ParsedItem {
        ParsedItem::Header {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn key_value_is_a_body_field() {
        assert_eq!(classify("name=joe"), body("name", "joe"));
        assert_eq!(classify("name="), body("name", ""));
        assert_eq!(classify("q=hello world"), body("q", "hello world"));
    }

    #[test]
    fn values_are_not_unescaped() {
        assert_eq!(classify("a=%20+"), body("a", "%20+"));
    }

    #[test]
    fn name_colon_value_is_a_header() {
        assert_eq!(classify("X-Api-Key:secret"), header("X-Api-Key", "secret"));
        assert_eq!(classify("Accept:"), header("Accept", ""));
    }

    #[test]
    fn first_delimiter_decides() {
        assert_eq!(classify("url=http://host:8080/"), body("url", "http://host:8080/"));
        assert_eq!(classify("X-Query:a=b"), header("X-Query", "a=b"));
    }

    #[test]
    fn repeated_deciding_delimiter_is_ambiguous() {
        assert_eq!(classify("a=b=c"), ParsedItem::Invalid);
        assert_eq!(classify("Referer:http://x"), ParsedItem::Invalid);
        assert_eq!(classify("a:b=c:d"), ParsedItem::Invalid);
    }

    #[test]
    fn tokens_without_delimiters_are_invalid() {
        assert_eq!(classify("plain"), ParsedItem::Invalid);
        assert_eq!(classify(""), ParsedItem::Invalid);
        assert_eq!(classify("=value"), ParsedItem::Invalid);
        assert_eq!(classify(":value"), ParsedItem::Invalid);
    }

    #[test]
    fn bad_header_names_and_values_are_invalid() {
        assert_eq!(classify("Bad Name:x"), ParsedItem::Invalid);
        assert_eq!(classify("X-Evil:a\r\nHost"), ParsedItem::Invalid);
    }

    #[test]
    fn file_fields_get_their_own_message() {
        let err = parse_item("file@data.bin").unwrap_err();
        assert_eq!(err.to_string(), "file fields are not supported: file@data.bin");
    }

    #[test]
    fn invalid_items_name_the_token() {
        let err = parse_item("oops").unwrap_err();
        assert!(matches!(err, GurlError::Usage(_)));
        assert_eq!(err.to_string(), "invalid request item oops");
    }

    #[test]
    fn parse_items_stops_at_first_invalid() {
        let err = parse_items(&["a=1", "bad", "c=3=4"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid request item bad");

        let items = parse_items(&["a=1", "X:y"]).unwrap();
        let items: Vec<ParsedItem> = items.into_iter().map(ParsedItem::from).collect();
        assert_eq!(items, vec![body("a", "1"), header("X", "y")]);
    }

    #[test]
    fn parsed_assignments_are_never_invalid() {
        assert_eq!(
            parse_item("X-Query:a=b").unwrap(),
            Assignment::Header {
                name: "X-Query".to_string(),
                value: "a=b".to_string()
            }
        );
        assert!(parse_item("a=b=c").is_err());
    }
}
