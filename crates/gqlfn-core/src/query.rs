//! URL query string parsing.

use std::collections::BTreeMap;

use crate::error::HandlerError;

/// Decode an `application/x-www-form-urlencoded` query string.
///
/// A leading `?` is tolerated. `+` decodes to a space. When a key repeats,
/// the last value wins.
pub fn parse_query_string(raw: &str) -> Result<BTreeMap<String, String>, HandlerError> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    if raw.is_empty() {
        return Ok(BTreeMap::new());
    }
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
        .map_err(|e| HandlerError::MalformedPayload(format!("invalid query string: {e}")))?;
    Ok(pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert!(parse_query_string("").unwrap().is_empty());
        assert!(parse_query_string("?").unwrap().is_empty());
    }

    #[test]
    fn plus_and_percent_decoding() {
        let map = parse_query_string("query=%7B+sysInfo+%7D&operationName=Q").unwrap();
        assert_eq!(map["query"], "{ sysInfo }");
        assert_eq!(map["operationName"], "Q");
    }

    #[test]
    fn leading_question_mark() {
        let map = parse_query_string("?a=1").unwrap();
        assert_eq!(map["a"], "1");
    }

    #[test]
    fn last_value_wins() {
        let map = parse_query_string("a=1&a=2").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["a"], "2");
    }

    #[test]
    fn key_without_value() {
        let map = parse_query_string("flag").unwrap();
        assert_eq!(map["flag"], "");
    }
}
