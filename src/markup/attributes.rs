//! Scanner for the attribute lists of raw tag lines.
//!
//! Handles `key="value" other=bare` sequences. There is no escape mechanism:
//! the first `"` after `=` opens a value and the next `"` closes it.

use super::error::{MarkupError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Key,
    AwaitingValue,
    Quoted,
    Bare,
}

/// Parse an attribute list into ordered key/value pairs.
pub fn parse(input: &str) -> Result<Vec<(String, String)>> {
    let malformed = |reason| MarkupError::MalformedAttributeList {
        input: input.to_string(),
        reason,
    };

    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut store = |key: &mut String, value: &mut String| {
        let key = std::mem::take(key);
        let value = std::mem::take(value);
        match attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => attributes.push((key, value)),
        }
    };

    let mut state = State::Key;
    let mut key = String::new();
    let mut value = String::new();

    for c in input.chars() {
        match state {
            State::Key => {
                if c == '=' {
                    if key.is_empty() {
                        return Err(malformed("attribute value without a key"));
                    }
                    state = State::AwaitingValue;
                } else if c.is_whitespace() {
                    // whitespace between pairs
                    if !key.is_empty() {
                        return Err(malformed("whitespace inside attribute key"));
                    }
                } else {
                    key.push(c);
                }
            }
            State::AwaitingValue => {
                if c == '"' {
                    state = State::Quoted;
                } else if c.is_whitespace() {
                    store(&mut key, &mut value);
                    state = State::Key;
                } else {
                    value.push(c);
                    state = State::Bare;
                }
            }
            State::Quoted => {
                if c == '"' {
                    store(&mut key, &mut value);
                    state = State::Key;
                } else {
                    value.push(c);
                }
            }
            State::Bare => {
                if c.is_whitespace() {
                    store(&mut key, &mut value);
                    state = State::Key;
                } else {
                    value.push(c);
                }
            }
        }
    }

    match state {
        State::Key if !key.is_empty() => return Err(malformed("attribute key without a value")),
        State::Key => {}
        State::Quoted => return Err(malformed("unterminated attribute value")),
        State::AwaitingValue | State::Bare => store(&mut key, &mut value),
    }

    Ok(attributes)
}

#[cfg(test)]
mod test {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_quoted_pairs() {
        assert_eq!(
            parse(r#"src="cover.gif" alt="The cover""#).expect("can parse"),
            pairs(&[("src", "cover.gif"), ("alt", "The cover")])
        );
    }

    #[test]
    fn skips_runs_of_whitespace() {
        assert_eq!(
            parse(r#"  a="1"    b="2"   "#).expect("can parse"),
            pairs(&[("a", "1"), ("b", "2")])
        );
    }

    #[test]
    fn accepts_bare_values() {
        assert_eq!(
            parse(r#"width=100 height="50""#).expect("can parse"),
            pairs(&[("width", "100"), ("height", "50")])
        );
        assert_eq!(
            parse("width=100").expect("can parse"),
            pairs(&[("width", "100")])
        );
    }

    #[test]
    fn quotes_have_no_escapes() {
        // the backslash is kept and the second quote closes the value
        assert_eq!(
            parse(r#"title="a \" x="y""#).expect("can parse"),
            pairs(&[("title", "a \\"), ("x", "y")])
        );
    }

    #[test]
    fn whitespace_in_key_is_an_error() {
        assert!(matches!(
            parse(r#"data src="x""#),
            Err(MarkupError::MalformedAttributeList { .. })
        ));
    }

    #[test]
    fn unterminated_values_are_errors() {
        assert!(parse(r#"src="cover.gif"#).is_err());
        assert!(parse("src").is_err());
        assert!(parse(r#"="x""#).is_err());
    }

    #[test]
    fn empty_input_has_no_attributes() {
        assert!(parse("").expect("can parse").is_empty());
        assert!(parse("   ").expect("can parse").is_empty());
    }
}
