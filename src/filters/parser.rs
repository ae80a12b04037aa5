//! One-line filter query parser.
//!
//! Turns text typed by a user into a [`FilterSpec`]. This is input handling, so
//! malformed queries are rejected here; the filtering core only ever sees
//! well-formed specifications.
//!
//! # Syntax
//!
//! ```text
//! query := field_filter (AND? field_filter)*
//! field_filter := field_name:value | field_name:"quoted value"
//! field_name := author | topic | since | until (case-insensitive)
//! ```
//!
//! # Supported Fields
//!
//! - `author:text` - Substring of the author name or email (case-insensitive)
//! - `topic:text` - Substring of the commit subject (case-insensitive)
//! - `since:YYYY-MM-DD` - Authored on or after the start of that day
//! - `until:YYYY-MM-DD` - Authored no later than the start of that day
//!
//! # Examples
//!
//! ```rust
//! # use commit_browser::filters::parser::parse_query;
//! let spec = parse_query("author:jane").unwrap();
//! assert_eq!(spec.primary_text_query(), Some("jane"));
//!
//! let spec = parse_query("topic:\"fix crash\" AND since:2024-01-01").unwrap();
//! assert_eq!(spec.secondary_text_query(), Some("fix crash"));
//! ```
//!
//! Every field may appear at most once; all fields are combined with AND.

use anyhow::{Context, Result, anyhow, bail};

use super::spec::{FilterSpec, parse_day};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// field:value or field:"quoted value"
    FieldValue { field: String, value: String },
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryField {
    Author,
    Topic,
    Since,
    Until,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let word = read_word(&mut chars);

        match word.to_uppercase().as_str() {
            "AND" => tokens.push(Token::And),
            "OR" => tokens.push(Token::Or),
            _ => {
                let Some(colon_pos) = word.find(':') else {
                    bail!("Invalid token: '{}' (expected field:value)", word);
                };
                let field = word[..colon_pos].to_string();
                let mut value = word[colon_pos + 1..].to_string();

                if value.starts_with('"') {
                    value = read_quoted_value(&mut chars, &value)?;
                }

                if field.is_empty() || value.is_empty() {
                    bail!("Invalid field:value format: {}", word);
                }

                tokens.push(Token::FieldValue { field, value });
            }
        }
    }

    Ok(tokens)
}

fn read_word(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut word = String::new();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            break;
        }
        word.push(ch);
        chars.next();
    }

    word
}

/// Read a quoted value whose opening quote (and maybe more) is already in `initial`
fn read_quoted_value(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    initial: &str,
) -> Result<String> {
    let mut value = initial[1..].to_string();

    if let Some(quote_pos) = value.find('"') {
        return Ok(value[..quote_pos].to_string());
    }

    for ch in chars.by_ref() {
        if ch == '"' {
            return Ok(value);
        }
        value.push(ch);
    }

    Err(anyhow!("Unterminated quoted string"))
}

fn parse_field(field: &str) -> Result<QueryField> {
    match field.to_lowercase().as_str() {
        "author" => Ok(QueryField::Author),
        "topic" => Ok(QueryField::Topic),
        "since" => Ok(QueryField::Since),
        "until" => Ok(QueryField::Until),
        _ => Err(anyhow!("Unknown field: '{}' (valid fields: author, topic, since, until)", field)),
    }
}

/// Parse a query string into a [`FilterSpec`]
///
/// An empty or whitespace-only query yields the match-everything spec.
pub fn parse_query(input: &str) -> Result<FilterSpec> {
    let tokens = tokenize(input).context("Failed to tokenize filter")?;

    let mut builder = FilterSpec::builder();
    let mut seen: Vec<QueryField> = Vec::new();
    let mut expecting_filter = true;
    let mut pending_and = false;

    for token in tokens {
        match token {
            Token::FieldValue { field, value } => {
                let query_field = parse_field(&field)?;
                if seen.contains(&query_field) {
                    bail!("Field '{}' given more than once", field.to_lowercase());
                }
                seen.push(query_field);

                builder = match query_field {
                    QueryField::Author => builder.primary_text(Some(value.as_str())),
                    QueryField::Topic => builder.secondary_text(Some(value.as_str())),
                    QueryField::Since => builder.start_date(Some(parse_date_value(&value)?)),
                    QueryField::Until => builder.end_date(Some(parse_date_value(&value)?)),
                };
                expecting_filter = false;
                pending_and = false;
            }
            Token::And => {
                if expecting_filter {
                    bail!("Unexpected AND operator (expected field:value)");
                }
                expecting_filter = true;
                pending_and = true;
            }
            Token::Or => bail!("OR is not supported (all fields are combined with AND)"),
        }
    }

    if pending_and {
        bail!("Filter ended with operator (expected field:value)");
    }

    Ok(builder.build())
}

fn parse_date_value(value: &str) -> Result<chrono::NaiveDate> {
    parse_day(value).ok_or_else(|| anyhow!("Invalid date format: '{}' (expected YYYY-MM-DD)", value))
}
