//! Normalization of list-valued request fields.

use crate::config::NormalizeConfig;
use ephemq_types::raw::RawValue;

/// Characters removed from a delimited list string before splitting.
const STRIPPED: [char; 4] = ['[', ']', '\'', '"'];

/// Converts a raw list-like value into an ordered sequence of string tokens.
///
/// - absent stays absent (distinct from an empty list)
/// - a native list is kept in order, duplicates included
/// - a scalar becomes a one-element list
/// - a string has brackets, quotes and whitespace stripped, then is split on `,`
///
/// Tokens are never coerced to numbers or booleans.
///
/// # Examples
///
/// ```
/// use ephemq::compute::list::normalize_list;
/// use ephemq::config::NormalizeConfig;
/// use ephemq_types::raw::RawValue;
///
/// let config = NormalizeConfig::default();
/// let raw = RawValue::text("['smithed', 'reconstructed']");
/// assert_eq!(
///     normalize_list(Some(&raw), &config),
///     Some(vec!["smithed".to_string(), "reconstructed".to_string()])
/// );
///
/// assert_eq!(normalize_list(None, &config), None);
/// ```
pub fn normalize_list(raw: Option<&RawValue>, config: &NormalizeConfig) -> Option<Vec<String>> {
    let raw = raw?;
    let tokens = match raw {
        RawValue::List(items) => {
            let mut tokens = Vec::with_capacity(items.len());
            flatten_into(items, &mut tokens);
            tokens
        }
        RawValue::Text(s) => split_delimited(s, config),
        scalar => vec![scalar.to_string()],
    };
    Some(tokens)
}

fn flatten_into(items: &[RawValue], out: &mut Vec<String>) {
    for item in items {
        match item {
            RawValue::List(nested) => flatten_into(nested, out),
            RawValue::Text(s) => out.push(s.clone()),
            scalar => out.push(scalar.to_string()),
        }
    }
}

/// Splits a bracket/quote-delimited string into tokens.
///
/// An input that is empty after stripping yields an empty list, never `[""]`.
pub fn split_delimited(value: &str, config: &NormalizeConfig) -> Vec<String> {
    let stripped: String = value
        .chars()
        .filter(|c| {
            !(STRIPPED.contains(c) || c.is_whitespace() || (config.strip_backslashes && *c == '\\'))
        })
        .collect();

    if stripped.is_empty() {
        return Vec::new();
    }

    stripped.split(',').map(str::to_string).collect()
}
