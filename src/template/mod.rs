//! Named-placeholder string formatting.
//!
//! Every export formatter renders its output through [`named_format`], so the
//! templates of all formats are configurable the same way.
//!
//! # Syntax
//!
//! Besides ordinary `printf` directives (see [`printf`]), a directive may name
//! its argument: `%key$conversion`, where `key` matches `[A-Za-z0-9_.-]+`.
//! Named directives are rewritten to positional ones using the key's position
//! in the argument map, then formatted positionally.
//!
//! A named directive whose key is not among the arguments is kept verbatim
//! in the output (`%missing$s` stays `%missing$s`).
//!
//! # Example
//!
//! ```
//! use environaut::parameters::Parameters;
//! use environaut::template::named_format;
//! use serde_json::json;
//!
//! let args = Parameters::from_value(&json!({"param": "Value", "min": 3, "max": 99}));
//! let text = named_format("%param$s must be between %min$03d and %max$03d.", &args).unwrap();
//! assert_eq!(text, "Value must be between 003 and 099.");
//! ```

pub mod printf;

pub use printf::{sprintf, value_to_string};

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{EnvironautError, Result};
use crate::parameters::Parameters;

/// Format `format` with named and positional directives.
///
/// # Errors
///
/// Returns the errors of [`sprintf`] for malformed or out-of-range
/// positional directives.
pub fn named_format(format: &str, args: &Parameters) -> Result<String> {
    let positions: HashMap<&str, usize> = args
        .iter()
        .enumerate()
        .map(|(i, (key, _))| (key.as_str(), i + 1))
        .collect();
    let values: Vec<Value> = args.iter().map(|(_, v)| v.clone()).collect();

    sprintf(&rewrite_named(format, &positions), &values)
}

/// Like [`named_format`], for a format that comes from untyped config.
///
/// # Errors
///
/// Returns `InvalidFormatType` if `format` is not a string.
pub fn format_value(format: &Value, args: &Parameters) -> Result<String> {
    match format {
        Value::String(format) => named_format(format, args),
        other => Err(EnvironautError::InvalidFormatType {
            found: other.to_string(),
        }),
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Rewrite `%key$` into `%N$`. Unknown keys are escaped to `%%key$` so the
/// directive prints literally.
fn rewrite_named(format: &str, positions: &HashMap<&str, usize>) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;

    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(stripped) = after.strip_prefix('%') {
            out.push_str("%%");
            rest = stripped;
            continue;
        }

        let key_len = after.find(|c: char| !is_key_char(c)).unwrap_or(after.len());
        let key = &after[..key_len];
        match after[key_len..].strip_prefix('$') {
            Some(tail) if !key.is_empty() => {
                if key.bytes().all(|b| b.is_ascii_digit()) {
                    out.push('%');
                    out.push_str(key);
                } else if let Some(position) = positions.get(key) {
                    out.push('%');
                    out.push_str(&position.to_string());
                } else {
                    tracing::debug!("Template placeholder '{}' has no value", key);
                    out.push_str("%%");
                    out.push_str(key);
                }
                out.push('$');
                rest = tail;
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        Parameters::from_value(&value)
    }

    #[test]
    fn named_placeholders_use_insertion_order() {
        let args = params(json!({"param": "Value", "min": 3, "max": 99}));
        assert_eq!(
            named_format("%param$s must be between %min$03d and %max$03d.", &args).unwrap(),
            "Value must be between 003 and 099."
        );
    }

    #[test]
    fn named_and_positional_mix() {
        let args = params(json!({"a": "first", "b": "second"}));
        assert_eq!(named_format("%b$s %1$s", &args).unwrap(), "second first");
    }

    #[test]
    fn unknown_key_is_kept_verbatim() {
        let args = params(json!({"known": "yes"}));
        assert_eq!(
            named_format("%known$s / %missing$s", &args).unwrap(),
            "yes / %missing$s"
        );
    }

    #[test]
    fn dotted_keys_are_supported() {
        let args = params(json!({"database.host": "db.local"}));
        assert_eq!(
            named_format("host=%database.host$s", &args).unwrap(),
            "host=db.local"
        );
    }

    #[test]
    fn plain_directives_pass_through() {
        let args = params(json!({"n": 5}));
        assert_eq!(named_format("%d%% of %n$d", &args).unwrap(), "5% of 5");
        assert_eq!(named_format("%.2f", &params(json!({"x": 1.5}))).unwrap(), "1.50");
    }

    #[test]
    fn escaped_percent_is_not_a_placeholder() {
        let args = params(json!({"name": "x"}));
        assert_eq!(named_format("%%name$s", &args).unwrap(), "%name$s");
    }

    #[test]
    fn format_value_requires_string() {
        let args = Parameters::new();
        assert!(matches!(
            format_value(&json!(["not", "a", "string"]), &args),
            Err(EnvironautError::InvalidFormatType { .. })
        ));
        assert_eq!(format_value(&json!("plain"), &args).unwrap(), "plain");
    }
}
