//! Positional `printf`-style formatting over JSON values.
//!
//! # Directive syntax
//!
//! `%[argnum$][flags][width][.precision]conversion`
//!
//! - `argnum$` - 1-based argument position; without it arguments are
//!   consumed in order
//! - flags - `-` left-justify, `+` always print a sign, space or `0` as pad
//!   character, `'c` pads with `c`
//! - conversions - `b c d e E f F o s u x X`, plus `%%` for a literal `%`
//!
//! Values are coerced loosely: `true` prints as `1`, `false` and `null` as
//! an empty string, arrays and objects as JSON text.

use serde_json::Value;

use crate::error::{EnvironautError, Result};

const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Largest width or precision a directive may request.
const MAX_FIELD_SIZE: usize = 1 << 20;

#[derive(Debug, Default)]
struct Directive {
    argnum: Option<usize>,
    left: bool,
    plus: bool,
    pad: Option<char>,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

/// Format `format` with positional `args`.
///
/// # Errors
///
/// Returns `MissingArgument` if a directive refers past the end of `args`
/// and `UnknownConversion` for an unsupported conversion character.
pub fn sprintf(format: &str, args: &[Value]) -> Result<String> {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let directive = parse_directive(&mut chars, format)?;
        let index = match directive.argnum {
            Some(n) => n.checked_sub(1).ok_or(EnvironautError::MissingArgument {
                position: 0,
                available: args.len(),
            })?,
            None => {
                next_arg += 1;
                next_arg - 1
            }
        };
        let arg = args.get(index).ok_or(EnvironautError::MissingArgument {
            position: index + 1,
            available: args.len(),
        })?;

        out.push_str(&render(&directive, arg));
    }

    Ok(out)
}

fn parse_directive(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, format: &str) -> Result<Directive> {
    let mut directive = Directive::default();

    // An argnum is a run of digits terminated by `$`; otherwise the digits
    // are flags/width and must be re-read.
    let mut lookahead = chars.clone();
    let mut digits = String::new();
    while let Some(d) = lookahead.peek().filter(|c| c.is_ascii_digit()) {
        digits.push(*d);
        lookahead.next();
    }
    if !digits.is_empty() && lookahead.peek() == Some(&'$') {
        lookahead.next();
        // Too large to parse means out of range.
        directive.argnum = Some(digits.parse().unwrap_or(usize::MAX));
        *chars = lookahead;
    }

    loop {
        match chars.peek() {
            Some('-') => directive.left = true,
            Some('+') => directive.plus = true,
            Some('0') => directive.pad = Some('0'),
            Some(' ') => directive.pad = Some(' '),
            Some('\'') => {
                chars.next();
                directive.pad = chars.peek().copied();
            }
            _ => break,
        }
        chars.next();
    }

    directive.width = field_size(chars, format)?;

    if chars.peek() == Some(&'.') {
        chars.next();
        directive.precision = Some(field_size(chars, format)?);
    }

    directive.conversion = match chars.next() {
        Some(c @ ('b' | 'c' | 'd' | 'e' | 'E' | 'f' | 'F' | 'o' | 's' | 'u' | 'x' | 'X')) => c,
        other => {
            return Err(EnvironautError::UnknownConversion {
                conversion: other.unwrap_or(' '),
                format: format.to_string(),
            })
        }
    };

    Ok(directive)
}

/// Read a width or precision.
fn field_size(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, format: &str) -> Result<usize> {
    let mut size: usize = 0;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        size = size
            .checked_mul(10)
            .and_then(|n| n.checked_add(d as usize))
            .filter(|n| *n <= MAX_FIELD_SIZE)
            .ok_or_else(|| EnvironautError::FieldTooLarge {
                max: MAX_FIELD_SIZE,
                format: format.to_string(),
            })?;
        chars.next();
    }
    Ok(size)
}

fn render(directive: &Directive, arg: &Value) -> String {
    match directive.conversion {
        's' => {
            let mut text = value_to_string(arg);
            if let Some(precision) = directive.precision {
                text = text.chars().take(precision).collect();
            }
            pad(directive, String::new(), text)
        }
        'c' => {
            let code = u32::try_from(value_to_i64(arg)).unwrap_or(0);
            char::from_u32(code).map(String::from).unwrap_or_default()
        }
        'd' => {
            let n = value_to_i64(arg);
            pad(directive, sign(directive, n < 0), n.unsigned_abs().to_string())
        }
        'u' => pad(directive, String::new(), (value_to_i64(arg) as u64).to_string()),
        'b' => pad(directive, String::new(), format!("{:b}", value_to_i64(arg))),
        'o' => pad(directive, String::new(), format!("{:o}", value_to_i64(arg))),
        'x' => pad(directive, String::new(), format!("{:x}", value_to_i64(arg))),
        'X' => pad(directive, String::new(), format!("{:X}", value_to_i64(arg))),
        'f' | 'F' => {
            let f = value_to_f64(arg);
            let precision = directive.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
            pad(
                directive,
                sign(directive, f.is_sign_negative() && f != 0.0),
                format!("{:.*}", precision, f.abs()),
            )
        }
        'e' | 'E' => {
            let f = value_to_f64(arg);
            let precision = directive.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
            let mut body = exponent_notation(f.abs(), precision);
            if directive.conversion == 'E' {
                body = body.to_uppercase();
            }
            pad(directive, sign(directive, f.is_sign_negative() && f != 0.0), body)
        }
        _ => String::new(),
    }
}

fn sign(directive: &Directive, negative: bool) -> String {
    if negative {
        "-".to_string()
    } else if directive.plus {
        "+".to_string()
    } else {
        String::new()
    }
}

/// `1.5e+3` style: the exponent always carries a sign and is not padded.
fn exponent_notation(f: f64, precision: usize) -> String {
    let formatted = format!("{:.*e}", precision, f);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{}e{}", mantissa, exp),
        Some((mantissa, exp)) => format!("{}e+{}", mantissa, exp),
        None => formatted,
    }
}

fn pad(directive: &Directive, sign: String, body: String) -> String {
    let len = sign.chars().count() + body.chars().count();
    if len >= directive.width {
        return sign + &body;
    }
    let pad_char = directive.pad.unwrap_or(' ');
    let fill: String = std::iter::repeat_n(pad_char, directive.width - len).collect();
    if directive.left {
        // Zeros on the right would change a number's value.
        let fill = if pad_char == '0' {
            " ".repeat(directive.width - len)
        } else {
            fill
        };
        sign + &body + &fill
    } else if pad_char == '0' {
        sign + &fill + &body
    } else {
        fill + &sign + &body
    }
}

/// Loose string coercion used by `%s` and by formatters.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn value_to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| u as i64))
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => leading_number(s).map(|f| f as i64).unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::Null => 0,
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(map) => i64::from(!map.is_empty()),
    }
}

fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => leading_number(s).unwrap_or(0.0),
        other => value_to_i64(other) as f64,
    }
}

/// Parse the numeric prefix of a string (`"42abc"` is 42).
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .take_while(|(i, c)| {
            c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))
        })
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fmt(format: &str, args: &[Value]) -> String {
        sprintf(format, args).unwrap()
    }

    #[test]
    fn sequential_and_positional_arguments() {
        assert_eq!(fmt("%s-%s", &[json!("a"), json!("b")]), "a-b");
        assert_eq!(fmt("%2$s-%1$s", &[json!("a"), json!("b")]), "b-a");
        assert_eq!(fmt("%1$s %1$s", &[json!("x")]), "x x");
    }

    #[test]
    fn zero_padding_and_width() {
        assert_eq!(fmt("%03d", &[json!(3)]), "003");
        assert_eq!(fmt("%2$03d", &[json!(0), json!(99)]), "099");
        assert_eq!(fmt("%5s|", &[json!("ab")]), "   ab|");
        assert_eq!(fmt("%-5s|", &[json!("ab")]), "ab   |");
        assert_eq!(fmt("%'*6s", &[json!("ab")]), "****ab");
        assert_eq!(fmt("%05d", &[json!(-3)]), "-0003");
    }

    #[test]
    fn precision() {
        assert_eq!(fmt("%.2f", &[json!(3.14159)]), "3.14");
        assert_eq!(fmt("%f", &[json!(1)]), "1.000000");
        assert_eq!(fmt("%.3s", &[json!("abcdef")]), "abc");
        assert_eq!(fmt("%+d", &[json!(5)]), "+5");
    }

    #[test]
    fn integer_bases() {
        assert_eq!(fmt("%x %X %o %b", &[json!(255), json!(255), json!(8), json!(5)]), "ff FF 10 101");
        assert_eq!(fmt("%c", &[json!(65)]), "A");
    }

    #[test]
    fn exponent() {
        assert_eq!(fmt("%.2e", &[json!(1234.5)]), "1.23e+3");
        assert_eq!(fmt("%.1E", &[json!(0.05)]), "5.0E-2");
    }

    #[test]
    fn loose_coercion() {
        assert_eq!(fmt("[%s][%s][%s]", &[json!(true), json!(false), json!(null)]), "[1][][]");
        assert_eq!(fmt("%s", &[json!([1, 2])]), "[1,2]");
        assert_eq!(fmt("%d", &[json!("42abc")]), "42");
        assert_eq!(fmt("%d", &[json!(7.9)]), "7");
        assert_eq!(fmt("%s", &[json!(2.0)]), "2");
    }

    #[test]
    fn literal_percent() {
        assert_eq!(fmt("100%%", &[]), "100%");
        assert_eq!(fmt("%%name$s", &[]), "%name$s");
    }

    #[test]
    fn missing_argument_fails() {
        assert!(matches!(
            sprintf("%s %s", &[json!(1)]),
            Err(EnvironautError::MissingArgument { position: 2, available: 1 })
        ));
        assert!(matches!(
            sprintf("%0$s", &[json!(1)]),
            Err(EnvironautError::MissingArgument { .. })
        ));
    }

    #[test]
    fn oversized_width_or_precision_fails() {
        assert!(matches!(
            sprintf("%99999999999999999999s", &[json!("x")]),
            Err(EnvironautError::FieldTooLarge { .. })
        ));
        assert!(matches!(
            sprintf("%.99999999999999999999f", &[json!(1)]),
            Err(EnvironautError::FieldTooLarge { .. })
        ));
        assert!(matches!(
            sprintf("%99999999999999999999$s", &[json!("x")]),
            Err(EnvironautError::MissingArgument { .. })
        ));
    }

    #[test]
    fn unknown_conversion_fails() {
        assert!(matches!(
            sprintf("%y", &[json!(1)]),
            Err(EnvironautError::UnknownConversion { conversion: 'y', .. })
        ));
        assert!(sprintf("trailing %", &[]).is_err());
    }
}
