//! Reader for PHP array-literal config files.
//!
//! Only a data subset is understood, nothing is executed:
//!
//! ```php
//! <?php
//! return [
//!     'name' => 'my-app',
//!     'checks' => array(
//!         ['name' => 'php', 'class' => 'executable', 'command' => 'php'],
//!     ),
//!     'cache' => ['pretty' => true, 'location' => null],
//! ];
//! ```
//!
//! Arrays without any `key =>` become lists; arrays with keys become
//! mappings, unkeyed entries taking the next free integer key.

use serde_json::{Map, Number, Value};
use std::path::Path;

use super::{expect_object, parse_error, read_source, ConfigReader};
use crate::error::Result;

/// Reads `.php` config files that return an array literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpReader;

impl ConfigReader for PhpReader {
    fn read(&self, path: &Path) -> Result<Value> {
        let content = read_source(path)?;
        let value = parse_php_literal(&content).map_err(|message| parse_error(path, message))?;
        expect_object(path, value)
    }
}

/// Parse `<?php return <literal>;` into a JSON value.
pub fn parse_php_literal(source: &str) -> std::result::Result<Value, String> {
    let mut parser = Parser { src: source, pos: 0 };
    parser.document()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: &str) -> String {
        let line = self.src[..self.pos].matches('\n').count() + 1;
        format!("{} at line {}", message, line)
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("//") || trimmed.starts_with('#') {
                let len = trimmed.find('\n').unwrap_or(trimmed.len());
                self.pos += len;
            } else if let Some(body) = trimmed.strip_prefix("/*") {
                let len = body.find("*/").map_or(trimmed.len(), |end| end + 4);
                self.pos += len;
            } else {
                return;
            }
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_trivia();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> std::result::Result<(), String> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", token)))
        }
    }

    /// Case-insensitive keyword not followed by an identifier character.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_trivia();
        let rest = self.rest();
        let matches = rest
            .get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
            && !rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if matches {
            self.pos += keyword.len();
        }
        matches
    }

    fn document(&mut self) -> std::result::Result<Value, String> {
        self.pos = self.src.len() - self.src.trim_start_matches('\u{feff}').len();
        if !self.eat("<?php") {
            return Err(self.error("expected '<?php'"));
        }
        if !self.eat_keyword("return") {
            return Err(self.error("expected 'return'"));
        }
        let value = self.value()?;
        self.eat(";");
        self.eat("?>");
        self.skip_trivia();
        if self.pos < self.src.len() {
            return Err(self.error("unexpected content after the returned value"));
        }
        Ok(value)
    }

    fn value(&mut self) -> std::result::Result<Value, String> {
        self.skip_trivia();
        match self.peek() {
            Some('[') => {
                self.bump();
                self.items(']')
            }
            Some('\'') => self.single_quoted().map(Value::String),
            Some('"') => self.double_quoted().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            _ => {
                if self.eat_keyword("array") {
                    self.expect("(")?;
                    self.items(')')
                } else if self.eat_keyword("true") {
                    Ok(Value::Bool(true))
                } else if self.eat_keyword("false") {
                    Ok(Value::Bool(false))
                } else if self.eat_keyword("null") {
                    Ok(Value::Null)
                } else {
                    Err(self.error("expected a literal value"))
                }
            }
        }
    }

    fn items(&mut self, close: char) -> std::result::Result<Value, String> {
        let close = close.to_string();
        let mut entries: Vec<(Option<Value>, Value)> = Vec::new();

        loop {
            if self.eat(&close) {
                break;
            }
            let first = self.value()?;
            let entry = if self.eat("=>") {
                (Some(first), self.value()?)
            } else {
                (None, first)
            };
            entries.push(entry);
            if !self.eat(",") {
                self.expect(&close)?;
                break;
            }
        }

        if entries.iter().all(|(key, _)| key.is_none()) {
            return Ok(Value::Array(entries.into_iter().map(|(_, v)| v).collect()));
        }

        let mut map = Map::new();
        // Wider than PHP's integer keys, so the index after the largest key
        // still fits.
        let mut next_index: i128 = 0;
        for (key, value) in entries {
            let key = match key {
                Some(key) => array_key(&key).ok_or_else(|| self.error("invalid array key"))?,
                None => next_index.to_string(),
            };
            if let Ok(n) = key.parse::<i64>() {
                next_index = next_index.max(i128::from(n) + 1);
            }
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn single_quoted(&mut self) -> std::result::Result<String, String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(out),
                Some('\\') => match self.peek() {
                    Some(c @ ('\'' | '\\')) => {
                        self.bump();
                        out.push(c);
                    }
                    _ => out.push('\\'),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn double_quoted(&mut self) -> std::result::Result<String, String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => {
                    let escaped = match self.peek() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('v') => '\u{0b}',
                        Some('f') => '\u{0c}',
                        Some('e') => '\u{1b}',
                        Some('0') => '\0',
                        Some(c @ ('\\' | '"' | '$')) => c,
                        _ => {
                            out.push('\\');
                            continue;
                        }
                    };
                    self.bump();
                    out.push(escaped);
                }
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn number(&mut self) -> std::result::Result<Value, String> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }

        let text: String = self.src[start..self.pos].chars().filter(|c| *c != '_').collect();
        let number = if is_float {
            text.parse::<f64>().ok().and_then(Number::from_f64)
        } else {
            text.parse::<i64>().ok().map(Number::from)
        };
        number
            .map(Value::Number)
            .ok_or_else(|| self.error(&format!("invalid number '{}'", text)))
    }
}

/// PHP array keys are strings or integers.
fn array_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).map(|i| i.to_string()),
        Value::Bool(b) => Some(i64::from(*b).to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
