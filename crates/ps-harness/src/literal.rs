use std::collections::BTreeMap;

use ps_core::ScriptValue;

// Default values in parameter directives use the legacy header dialect:
// None/True/False, numbers, quoted strings, lists and string-keyed dicts.
pub(crate) fn parse_literal(raw: &str) -> Result<ScriptValue, String> {
    let mut cursor = Cursor::new(raw);
    cursor.skip_whitespace();
    let value = cursor.parse_value()?;
    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(format!(
            "unexpected trailing text after literal: {:?}",
            cursor.rest()
        ));
    }
    Ok(value)
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(raw: &str) -> Self {
        Self {
            chars: raw.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn rest(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Result<ScriptValue, String> {
        match self.peek() {
            None => Err("empty literal".to_string()),
            Some('\'') | Some('"') => self.parse_string(),
            Some('[') => self.parse_list(),
            Some('{') => self.parse_dict(),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => self.parse_keyword(),
            Some(ch) if ch.is_ascii_digit() || ch == '+' || ch == '-' || ch == '.' => {
                self.parse_number()
            }
            Some(ch) => Err(format!("unexpected character {:?} in literal", ch)),
        }
    }

    fn parse_keyword(&mut self) -> Result<ScriptValue, String> {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "None" => Ok(ScriptValue::Null),
            "True" => Ok(ScriptValue::Bool(true)),
            "False" => Ok(ScriptValue::Bool(false)),
            _ => Err(format!("unsupported literal {:?}", word)),
        }
    }

    fn parse_number(&mut self) -> Result<ScriptValue, String> {
        let start = self.pos;
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.pos += 1;
        }
        let mut saw_exponent = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '.' {
                self.pos += 1;
            } else if (ch == 'e' || ch == 'E') && !saw_exponent {
                saw_exponent = true;
                self.pos += 1;
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        token
            .parse::<f64>()
            .map(ScriptValue::Number)
            .map_err(|_| format!("invalid number literal {:?}", token))
    }

    fn parse_string(&mut self) -> Result<ScriptValue, String> {
        let quote = self.advance().expect("string parser should start at a quote");
        let mut text = String::new();
        loop {
            let Some(ch) = self.advance() else {
                return Err("unterminated string literal".to_string());
            };
            if ch == quote {
                return Ok(ScriptValue::String(text));
            }
            if ch != '\\' {
                text.push(ch);
                continue;
            }
            let Some(escape) = self.advance() else {
                return Err("unterminated string literal".to_string());
            };
            match escape {
                '\\' => text.push('\\'),
                '\'' => text.push('\''),
                '"' => text.push('"'),
                'n' => text.push('\n'),
                't' => text.push('\t'),
                'r' => text.push('\r'),
                '0' => text.push('\0'),
                other => return Err(format!("unsupported escape sequence \\{}", other)),
            }
        }
    }

    fn parse_list(&mut self) -> Result<ScriptValue, String> {
        self.advance();
        let mut values = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.advance();
                    return Ok(ScriptValue::List(values));
                }
                None => return Err("unterminated list literal".to_string()),
                _ => {}
            }
            values.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(']') => {
                    self.advance();
                    return Ok(ScriptValue::List(values));
                }
                Some(ch) => {
                    return Err(format!("expected ',' or ']' in list literal, found {:?}", ch))
                }
                None => return Err("unterminated list literal".to_string()),
            }
        }
    }

    fn parse_dict(&mut self) -> Result<ScriptValue, String> {
        self.advance();
        let mut entries = BTreeMap::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.advance();
                    return Ok(ScriptValue::Map(entries));
                }
                None => return Err("unterminated dict literal".to_string()),
                _ => {}
            }
            let key = match self.parse_value()? {
                ScriptValue::String(key) => key,
                other => {
                    return Err(format!(
                        "dict keys must be string literals, found {}",
                        other.type_name()
                    ))
                }
            };
            self.skip_whitespace();
            if self.peek() != Some(':') {
                return Err("expected ':' after dict key".to_string());
            }
            self.advance();
            self.skip_whitespace();
            let value = self.parse_value()?;
            entries.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some('}') => {
                    self.advance();
                    return Ok(ScriptValue::Map(entries));
                }
                Some(ch) => {
                    return Err(format!(
                        "expected ',' or '}}' in dict literal, found {:?}",
                        ch
                    ))
                }
                None => return Err("unterminated dict literal".to_string()),
            }
        }
    }
}
