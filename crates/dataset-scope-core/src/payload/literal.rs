//! Permissive literal notation.
//!
//! Accepts the container and scalar literals that upstream loggers emit when they
//! print a dict instead of serializing it: single-quoted strings, tuples, sets,
//! `True`/`False`/`None`, trailing commas and `#` comments. The `NaN` and
//! `Infinity` tokens of Python-emitted JSON are read as non-finite floats. Names,
//! calls and operators other than a leading sign on a number are rejected.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Maximum bracket nesting, the same limit serde_json applies.
pub const MAX_DEPTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parse `text` as a single literal expression and convert it to a JSON value.
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    parser.skip_trivia();
    let literal = parser.parse_expr()?;
    parser.skip_trivia();
    if parser.pos != text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(literal.into_value())
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    None,
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    fn is_hashable(&self) -> bool {
        match self {
            Literal::List(_) | Literal::Set(_) | Literal::Dict(_) => false,
            Literal::Tuple(items) => items.iter().all(Literal::is_hashable),
            _ => true,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Literal::None => Value::Null,
            Literal::Bool(b) => Value::Bool(b),
            Literal::Int(i) => int_value(i),
            Literal::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            Literal::Str(s) => Value::String(s),
            Literal::Bytes(bytes) => Value::Array(bytes.into_iter().map(Value::from).collect()),
            Literal::List(items) | Literal::Tuple(items) | Literal::Set(items) => {
                Value::Array(items.into_iter().map(Literal::into_value).collect())
            }
            Literal::Dict(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.key_text(), value.into_value());
                }
                Value::Object(map)
            }
        }
    }

    /// Render a dict key as text; only string keys can ever match a lookup.
    fn key_text(self) -> String {
        match self {
            Literal::Str(s) => s,
            Literal::None => "None".to_string(),
            Literal::Bool(true) => "True".to_string(),
            Literal::Bool(false) => "False".to_string(),
            Literal::Int(i) => i.to_string(),
            Literal::Float(f) => f.to_string(),
            other => other.into_value().to_string(),
        }
    }
}

fn int_value(i: i128) -> Value {
    if let Ok(v) = i64::try_from(i) {
        Value::from(v)
    } else if let Ok(v) = u64::try_from(i) {
        Value::from(v)
    } else {
        Number::from_f64(i as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: &str) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn parse_expr(&mut self) -> Result<Literal, LiteralError> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(open @ ('{' | '[' | '(')) => {
                if self.depth >= MAX_DEPTH {
                    return Err(self.error("nesting too deep"));
                }
                self.depth += 1;
                let result = match open {
                    '{' => self.parse_brace(),
                    '[' => {
                        self.bump();
                        self.parse_items(']').map(Literal::List)
                    }
                    _ => self.parse_paren(),
                };
                self.depth -= 1;
                result
            }
            Some('+') | Some('-') => self.parse_signed(),
            Some(c) if c.is_ascii_digit() => self.parse_number(),
            Some('.') if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_number()
            }
            Some('\'') | Some('"') => self.parse_strings(),
            Some(c) if is_ident_start(c) => self.parse_name(),
            Some(_) => Err(self.error("unexpected character")),
        }
    }

    /// Comma separated expressions up to `close`, trailing comma allowed.
    fn parse_items(&mut self, close: char) -> Result<Vec<Literal>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            self.skip_trivia();
            if self.eat(close) {
                return Ok(items);
            }
            if !self.eat(',') {
                return Err(self.error("expected ',' or closing bracket"));
            }
        }
    }

    fn parse_paren(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        self.skip_trivia();
        if self.eat(')') {
            return Ok(Literal::Tuple(Vec::new()));
        }
        let first = self.parse_expr()?;
        self.skip_trivia();
        if self.eat(')') {
            // Parenthesized expression, not a tuple.
            return Ok(first);
        }
        if !self.eat(',') {
            return Err(self.error("expected ',' or ')'"));
        }
        let mut items = vec![first];
        items.extend(self.parse_items(')')?);
        Ok(Literal::Tuple(items))
    }

    fn parse_brace(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        self.skip_trivia();
        if self.eat('}') {
            return Ok(Literal::Dict(Vec::new()));
        }
        let first = self.parse_expr()?;
        self.skip_trivia();
        if self.eat(':') {
            self.parse_dict_rest(first)
        } else {
            self.parse_set_rest(first)
        }
    }

    fn parse_dict_rest(&mut self, first_key: Literal) -> Result<Literal, LiteralError> {
        let mut entries = Vec::new();
        let mut key = first_key;
        loop {
            if !key.is_hashable() {
                return Err(self.error("unhashable dict key"));
            }
            self.skip_trivia();
            let value = self.parse_expr()?;
            entries.push((key, value));
            self.skip_trivia();
            if self.eat('}') {
                return Ok(Literal::Dict(entries));
            }
            if !self.eat(',') {
                return Err(self.error("expected ',' or '}'"));
            }
            self.skip_trivia();
            if self.eat('}') {
                return Ok(Literal::Dict(entries));
            }
            key = self.parse_expr()?;
            self.skip_trivia();
            if !self.eat(':') {
                return Err(self.error("expected ':'"));
            }
        }
    }

    fn parse_set_rest(&mut self, first: Literal) -> Result<Literal, LiteralError> {
        let mut items = vec![first];
        if !self.eat('}') {
            if !self.eat(',') {
                return Err(self.error("expected ',' or '}'"));
            }
            items.extend(self.parse_items('}')?);
        }
        if !items.iter().all(Literal::is_hashable) {
            return Err(self.error("unhashable set element"));
        }
        let mut unique: Vec<Literal> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Ok(Literal::Set(unique))
    }

    fn parse_signed(&mut self) -> Result<Literal, LiteralError> {
        let negative = self.bump() == Some('-');
        self.skip_trivia();
        if self.rest().starts_with("Infinity") {
            return match self.parse_name()? {
                Literal::Float(f) if negative => Ok(Literal::Float(-f)),
                other => Ok(other),
            };
        }
        let starts_number = match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };
        if !starts_number {
            return Err(self.error("sign must be followed by a number"));
        }
        match self.parse_number()? {
            Literal::Int(i) if negative => Ok(Literal::Int(-i)),
            Literal::Float(f) if negative => Ok(Literal::Float(-f)),
            other => Ok(other),
        }
    }

    fn parse_number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let rest = self.rest();
        let radix = match rest.get(..2).map(str::to_ascii_lowercase).as_deref() {
            Some("0x") => Some(16),
            Some("0o") => Some(8),
            Some("0b") => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.pos += 2;
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.bump();
            }
            let digits = &self.src[start + 2..self.pos];
            if digits.is_empty() || digits.ends_with('_') || digits.contains("__") {
                return Err(self.error("invalid integer literal"));
            }
            let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
            return i128::from_str_radix(&cleaned, radix)
                .map(Literal::Int)
                .map_err(|_| self.error("invalid integer literal"));
        }

        let mut is_float = false;
        self.eat_digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error("invalid float exponent"));
            }
            self.eat_digits();
        }
        if self.peek().is_some_and(is_ident_continue) {
            return Err(self.error("invalid numeric literal"));
        }

        let text = &self.src[start..self.pos];
        if text.ends_with('_') || text.contains("__") || text.contains("_.") || text.contains("._")
        {
            return Err(self.error("invalid numeric literal"));
        }
        let cleaned: String = text.chars().filter(|c| *c != '_').collect();
        if is_float {
            return cleaned
                .parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| self.error("invalid float literal"));
        }
        if cleaned.len() > 1 && cleaned.starts_with('0') && cleaned.chars().any(|c| c != '0') {
            return Err(self.error("leading zeros in decimal integer literal"));
        }
        match cleaned.parse::<i128>() {
            Ok(i) => Ok(Literal::Int(i)),
            Err(_) => cleaned
                .parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| self.error("invalid integer literal")),
        }
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }

    fn parse_name(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        let name = &self.src[start..self.pos];

        // String prefixes: r, u, b and their combinations.
        if matches!(self.peek(), Some('\'') | Some('"')) && is_string_prefix(name) {
            self.pos = start;
            return self.parse_strings();
        }

        match name {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            "NaN" => Ok(Literal::Float(f64::NAN)),
            "Infinity" => Ok(Literal::Float(f64::INFINITY)),
            _ => {
                self.pos = start;
                Err(self.error("names are not literals"))
            }
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn parse_strings(&mut self) -> Result<Literal, LiteralError> {
        let (mut text, mut bytes) = self.parse_one_string()?;
        loop {
            let checkpoint = self.pos;
            self.skip_trivia();
            if !self.at_string_start() {
                self.pos = checkpoint;
                break;
            }
            let (next_text, next_bytes) = self.parse_one_string()?;
            if next_bytes != bytes {
                return Err(self.error("cannot mix bytes and nonbytes literals"));
            }
            text.push_str(&next_text);
            bytes = next_bytes;
        }
        if bytes {
            Ok(Literal::Bytes(text.chars().map(|c| c as u32 as u8).collect()))
        } else {
            Ok(Literal::Str(text))
        }
    }

    fn at_string_start(&self) -> bool {
        let rest = self.rest();
        let prefix_len = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        let prefix = &rest[..prefix_len];
        matches!(rest[prefix_len..].chars().next(), Some('\'') | Some('"'))
            && (prefix.is_empty() || is_string_prefix(prefix))
    }

    /// Returns the decoded text and whether it was a bytes literal.
    fn parse_one_string(&mut self) -> Result<(String, bool), LiteralError> {
        let mut raw = false;
        let mut bytes = false;
        while let Some(c) = self.peek() {
            match c.to_ascii_lowercase() {
                'r' => raw = true,
                'b' => bytes = true,
                'u' => {}
                _ => break,
            }
            self.bump();
        }

        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string quote")),
        };
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
        }

        let mut out = String::new();
        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(self.error("unterminated string literal")),
            };
            if c == quote {
                if !triple {
                    break;
                }
                if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                    self.bump();
                    self.bump();
                    break;
                }
                out.push(c);
            } else if c == '\n' && !triple {
                return Err(self.error("unterminated string literal"));
            } else if c == '\\' {
                let escaped = match self.bump() {
                    Some(e) => e,
                    None => return Err(self.error("unterminated string literal")),
                };
                if raw {
                    out.push('\\');
                    out.push(escaped);
                } else {
                    self.push_escape(escaped, bytes, &mut out)?;
                }
            } else if bytes && !c.is_ascii() {
                return Err(self.error("bytes can only contain ASCII literal characters"));
            } else {
                out.push(c);
            }
        }
        Ok((out, bytes))
    }

    fn push_escape(
        &mut self,
        escaped: char,
        bytes: bool,
        out: &mut String,
    ) -> Result<(), LiteralError> {
        match escaped {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '0'..='7' => {
                let mut value = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            'x' => {
                let value = self.read_hex(2)?;
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            'u' if !bytes => {
                let value = self.read_hex(4)?;
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            'U' if !bytes => {
                let value = self.read_hex(8)?;
                match char::from_u32(value) {
                    Some(c) => out.push(c),
                    None => return Err(self.error("illegal Unicode character")),
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn read_hex(&mut self, digits: usize) -> Result<u32, LiteralError> {
        let mut value = 0u32;
        for _ in 0..digits {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(d) => {
                    value = value * 16 + d;
                    self.bump();
                }
                None => return Err(self.error("truncated escape sequence")),
            }
        }
        Ok(value)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_string_prefix(prefix: &str) -> bool {
    matches!(
        prefix.to_ascii_lowercase().as_str(),
        "r" | "u" | "b" | "br" | "rb"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_quoted_dict() {
        let value = parse_literal("{'function': {'name': 'get_weather'}}").unwrap();
        assert_eq!(value, json!({"function": {"name": "get_weather"}}));
    }

    #[test]
    fn test_keywords_and_trailing_commas() {
        let value = parse_literal("{'a': True, 'b': False, 'c': None, 'd': [1, 2,],}").unwrap();
        assert_eq!(value, json!({"a": true, "b": false, "c": null, "d": [1, 2]}));
    }

    #[test]
    fn test_tuples_and_parens() {
        assert_eq!(parse_literal("()").unwrap(), json!([]));
        assert_eq!(parse_literal("(1,)").unwrap(), json!([1]));
        assert_eq!(parse_literal("(1)").unwrap(), json!(1));
        assert_eq!(
            parse_literal("({'name': 'a'}, {'name': 'b'})").unwrap(),
            json!([{"name": "a"}, {"name": "b"}])
        );
    }

    #[test]
    fn test_sets_deduplicate() {
        assert_eq!(parse_literal("{'a', 'b', 'a'}").unwrap(), json!(["a", "b"]));
        assert!(parse_literal("{[1], [2]}").is_err());
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(parse_literal(r#"'it\'s'"#).unwrap(), json!("it's"));
        assert_eq!(parse_literal(r#""tab\there""#).unwrap(), json!("tab\there"));
        assert_eq!(parse_literal(r"r'\d+'").unwrap(), json!("\\d+"));
        assert_eq!(parse_literal("'abc' \"def\"").unwrap(), json!("abcdef"));
        assert_eq!(parse_literal("'''multi\nline'''").unwrap(), json!("multi\nline"));
        assert_eq!(parse_literal(r"'é\x41'").unwrap(), json!("éA"));
        assert_eq!(parse_literal("u'x'").unwrap(), json!("x"));
    }

    #[test]
    fn test_bytes_are_not_strings() {
        assert_eq!(parse_literal("b'hi'").unwrap(), json!([104, 105]));
        assert!(parse_literal("b'a' 'b'").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_literal("-42").unwrap(), json!(-42));
        assert_eq!(parse_literal("1_000").unwrap(), json!(1000));
        assert_eq!(parse_literal("0x1F").unwrap(), json!(31));
        assert_eq!(parse_literal("2.5e1").unwrap(), json!(25.0));
        assert_eq!(parse_literal(".5").unwrap(), json!(0.5));
        assert!(parse_literal("007").is_err());
        assert!(parse_literal("1abc").is_err());
        assert!(parse_literal("--1").is_err());
    }

    #[test]
    fn test_non_string_keys_are_rendered() {
        let value = parse_literal("{1: 'a', None: 'b', (1, 2): 'c'}").unwrap();
        assert_eq!(value, json!({"1": "a", "None": "b", "[1,2]": "c"}));
        assert!(parse_literal("{[1]: 'a'}").is_err());
    }

    #[test]
    fn test_rejects_non_literals() {
        assert!(parse_literal("").is_err());
        assert!(parse_literal("   ").is_err());
        assert!(parse_literal("not json at all {{").is_err());
        assert!(parse_literal("foo(1)").is_err());
        assert!(parse_literal("{'a': true}").is_err());
        assert!(parse_literal("[1, 2] + [3]").is_err());
        assert!(parse_literal("'unterminated").is_err());
    }

    #[test]
    fn test_json_non_finite_tokens() {
        let value = parse_literal(r#"{"function": {"name": "f"}, "score": NaN}"#).unwrap();
        assert_eq!(value, json!({"function": {"name": "f"}, "score": null}));
        assert_eq!(
            parse_literal("[Infinity, -Infinity, NaN]").unwrap(),
            json!([null, null, null])
        );
        assert!(parse_literal("-NaN").is_err());
        assert!(parse_literal("Infinityx").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_literal(&at_limit).is_ok());

        let too_deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        let err = parse_literal(&too_deep).unwrap_err();
        assert_eq!(err.message, "nesting too deep");
        assert_eq!(err.offset, MAX_DEPTH);

        assert!(parse_literal(&"[".repeat(100_000)).is_err());
        assert!(parse_literal(&"({".repeat(50_000)).is_err());
    }

    #[test]
    fn test_comments_and_whitespace() {
        let value = parse_literal("  [\n  'a',  # first\n  'b'\n]\n").unwrap();
        assert_eq!(value, json!(["a", "b"]));
    }

    #[test]
    fn test_error_reports_offset() {
        let err = parse_literal("[1, @]").unwrap_err();
        assert_eq!(err.offset, 4);
    }
}
