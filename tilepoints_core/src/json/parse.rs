//! A small recursive-descent JSON parser. Good enough for the two things we
//! ever parse: the index's aggregation response, and whatever a test feeds
//! it — no need for a streaming or zero-copy parser at this volume.

use super::{JsonArray, JsonObject, JsonValue};
use anyhow::{Result, anyhow, bail};

struct Parser<'a> {
	chars: std::iter::Peekable<std::str::CharIndices<'a>>,
	input: &'a str,
}

/// # Errors
/// Returns an error if `json` is not valid JSON, or has trailing garbage
/// after the first value.
pub fn parse_json_str(json: &str) -> Result<JsonValue> {
	let mut parser = Parser {
		chars: json.char_indices().peekable(),
		input: json,
	};
	parser.skip_whitespace();
	let value = parser.parse_value()?;
	parser.skip_whitespace();
	if let Some((pos, c)) = parser.chars.peek().copied() {
		bail!("unexpected trailing character '{c}' at position {pos}");
	}
	Ok(value)
}

impl<'a> Parser<'a> {
	fn skip_whitespace(&mut self) {
		while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
			self.chars.next();
		}
	}

	fn peek_char(&mut self) -> Option<char> {
		self.chars.peek().map(|(_, c)| *c)
	}

	fn parse_value(&mut self) -> Result<JsonValue> {
		self.skip_whitespace();
		match self.peek_char() {
			Some('{') => self.parse_object().map(JsonValue::Object),
			Some('[') => self.parse_array().map(JsonValue::Array),
			Some('"') => self.parse_string().map(JsonValue::String),
			Some('t') | Some('f') => self.parse_bool(),
			Some('n') => self.parse_null(),
			Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
			Some(c) => bail!("unexpected character '{c}' while parsing a value"),
			None => bail!("unexpected end of input while parsing a value"),
		}
	}

	fn expect(&mut self, expected: char) -> Result<()> {
		match self.chars.next() {
			Some((_, c)) if c == expected => Ok(()),
			Some((pos, c)) => bail!("expected '{expected}', found '{c}' at position {pos}"),
			None => bail!("expected '{expected}', found end of input"),
		}
	}

	fn parse_object(&mut self) -> Result<JsonObject> {
		self.expect('{')?;
		let mut object = JsonObject::new();
		self.skip_whitespace();
		if self.peek_char() == Some('}') {
			self.chars.next();
			return Ok(object);
		}
		loop {
			self.skip_whitespace();
			let key = self.parse_string()?;
			self.skip_whitespace();
			self.expect(':')?;
			let value = self.parse_value()?;
			object.set(key, value);
			self.skip_whitespace();
			match self.chars.next() {
				Some((_, ',')) => continue,
				Some((_, '}')) => break,
				Some((pos, c)) => bail!("expected ',' or '}}', found '{c}' at position {pos}"),
				None => bail!("unexpected end of input while parsing object"),
			}
		}
		Ok(object)
	}

	fn parse_array(&mut self) -> Result<JsonArray> {
		self.expect('[')?;
		let mut array = JsonArray::default();
		self.skip_whitespace();
		if self.peek_char() == Some(']') {
			self.chars.next();
			return Ok(array);
		}
		loop {
			let value = self.parse_value()?;
			array.push(value);
			self.skip_whitespace();
			match self.chars.next() {
				Some((_, ',')) => continue,
				Some((_, ']')) => break,
				Some((pos, c)) => bail!("expected ',' or ']', found '{c}' at position {pos}"),
				None => bail!("unexpected end of input while parsing array"),
			}
		}
		Ok(array)
	}

	fn parse_string(&mut self) -> Result<String> {
		self.expect('"')?;
		let mut out = String::new();
		loop {
			match self.chars.next() {
				Some((_, '"')) => break,
				Some((_, '\\')) => match self.chars.next() {
					Some((_, '"')) => out.push('"'),
					Some((_, '\\')) => out.push('\\'),
					Some((_, '/')) => out.push('/'),
					Some((_, 'n')) => out.push('\n'),
					Some((_, 'r')) => out.push('\r'),
					Some((_, 't')) => out.push('\t'),
					Some((_, 'b')) => out.push('\u{08}'),
					Some((_, 'f')) => out.push('\u{0c}'),
					Some((_, 'u')) => out.push(self.parse_unicode_escape()?),
					Some((pos, c)) => bail!("invalid escape '\\{c}' at position {pos}"),
					None => bail!("unexpected end of input in string escape"),
				},
				Some((_, c)) => out.push(c),
				None => bail!("unterminated string"),
			}
		}
		Ok(out)
	}

	fn parse_unicode_escape(&mut self) -> Result<char> {
		let mut hex = String::with_capacity(4);
		for _ in 0..4 {
			match self.chars.next() {
				Some((_, c)) => hex.push(c),
				None => bail!("truncated \\u escape"),
			}
		}
		let code = u32::from_str_radix(&hex, 16).map_err(|e| anyhow!("invalid \\u escape '{hex}': {e}"))?;
		char::from_u32(code).ok_or_else(|| anyhow!("invalid unicode code point \\u{hex}"))
	}

	fn parse_bool(&mut self) -> Result<JsonValue> {
		if self.input[self.current_pos()..].starts_with("true") {
			self.advance_by(4);
			Ok(JsonValue::Boolean(true))
		} else if self.input[self.current_pos()..].starts_with("false") {
			self.advance_by(5);
			Ok(JsonValue::Boolean(false))
		} else {
			bail!("unexpected character while parsing a boolean literal")
		}
	}

	fn parse_null(&mut self) -> Result<JsonValue> {
		if self.input[self.current_pos()..].starts_with("null") {
			self.advance_by(4);
			Ok(JsonValue::Null)
		} else {
			bail!("unexpected character while parsing 'null'")
		}
	}

	fn parse_number(&mut self) -> Result<JsonValue> {
		let start = self.current_pos();
		if self.peek_char() == Some('-') {
			self.chars.next();
		}
		while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
			self.chars.next();
		}
		if self.peek_char() == Some('.') {
			self.chars.next();
			while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
				self.chars.next();
			}
		}
		if matches!(self.peek_char(), Some('e') | Some('E')) {
			self.chars.next();
			if matches!(self.peek_char(), Some('+') | Some('-')) {
				self.chars.next();
			}
			while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
				self.chars.next();
			}
		}
		let end = self.current_pos();
		let text = &self.input[start..end];
		text
			.parse::<f64>()
			.map(JsonValue::Number)
			.map_err(|e| anyhow!("invalid number literal '{text}': {e}"))
	}

	fn current_pos(&mut self) -> usize {
		self.chars.peek().map_or(self.input.len(), |(pos, _)| *pos)
	}

	fn advance_by(&mut self, n: usize) {
		for _ in 0..n {
			self.chars.next();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_primitives() {
		assert_eq!(parse_json_str("true").unwrap(), JsonValue::Boolean(true));
		assert_eq!(parse_json_str("false").unwrap(), JsonValue::Boolean(false));
		assert_eq!(parse_json_str("null").unwrap(), JsonValue::Null);
		assert_eq!(parse_json_str("42").unwrap(), JsonValue::Number(42.0));
		assert_eq!(parse_json_str("-3.5e2").unwrap(), JsonValue::Number(-350.0));
		assert_eq!(parse_json_str("\"hi\"").unwrap(), JsonValue::String("hi".into()));
	}

	#[test]
	fn parses_nested_object_and_array() {
		let value = parse_json_str(r#"{"key1": "value1", "nums": [1, 2, 3.5]}"#).unwrap();
		let object = value.as_object().unwrap();
		assert_eq!(object.get_string("key1").unwrap(), "value1");
		assert_eq!(object.get_array("nums").unwrap().as_number_vec::<f64>().unwrap(), vec![
			1.0, 2.0, 3.5
		]);
	}

	#[test]
	fn handles_escapes_and_unicode() {
		let value = parse_json_str(r#""Line1\nLine2\té""#).unwrap();
		assert_eq!(value, JsonValue::String("Line1\nLine2\té".into()));
	}

	#[test]
	fn rejects_trailing_garbage() {
		assert!(parse_json_str("42 43").is_err());
	}

	#[test]
	fn rejects_malformed_object() {
		assert!(parse_json_str(r#"{"key":}"#).is_err());
		assert!(parse_json_str(r#"{"key": "value""#).is_err());
	}

	#[test]
	fn whitespace_between_tokens_is_ignored() {
		let value = parse_json_str("  {  \"a\"  :  1  }  ").unwrap();
		assert_eq!(value.as_object().unwrap().get_number::<u32>("a").unwrap(), 1);
	}
}
