//! A JSON array, backed by a `Vec<JsonValue>`.

use super::{AsNumber, JsonValue};
use crate::json::stringify::{stringify, stringify_pretty_multi_line, stringify_pretty_single_line};
use anyhow::Result;

#[derive(Clone, Default, PartialEq)]
pub struct JsonArray(pub Vec<JsonValue>);

impl JsonArray {
	#[must_use]
	pub fn stringify(&self) -> String {
		let items = self.0.iter().map(stringify).collect::<Vec<_>>();
		format!("[{}]", items.join(","))
	}

	#[must_use]
	pub fn stringify_pretty_single_line(&self) -> String {
		if self.0.is_empty() {
			return "[]".to_string();
		}
		let items = self.0.iter().map(stringify_pretty_single_line).collect::<Vec<_>>();
		format!("[ {} ]", items.join(", "))
	}

	#[must_use]
	pub fn stringify_pretty_multi_line(&self, max_width: usize, depth: usize) -> String {
		if self.0.is_empty() {
			return "[]".to_string();
		}
		let indent = "  ".repeat(depth);
		let items = self
			.0
			.iter()
			.map(|value| {
				format!(
					"{indent}  {}",
					stringify_pretty_multi_line(value, max_width, depth + 1, depth * 2 + 2)
				)
			})
			.collect::<Vec<_>>();
		format!("[\n{}\n{}]", items.join(",\n"), indent)
	}

	/// # Errors
	/// Returns an error if any element is not a string.
	pub fn as_string_vec(&self) -> Result<Vec<String>> {
		self.0.iter().map(JsonValue::as_string).collect()
	}

	/// # Errors
	/// Returns an error if any element is not numeric.
	pub fn as_number_vec<T: AsNumber>(&self) -> Result<Vec<T>> {
		self.0.iter().map(JsonValue::as_number).collect()
	}

	#[must_use]
	pub fn as_vec(&self) -> &Vec<JsonValue> {
		&self.0
	}

	pub fn push(&mut self, value: impl Into<JsonValue>) -> &mut Self {
		self.0.push(value.into());
		self
	}
}

impl std::fmt::Debug for JsonArray {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.0)
	}
}

impl<T> From<Vec<T>> for JsonArray
where
	JsonValue: From<T>,
{
	fn from(input: Vec<T>) -> Self {
		JsonArray(input.into_iter().map(JsonValue::from).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stringify_mixed_types() {
		let array = JsonArray(vec![JsonValue::from("hello"), JsonValue::from(42.0), JsonValue::from(true)]);
		assert_eq!(array.stringify(), r#"["hello",42,true]"#);
	}

	#[test]
	fn as_string_vec_rejects_non_strings() {
		let array = JsonArray::from(vec!["a", "b"]);
		assert_eq!(array.as_string_vec().unwrap(), vec!["a", "b"]);
		assert!(JsonArray::from(vec![1_u32, 2]).as_string_vec().is_err());
	}

	#[test]
	fn as_number_vec_converts_type() {
		let array = JsonArray::from(vec![1.2_f64, 3.4, 5.6]);
		assert_eq!(array.as_number_vec::<u8>().unwrap(), vec![1, 3, 5]);
	}

	#[test]
	fn pretty_printing_handles_empty() {
		assert_eq!(JsonArray::default().stringify_pretty_single_line(), "[]");
		assert_eq!(JsonArray::default().stringify_pretty_multi_line(80, 0), "[]");
	}
}
