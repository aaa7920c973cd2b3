//! A JSON object, keyed and ordered like `serde_json::Map` would be if we
//! used it: alphabetically, via a `BTreeMap`. That's fine for us — the only
//! object we build (the aggregation query) and the only one we read (its
//! response) don't care about key order, and alphabetical order makes the
//! stringified query body deterministic across runs, which is handy for
//! snapshotting in tests.

use super::{AsNumber, JsonArray, JsonValue};
use crate::json::{parse_json_str, stringify, stringify_pretty_multi_line, stringify_pretty_single_line};
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

#[derive(Clone, Default, PartialEq)]
pub struct JsonObject(pub BTreeMap<String, JsonValue>);

impl JsonObject {
	#[must_use]
	pub fn new() -> Self {
		JsonObject(BTreeMap::new())
	}

	/// # Errors
	/// Returns an error if `json` doesn't parse into an object.
	pub fn parse_str(json: &str) -> Result<JsonObject> {
		parse_json_str(json)?.into_object()
	}

	pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> &mut Self {
		self.0.insert(key.into(), value.into());
		self
	}

	pub fn set_optional(&mut self, key: impl Into<String>, value: Option<impl Into<JsonValue>>) -> &mut Self {
		if let Some(value) = value {
			self.set(key, value);
		}
		self
	}

	/// Merge `other`'s entries into `self`, overwriting on conflicting keys.
	pub fn assign(&mut self, other: JsonObject) -> &mut Self {
		self.0.extend(other.0);
		self
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.0.get(key)
	}

	/// # Errors
	/// Returns an error if `key` is missing or not a string.
	pub fn get_string(&self, key: &str) -> Result<String> {
		self
			.get(key)
			.ok_or_else(|| anyhow::anyhow!("missing key '{key}'"))?
			.as_string()
	}

	/// # Errors
	/// Returns an error if `key` is missing or not a number.
	pub fn get_number<T: AsNumber>(&self, key: &str) -> Result<T> {
		self
			.get(key)
			.ok_or_else(|| anyhow::anyhow!("missing key '{key}'"))?
			.as_number()
	}

	/// # Errors
	/// Returns an error if `key` is missing or not an array.
	pub fn get_array(&self, key: &str) -> Result<&JsonArray> {
		self
			.get(key)
			.ok_or_else(|| anyhow::anyhow!("missing key '{key}'"))?
			.as_array()
	}

	/// # Errors
	/// Returns an error if `key` is missing or not an object.
	pub fn get_object(&self, key: &str) -> Result<&JsonObject> {
		self
			.get(key)
			.ok_or_else(|| anyhow::anyhow!("missing key '{key}'"))?
			.as_object()
	}

	/// # Errors
	/// Returns an error if `key` is present but not a number.
	pub fn get_number_optional<T: AsNumber>(&self, key: &str) -> Result<Option<T>> {
		match self.get(key) {
			Some(value) if value.is_null() => Ok(None),
			Some(value) => Ok(Some(value.as_number()?)),
			None => Ok(None),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
		self.0.iter()
	}

	#[must_use]
	pub fn stringify(&self) -> String {
		let items = self
			.0
			.iter()
			.map(|(key, value)| format!("{}:{}", JsonValue::from(key.as_str()).stringify(), stringify(value)))
			.collect::<Vec<_>>();
		format!("{{{}}}", items.join(","))
	}

	#[must_use]
	pub fn stringify_pretty_single_line(&self) -> String {
		if self.0.is_empty() {
			return "{}".to_string();
		}
		let items = self
			.0
			.iter()
			.map(|(key, value)| {
				format!(
					"{}: {}",
					JsonValue::from(key.as_str()).stringify(),
					stringify_pretty_single_line(value)
				)
			})
			.collect::<Vec<_>>();
		format!("{{ {} }}", items.join(", "))
	}

	#[must_use]
	pub fn stringify_pretty_multi_line(&self, max_width: usize, depth: usize) -> String {
		if self.0.is_empty() {
			return "{}".to_string();
		}
		let indent = "  ".repeat(depth);
		let items = self
			.0
			.iter()
			.map(|(key, value)| {
				format!(
					"{indent}  {}: {}",
					JsonValue::from(key.as_str()).stringify(),
					stringify_pretty_multi_line(value, max_width, depth + 1, depth * 2 + 2)
				)
			})
			.collect::<Vec<_>>();
		format!("{{\n{}\n{}}}", items.join(",\n"), indent)
	}
}

impl Debug for JsonObject {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.0)
	}
}

impl Display for JsonObject {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.stringify())
	}
}

impl<T> From<Vec<(&str, T)>> for JsonObject
where
	JsonValue: From<T>,
{
	fn from(input: Vec<(&str, T)>) -> Self {
		JsonObject(BTreeMap::from_iter(
			input.into_iter().map(|(k, v)| (k.to_string(), JsonValue::from(v))),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_and_get_round_trip() {
		let mut object = JsonObject::new();
		object.set("z", 3_u32).set("x", 1_u32);

		assert_eq!(object.get_number::<u32>("z").unwrap(), 3);
		assert!(object.get("missing").is_none());
		assert_eq!(object.stringify(), r#"{"x":1,"z":3}"#);
	}

	#[test]
	fn set_optional_skips_none() {
		let mut object = JsonObject::new();
		object.set_optional("a", Some(1_u32));
		object.set_optional("b", None::<u32>);
		assert_eq!(object.stringify(), r#"{"a":1}"#);
	}

	#[test]
	fn assign_overwrites_conflicting_keys() {
		let mut a = JsonObject::from(vec![("k", "old")]);
		let b = JsonObject::from(vec![("k", "new")]);
		a.assign(b);
		assert_eq!(a.get_string("k").unwrap(), "new");
	}

	#[test]
	fn get_array_and_object_type_errors() {
		let object = JsonObject::from(vec![("n", 1_u32)]);
		assert!(object.get_array("n").is_err());
		assert!(object.get_object("n").is_err());
		assert!(object.get_string("missing").is_err());
	}

	#[test]
	fn parse_str_rejects_non_objects() {
		assert!(JsonObject::parse_str("[1,2]").is_err());
		assert!(JsonObject::parse_str(r#"{"a":1}"#).is_ok());
	}

	#[test]
	fn pretty_printing_varies_with_width() {
		let object = JsonObject::from(vec![("a", 1_u32), ("bb", 2_u32)]);
		assert_eq!(object.stringify_pretty_single_line(), "{ \"a\": 1, \"bb\": 2 }");
		assert_eq!(
			object.stringify_pretty_multi_line(5, 0),
			"{\n  \"a\": 1,\n  \"bb\": 2\n}"
		);
	}
}
