//! A JSON value: exactly the six kinds the grammar allows, nothing more.

use super::{AsNumber, JsonArray, JsonObject};
use crate::json::{parse_json_str, stringify};
use anyhow::{Result, bail};

#[derive(Clone, Debug, PartialEq)]
pub enum JsonValue {
	Array(JsonArray),
	Boolean(bool),
	Null,
	Number(f64),
	Object(JsonObject),
	String(String),
}

impl JsonValue {
	/// # Errors
	/// Returns an error if `json` is not valid JSON.
	pub fn parse_str(json: &str) -> Result<JsonValue> {
		parse_json_str(json)
	}

	#[must_use]
	pub fn type_as_str(&self) -> &str {
		use JsonValue::*;
		match self {
			Array(_) => "array",
			Boolean(_) => "boolean",
			Null => "null",
			Number(_) => "number",
			Object(_) => "object",
			String(_) => "string",
		}
	}

	#[must_use]
	pub fn stringify(&self) -> String {
		stringify(self)
	}

	#[must_use]
	pub fn new_array() -> JsonValue {
		JsonValue::Array(JsonArray::default())
	}

	#[must_use]
	pub fn new_object() -> JsonValue {
		JsonValue::Object(JsonObject::default())
	}

	/// # Errors
	/// Returns an error if this isn't an array.
	pub fn as_array(&self) -> Result<&JsonArray> {
		match self {
			JsonValue::Array(array) => Ok(array),
			_ => bail!("expected an array, found a {}", self.type_as_str()),
		}
	}

	/// # Errors
	/// Returns an error if this isn't an array.
	pub fn into_array(self) -> Result<JsonArray> {
		match self {
			JsonValue::Array(array) => Ok(array),
			_ => bail!("expected an array, found a {}", self.type_as_str()),
		}
	}

	/// # Errors
	/// Returns an error if this isn't an object.
	pub fn as_object(&self) -> Result<&JsonObject> {
		match self {
			JsonValue::Object(object) => Ok(object),
			_ => bail!("expected an object, found a {}", self.type_as_str()),
		}
	}

	/// # Errors
	/// Returns an error if this isn't an object.
	pub fn into_object(self) -> Result<JsonObject> {
		match self {
			JsonValue::Object(object) => Ok(object),
			_ => bail!("expected an object, found a {}", self.type_as_str()),
		}
	}

	/// # Errors
	/// Returns an error if this isn't a string.
	pub fn as_str(&self) -> Result<&str> {
		match self {
			JsonValue::String(text) => Ok(text),
			_ => bail!("expected a string, found a {}", self.type_as_str()),
		}
	}

	/// # Errors
	/// Returns an error if this isn't a string.
	pub fn as_string(&self) -> Result<String> {
		self.as_str().map(str::to_owned)
	}

	/// # Errors
	/// Returns an error if this isn't a number.
	pub fn as_number<T: AsNumber>(&self) -> Result<T> {
		match self {
			JsonValue::Number(value) => Ok(T::from_f64(*value)),
			_ => bail!("expected a number, found a {}", self.type_as_str()),
		}
	}

	#[must_use]
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			JsonValue::Boolean(value) => Some(*value),
			_ => None,
		}
	}

	#[must_use]
	pub fn is_null(&self) -> bool {
		matches!(self, JsonValue::Null)
	}
}

impl From<&str> for JsonValue {
	fn from(input: &str) -> Self {
		JsonValue::String(input.to_string())
	}
}

impl From<String> for JsonValue {
	fn from(input: String) -> Self {
		JsonValue::String(input)
	}
}

impl From<bool> for JsonValue {
	fn from(input: bool) -> Self {
		JsonValue::Boolean(input)
	}
}

impl From<JsonObject> for JsonValue {
	fn from(input: JsonObject) -> Self {
		JsonValue::Object(input)
	}
}

impl From<JsonArray> for JsonValue {
	fn from(input: JsonArray) -> Self {
		JsonValue::Array(input)
	}
}

impl<T> From<Vec<T>> for JsonValue
where
	JsonArray: From<Vec<T>>,
{
	fn from(input: Vec<T>) -> Self {
		JsonValue::Array(JsonArray::from(input))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn type_as_str_matches_variant() {
		assert_eq!(JsonValue::String("a".into()).type_as_str(), "string");
		assert_eq!(JsonValue::Number(1.0).type_as_str(), "number");
		assert_eq!(JsonValue::Boolean(true).type_as_str(), "boolean");
		assert_eq!(JsonValue::Null.type_as_str(), "null");
		assert_eq!(JsonValue::new_array().type_as_str(), "array");
		assert_eq!(JsonValue::new_object().type_as_str(), "object");
	}

	#[test]
	fn as_number_converts_and_rejects() {
		let value = JsonValue::Number(17.0);
		assert_eq!(value.as_number::<u32>().unwrap(), 17_u32);

		let err = JsonValue::String("nope".into()).as_number::<u32>().unwrap_err();
		assert_eq!(err.to_string(), "expected a number, found a string");
	}

	#[test]
	fn as_str_and_as_string() {
		let value = JsonValue::from("hello");
		assert_eq!(value.as_str().unwrap(), "hello");
		assert_eq!(value.as_string().unwrap(), "hello".to_string());
		assert!(JsonValue::Null.as_str().is_err());
	}

	#[test]
	fn array_and_object_accessors_round_trip() {
		let array = JsonValue::Array(JsonArray(vec![JsonValue::from(1_u32)]));
		assert!(array.as_array().is_ok());
		assert!(array.clone().into_array().is_ok());
		assert!(array.as_object().is_err());

		let object = JsonValue::new_object();
		assert!(object.as_object().is_ok());
		assert!(object.into_object().is_ok());
	}

	#[test]
	fn parse_str_round_trips() {
		let parsed = JsonValue::parse_str(r#"{"a":1,"b":[true,null]}"#).unwrap();
		assert_eq!(parsed.stringify(), r#"{"a":1,"b":[true,null]}"#);
	}
}
