//! Rebuilds a storage-schema'd record tree into the shape presented to
//! clients: unwrap `{"_u": value}` leaves, and drop `_`-prefixed keys
//! (except `_id`) from structural objects.

use tilepoints_core::json::{JsonArray, JsonObject, JsonValue};

/// Recursively rebuild `value` per the unwrap/underscore-drop rules.
#[must_use]
pub fn rebuild(value: &JsonValue) -> JsonValue {
	match value {
		JsonValue::Object(object) => {
			if let Some(inner) = object.get("_u") {
				return inner.clone();
			}
			let mut rebuilt = JsonObject::new();
			for (key, inner) in object.iter() {
				if key.starts_with('_') && key != "_id" {
					continue;
				}
				rebuilt.set(key.clone(), rebuild(inner));
			}
			JsonValue::Object(rebuilt)
		}
		JsonValue::Array(array) => JsonValue::Array(JsonArray(array.as_vec().iter().map(rebuild).collect())),
		other => other.clone(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unwraps_value_dicts() {
		let value = JsonValue::Object(JsonObject::from(vec![("_u", JsonValue::from(42_u32))]));
		assert_eq!(rebuild(&value), JsonValue::Number(42.0));
	}

	#[test]
	fn drops_underscore_keys_except_id() {
		let value = JsonValue::Object(JsonObject::from(vec![
			("_id", JsonValue::from("abc")),
			("_private", JsonValue::from("hidden")),
			("name", JsonValue::from("visible")),
		]));
		let rebuilt = rebuild(&value).into_object().unwrap();
		assert!(rebuilt.get("_id").is_some());
		assert!(rebuilt.get("_private").is_none());
		assert!(rebuilt.get("name").is_some());
	}

	#[test]
	fn recurses_through_lists_and_nested_structures() {
		let value = JsonValue::Array(JsonArray(vec![
			JsonValue::Object(JsonObject::from(vec![("_u", JsonValue::from("a"))])),
			JsonValue::Object(JsonObject::from(vec![("_junk", JsonValue::from(1_u32)), ("keep", JsonValue::from(2_u32))])),
		]));
		let rebuilt = rebuild(&value).into_array().unwrap();
		assert_eq!(rebuilt.as_vec()[0], JsonValue::from("a"));
		let second = rebuilt.as_vec()[1].as_object().unwrap();
		assert!(second.get("_junk").is_none());
		assert_eq!(second.get_number::<u32>("keep").unwrap(), 2);
	}

	#[test]
	fn rebuilding_twice_is_a_fixed_point() {
		let value = JsonValue::Object(JsonObject::from(vec![
			("_id", JsonValue::from("abc")),
			("_hidden", JsonValue::from(1_u32)),
			("nested", JsonValue::Object(JsonObject::from(vec![("_u", JsonValue::from(7_u32))]))),
		]));
		let once = rebuild(&value);
		let twice = rebuild(&once);
		assert_eq!(once, twice);
	}

	#[test]
	fn primitives_pass_through_unchanged() {
		assert_eq!(rebuild(&JsonValue::Null), JsonValue::Null);
		assert_eq!(rebuild(&JsonValue::from(true)), JsonValue::Boolean(true));
	}
}
