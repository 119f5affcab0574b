//! Opaque state blobs that round-trip caller context through the authorization redirect.

// self
use crate::_prelude::*;

/// Caller-supplied context echoed back by the provider (originating project, success and
/// failure redirect URLs, ...).
///
/// On the way out the blob is serialized as a JSON object into the `state` parameter. On the
/// way back [`parse_state`] decodes it without validating any field; treat the contents as
/// untrusted input.
pub type StateBlob = JsonMap<String, JsonValue>;

/// Serializes the blob into the compact JSON string placed in the `state` parameter.
pub fn encode_state(state: &StateBlob) -> String {
	JsonValue::Object(state.clone()).to_string()
}

/// Decodes a returned `state` string into a mapping.
///
/// Returns `None` for anything that is not a JSON object; malformed input never raises.
pub fn parse_state(state: &str) -> Option<StateBlob> {
	match serde_json::from_str::<JsonValue>(state) {
		Ok(JsonValue::Object(map)) => Some(map),
		_ => None,
	}
}
