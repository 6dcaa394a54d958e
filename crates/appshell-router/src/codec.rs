//! Hash codec
//!
//! Converts between a `(path, state)` pair and the URL-hash string
//! `<path>[?<json>]`. The codec is pure: it never touches the location.
//!
//! ## Format
//!
//! - `path` is normalized (see [`crate::path::normalize`]).
//! - `state`, when present and meaningful, follows a `?` as compact JSON.
//!   `null` and `{}` are omitted.
//! - With `uri_encode`, the whole string is percent-encoded like `encodeURI`:
//!   `/`, `?`, `#`, `&`, `=`, `:` and the other URI delimiters stay literal.
//!
//! Decoding never fails. A params suffix that is not JSON (or not
//! percent-encoded JSON) is kept as an opaque string and the state is `None`.
//!
//! ## Example
//!
//! ```
//! use appshell_router::codec::HashCodec;
//! use serde_json::json;
//!
//! let codec = HashCodec::new();
//! let hash = codec.encode("/users/./42", Some(&json!({ "tab": "edit" })), false);
//! assert_eq!(hash, r#"/users/42?{"tab":"edit"}"#);
//!
//! let route = codec.decode(&format!("#{hash}"));
//! assert_eq!(route.path, "/users/42");
//! assert_eq!(route.state, Some(json!({ "tab": "edit" })));
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;

use appshell_core::logging::targets;

use crate::path;
use crate::route::Route;

/// Separates the path from the serialized state.
pub const PARAMS_SEPARATOR: char = '?';

/// Characters `encodeURI` escapes: everything except alphanumerics, the
/// unreserved marks and the URI delimiters.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')')
	.remove(b';')
	.remove(b',')
	.remove(b'/')
	.remove(b'?')
	.remove(b':')
	.remove(b'@')
	.remove(b'&')
	.remove(b'=')
	.remove(b'+')
	.remove(b'$')
	.remove(b'#');

/// Encoder/decoder for URL hashes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashCodec;

impl HashCodec {
	/// Creates a codec.
	pub const fn new() -> Self {
		Self
	}

	/// Composes the hash for `path` and `state`, without the leading `#`.
	pub fn encode(&self, path: &str, state: Option<&Value>, uri_encode: bool) -> String {
		let mut hash = path::normalize(path);

		if let Some(state) = state.filter(|state| carries_payload(state)) {
			match serde_json::to_string(state) {
				Ok(json) => {
					hash.push(PARAMS_SEPARATOR);
					hash.push_str(&json);
				}
				Err(err) => {
					tracing::trace!(
						target: targets::ROUTER,
						error = %err,
						"dropping unserializable route state"
					);
				}
			}
		}

		if uri_encode {
			utf8_percent_encode(&hash, URI_ENCODE_SET).to_string()
		} else {
			hash
		}
	}

	/// Like [`encode`](Self::encode) for any serializable state.
	///
	/// State that fails to serialize is dropped; the path is still encoded.
	pub fn encode_state<S: Serialize>(&self, path: &str, state: &S, uri_encode: bool) -> String {
		let state = serde_json::to_value(state)
			.inspect_err(|err| {
				tracing::trace!(
					target: targets::ROUTER,
					error = %err,
					"dropping unserializable route state"
				);
			})
			.ok();
		self.encode(path, state.as_ref(), uri_encode)
	}

	/// Decodes a hash, with or without its leading `#`.
	pub fn decode(&self, hash: &str) -> Route {
		let raw = hash.strip_prefix('#').unwrap_or(hash);
		let (path_part, params) = match raw.find(PARAMS_SEPARATOR) {
			Some(index) => (&raw[..index], Some(&raw[index..])),
			None => (raw, None),
		};

		let state = params.and_then(|params| parse_state(&params[PARAMS_SEPARATOR.len_utf8()..]));

		Route {
			path: path::normalize(path_part),
			params: params.map(str::to_string),
			state,
			matches: None,
		}
	}

	/// `#` + path + raw params of `route`.
	///
	/// A raw hash equal to the canonical hash of its own decoding is in
	/// canonical form.
	pub fn canonical_hash(&self, route: &Route) -> String {
		route.canonical_hash()
	}

	/// Returns `true` if `hash` is already in canonical form.
	pub fn is_canonical(&self, hash: &str) -> bool {
		self.canonical_hash(&self.decode(hash)) == hash
	}
}

fn carries_payload(state: &Value) -> bool {
	match state {
		Value::Null => false,
		Value::Object(map) => !map.is_empty(),
		_ => true,
	}
}

/// Parses a params body as JSON, first verbatim, then percent-decoded.
fn parse_state(body: &str) -> Option<Value> {
	if body.is_empty() {
		return None;
	}
	if let Ok(state) = serde_json::from_str(body) {
		return Some(state);
	}

	let decoded = match percent_decode_str(body).decode_utf8() {
		Ok(decoded) => decoded,
		Err(err) => {
			tracing::trace!(target: targets::ROUTER, error = %err, "params are not valid UTF-8");
			return None;
		}
	};
	match serde_json::from_str(&decoded) {
		Ok(state) => Some(state),
		Err(err) => {
			tracing::trace!(
				target: targets::ROUTER,
				params = body,
				error = %err,
				"params are not JSON, keeping them opaque"
			);
			None
		}
	}
}
