//! The decoded form of a URL hash.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path;

/// A decoded URL hash.
///
/// `path` is always absolute and normalized. `params` is the raw suffix of
/// the hash including its leading `?`; `state` is the JSON payload parsed
/// from it, if it parsed. `matches` carries the capture groups of the route
/// pattern that resolved this route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
	/// Normalized absolute path.
	pub path: String,
	/// Raw params suffix, including the leading separator.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub params: Option<String>,
	/// Auxiliary state decoded from `params`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<Value>,
	/// Capture groups of the resolving pattern; group 0 is the whole match.
	#[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
	pub matches: Option<Vec<Option<String>>>,
}

impl Default for Route {
	fn default() -> Self {
		Self::new("/")
	}
}

impl Route {
	/// Creates a route for `path` (normalized) without params or state.
	pub fn new(path: &str) -> Self {
		Self {
			path: path::normalize(path),
			params: None,
			state: None,
			matches: None,
		}
	}

	/// Attaches a state payload.
	pub fn with_state(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}

	/// `#` + path + raw params: the form a browser would show for this route.
	pub fn canonical_hash(&self) -> String {
		let params = self.params.as_deref().unwrap_or("");
		let mut hash = String::with_capacity(1 + self.path.len() + params.len());
		hash.push('#');
		hash.push_str(&self.path);
		hash.push_str(params);
		hash
	}

	/// Capture group `index` of the resolving pattern, if it participated.
	pub fn capture(&self, index: usize) -> Option<&str> {
		self.matches.as_ref()?.get(index)?.as_deref()
	}

	/// Deserializes the state payload into `T`.
	///
	/// Returns `None` when there is no state or it does not fit `T`.
	pub fn state_as<T: DeserializeOwned>(&self) -> Option<T> {
		let state = self.state.clone()?;
		serde_json::from_value(state).ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_route_new_normalizes() {
		assert_eq!(Route::new("users/./42").path, "/users/42");
		assert_eq!(Route::default().path, "/");
	}

	#[rstest]
	fn test_canonical_hash_includes_raw_params() {
		let mut route = Route::new("/a");
		route.params = Some("?{\"x\":1}".to_string());

		assert_eq!(route.canonical_hash(), "#/a?{\"x\":1}");
		assert_eq!(Route::new("/a").canonical_hash(), "#/a");
	}

	#[rstest]
	fn test_capture_skips_unmatched_groups() {
		let mut route = Route::new("/demo");
		route.matches = Some(vec![Some("/demo".to_string()), None]);

		assert_eq!(route.capture(0), Some("/demo"));
		assert_eq!(route.capture(1), None);
		assert_eq!(route.capture(5), None);
	}

	#[rstest]
	fn test_state_as_typed() {
		#[derive(Debug, Deserialize, PartialEq)]
		struct Paging {
			page: u32,
		}

		let route = Route::new("/list").with_state(json!({ "page": 3 }));

		assert_eq!(route.state_as::<Paging>(), Some(Paging { page: 3 }));
		assert_eq!(route.state_as::<String>(), None);
	}

	#[rstest]
	fn test_route_serializes_match_field_name() {
		let mut route = Route::new("/x");
		route.matches = Some(vec![Some("/x".to_string())]);

		let value = serde_json::to_value(&route).unwrap();

		assert_eq!(value, json!({ "path": "/x", "match": ["/x"] }));
	}
}
