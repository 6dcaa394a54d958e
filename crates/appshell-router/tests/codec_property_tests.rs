//! Hash codec property tests
//!
//! Round-trip and normalization properties of the hash codec.

use appshell_router::HashCodec;
use appshell_router::path::normalize;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn path_strategy() -> impl Strategy<Value = String> {
	(
		any::<bool>(),
		prop::collection::vec(prop_oneof![4 => "[a-z0-9_-]{1,8}", 1 => Just(".".to_string()), 1 => Just("..".to_string()), 1 => Just(String::new())], 0..6),
		any::<bool>(),
	)
		.prop_map(|(leading, segments, trailing)| {
			let mut path = segments.join("/");
			if leading {
				path.insert(0, '/');
			}
			if trailing {
				path.push('/');
			}
			path
		})
}

fn leaf_strategy() -> impl Strategy<Value = Value> {
	prop_oneof![
		any::<i64>().prop_map(Value::from),
		any::<bool>().prop_map(Value::from),
		"[a-zA-Z0-9 %?#&=/]{0,12}".prop_map(Value::from),
	]
}

/// JSON values that the codec carries: anything but `null` and `{}`.
fn state_strategy() -> impl Strategy<Value = Value> {
	prop_oneof![
		leaf_strategy(),
		prop::collection::vec(leaf_strategy(), 0..4).prop_map(Value::from),
		prop::collection::btree_map("[a-z]{1,6}", leaf_strategy(), 1..4)
			.prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>())),
	]
}

proptest! {
	/// Test: normalization is idempotent
	///
	/// Category: Property
	#[test]
	fn prop_normalize_idempotent(path in path_strategy()) {
		let once = normalize(&path);
		prop_assert_eq!(normalize(&once), once.clone());
		prop_assert!(once.starts_with('/'));
		prop_assert!(!once.contains("//"));
	}

	/// Test: decode(encode(p, s)) == (normalize(p), s)
	///
	/// Category: Property
	#[test]
	fn prop_encode_decode_roundtrip(
		path in path_strategy(),
		state in state_strategy(),
		uri_encode in any::<bool>(),
	) {
		let codec = HashCodec::new();

		let hash = codec.encode(&path, Some(&state), uri_encode);
		let route = codec.decode(&hash);

		prop_assert_eq!(route.path, normalize(&path));
		prop_assert_eq!(route.state, Some(state));
	}

	/// Test: encoded hashes are canonical
	///
	/// Category: Property
	/// A freshly encoded hash never triggers a correction.
	#[test]
	fn prop_encoded_hash_is_canonical(
		path in path_strategy(),
		state in prop::option::of(state_strategy()),
		uri_encode in any::<bool>(),
	) {
		let codec = HashCodec::new();

		let hash = format!("#{}", codec.encode(&path, state.as_ref(), uri_encode));

		prop_assert!(codec.is_canonical(&hash), "not canonical: {}", hash);
	}

	/// Test: decode never panics and always yields an absolute path
	///
	/// Category: Fuzz
	#[test]
	fn prop_decode_total(hash in "\\PC{0,40}") {
		let route = HashCodec::new().decode(&hash);
		prop_assert!(route.path.starts_with('/'));
	}
}
