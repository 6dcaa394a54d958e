//! Hash path normalization and relative resolution.
//!
//! Paths inside the hash are always absolute and normalized:
//!
//! - a leading `/` is ensured
//! - `.` segments and empty interior segments are removed
//! - `..` collapses against the preceding segment; a `..` with nothing
//!   before it is dropped
//! - a trailing `/` is kept (except on the root, which is just `/`)

/// Returns the normalized, absolute form of `path`.
///
/// ```
/// use appshell_router::path::normalize;
///
/// assert_eq!(normalize("/a/../b"), "/b");
/// assert_eq!(normalize("users//42/./edit/"), "/users/42/edit/");
/// assert_eq!(normalize("/../x"), "/x");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> String {
	let mut segments: Vec<&str> = Vec::new();
	for segment in path.split('/') {
		match segment {
			"" | "." => {}
			".." => {
				segments.pop();
			}
			segment => segments.push(segment),
		}
	}

	let mut normalized = String::with_capacity(path.len() + 1);
	normalized.push('/');
	normalized.push_str(&segments.join("/"));
	if path.ends_with('/') && !segments.is_empty() {
		normalized.push('/');
	}
	normalized
}

/// Returns `true` for paths starting with `/`.
pub fn is_absolute(path: &str) -> bool {
	path.starts_with('/')
}

/// Everything before the last `/` of `path`.
///
/// `/users/42/edit` → `/users/42`, `/users/` → `/users`, `/` → ``.
pub fn directory_of(path: &str) -> &str {
	path.rfind('/').map_or("", |index| &path[..index])
}

/// Resolves `path` against the directory of `base` and normalizes the result.
///
/// Absolute paths ignore `base`.
///
/// ```
/// use appshell_router::path::resolve;
///
/// assert_eq!(resolve("/users/42/edit", "../list"), "/users/list");
/// assert_eq!(resolve("/users/42/edit", "view"), "/users/42/view");
/// assert_eq!(resolve("/users/42/edit", "/home"), "/home");
/// ```
pub fn resolve(base: &str, path: &str) -> String {
	if is_absolute(path) {
		normalize(path)
	} else {
		normalize(&format!("{}/{}", directory_of(base), path))
	}
}
