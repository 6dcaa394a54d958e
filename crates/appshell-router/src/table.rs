//! Route table
//!
//! Maps a route path to what should be shown for it.
//!
//! ## Key syntax
//!
//! - Keys starting with `^` are regular expressions, matched
//!   case-insensitively against the path. The `^` is part of the pattern.
//! - Any other key is an exact path.
//!
//! ## Resolution
//!
//! 1. Exact keys are looked up first.
//! 2. Patterns are tried in registration order; the first match wins and its
//!    capture groups are handed to the activated unit via [`Route::matches`].
//!
//! ## Example
//!
//! ```
//! use appshell_router::route::Route;
//! use appshell_router::table::{Activation, RouteTable};
//!
//! let table = RouteTable::new()
//! 	.redirect("/", "/home")
//! 	.unwrap()
//! 	.route("/home", |_: &Route| "home")
//! 	.unwrap()
//! 	.route(r"^/items/(\d+)$", |_: &Route| "item")
//! 	.unwrap();
//!
//! match table.activate(Route::new("/items/7")) {
//! 	Some(Activation::Unit { unit, route, .. }) => {
//! 		assert_eq!(unit, "item");
//! 		assert_eq!(route.capture(1), Some("7"));
//! 	}
//! 	_ => unreachable!(),
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use appshell_core::logging::targets;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::route::Route;

/// Marks a key as a regular expression.
pub const PATTERN_MARKER: char = '^';

/// Route table registration errors.
#[derive(Debug, Error)]
pub enum RouteTableError {
	/// A `^` key is not a valid regular expression.
	#[error("Invalid route pattern '{pattern}': {source}")]
	InvalidPattern {
		/// The rejected key.
		pattern: String,
		/// The regex compiler's error.
		#[source]
		source: regex::Error,
	},
}

/// Builds the unit for a resolved route.
pub type Activator<U> = Rc<dyn Fn(&Route) -> U>;

/// What a table entry leads to.
pub enum RouteTarget<U> {
	/// Build a unit.
	Activate(Activator<U>),
	/// Navigate to another path instead.
	Redirect(String),
}

impl<U> Clone for RouteTarget<U> {
	fn clone(&self) -> Self {
		match self {
			Self::Activate(activator) => Self::Activate(activator.clone()),
			Self::Redirect(path) => Self::Redirect(path.clone()),
		}
	}
}

impl<U> fmt::Debug for RouteTarget<U> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Activate(_) => f.write_str("Activate(..)"),
			Self::Redirect(path) => f.debug_tuple("Redirect").field(path).finish(),
		}
	}
}

struct PatternEntry<U> {
	key: String,
	regex: Regex,
	target: RouteTarget<U>,
}

/// A successful lookup.
#[derive(Debug)]
pub struct Resolution<'a, U> {
	/// The table key that matched.
	pub key: &'a str,
	/// Its target.
	pub target: &'a RouteTarget<U>,
	/// Capture groups for pattern hits, `None` for exact hits.
	pub captures: Option<Vec<Option<String>>>,
}

impl<U> Resolution<'_, U> {
	/// Returns `true` when an exact key matched.
	pub fn is_exact(&self) -> bool {
		self.captures.is_none()
	}

	/// Writes the pattern captures into `route.matches`.
	///
	/// Exact hits leave the route untouched.
	pub fn apply_captures(&self, route: &mut Route) {
		if let Some(captures) = &self.captures {
			route.matches = Some(captures.clone());
		}
	}
}

/// Outcome of [`RouteTable::activate`].
#[derive(Debug)]
pub enum Activation<U> {
	/// A unit was built for `route`.
	Unit {
		/// The table key that matched.
		key: String,
		/// The built unit.
		unit: U,
		/// The route as handed to the activator.
		route: Route,
	},
	/// The entry redirects to this path.
	Redirect(String),
}

/// Exact and pattern routes.
pub struct RouteTable<U> {
	exact: HashMap<String, RouteTarget<U>>,
	patterns: Vec<PatternEntry<U>>,
}

impl<U> Default for RouteTable<U> {
	fn default() -> Self {
		Self {
			exact: HashMap::new(),
			patterns: Vec::new(),
		}
	}
}

impl<U> fmt::Debug for RouteTable<U> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut exact: Vec<&str> = self.exact.keys().map(String::as_str).collect();
		exact.sort_unstable();
		f.debug_struct("RouteTable")
			.field("exact", &exact)
			.field(
				"patterns",
				&self.patterns.iter().map(|p| p.key.as_str()).collect::<Vec<_>>(),
			)
			.finish()
	}
}

impl<U> RouteTable<U> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `true` if `key` is a pattern key.
	pub fn is_pattern(key: &str) -> bool {
		key.starts_with(PATTERN_MARKER)
	}

	/// Registers `target` under `key`.
	///
	/// An exact key replaces any earlier registration. A pattern key that is
	/// already registered keeps its position and gets the new target.
	///
	/// # Errors
	///
	/// Returns [`RouteTableError::InvalidPattern`] for a `^` key that does not
	/// compile.
	pub fn insert(&mut self, key: &str, target: RouteTarget<U>) -> Result<(), RouteTableError> {
		if !Self::is_pattern(key) {
			if self.exact.insert(key.to_string(), target).is_some() {
				tracing::debug!(target: targets::ROUTING, key, "replaced route");
			}
			return Ok(());
		}

		if let Some(entry) = self.patterns.iter_mut().find(|entry| entry.key == key) {
			tracing::debug!(target: targets::ROUTING, key, "replaced route pattern");
			entry.target = target;
			return Ok(());
		}

		let regex = RegexBuilder::new(key)
			.case_insensitive(true)
			.build()
			.map_err(|source| RouteTableError::InvalidPattern {
				pattern: key.to_string(),
				source,
			})?;
		self.patterns.push(PatternEntry {
			key: key.to_string(),
			regex,
			target,
		});
		Ok(())
	}

	/// Builder form of [`insert`](Self::insert) for an activator.
	///
	/// # Errors
	///
	/// See [`insert`](Self::insert).
	pub fn route<F>(mut self, key: &str, activator: F) -> Result<Self, RouteTableError>
	where
		F: Fn(&Route) -> U + 'static,
	{
		self.insert(key, RouteTarget::Activate(Rc::new(activator)))?;
		Ok(self)
	}

	/// Builder form of [`insert`](Self::insert) for a redirect.
	///
	/// # Errors
	///
	/// See [`insert`](Self::insert).
	pub fn redirect(mut self, key: &str, to: impl Into<String>) -> Result<Self, RouteTableError> {
		self.insert(key, RouteTarget::Redirect(to.into()))?;
		Ok(self)
	}

	/// Number of registered keys.
	pub fn len(&self) -> usize {
		self.exact.len() + self.patterns.len()
	}

	/// Returns `true` if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Looks up `segment`: exact keys first, then patterns in order.
	pub fn resolve(&self, segment: &str) -> Option<Resolution<'_, U>> {
		if let Some((key, target)) = self.exact.get_key_value(segment) {
			return Some(Resolution {
				key,
				target,
				captures: None,
			});
		}

		self.patterns.iter().find_map(|entry| {
			let captures = entry.regex.captures(segment)?;
			let captures = captures
				.iter()
				.map(|group| group.map(|m| m.as_str().to_string()))
				.collect();
			Some(Resolution {
				key: entry.key.as_str(),
				target: &entry.target,
				captures: Some(captures),
			})
		})
	}

	/// Resolves `route.path` and runs the matching activator.
	///
	/// Pattern hits overwrite `route.matches` with their captures before the
	/// activator sees the route. Redirects are reported, not followed.
	pub fn activate(&self, mut route: Route) -> Option<Activation<U>> {
		let Some(resolution) = self.resolve(&route.path) else {
			tracing::debug!(target: targets::ROUTING, path = %route.path, "no route matches");
			return None;
		};

		match resolution.target {
			RouteTarget::Redirect(to) => Some(Activation::Redirect(to.clone())),
			RouteTarget::Activate(activator) => {
				resolution.apply_captures(&mut route);
				let unit = activator(&route);
				Some(Activation::Unit {
					key: resolution.key.to_string(),
					unit,
					route,
				})
			}
		}
	}
}
