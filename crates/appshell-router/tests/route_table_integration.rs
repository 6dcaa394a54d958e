//! Route table integration tests
//!
//! Resolution precedence and capture hand-off through `activate`.

use std::cell::Cell;
use std::rc::Rc;

use appshell_router::{Activation, Route, RouteTable, RouteTarget};
use rstest::*;

#[derive(Debug, PartialEq)]
enum Page {
	Exact,
	Pattern(Option<String>),
}

#[fixture]
fn table() -> RouteTable<Page> {
	RouteTable::new()
		.route("/x", |_: &Route| Page::Exact)
		.unwrap()
		.route("^/x.*", |route: &Route| Page::Pattern(route.capture(0).map(str::to_string)))
		.unwrap()
}

#[rstest]
#[case("/x", Page::Exact)]
#[case("/xy", Page::Pattern(Some("/xy".to_string())))]
#[case("/X/Y", Page::Pattern(Some("/X/Y".to_string())))]
fn test_resolution_precedence(table: RouteTable<Page>, #[case] path: &str, #[case] expected: Page) {
	// Act
	let activation = table.activate(Route::new(path));

	// Assert
	let Some(Activation::Unit { unit, .. }) = activation else {
		panic!("{path} did not resolve");
	};
	assert_eq!(unit, expected);
}

#[rstest]
fn test_activator_runs_once_per_activation(table: RouteTable<Page>) {
	// Arrange
	let calls = Rc::new(Cell::new(0));
	let counter = calls.clone();
	let mut table = table;
	table
		.insert(
			"/count",
			RouteTarget::Activate(Rc::new(move |_: &Route| {
				counter.set(counter.get() + 1);
				Page::Exact
			})),
		)
		.unwrap();

	// Act
	let resolved = table.resolve("/count").is_some();
	table.activate(Route::new("/count"));

	// Assert: resolving alone does not activate.
	assert!(resolved);
	assert_eq!(calls.get(), 1);
}

#[rstest]
fn test_exact_hit_keeps_incoming_matches(table: RouteTable<Page>) {
	// Arrange
	let mut route = Route::new("/x");
	route.matches = Some(vec![Some("kept".to_string())]);

	// Act
	let Some(Activation::Unit { route, .. }) = table.activate(route) else {
		panic!("expected a unit");
	};

	// Assert
	assert_eq!(route.capture(0), Some("kept"));
}

#[rstest]
fn test_state_reaches_activator() {
	let table = RouteTable::new()
		.route(r"^/users/(\d+)$", |route: &Route| {
			(route.capture(1).map(str::to_string), route.state.clone())
		})
		.unwrap();
	let route = Route::new("/users/42").with_state(serde_json::json!({ "tab": "edit" }));

	let Some(Activation::Unit { unit, .. }) = table.activate(route) else {
		panic!("expected a unit");
	};

	assert_eq!(unit.0.as_deref(), Some("42"));
	assert_eq!(unit.1, Some(serde_json::json!({ "tab": "edit" })));
}
