//! End-to-end shell tests
//!
//! Drives the two-page application from `appshell_integration_tests`
//! through the facade: landing, paging through the URL, event dispatch into
//! the active page and shutdown.

use appshell::prelude::*;
use appshell_integration_tests::{App, UsersPage};
use rstest::*;
use serde_json::json;

#[fixture]
fn app() -> App {
	App::start("").unwrap()
}

#[rstest]
fn test_empty_hash_lands_on_users(app: App) {
	// Act
	app.context.scheduler().run_until_idle();

	// Assert
	assert_eq!(app.location.hash(), "#/users");
	assert_eq!(*app.rendered.borrow(), vec!["Users".to_string()]);
}

#[rstest]
fn test_paging_round_trips_through_url(app: App) {
	// Arrange
	app.context.scheduler().run_until_idle();
	let users = app.users_page().unwrap();

	// Act
	users.set_page(3);
	app.context.scheduler().run_until_idle();

	// Assert
	assert_eq!(app.location.hash(), r#"#/users?{"page":3}"#);
	assert_eq!(
		app.context.router().route().and_then(|r| r.state),
		Some(json!({ "page": 3 }))
	);
	assert_eq!(users.page.get(), 3);
}

#[rstest]
fn test_command_navigation_to_detail(app: App) {
	// Arrange
	app.context.scheduler().run_until_idle();
	let users = app.users_page().unwrap();
	let on_click = EventBinding::for_model_with(
		&users,
		|page: &UsersPage| page.open_user.clone(),
		|id: &String| id.clone(),
	)
	.build();

	// Act
	let rejected = on_click.handle(&String::new());
	let executed = on_click.handle(&"alice".to_string());
	app.context.scheduler().run_until_idle();

	// Assert
	assert_eq!(rejected, Dispatch::Rejected);
	assert_eq!(executed, Dispatch::Executed);
	assert_eq!(app.location.hash(), "#/users/alice");
	assert_eq!(app.host.active_key().as_deref(), Some(r"^/users/(\w+)$"));
	assert_eq!(
		*app.rendered.borrow(),
		vec!["Users".to_string(), "User".to_string()]
	);
}

#[rstest]
fn test_shutdown_stops_routing(app: App) {
	app.context.scheduler().run_until_idle();

	app.context.shutdown();
	app.location.set_hash("/users/bob");
	app.context.scheduler().run_until_idle();

	assert_eq!(app.host.active_key().as_deref(), Some("/users"));
}
