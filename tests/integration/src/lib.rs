//! Shared application for the cross-crate integration tests.
//!
//! A small two-page shell: a paged user list keeping its page in the URL and
//! a user detail page behind a pattern route.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use appshell::prelude::*;
use appshell::views::UnitRef;

/// Routing state of [`UsersPage`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UsersState {
	pub page: u32,
}

/// Paged user list.
pub struct UsersPage {
	pub base: ViewModelBase,
	pub routing: RoutingSupport,
	pub page: Cell<u32>,
	pub open_user: Command<String, ()>,
}

impl UsersPage {
	pub fn new(bus: &NotificationBus, router: &RouteManager) -> Self {
		let router = router.clone();
		let routing = RoutingSupport::new(bus.clone(), Self::ROUTING_KEY);
		routing.set_enabled(true);
		Self {
			base: ViewModelBase::new("Users", bus.clone()),
			routing,
			page: Cell::new(1),
			open_user: Command::with_guard(
				"open_user",
				|id: &String| !id.is_empty(),
				move |id: String| {
					router.navigate(&format!("/users/{id}"));
					Ok(())
				},
			),
		}
	}

	pub fn set_page(&self, page: u32) {
		self.page.set(page);
		self.base.notify_state_changed();
		self.routing.routing_state_changed();
	}
}

impl Initializable for UsersPage {}

impl Cleanable for UsersPage {
	fn cleanup(&self) {
		self.base.cleanup();
	}
}

impl ViewModel for UsersPage {
	fn display_name(&self) -> &str {
		self.base.display_name()
	}

	fn state_changed(&self) -> Observable<()> {
		self.base.state_changed()
	}

	fn alert_for_error(&self, error: &ShellError) {
		self.base.alert_for_error(error);
	}
}

impl Routable for UsersPage {
	type State = UsersState;

	const ROUTING_KEY: &'static str = "users";

	fn routing(&self) -> &RoutingSupport {
		&self.routing
	}

	fn create_routing_state(&self) -> UsersState {
		UsersState {
			page: self.page.get(),
		}
	}

	fn handle_routing_state(&self, state: UsersState) {
		self.set_page(state.page);
	}
}

/// User detail page; the user id comes from the route's first capture group.
pub struct UserPage {
	pub base: ViewModelBase,
	pub routing: RoutingSupport,
	pub user_id: RefCell<Option<String>>,
}

impl UserPage {
	pub fn new(bus: &NotificationBus) -> Self {
		Self {
			base: ViewModelBase::new("User", bus.clone()),
			routing: RoutingSupport::new(bus.clone(), Self::ROUTING_KEY),
			user_id: RefCell::new(None),
		}
	}
}

impl Initializable for UserPage {}

impl Cleanable for UserPage {}

impl ViewModel for UserPage {
	fn display_name(&self) -> &str {
		self.base.display_name()
	}

	fn state_changed(&self) -> Observable<()> {
		self.base.state_changed()
	}

	fn alert_for_error(&self, error: &ShellError) {
		self.base.alert_for_error(error);
	}
}

impl Routable for UserPage {
	type State = serde_json::Value;

	const ROUTING_KEY: &'static str = "user";

	fn routing(&self) -> &RoutingSupport {
		&self.routing
	}

	fn create_routing_state(&self) -> serde_json::Value {
		serde_json::Value::Null
	}

	fn handle_routing_state(&self, _state: serde_json::Value) {}

	fn route_activated(&self, route: &Route) {
		*self.user_id.borrow_mut() = route.capture(1).map(str::to_string);
	}
}

/// Records the display name of every unit it renders.
pub struct Frame {
	pub rendered: Rc<RefCell<Vec<String>>>,
}

impl View for Frame {
	type Model = dyn RoutableUnit;

	fn display_name(&self) -> &str {
		"Frame"
	}

	fn render(&self, model: &Self::Model) {
		self.rendered
			.borrow_mut()
			.push(model.display_name().to_string());
	}
}

/// A headless shell with both pages routed and a [`Frame`] attached.
pub struct App {
	pub context: ShellContext,
	pub location: MemoryLocation,
	pub host: RouteHost,
	pub rendered: Rc<RefCell<Vec<String>>>,
	pub users: Rc<RefCell<Option<Rc<UsersPage>>>>,
}

impl App {
	/// Starts the shell on `initial_hash`; unknown routes land on `/users`.
	pub fn start(initial_hash: &str) -> Result<Self, Box<dyn std::error::Error>> {
		let mut settings = ShellSettings::default();
		settings.router.default_route = Some("/users".to_string());
		let (context, location) = ShellContext::headless(settings, initial_hash)?;

		let users = Rc::new(RefCell::new(None));
		let table = {
			let (bus, router, slot) = (context.bus().clone(), context.router().clone(), users.clone());
			let user_bus = context.bus().clone();
			RouteTable::new()
				.redirect("/", "/users")?
				.route("/users", move |_| {
					let page = Rc::new(UsersPage::new(&bus, &router));
					*slot.borrow_mut() = Some(page.clone());
					page as UnitRef
				})?
				.route(r"^/users/(\w+)$", move |_| unit(UserPage::new(&user_bus)))?
		};
		let host = context.route_host(table);

		let rendered = Rc::new(RefCell::new(Vec::new()));
		host.attach(context.binding(Frame {
			rendered: rendered.clone(),
		}));

		Ok(Self {
			context,
			location,
			host,
			rendered,
			users,
		})
	}

	/// The active users page, once it was routed to.
	pub fn users_page(&self) -> Option<Rc<UsersPage>> {
		self.users.borrow().clone()
	}
}
