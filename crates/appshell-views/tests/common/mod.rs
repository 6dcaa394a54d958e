//! Shared test view-models and views.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use appshell_core::{Command, NotificationBus, Observable, ShellError};
use appshell_router::Route;
use appshell_views::{
	Cleanable, Initializable, Routable, RoutableUnit, RoutingSupport, View, ViewModel,
	ViewModelBase,
};
use serde::{Deserialize, Serialize};

pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
	Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
	journal.borrow().clone()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListState {
	pub page: u32,
}

/// A routable list page that records its lifecycle.
pub struct ListPage {
	pub base: ViewModelBase,
	pub routing: RoutingSupport,
	pub name: &'static str,
	pub page: Rc<Cell<u32>>,
	pub open_page: Command<u32, ()>,
	pub routes: RefCell<Vec<Route>>,
	pub journal: Journal,
}

impl ListPage {
	pub fn new(name: &'static str, bus: &NotificationBus, journal: &Journal) -> Self {
		let page = Rc::new(Cell::new(1));
		let (target, log) = (page.clone(), journal.clone());
		let open_page = Command::with_guard("open_page", |page: &u32| *page > 0, move |page: u32| {
			if page > 99 {
				return Err(ShellError::command_failed("open_page", "no such page"));
			}
			log.borrow_mut().push(format!("{name}:open({page})"));
			target.set(page);
			Ok(())
		});
		let routing = RoutingSupport::new(bus.clone(), Self::ROUTING_KEY);
		routing.set_enabled(true);
		Self {
			base: ViewModelBase::new(name, bus.clone()),
			routing,
			name,
			page,
			open_page,
			routes: RefCell::new(Vec::new()),
			journal: journal.clone(),
		}
	}

	fn record(&self, event: &str) {
		self.journal.borrow_mut().push(format!("{}:{event}", self.name));
	}

	pub fn go_to_page(&self, page: u32) {
		self.page.set(page);
		self.base.notify_state_changed();
		self.routing.routing_state_changed();
	}
}

impl Initializable for ListPage {
	fn initialize(&self) {
		self.record("initialize");
	}
}

impl Cleanable for ListPage {
	fn cleanup(&self) {
		self.record("cleanup");
		self.base.cleanup();
	}
}

impl ViewModel for ListPage {
	fn display_name(&self) -> &str {
		self.base.display_name()
	}

	fn loaded(&self) {
		self.record("loaded");
	}

	fn state_changed(&self) -> Observable<()> {
		self.base.state_changed()
	}

	fn alert_for_error(&self, error: &ShellError) {
		self.record(&format!("alert({error})"));
		self.base.alert_for_error(error);
	}
}

impl Routable for ListPage {
	type State = ListState;

	const ROUTING_KEY: &'static str = "list";

	fn routing(&self) -> &RoutingSupport {
		&self.routing
	}

	fn create_routing_state(&self) -> ListState {
		ListState {
			page: self.page.get(),
		}
	}

	fn handle_routing_state(&self, state: ListState) {
		self.record(&format!("state(page={})", state.page));
		self.page.set(state.page);
		self.go_to_page(state.page);
	}

	fn route_activated(&self, route: &Route) {
		self.routes.borrow_mut().push(route.clone());
	}
}

/// Renders whatever unit the route host activated.
pub struct ContentView {
	pub journal: Journal,
}

impl View for ContentView {
	type Model = dyn RoutableUnit;

	fn display_name(&self) -> &str {
		"Content"
	}

	fn render(&self, model: &Self::Model) {
		self.journal
			.borrow_mut()
			.push(format!("render({})", model.display_name()));
	}
}
