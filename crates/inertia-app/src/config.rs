use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use inertia_core::Clock;
use inertia_runtime_std::StdClock;

use crate::appear::{DialogKeyLookup, NestedComponentLookup};
use crate::component::{Component, ComponentResolver};
use crate::page::Page;
use crate::router::{FormHelper, HeadManagerFactory, HeadUpdateCallback, Router, TitleCallback};

/// Bootstrap options for [`InertiaApp`](crate::InertiaApp).
#[derive(Clone)]
pub struct AppConfig {
    pub initial_page: Page,
    pub initial_component: Option<Component>,
    pub resolve_component: Option<Rc<dyn ComponentResolver>>,
    pub title_callback: TitleCallback,
    pub on_head_update: HeadUpdateCallback,
    /// Rendering on the server: the router is neither initialised nor
    /// listened to.
    pub server_side: bool,
    /// Source of page and dialog key timestamps.
    pub clock: Arc<dyn Clock>,
    pub dialog_lookup: Rc<dyn DialogKeyLookup>,
}

impl AppConfig {
    pub fn new(initial_page: Page) -> Self {
        Self {
            initial_page,
            initial_component: None,
            resolve_component: None,
            title_callback: Rc::new(|title: &str| title.to_string()),
            on_head_update: Rc::new(|_: &[String]| {}),
            server_side: false,
            clock: Arc::new(StdClock),
            dialog_lookup: Rc::new(NestedComponentLookup),
        }
    }

    pub fn initial_component(mut self, component: Component) -> Self {
        self.initial_component = Some(component);
        self
    }

    pub fn resolve_component(mut self, resolver: impl ComponentResolver + 'static) -> Self {
        self.resolve_component = Some(Rc::new(resolver));
        self
    }

    pub fn title_callback(mut self, callback: impl Fn(&str) -> String + 'static) -> Self {
        self.title_callback = Rc::new(callback);
        self
    }

    pub fn on_head_update(mut self, callback: impl Fn(&[String]) + 'static) -> Self {
        self.on_head_update = Rc::new(callback);
        self
    }

    pub fn server_side(mut self, server_side: bool) -> Self {
        self.server_side = server_side;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn dialog_lookup(mut self, lookup: Rc<dyn DialogKeyLookup>) -> Self {
        self.dialog_lookup = lookup;
        self
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("initial_page", &self.initial_page.component)
            .field("initial_component", &self.initial_component)
            .field("resolve_component", &self.resolve_component.is_some())
            .field("server_side", &self.server_side)
            .finish_non_exhaustive()
    }
}

/// The external services the adapter is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub router: Rc<dyn Router>,
    pub head_manager_factory: Rc<dyn HeadManagerFactory>,
    pub form_helper: Option<Rc<dyn FormHelper>>,
}
