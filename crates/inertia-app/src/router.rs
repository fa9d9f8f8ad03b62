//! Interfaces of the collaborators the adapter plugs into: the navigation
//! router, the document head manager and the form helper.

use std::any::Any;
use std::rc::Rc;

use serde_json::Value;

use crate::component::ComponentResolver;
use crate::navigation::NavigationHandler;
use crate::page::{Page, PageData, Props};

/// What the adapter hands to [`Router::init`].
#[derive(Clone)]
pub struct RouterConfig {
    pub initial_page: Page,
    pub resolve_component: Option<Rc<dyn ComponentResolver>>,
    pub swap_component: NavigationHandler,
}

pub type NavigateListener = Box<dyn Fn(&PageData)>;

/// Storage used by the remember mixin to carry view fields across visits.
pub trait RememberStore {
    fn remember(&self, data: Value, key: &str);
    fn restore(&self, key: &str) -> Option<Value>;
}

/// Builds form objects for views. The adapter only forwards it to the router.
pub trait FormHelper {
    fn create(&self, remember_key: Option<&str>, initial: Props) -> Box<dyn Any>;
}

/// The navigation router. It performs visits and history management and
/// calls back into [`RouterConfig::swap_component`] for every navigation.
pub trait Router: RememberStore {
    fn init(&self, config: RouterConfig);
    fn on_navigate(&self, listener: NavigateListener);
    fn set_form_helper(&self, helper: Rc<dyn FormHelper>);
}

pub type TitleCallback = Rc<dyn Fn(&str) -> String>;
pub type HeadUpdateCallback = Rc<dyn Fn(&[String])>;

pub trait HeadManager {
    fn force_update(&self);
}

/// Creates the head manager at bootstrap.
pub trait HeadManagerFactory {
    fn create(
        &self,
        server_side: bool,
        title_callback: TitleCallback,
        on_head_update: HeadUpdateCallback,
    ) -> Rc<dyn HeadManager>;
}
