//! Application bootstrap and the glue towards the hosting UI runtime.

use std::fmt;
use std::rc::Rc;

use inertia_core::{Composition, RuntimeHandle};
use serde_json::Value;

use crate::composer::compose;
use crate::config::{AppConfig, Collaborators};
use crate::context::AppContext;
use crate::error::SwapError;
use crate::navigation::NavigationHandler;
use crate::node::RenderTree;
use crate::page::{DialogDescriptor, PageData};
use crate::remember::RememberMixin;
use crate::router::{FormHelper, HeadManager, RememberStore, Router, RouterConfig};

/// A running application: the state cells plus the collaborators they are
/// wired to.
#[derive(Clone)]
pub struct InertiaApp {
    ctx: AppContext,
    handler: NavigationHandler,
    router: Rc<dyn Router>,
    head_manager: Rc<dyn HeadManager>,
    form_helper: Option<Rc<dyn FormHelper>>,
}

impl InertiaApp {
    /// Creates the state cells from the initial page and, unless rendering
    /// on the server, hands the navigation handler to the router.
    pub fn setup(
        runtime: RuntimeHandle,
        config: AppConfig,
        collaborators: Collaborators,
    ) -> Result<Self, SwapError> {
        let AppConfig {
            initial_page,
            initial_component,
            resolve_component,
            title_callback,
            on_head_update,
            server_side,
            clock,
            dialog_lookup,
        } = config;
        let Collaborators {
            router,
            head_manager_factory,
            form_helper,
        } = collaborators;

        let (page, _) = initial_page.clone().split()?;
        let ctx = AppContext::new(runtime, page);
        ctx.page.component.set(initial_component);
        ctx.page.key.set(None);

        let head_manager = head_manager_factory.create(server_side, title_callback, on_head_update);
        let handler = NavigationHandler::new(ctx.clone(), clock).with_lookup(dialog_lookup);

        if server_side {
            log::debug!("server-side setup; router left uninitialised");
        } else {
            router.init(RouterConfig {
                initial_page,
                resolve_component,
                swap_component: handler.clone(),
            });
            let head = Rc::clone(&head_manager);
            router.on_navigate(Box::new(move |_| head.force_update()));
        }

        Ok(Self {
            ctx,
            handler,
            router,
            head_manager,
            form_helper,
        })
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn handler(&self) -> &NavigationHandler {
        &self.handler
    }

    pub fn router(&self) -> Rc<dyn Router> {
        Rc::clone(&self.router)
    }

    pub fn head_manager(&self) -> Rc<dyn HeadManager> {
        Rc::clone(&self.head_manager)
    }

    /// The current page payload.
    pub fn use_page(&self) -> PageData {
        self.ctx.use_page()
    }

    pub fn render(&self) -> RenderTree {
        compose(&self.ctx)
    }

    /// A composition that re-runs the composer whenever a cell it read changes.
    pub fn composition(&self) -> Composition<RenderTree> {
        let ctx = self.ctx.clone();
        Composition::new(self.ctx.runtime_handle(), move || compose(&ctx))
    }

    /// Registers the global accessors and the remember mixin with `host`, and
    /// hands the form helper to the router.
    pub fn install(&self, host: &mut dyn Host) {
        if let Some(helper) = &self.form_helper {
            self.router.set_form_helper(Rc::clone(helper));
        }

        let router = Rc::clone(&self.router);
        host.define_global("$inertia", Box::new(move || GlobalValue::Router(Rc::clone(&router))));
        let ctx = self.ctx.clone();
        host.define_global("$page", Box::new(move || GlobalValue::Page(ctx.use_page())));
        let ctx = self.ctx.clone();
        host.define_global("$dialog", Box::new(move || GlobalValue::Dialog(ctx.use_dialog())));
        let head = Rc::clone(&self.head_manager);
        host.define_global(
            "$headManager",
            Box::new(move || GlobalValue::HeadManager(Rc::clone(&head))),
        );

        host.add_mixin(RememberMixin::new(Rc::new(RouterStore(Rc::clone(&self.router)))));
    }
}

impl fmt::Debug for InertiaApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InertiaApp")
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

struct RouterStore(Rc<dyn Router>);

impl RememberStore for RouterStore {
    fn remember(&self, data: Value, key: &str) {
        self.0.remember(data, key);
    }

    fn restore(&self, key: &str) -> Option<Value> {
        self.0.restore(key)
    }
}

/// Value returned by a global accessor.
#[derive(Clone)]
pub enum GlobalValue {
    Router(Rc<dyn Router>),
    Page(PageData),
    Dialog(Option<DialogDescriptor>),
    HeadManager(Rc<dyn HeadManager>),
}

impl fmt::Debug for GlobalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalValue::Router(_) => f.write_str("Router"),
            GlobalValue::Page(page) => f.debug_tuple("Page").field(page).finish(),
            GlobalValue::Dialog(dialog) => f.debug_tuple("Dialog").field(dialog).finish(),
            GlobalValue::HeadManager(_) => f.write_str("HeadManager"),
        }
    }
}

pub type GlobalAccessor = Box<dyn Fn() -> GlobalValue>;

/// The hosting UI runtime, as far as registration is concerned.
pub trait Host {
    fn define_global(&mut self, name: &'static str, accessor: GlobalAccessor);
    fn add_mixin(&mut self, mixin: RememberMixin);
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
