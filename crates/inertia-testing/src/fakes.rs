use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::executor::block_on;
use inertia_app::{
    FormHelper, GlobalAccessor, GlobalValue, HeadManager, HeadManagerFactory, HeadUpdateCallback,
    Host, NavigateListener, NavigationHandler, Page, Props, RememberMixin, RememberStore, Router,
    RouterConfig, SwapArgs, SwapError, TitleCallback,
};
use inertia_core::Clock;
use serde_json::Value;
use thiserror::Error;

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Error)]
pub enum VisitError {
    #[error("router visited before init")]
    NotInitialised,
    #[error("no component resolver configured")]
    NoResolver,
    #[error(transparent)]
    Swap(#[from] SwapError),
}

/// In-memory router. Visits resolve components through the configured
/// resolver and call the swap handler synchronously.
#[derive(Default)]
pub struct FakeRouter {
    config: RefCell<Option<RouterConfig>>,
    listeners: RefCell<Vec<NavigateListener>>,
    remembered: RefCell<HashMap<String, Value>>,
    form_helper: RefCell<Option<Rc<dyn FormHelper>>>,
}

impl FakeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialised(&self) -> bool {
        self.config.borrow().is_some()
    }

    pub fn initial_page(&self) -> Option<Page> {
        self.config
            .borrow()
            .as_ref()
            .map(|config| config.initial_page.clone())
    }

    pub fn handler(&self) -> Option<NavigationHandler> {
        self.config
            .borrow()
            .as_ref()
            .map(|config| config.swap_component.clone())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn form_helper(&self) -> Option<Rc<dyn FormHelper>> {
        self.form_helper.borrow().clone()
    }

    /// Navigates to `page`, resolving its component and, when present, its
    /// dialog component by name.
    pub fn visit(&self, page: Page, preserve_state: bool) -> Result<(), VisitError> {
        let config = self.config.borrow().clone().ok_or(VisitError::NotInitialised)?;
        let resolver = config.resolve_component.ok_or(VisitError::NoResolver)?;
        let mut args =
            SwapArgs::new(page.clone(), resolver.resolve(&page.component)).preserve_state(preserve_state);
        if let Some(dialog) = &page.dialog {
            args = args.with_dialog(resolver.resolve(&dialog.component));
        }
        self.swap(&config.swap_component, args)
    }

    /// Hands prepared swap arguments straight to the handler.
    pub fn visit_with(&self, args: SwapArgs) -> Result<(), VisitError> {
        let handler = self.handler().ok_or(VisitError::NotInitialised)?;
        self.swap(&handler, args)
    }

    fn swap(&self, handler: &NavigationHandler, args: SwapArgs) -> Result<(), VisitError> {
        block_on(handler.swap_component(args))?;
        let page = handler.context().page.data.value();
        log::trace!("visited `{}`", page.component);
        for listener in self.listeners.borrow().iter() {
            listener(&page);
        }
        Ok(())
    }
}

impl RememberStore for FakeRouter {
    fn remember(&self, data: Value, key: &str) {
        self.remembered.borrow_mut().insert(key.to_string(), data);
    }

    fn restore(&self, key: &str) -> Option<Value> {
        self.remembered.borrow().get(key).cloned()
    }
}

impl Router for FakeRouter {
    fn init(&self, config: RouterConfig) {
        *self.config.borrow_mut() = Some(config);
    }

    fn on_navigate(&self, listener: NavigateListener) {
        self.listeners.borrow_mut().push(listener);
    }

    fn set_form_helper(&self, helper: Rc<dyn FormHelper>) {
        *self.form_helper.borrow_mut() = Some(helper);
    }
}

pub struct FakeHeadManager {
    server_side: bool,
    title_callback: TitleCallback,
    on_head_update: HeadUpdateCallback,
    forced_updates: Cell<usize>,
}

impl FakeHeadManager {
    pub fn server_side(&self) -> bool {
        self.server_side
    }

    pub fn forced_updates(&self) -> usize {
        self.forced_updates.get()
    }

    pub fn title(&self, title: &str) -> String {
        (self.title_callback)(title)
    }

    /// Reports rendered head elements the way a real head manager would.
    pub fn push_head(&self, elements: &[String]) {
        (self.on_head_update)(elements);
    }
}

impl HeadManager for FakeHeadManager {
    fn force_update(&self) {
        self.forced_updates.set(self.forced_updates.get() + 1);
    }
}

#[derive(Default)]
pub struct FakeHeadManagerFactory {
    created: RefCell<Option<Rc<FakeHeadManager>>>,
}

impl FakeHeadManagerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The head manager handed out by the last `create` call.
    pub fn head(&self) -> Option<Rc<FakeHeadManager>> {
        self.created.borrow().clone()
    }
}

impl HeadManagerFactory for FakeHeadManagerFactory {
    fn create(
        &self,
        server_side: bool,
        title_callback: TitleCallback,
        on_head_update: HeadUpdateCallback,
    ) -> Rc<dyn HeadManager> {
        let head = Rc::new(FakeHeadManager {
            server_side,
            title_callback,
            on_head_update,
            forced_updates: Cell::new(0),
        });
        *self.created.borrow_mut() = Some(Rc::clone(&head));
        head
    }
}

/// Form helper that returns the initial props and records remember keys.
#[derive(Default)]
pub struct FakeFormHelper {
    remember_keys: RefCell<Vec<Option<String>>>,
}

impl FakeFormHelper {
    pub fn remember_keys(&self) -> Vec<Option<String>> {
        self.remember_keys.borrow().clone()
    }
}

impl FormHelper for FakeFormHelper {
    fn create(&self, remember_key: Option<&str>, initial: Props) -> Box<dyn Any> {
        self.remember_keys
            .borrow_mut()
            .push(remember_key.map(str::to_string));
        Box::new(initial)
    }
}

/// Host recording global registrations and mixins.
#[derive(Default)]
pub struct TestHost {
    globals: Vec<(&'static str, GlobalAccessor)>,
    mixins: Vec<RememberMixin>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global_names(&self) -> Vec<&'static str> {
        self.globals.iter().map(|(name, _)| *name).collect()
    }

    /// Reads a global the way a view would, through its accessor.
    pub fn global(&self, name: &str) -> Option<GlobalValue> {
        self.globals
            .iter()
            .find(|(defined, _)| *defined == name)
            .map(|(_, accessor)| accessor())
    }

    pub fn mixins(&self) -> &[RememberMixin] {
        &self.mixins
    }
}

impl Host for TestHost {
    fn define_global(&mut self, name: &'static str, accessor: GlobalAccessor) {
        self.globals.push((name, accessor));
    }

    fn add_mixin(&mut self, mixin: RememberMixin) {
        self.mixins.push(mixin);
    }
}
