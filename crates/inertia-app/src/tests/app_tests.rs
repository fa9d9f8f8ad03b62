use super::*;
use crate::component::Component;
use crate::navigation::SwapArgs;
use crate::page::{Page, Props};
use crate::router::{HeadManagerFactory, HeadUpdateCallback, NavigateListener, TitleCallback};
use futures::executor::block_on;
use inertia_core::{DefaultScheduler, Runtime};
use serde_json::json;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct StubRouter {
    config: RefCell<Option<RouterConfig>>,
    listeners: RefCell<Vec<NavigateListener>>,
    remembered: RefCell<HashMap<String, Value>>,
    form_helper: RefCell<Option<Rc<dyn FormHelper>>>,
}

impl StubRouter {
    fn navigate(&self, page: &PageData) {
        for listener in self.listeners.borrow().iter() {
            listener(page);
        }
    }
}

impl RememberStore for StubRouter {
    fn remember(&self, data: Value, key: &str) {
        self.remembered.borrow_mut().insert(key.to_string(), data);
    }

    fn restore(&self, key: &str) -> Option<Value> {
        self.remembered.borrow().get(key).cloned()
    }
}

impl Router for StubRouter {
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

#[derive(Default)]
struct CountingHead {
    updates: Cell<usize>,
}

impl HeadManager for CountingHead {
    fn force_update(&self) {
        self.updates.set(self.updates.get() + 1);
    }
}

#[derive(Default)]
struct StubHeadFactory {
    head: Rc<CountingHead>,
    server_side: Cell<Option<bool>>,
    title: RefCell<Option<TitleCallback>>,
}

impl HeadManagerFactory for StubHeadFactory {
    fn create(
        &self,
        server_side: bool,
        title_callback: TitleCallback,
        _on_head_update: HeadUpdateCallback,
    ) -> Rc<dyn HeadManager> {
        self.server_side.set(Some(server_side));
        *self.title.borrow_mut() = Some(title_callback);
        self.head.clone()
    }
}

struct NoopForms;

impl FormHelper for NoopForms {
    fn create(&self, _remember_key: Option<&str>, initial: Props) -> Box<dyn Any> {
        Box::new(initial)
    }
}

#[derive(Default)]
struct RecordingHost {
    globals: Vec<(&'static str, GlobalAccessor)>,
    mixins: Vec<RememberMixin>,
}

impl RecordingHost {
    fn global(&self, name: &str) -> GlobalValue {
        let (_, accessor) = self
            .globals
            .iter()
            .find(|(defined, _)| *defined == name)
            .expect("global defined");
        accessor()
    }
}

impl Host for RecordingHost {
    fn define_global(&mut self, name: &'static str, accessor: GlobalAccessor) {
        self.globals.push((name, accessor));
    }

    fn add_mixin(&mut self, mixin: RememberMixin) {
        self.mixins.push(mixin);
    }
}

struct Fixture {
    _runtime: Runtime,
    router: Rc<StubRouter>,
    heads: Rc<StubHeadFactory>,
    app: InertiaApp,
}

fn props(value: Value) -> Props {
    match value {
        Value::Object(map) => map,
        _ => Props::new(),
    }
}

fn collaborators(router: &Rc<StubRouter>, heads: &Rc<StubHeadFactory>) -> Collaborators {
    Collaborators {
        router: router.clone(),
        head_manager_factory: heads.clone(),
        form_helper: Some(Rc::new(NoopForms) as Rc<dyn FormHelper>),
    }
}

fn fixture_with(config: impl FnOnce(AppConfig) -> AppConfig) -> Fixture {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let router = Rc::new(StubRouter::default());
    let heads = Rc::new(StubHeadFactory::default());
    let initial = Page::new("Home", props(json!({"greeting": "hi"}))).with_url("/");
    let config = config(AppConfig::new(initial).initial_component(Component::named("Home")));
    let app = InertiaApp::setup(runtime.handle(), config, collaborators(&router, &heads))
        .expect("setup succeeds");
    Fixture {
        _runtime: runtime,
        router,
        heads,
        app,
    }
}

fn fixture() -> Fixture {
    fixture_with(|config| config)
}

#[test]
fn setup_installs_initial_page_without_key() {
    let f = fixture();
    let ctx = f.app.context();

    assert_eq!(f.app.use_page().component, "Home");
    assert_eq!(f.app.use_page().url, "/");
    assert_eq!(ctx.page.key.value(), None);
    assert_eq!(
        ctx.page.component.value().map(|c| c.name().to_string()),
        Some("Home".to_string())
    );
    assert_eq!(ctx.dialog.data.value(), None);
    assert_eq!(f.heads.server_side.get(), Some(false));
}

#[test]
fn router_receives_working_swap_handler() {
    let f = fixture();
    let config = f.router.config.borrow().clone().expect("router initialised");
    assert_eq!(config.initial_page.component, "Home");

    let next = Page::new("Users", props(json!({"count": 3})));
    block_on(
        config
            .swap_component
            .swap_component(SwapArgs::new(next, Component::named("Users"))),
    )
    .expect("swap succeeds");

    assert_eq!(f.app.use_page().component, "Users");
    assert!(f.app.context().page.key.value().is_some());
}

#[test]
fn navigation_forces_head_update() {
    let f = fixture();
    assert_eq!(f.heads.head.updates.get(), 0);

    f.router.navigate(&f.app.use_page());
    f.router.navigate(&f.app.use_page());

    assert_eq!(f.heads.head.updates.get(), 2);
}

#[test]
fn server_side_setup_leaves_router_alone() {
    let f = fixture_with(|config| config.server_side(true));

    assert!(f.router.config.borrow().is_none());
    assert!(f.router.listeners.borrow().is_empty());
    assert_eq!(f.heads.server_side.get(), Some(true));
    assert_eq!(f.app.use_page().component, "Home");
}

#[test]
fn title_callback_reaches_head_manager() {
    let f = fixture_with(|config| config.title_callback(|title| format!("{title} - Acme")));
    let title = f.heads.title.borrow().clone().expect("title callback passed");
    assert_eq!(title("Users"), "Users - Acme");
}

#[test]
fn install_registers_globals_mixin_and_form_helper() {
    let f = fixture();
    let mut host = RecordingHost::default();
    f.app.install(&mut host);

    let names: Vec<&str> = host.globals.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, ["$inertia", "$page", "$dialog", "$headManager"]);
    assert_eq!(host.mixins.len(), 1);
    assert!(f.router.form_helper.borrow().is_some());
    assert!(matches!(host.global("$inertia"), GlobalValue::Router(_)));
    assert!(matches!(host.global("$headManager"), GlobalValue::HeadManager(_)));
    assert!(matches!(host.global("$dialog"), GlobalValue::Dialog(None)));
}

#[test]
fn page_global_tracks_swaps() {
    let f = fixture();
    let mut host = RecordingHost::default();
    f.app.install(&mut host);

    block_on(f.app.handler().swap_component(SwapArgs::new(
        Page::new("About", Props::new()),
        Component::named("About"),
    )))
    .expect("swap succeeds");

    match host.global("$page") {
        GlobalValue::Page(page) => assert_eq!(page.component, "About"),
        other => panic!("unexpected global {other:?}"),
    }
}

#[test]
fn remember_mixin_stores_through_router() {
    let f = fixture();
    let mut host = RecordingHost::default();
    f.app.install(&mut host);

    let option = crate::remember::RememberOption::from("query");
    host.mixins[0].changed("Search", &option, &props(json!({"query": "rust"})));

    assert_eq!(f.router.restore("Search"), Some(json!({"query": "rust"})));
}

#[test]
fn initial_page_without_props_is_rejected() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let router = Rc::new(StubRouter::default());
    let heads = Rc::new(StubHeadFactory::default());
    let mut initial = Page::new("Broken", Props::new());
    initial.props = None;

    let result = InertiaApp::setup(
        runtime.handle(),
        AppConfig::new(initial),
        collaborators(&router, &heads),
    );

    assert!(matches!(result, Err(SwapError::MissingPageProps { .. })));
    assert!(router.config.borrow().is_none());
}

#[test]
fn composition_reflects_swaps() {
    let f = fixture();
    let mut composition = f.app.composition();
    assert_eq!(crate::node::describe_tree(composition.render()), "Home");

    block_on(f.app.handler().swap_component(SwapArgs::new(
        Page::new("About", Props::new()),
        Component::named("About"),
    )))
    .expect("swap succeeds");

    assert!(composition.should_render());
    let tree = composition.recompose().expect("recomposed");
    assert_eq!(crate::node::describe_tree(tree), "About");
}
