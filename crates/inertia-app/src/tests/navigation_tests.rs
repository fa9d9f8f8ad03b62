use super::*;
use crate::error::ResolveError;
use crate::context::DialogSnapshot;
use crate::key::ViewKey;
use crate::page::{PageData, Props};
use futures::executor::block_on;
use inertia_core::{Composition, DefaultScheduler, Runtime};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

struct StepClock(AtomicU64);

impl Clock for StepClock {
    fn now_millis(&self) -> u64 {
        self.0.fetch_add(10, Ordering::SeqCst)
    }
}

struct Fixture {
    _runtime: Runtime,
    ctx: AppContext,
    handler: NavigationHandler,
}

fn fixture() -> Fixture {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let initial = Page::new("Home", Props::new())
        .split()
        .map(|(data, _)| data)
        .expect("initial page has props");
    let ctx = AppContext::new(runtime.handle(), initial);
    let handler = NavigationHandler::new(ctx.clone(), Arc::new(StepClock(AtomicU64::new(1_000))));
    Fixture {
        _runtime: runtime,
        ctx,
        handler,
    }
}

fn props(value: serde_json::Value) -> Props {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    }
}

fn page(component: &str) -> Page {
    Page::new(component, props(json!({"title": component})))
}

fn page_with_dialog(component: &str, dialog: &str) -> Page {
    page(component).with_dialog(DialogDescriptor::new(dialog, props(json!({"id": 7}))))
}

impl Fixture {
    fn swap(&self, args: SwapArgs) -> Result<(), SwapError> {
        block_on(self.handler.swap_component(args))
    }

    fn tick(&self) -> usize {
        self.ctx.runtime_handle().drain_tasks()
    }

    fn page_key(&self) -> Option<ViewKey> {
        self.ctx.page.key.value()
    }

    fn page_data(&self) -> PageData {
        self.ctx.page.data.value()
    }
}

#[test]
fn fresh_navigation_assigns_a_later_page_key() {
    let f = fixture();
    f.swap(SwapArgs::new(page("A"), Component::named("A")))
        .expect("swap succeeds");
    let first = f.page_key().expect("key assigned");

    f.swap(SwapArgs::new(page("B"), Component::named("B")))
        .expect("swap succeeds");
    let second = f.page_key().expect("key assigned");

    assert!(second > first);
    assert_eq!(f.page_data().component, "B");
    assert_eq!(
        f.ctx.page.component.value().map(|c| c.name().to_string()),
        Some("B".to_string())
    );
}

#[test]
fn preserve_state_keeps_the_page_key() {
    let f = fixture();
    f.swap(SwapArgs::new(page("A"), Component::named("A")))
        .expect("swap succeeds");
    let before = f.page_key();

    f.swap(SwapArgs::new(page("A"), Component::named("A")).preserve_state(true))
        .expect("swap succeeds");
    assert_eq!(f.page_key(), before);
}

#[test]
fn dialog_swap_keeps_the_page_key_without_preserve_state() {
    let f = fixture();
    f.swap(SwapArgs::new(page("A"), Component::named("A")))
        .expect("swap succeeds");
    let before = f.page_key();

    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(Component::named("Modal")),
    )
    .expect("swap succeeds");
    assert_eq!(f.page_key(), before);
    assert_eq!(f.page_data().component, "B");
}

#[test]
fn dialog_commit_waits_for_the_next_tick() {
    let f = fixture();
    let modal = Component::named("Modal");
    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(modal.clone()),
    )
    .expect("swap succeeds");

    assert_eq!(f.page_data().component, "B");
    assert_eq!(f.ctx.dialog.snapshot(), DialogSnapshot::default());

    assert_eq!(f.tick(), 1);
    let dialog = f.ctx.dialog.snapshot();
    let data = dialog.data.expect("dialog written");
    assert!(data.open);
    assert!(data.appear);
    assert_eq!(data.props["id"], json!(7));
    assert!(dialog.key.is_some());
    assert_eq!(dialog.component, Some(modal));
}

#[test]
fn pending_dialog_is_dropped_when_a_later_swap_has_none() {
    let f = fixture();
    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(Component::named("Modal")),
    )
    .expect("swap succeeds");
    f.swap(SwapArgs::new(page("C"), Component::named("C")))
        .expect("swap succeeds");

    assert_eq!(f.tick(), 1);
    assert_eq!(f.page_data().component, "C");
    assert_eq!(f.ctx.dialog.snapshot(), DialogSnapshot::default());
}

#[test]
fn only_the_latest_pending_dialog_is_committed() {
    let f = fixture();
    let first = Component::named("First");
    let second = Component::named("Second");
    f.swap(
        SwapArgs::new(page_with_dialog("B", "First"), Component::named("B"))
            .with_dialog(first),
    )
    .expect("swap succeeds");
    f.swap(
        SwapArgs::new(page_with_dialog("C", "Second"), Component::named("C"))
            .with_dialog(second.clone()),
    )
    .expect("swap succeeds");

    assert_eq!(f.tick(), 2);
    let dialog = f.ctx.dialog.snapshot();
    assert_eq!(dialog.data.map(|data| data.component), Some("Second".to_string()));
    assert_eq!(dialog.component, Some(second));
}

#[test]
fn rejected_swap_does_not_cancel_a_pending_dialog() {
    let f = fixture();
    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(Component::named("Modal")),
    )
    .expect("swap succeeds");
    let failing = ComponentSource::failed(ResolveError::NotFound { name: "C".into() });
    assert!(f.swap(SwapArgs::new(page("C"), failing)).is_err());

    assert_eq!(f.tick(), 1);
    assert!(f.ctx.dialog.snapshot().data.is_some_and(|data| data.open));
}

#[test]
fn page_payload_never_contains_the_dialog() {
    let f = fixture();
    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(Component::named("Modal")),
    )
    .expect("swap succeeds");
    let data = f.page_data();
    assert!(!data.extra.contains_key("dialog"));
    assert_eq!(data.props["title"], json!("B"));
}

#[test]
fn same_dialog_on_next_navigation_does_not_reappear() {
    let f = fixture();
    let modal = Component::named("Modal");
    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(modal.clone()),
    )
    .expect("swap succeeds");
    f.tick();
    let first_key = f.ctx.dialog.snapshot().key;

    f.swap(
        SwapArgs::new(page_with_dialog("C", "Modal"), Component::named("C"))
            .with_dialog(modal),
    )
    .expect("swap succeeds");
    f.tick();

    let dialog = f.ctx.dialog.snapshot();
    let data = dialog.data.expect("dialog written");
    assert!(data.open);
    assert!(!data.appear);
    assert!(dialog.key > first_key, "dialog key refreshes without preserve_state");
}

#[test]
fn preserve_state_keeps_the_dialog_key() {
    let f = fixture();
    let modal = Component::named("Modal");
    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(modal.clone()),
    )
    .expect("swap succeeds");
    f.tick();
    let first_key = f.ctx.dialog.snapshot().key;

    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(modal)
            .preserve_state(true),
    )
    .expect("swap succeeds");
    f.tick();
    assert_eq!(f.ctx.dialog.snapshot().key, first_key);
}

#[test]
fn eager_dialog_is_committed_without_appear() {
    let f = fixture();
    let page = page("B").with_dialog(DialogDescriptor::new("Modal", Props::new()).eager(true));
    f.swap(SwapArgs::new(page, Component::named("B")).with_dialog(Component::named("Modal")))
        .expect("swap succeeds");
    f.tick();
    let data = f.ctx.dialog.snapshot().data.expect("dialog written");
    assert!(data.open);
    assert!(!data.appear);
}

#[test]
fn navigating_away_closes_but_retains_the_dialog() {
    let f = fixture();
    f.swap(
        SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B"))
            .with_dialog(Component::named("Modal")),
    )
    .expect("swap succeeds");
    f.tick();
    let before = f.ctx.dialog.snapshot();

    f.swap(SwapArgs::new(page("C"), Component::named("C")))
        .expect("swap succeeds");
    assert_eq!(f.tick(), 0, "closing happens synchronously");

    let after = f.ctx.dialog.snapshot();
    let data = after.data.clone().expect("payload retained");
    assert!(!data.open);
    assert_eq!(data.props, before.data.expect("had payload").props);
    assert_eq!(after.key, before.key);
    assert_eq!(after.component, before.component);
}

#[test]
fn navigation_without_open_dialog_leaves_dialog_cells_alone() {
    let f = fixture();
    let mut observer = Composition::new(f.ctx.runtime_handle(), {
        let ctx = f.ctx.clone();
        move || ctx.use_dialog()
    });
    observer.render();

    f.swap(SwapArgs::new(page("C"), Component::named("C")))
        .expect("swap succeeds");
    assert!(!observer.should_render());
}

#[test]
fn dialog_payload_without_dialog_component_is_treated_as_no_dialog() {
    let f = fixture();
    f.swap(SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B")))
        .expect("swap succeeds");
    assert_eq!(f.tick(), 0);
    assert_eq!(f.ctx.dialog.snapshot().data, None);
    assert!(f.page_key().is_some(), "no dialog, so the page key refreshes");
}

#[test]
fn missing_props_rejects_before_any_write() {
    let f = fixture();
    let mut broken = page("Broken");
    broken.props = None;

    let error = f
        .swap(SwapArgs::new(broken, Component::named("Broken")))
        .unwrap_err();
    assert_eq!(
        error,
        SwapError::MissingPageProps {
            component: "Broken".into()
        }
    );
    assert_eq!(f.page_data().component, "Home");
    assert_eq!(f.page_key(), None);
    assert_eq!(f.ctx.page.component.value(), None);
}

#[test]
fn dialog_component_without_payload_is_rejected() {
    let f = fixture();
    let error = f
        .swap(SwapArgs::new(page("B"), Component::named("B")).with_dialog(Component::named("Modal")))
        .unwrap_err();
    assert!(matches!(error, SwapError::MissingDialogPayload { .. }));
    assert_eq!(f.page_data().component, "Home");
    assert!(!f.ctx.runtime_handle().has_pending_tasks());
}

#[test]
fn failed_dialog_resolution_leaves_page_untouched() {
    let f = fixture();
    let failing = ComponentSource::failed(ResolveError::Failed {
        name: "Modal".into(),
        reason: "chunk missing".into(),
    });
    let error = f
        .swap(SwapArgs::new(page_with_dialog("B", "Modal"), Component::named("B")).with_dialog(failing))
        .unwrap_err();
    assert!(matches!(error, SwapError::Resolve(ResolveError::Failed { .. })));
    assert_eq!(f.page_data().component, "Home");
    assert_eq!(f.ctx.page.component.value(), None);
}

#[test]
fn failed_page_resolution_keeps_previous_page() {
    let f = fixture();
    f.swap(SwapArgs::new(page("A"), Component::named("A")))
        .expect("swap succeeds");
    let key = f.page_key();

    let failing = ComponentSource::failed(ResolveError::NotFound { name: "B".into() });
    assert!(f.swap(SwapArgs::new(page("B"), failing)).is_err());
    assert_eq!(f.page_data().component, "A");
    assert_eq!(f.page_key(), key);
}

#[test]
fn pending_components_are_awaited_before_writing() {
    let f = fixture();
    let lazy = Component::named("Lazy");
    let source = ComponentSource::pending({
        let lazy = lazy.clone();
        async move { Ok(lazy) }
    });
    f.swap(SwapArgs::new(page("Lazy"), source))
        .expect("swap succeeds");
    assert_eq!(f.ctx.page.component.value(), Some(lazy));
}

#[test]
fn custom_lookup_is_used_for_dialog_identity() {
    struct SharedKey;

    impl DialogKeyLookup for SharedKey {
        fn dialog_key(&self, _component: &Component) -> Option<String> {
            Some("shared".into())
        }
    }

    let f = fixture();
    let handler = f.handler.clone().with_lookup(Rc::new(SharedKey));
    block_on(handler.swap_component(
        SwapArgs::new(page_with_dialog("B", "First"), Component::named("B"))
            .with_dialog(Component::named("First")),
    ))
    .expect("swap succeeds");
    f.tick();

    let keyed = Component::builder("Second").dialog_key("shared").build();
    block_on(handler.swap_component(
        SwapArgs::new(page_with_dialog("B", "Second"), Component::named("B")).with_dialog(keyed),
    ))
    .expect("swap succeeds");
    f.tick();

    let data = f.ctx.dialog.snapshot().data.expect("dialog written");
    assert_eq!(data.component, "Second");
    assert!(!data.appear);
}
