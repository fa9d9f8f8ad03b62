use std::rc::Rc;
use std::sync::Arc;

use futures::executor::block_on;
use inertia_app::{
    AppConfig, AppContext, Collaborators, FormHelper, InertiaApp, Node, Page, RenderTree,
    SwapArgs, SwapError,
};
use inertia_core::{Composition, DefaultScheduler, Runtime, RuntimeHandle};

use crate::fakes::{
    FakeFormHelper, FakeHeadManager, FakeHeadManagerFactory, FakeRouter, ManualClock, VisitError,
};

/// Clock reading the harness starts from.
pub const HARNESS_START_MILLIS: u64 = 1_000;

/// Headless application wired to fake collaborators.
///
/// Frames are committed explicitly with [`SwapHarness::frame`], which mirrors
/// a host frame loop: recompose if invalidated, record the tree, then run the
/// next-tick tasks queued so far.
pub struct SwapHarness {
    runtime: Runtime,
    app: InertiaApp,
    router: Rc<FakeRouter>,
    heads: Rc<FakeHeadManagerFactory>,
    forms: Rc<FakeFormHelper>,
    clock: Arc<ManualClock>,
    composition: Composition<RenderTree>,
    frames: Vec<RenderTree>,
}

impl SwapHarness {
    /// Sets up the application and records its first frame. The config's
    /// clock is replaced by the harness clock.
    pub fn new(config: AppConfig) -> Result<Self, SwapError> {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let router = Rc::new(FakeRouter::new());
        let heads = Rc::new(FakeHeadManagerFactory::new());
        let forms = Rc::new(FakeFormHelper::default());
        let clock = Arc::new(ManualClock::new(HARNESS_START_MILLIS));
        let collaborators = Collaborators {
            router: router.clone(),
            head_manager_factory: heads.clone(),
            form_helper: Some(forms.clone() as Rc<dyn FormHelper>),
        };
        let app = InertiaApp::setup(
            runtime.handle(),
            config.clock(clock.clone()),
            collaborators,
        )?;
        let composition = app.composition();
        let mut harness = Self {
            runtime,
            app,
            router,
            heads,
            forms,
            clock,
            composition,
            frames: Vec::new(),
        };
        let first = harness.composition.render().clone();
        harness.frames.push(first);
        Ok(harness)
    }

    /// Starts the application from a bare page.
    pub fn with_page(page: Page) -> Result<Self, SwapError> {
        Self::new(AppConfig::new(page))
    }

    pub fn app(&self) -> &InertiaApp {
        &self.app
    }

    pub fn context(&self) -> &AppContext {
        self.app.context()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn router(&self) -> &FakeRouter {
        &self.router
    }

    pub fn head(&self) -> Option<Rc<FakeHeadManager>> {
        self.heads.head()
    }

    pub fn forms(&self) -> &FakeFormHelper {
        &self.forms
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Calls the navigation handler directly. No frame is committed.
    pub fn swap(&self, args: SwapArgs) -> Result<(), SwapError> {
        block_on(self.app.handler().swap_component(args))
    }

    /// Navigates through the fake router. No frame is committed.
    pub fn visit(&self, page: Page) -> Result<(), VisitError> {
        self.router.visit(page, false)
    }

    /// Commits one frame. Returns the committed tree, or `None` when nothing
    /// was invalidated since the previous frame.
    pub fn frame(&mut self) -> Option<&RenderTree> {
        let committed = match self.composition.recompose() {
            Some(tree) => {
                self.frames.push(tree.clone());
                true
            }
            None => false,
        };
        self.runtime.handle().drain_tasks();
        if committed {
            self.frames.last()
        } else {
            None
        }
    }

    /// Commits frames until the runtime is idle. Returns how many were
    /// committed.
    pub fn pump_until_idle(&mut self) -> usize {
        let mut committed = 0;
        loop {
            let handle = self.runtime.handle();
            if !self.composition.should_render() && !handle.has_pending_tasks() {
                break;
            }
            if self.frame().is_some() {
                committed += 1;
            }
        }
        committed
    }

    /// Every committed tree, the initial one first.
    pub fn frames(&self) -> &[RenderTree] {
        &self.frames
    }

    pub fn last_frame(&self) -> &[Node] {
        self.frames.last().map(Vec::as_slice).unwrap_or_default()
    }
}
