//! Frame loop for hosts embedding the adapter.
//!
//! Each [`AppShell::update`] commits at most one frame: it re-runs the
//! composer if a state cell it read was written, hands the tree to the
//! [`Renderer`], and only then runs the next-tick tasks queued so far. Work
//! those tasks do lands in the following frame.

use std::fmt::Debug;

use inertia_app::{AppConfig, Collaborators, InertiaApp, RenderTree, SwapError};
use inertia_core::Composition;
use inertia_runtime_std::StdRuntime;

/// Backend receiving committed trees.
pub trait Renderer {
    type Error;

    fn commit(&mut self, frame: u64, tree: &RenderTree) -> Result<(), Self::Error>;
}

pub struct AppShell<R>
where
    R: Renderer,
{
    runtime: StdRuntime,
    app: InertiaApp,
    composition: Composition<RenderTree>,
    renderer: R,
    frame: u64,
}

impl<R> AppShell<R>
where
    R: Renderer,
    R::Error: Debug,
{
    /// Wraps an application already set up on `runtime` and commits its
    /// first frame.
    pub fn new(renderer: R, runtime: StdRuntime, app: InertiaApp) -> Self {
        let composition = app.composition();
        let mut shell = Self {
            runtime,
            app,
            composition,
            renderer,
            frame: 0,
        };
        shell.composition.render();
        shell.commit();
        shell
    }

    /// Sets up the application on a fresh [`StdRuntime`].
    pub fn launch(
        renderer: R,
        config: AppConfig,
        collaborators: Collaborators,
    ) -> Result<Self, SwapError> {
        let runtime = StdRuntime::new();
        let app = InertiaApp::setup(runtime.runtime_handle(), config, collaborators)?;
        Ok(Self::new(renderer, runtime, app))
    }

    pub fn app(&self) -> &InertiaApp {
        &self.app
    }

    pub fn runtime(&self) -> &StdRuntime {
        &self.runtime
    }

    pub fn renderer(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Number of frames committed so far, the first one included.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn tree(&self) -> Option<&RenderTree> {
        self.composition.output()
    }

    pub fn should_render(&self) -> bool {
        self.runtime.take_frame_request()
            || self.composition.should_render()
            || self.runtime.runtime_handle().has_pending_tasks()
    }

    /// Commits a frame if the composition was invalidated, then runs the
    /// pending next-tick tasks. Returns whether a frame was committed.
    pub fn update(&mut self) -> bool {
        let committed = self.composition.recompose().is_some();
        if committed {
            self.commit();
        }
        let tasks = self.runtime.drain_tasks();
        if tasks > 0 {
            log::trace!("ran {tasks} deferred task(s) after frame {}", self.frame);
        }
        committed
    }

    /// Updates until nothing is left to do, committing at most `max_frames`
    /// frames. Returns the number of frames committed.
    pub fn run_until_idle(&mut self, max_frames: u64) -> u64 {
        let mut committed = 0;
        while committed < max_frames && self.should_render() {
            if self.update() {
                committed += 1;
            }
        }
        if committed == max_frames && self.should_render() {
            log::warn!("still busy after {max_frames} frame(s)");
        }
        committed
    }

    fn commit(&mut self) {
        let Some(tree) = self.composition.output() else {
            return;
        };
        self.frame += 1;
        if let Err(err) = self.renderer.commit(self.frame, tree) {
            log::error!("renderer commit failed on frame {}: {err:?}", self.frame);
        }
    }
}
