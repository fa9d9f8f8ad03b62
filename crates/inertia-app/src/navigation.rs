//! Applies router swaps to the application state cells.
//!
//! A swap commits in two phases. The page cells are written synchronously;
//! the dialog cells, when the swap carries a dialog, are written from a task
//! on the next runtime tick, so the page and the dialog land in separate
//! frames and always in that order. A deferred dialog write is dropped when
//! another swap has been applied before it runs.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use inertia_core::{untracked, Clock, RuntimeHandle};

use crate::appear::{should_appear, DialogKeyLookup, NestedComponentLookup};
use crate::component::{Component, ComponentSource};
use crate::context::AppContext;
use crate::error::SwapError;
use crate::key::KeyGenerator;
use crate::page::{DialogDescriptor, Page, PageData};

/// Everything the router hands over for one navigation.
#[derive(Debug)]
pub struct SwapArgs {
    pub page: Page,
    pub component: ComponentSource,
    pub dialog_component: Option<ComponentSource>,
    pub preserve_state: bool,
}

impl SwapArgs {
    pub fn new(page: Page, component: impl Into<ComponentSource>) -> Self {
        Self {
            page,
            component: component.into(),
            dialog_component: None,
            preserve_state: false,
        }
    }

    pub fn with_dialog(mut self, component: impl Into<ComponentSource>) -> Self {
        self.dialog_component = Some(component.into());
        self
    }

    pub fn preserve_state(mut self, preserve: bool) -> Self {
        self.preserve_state = preserve;
        self
    }
}

struct DialogCommit {
    dialog: DialogDescriptor,
    component: Component,
    preserve_state: bool,
}

/// The `swap_component` entry point handed to the router.
#[derive(Clone)]
pub struct NavigationHandler {
    ctx: AppContext,
    runtime: RuntimeHandle,
    keys: KeyGenerator,
    lookup: Rc<dyn DialogKeyLookup>,
    swaps: Rc<Cell<u64>>,
}

impl NavigationHandler {
    pub fn new(ctx: AppContext, clock: Arc<dyn Clock>) -> Self {
        Self {
            runtime: ctx.runtime_handle(),
            ctx,
            keys: KeyGenerator::new(clock),
            lookup: Rc::new(NestedComponentLookup),
            swaps: Rc::new(Cell::new(0)),
        }
    }

    pub fn with_lookup(mut self, lookup: Rc<dyn DialogKeyLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Applies one navigation.
    ///
    /// Validation and component resolution finish before the first cell is
    /// written: a rejected swap leaves the previous state on screen.
    pub async fn swap_component(&self, args: SwapArgs) -> Result<(), SwapError> {
        let preserve_state = args.preserve_state;
        let (page, component, dialog) = match prepare(args).await {
            Ok(prepared) => prepared,
            Err(err) => {
                log::warn!("swap rejected: {err}");
                return Err(err);
            }
        };

        log::debug!(
            "swapping to page `{}` (preserve_state: {preserve_state}, dialog: {})",
            page.component,
            dialog.is_some()
        );

        let swap = self.swaps.get() + 1;
        self.swaps.set(swap);
        let ctx = &self.ctx;
        ctx.page.data.set(page);
        let previous = untracked(|| ctx.page.key.value());
        let key = if preserve_state || dialog.is_some() {
            previous
        } else {
            Some(self.keys.fresh(previous))
        };
        if key != previous {
            log::debug!("page key refreshed: {previous:?} -> {key:?}");
        }
        ctx.page.key.set(key);
        ctx.page.component.set(Some(component));

        match dialog {
            Some(commit) => {
                let handler = self.clone();
                self.runtime
                    .spawn_task(Box::new(move || handler.commit_dialog(commit, swap)));
            }
            None => self.close_dialog(),
        }
        Ok(())
    }

    fn commit_dialog(&self, commit: DialogCommit, swap: u64) {
        let DialogCommit {
            dialog,
            component,
            preserve_state,
        } = commit;
        if swap != self.swaps.get() {
            log::debug!(
                "dialog `{}` from swap {swap} superseded by swap {}",
                dialog.component,
                self.swaps.get()
            );
            return;
        }
        let current = self.ctx.dialog.snapshot();
        let appear = should_appear(&dialog, Some(&component), &current, self.lookup.as_ref());
        let key = if preserve_state {
            current.key
        } else {
            Some(self.keys.fresh(current.key))
        };
        log::debug!(
            "dialog `{}` committed (appear: {appear}, key: {key:?})",
            dialog.component
        );

        let dialog_state = &self.ctx.dialog;
        dialog_state.data.set(Some(DialogDescriptor {
            open: true,
            appear,
            ..dialog
        }));
        dialog_state.key.set(key);
        dialog_state.component.set(Some(component));
    }

    fn close_dialog(&self) {
        let dialog_state = &self.ctx.dialog;
        if !untracked(|| dialog_state.is_open()) {
            return;
        }
        log::debug!("closing dialog");
        dialog_state.data.update(|data| {
            if let Some(dialog) = data.as_mut() {
                dialog.open = false;
            }
        });
    }
}

async fn prepare(
    args: SwapArgs,
) -> Result<(PageData, Component, Option<DialogCommit>), SwapError> {
    let SwapArgs {
        page,
        component,
        dialog_component,
        preserve_state,
    } = args;

    let (page, dialog) = page.split()?;
    let component = component.resolve().await?;
    let dialog = match dialog_component {
        Some(source) => {
            let dialog = dialog.ok_or_else(|| SwapError::MissingDialogPayload {
                component: page.component.clone(),
            })?;
            Some(DialogCommit {
                dialog,
                component: source.resolve().await?,
                preserve_state,
            })
        }
        None => None,
    };
    Ok((page, component, dialog))
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
