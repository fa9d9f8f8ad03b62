//! The application-wide state cells.
//!
//! One [`AppContext`] exists per running application. It is created at
//! bootstrap and shared by reference with the navigation handler, the render
//! composer and the global accessors.

use inertia_core::{mutable_state_of, untracked, MutableState, RuntimeHandle};

use crate::component::Component;
use crate::key::ViewKey;
use crate::page::{DialogDescriptor, PageData};

/// Primary view state: payload, remount key and component.
#[derive(Clone, Debug)]
pub struct PageState {
    pub data: MutableState<PageData>,
    pub key: MutableState<Option<ViewKey>>,
    pub component: MutableState<Option<Component>>,
}

/// Overlay state. `data` is `None` until the first dialog is swapped in and
/// keeps the last payload after the dialog closes.
#[derive(Clone, Debug)]
pub struct DialogState {
    pub data: MutableState<Option<DialogDescriptor>>,
    pub key: MutableState<Option<ViewKey>>,
    pub component: MutableState<Option<Component>>,
}

/// Plain copy of the dialog cells taken without subscribing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DialogSnapshot {
    pub data: Option<DialogDescriptor>,
    pub key: Option<ViewKey>,
    pub component: Option<Component>,
}

impl DialogSnapshot {
    pub fn is_open(&self) -> bool {
        self.data.as_ref().is_some_and(|dialog| dialog.open)
    }
}

impl DialogState {
    pub fn snapshot(&self) -> DialogSnapshot {
        untracked(|| DialogSnapshot {
            data: self.data.value(),
            key: self.key.value(),
            component: self.component.value(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.data
            .with(|data| data.as_ref().is_some_and(|dialog| dialog.open))
    }
}

#[derive(Clone, Debug)]
pub struct AppContext {
    pub page: PageState,
    pub dialog: DialogState,
    runtime: RuntimeHandle,
}

impl AppContext {
    pub fn new(runtime: RuntimeHandle, initial_page: PageData) -> Self {
        Self {
            page: PageState {
                data: mutable_state_of(initial_page, &runtime),
                key: mutable_state_of(None, &runtime),
                component: mutable_state_of(None, &runtime),
            },
            dialog: DialogState {
                data: mutable_state_of(None, &runtime),
                key: mutable_state_of(None, &runtime),
                component: mutable_state_of(None, &runtime),
            },
            runtime,
        }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    /// Current page payload. Subscribes the running composition, if any.
    pub fn use_page(&self) -> PageData {
        self.page.data.value()
    }

    /// Current dialog payload. Subscribes the running composition, if any.
    pub fn use_dialog(&self) -> Option<DialogDescriptor> {
        self.dialog.data.value()
    }
}
