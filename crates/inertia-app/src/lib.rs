//! Page and dialog state for an Inertia-style client adapter.
//!
//! The router hands every navigation to [`NavigationHandler::swap_component`],
//! which writes the page and dialog state cells held by [`AppContext`].
//! [`compose`] turns those cells into a [`RenderTree`] for the UI runtime, and
//! [`InertiaApp`] wires everything to the router and head manager at startup.

mod app;
mod appear;
mod component;
mod composer;
mod config;
mod context;
mod error;
mod key;
mod navigation;
mod node;
mod page;
mod remember;
mod router;

pub use app::{GlobalAccessor, GlobalValue, Host, InertiaApp};
pub use appear::{should_appear, DialogKeyLookup, NestedComponentLookup};
pub use component::{
    Component, ComponentBuilder, ComponentDef, ComponentRegistry, ComponentResolver,
    ComponentSource, Layout, LayoutFn,
};
pub use composer::{compose, DIALOG_PROP};
pub use config::{AppConfig, Collaborators};
pub use context::{AppContext, DialogSnapshot, DialogState, PageState};
pub use error::{PageDecodeError, ResolveError, SwapError};
pub use key::{KeyGenerator, ViewKey};
pub use navigation::{NavigationHandler, SwapArgs};
pub use node::{describe_tree, h, Node, Render, RenderTree};
pub use page::{DialogDescriptor, Page, PageData, Props};
pub use remember::{RememberKey, RememberMixin, RememberOption};
pub use router::{
    FormHelper, HeadManager, HeadManagerFactory, HeadUpdateCallback, NavigateListener,
    RememberStore, Router, RouterConfig, TitleCallback,
};
