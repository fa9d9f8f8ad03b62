//! Component definitions as seen by the adapter.
//!
//! The adapter never instantiates components itself; it only needs their
//! identity, the attribute-inheritance flag, the declared layout and the
//! dialog identity metadata.

use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};
use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::node::{Node, Render};

/// A function-style layout: receives the render primitive and the page view
/// and returns the wrapped tree.
pub type LayoutFn = Rc<dyn Fn(Render, Node) -> Node>;

/// How a page component wants to be wrapped.
#[derive(Clone, Default)]
pub enum Layout {
    #[default]
    None,
    Single(LayoutFn),
    /// Declared outermost first.
    Chain(Vec<Component>),
    /// A single layout component wrapping the page.
    Persistent(Component),
}

impl Layout {
    pub fn single(layout: impl Fn(Render, Node) -> Node + 'static) -> Self {
        Layout::Single(Rc::new(layout))
    }

    pub fn chain(layouts: impl IntoIterator<Item = Component>) -> Self {
        Layout::Chain(layouts.into_iter().collect())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Layout::None)
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::None => f.write_str("None"),
            Layout::Single(_) => f.write_str("Single(<fn>)"),
            Layout::Chain(layouts) => f
                .debug_tuple("Chain")
                .field(&layouts.iter().map(|layout| layout.name()).collect::<Vec<_>>())
                .finish(),
            Layout::Persistent(layout) => f.debug_tuple("Persistent").field(&layout.name()).finish(),
        }
    }
}

#[derive(Debug)]
pub struct ComponentDef {
    name: String,
    inherit_attrs: Option<bool>,
    layout: Layout,
    dialog_key: Option<String>,
    components: IndexMap<String, Component>,
}

impl ComponentDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The flag exactly as declared; `None` when the author left it unset.
    pub fn declared_inherit_attrs(&self) -> Option<bool> {
        self.inherit_attrs
    }

    /// The flag normalised to a boolean, unset meaning `false`.
    pub fn inherit_attrs(&self) -> bool {
        self.inherit_attrs.unwrap_or(false)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn dialog_key(&self) -> Option<&str> {
        self.dialog_key.as_deref()
    }

    /// Nested sub-components, in registration order.
    pub fn components(&self) -> &IndexMap<String, Component> {
        &self.components
    }
}

/// Shared handle to a component definition. Equality is identity: two handles
/// are equal only when they point at the same definition.
#[derive(Clone)]
pub struct Component(Rc<ComponentDef>);

impl Component {
    pub fn named(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> ComponentBuilder {
        ComponentBuilder {
            def: ComponentDef {
                name: name.into(),
                inherit_attrs: None,
                layout: Layout::None,
                dialog_key: None,
                components: IndexMap::new(),
            },
        }
    }

    pub fn ptr_eq(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Component {
    type Target = ComponentDef;

    fn deref(&self) -> &ComponentDef {
        &self.0
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Component {}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.0.name).finish()
    }
}

pub struct ComponentBuilder {
    def: ComponentDef,
}

impl ComponentBuilder {
    pub fn inherit_attrs(mut self, inherit: bool) -> Self {
        self.def.inherit_attrs = Some(inherit);
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.def.layout = layout;
        self
    }

    pub fn dialog_key(mut self, key: impl Into<String>) -> Self {
        self.def.dialog_key = Some(key.into());
        self
    }

    pub fn component(mut self, name: impl Into<String>, component: Component) -> Self {
        self.def.components.insert(name.into(), component);
        self
    }

    pub fn build(self) -> Component {
        Component(Rc::new(self.def))
    }
}

/// A component that is either already loaded or still being resolved.
pub enum ComponentSource {
    Ready(Component),
    Pending(LocalBoxFuture<'static, Result<Component, ResolveError>>),
}

impl ComponentSource {
    pub fn pending(load: impl Future<Output = Result<Component, ResolveError>> + 'static) -> Self {
        ComponentSource::Pending(load.boxed_local())
    }

    pub fn failed(error: ResolveError) -> Self {
        ComponentSource::Pending(future::ready(Err(error)).boxed_local())
    }

    pub async fn resolve(self) -> Result<Component, ResolveError> {
        match self {
            ComponentSource::Ready(component) => Ok(component),
            ComponentSource::Pending(load) => load.await,
        }
    }
}

impl From<Component> for ComponentSource {
    fn from(component: Component) -> Self {
        ComponentSource::Ready(component)
    }
}

impl fmt::Debug for ComponentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentSource::Ready(component) => f.debug_tuple("Ready").field(component).finish(),
            ComponentSource::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// Maps a server-side component name to a component, synchronously or not.
pub trait ComponentResolver {
    fn resolve(&self, name: &str) -> ComponentSource;
}

impl<F> ComponentResolver for F
where
    F: Fn(&str) -> ComponentSource,
{
    fn resolve(&self, name: &str) -> ComponentSource {
        self(name)
    }
}

/// Resolver over a fixed set of already loaded components.
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    components: IndexMap<String, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: Component) -> &mut Self {
        self.components
            .insert(component.name().to_string(), component);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }
}

impl ComponentResolver for ComponentRegistry {
    fn resolve(&self, name: &str) -> ComponentSource {
        match self.components.get(name) {
            Some(component) => ComponentSource::Ready(component.clone()),
            None => ComponentSource::failed(ResolveError::NotFound {
                name: name.to_string(),
            }),
        }
    }
}
