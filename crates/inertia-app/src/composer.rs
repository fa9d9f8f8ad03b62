//! Turns the page and dialog cells into the tree handed to the UI runtime.
//!
//! [`compose`] reads the state cells, so running it inside a
//! [`Composition`](inertia_core::Composition) re-evaluates it whenever one of
//! the cells it read is written.

use serde_json::Value;

use crate::component::{Component, Layout};
use crate::context::AppContext;
use crate::node::{h, Node, RenderTree};
use crate::page::PageData;

/// Prop forced to `false` on the primary view so a page component that can
/// also act as a dialog never renders itself as one.
pub const DIALOG_PROP: &str = "dialog";

pub fn compose(ctx: &AppContext) -> RenderTree {
    let Some(component) = ctx.page.component.value() else {
        return RenderTree::new();
    };
    let page = ctx.page.data.value();
    let view = render_page(ctx, &component, &page);

    match component.layout() {
        Layout::None => with_dialog(view, ctx),
        Layout::Single(layout) => vec![layout(h, view)],
        Layout::Persistent(layout) => {
            let wrapped = h(layout, page.props.clone(), vec![view]);
            with_dialog(wrapped, ctx)
        }
        Layout::Chain(layouts) => {
            let wrapped = layouts
                .iter()
                .rev()
                .fold(view, |child, layout| h(layout, page.props.clone(), vec![child]));
            with_dialog(wrapped, ctx)
        }
    }
}

fn render_page(ctx: &AppContext, component: &Component, page: &PageData) -> Node {
    let mut props = page.props.clone();
    props.insert(DIALOG_PROP.to_string(), Value::Bool(false));
    h(component, props, Vec::new()).with_key(ctx.page.key.value())
}

fn render_dialog(ctx: &AppContext) -> Option<Node> {
    let component = ctx.dialog.component.value()?;
    let props = ctx
        .dialog
        .data
        .with(|data| data.as_ref().map(|dialog| dialog.props.clone()))
        .unwrap_or_default();
    Some(h(&component, props, Vec::new()).with_key(ctx.dialog.key.value()))
}

fn with_dialog(root: Node, ctx: &AppContext) -> RenderTree {
    let mut tree = vec![root];
    tree.extend(render_dialog(ctx));
    tree
}

#[cfg(test)]
#[path = "tests/composer_tests.rs"]
mod tests;
