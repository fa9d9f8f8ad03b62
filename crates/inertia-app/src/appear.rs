//! Decides whether a dialog that is being swapped in plays its entry
//! animation.

use crate::component::Component;
use crate::context::DialogSnapshot;
use crate::page::DialogDescriptor;

/// Finds the logical dialog identity of a component that is currently shown.
///
/// Dialog components may wrap the real dialog in a nested sub-component, so
/// the identity is not necessarily declared on the outer component.
pub trait DialogKeyLookup {
    fn dialog_key(&self, component: &Component) -> Option<String>;
}

/// Looks at the component itself, then its nested components in
/// registration order, and takes the first `dialog_key` found.
#[derive(Clone, Copy, Debug, Default)]
pub struct NestedComponentLookup;

impl DialogKeyLookup for NestedComponentLookup {
    fn dialog_key(&self, component: &Component) -> Option<String> {
        std::iter::once(component)
            .chain(component.components().values())
            .find_map(|candidate| candidate.dialog_key())
            .map(str::to_string)
    }
}

/// Entry animation eligibility for `incoming`.
///
/// Eager dialogs never animate. While a dialog is open, swapping in the same
/// server component, or a component declaring the same dialog key as the one
/// on screen, counts as the same dialog and does not animate either.
pub fn should_appear(
    incoming: &DialogDescriptor,
    incoming_component: Option<&Component>,
    current: &DialogSnapshot,
    lookup: &dyn DialogKeyLookup,
) -> bool {
    if incoming.eager {
        return false;
    }
    let Some(open) = current.data.as_ref().filter(|dialog| dialog.open) else {
        return true;
    };
    if open.component == incoming.component {
        return false;
    }
    let incoming_key = incoming_component.and_then(|component| component.dialog_key());
    let current_key = current
        .component
        .as_ref()
        .and_then(|component| lookup.dialog_key(component));
    match (incoming_key, current_key) {
        (Some(incoming_key), Some(current_key)) => incoming_key != current_key,
        _ => true,
    }
}

#[cfg(test)]
#[path = "tests/appear_tests.rs"]
mod tests;
