use std::fmt;
use std::sync::Arc;

use inertia_core::Clock;

/// Remount identity for a rendered view. A view keeps its instance (and its
/// local state) for as long as its key is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewKey(u64);

impl ViewKey {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues timestamp-derived keys that always sort after the key they replace.
#[derive(Clone)]
pub struct KeyGenerator {
    clock: Arc<dyn Clock>,
}

impl KeyGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn fresh(&self, previous: Option<ViewKey>) -> ViewKey {
        let now = self.clock.now_millis();
        match previous {
            Some(ViewKey(prev)) if now <= prev => match prev.checked_add(1) {
                Some(next) => ViewKey(next),
                None => {
                    log::warn!("view key space exhausted; reusing key {prev}");
                    ViewKey(prev)
                }
            },
            _ => ViewKey(now),
        }
    }
}

impl fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyGenerator").finish_non_exhaustive()
    }
}
