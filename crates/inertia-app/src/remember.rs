//! Persisting selected view fields across visits to the same logical view.
//!
//! A view declares which of its local fields to remember and, optionally,
//! under which key. The mixin restores those fields when the view is created
//! and stores them back whenever they change.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::page::Props;
use crate::router::RememberStore;

#[derive(Clone)]
pub enum RememberKey {
    Static(String),
    Computed(Rc<dyn Fn() -> String>),
}

impl RememberKey {
    pub fn computed(key: impl Fn() -> String + 'static) -> Self {
        RememberKey::Computed(Rc::new(key))
    }

    fn resolve(&self) -> String {
        match self {
            RememberKey::Static(key) => key.clone(),
            RememberKey::Computed(key) => key(),
        }
    }
}

impl fmt::Debug for RememberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RememberKey::Static(key) => f.debug_tuple("Static").field(key).finish(),
            RememberKey::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// A view's remember declaration: one field, several fields, or fields with
/// an explicit key.
#[derive(Clone, Debug, Default)]
pub struct RememberOption {
    pub data: Vec<String>,
    pub key: Option<RememberKey>,
}

impl RememberOption {
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: fields.into_iter().map(Into::into).collect(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: RememberKey) -> Self {
        self.key = Some(key);
        self
    }

    /// The storage key, falling back to the view name.
    pub fn storage_key(&self, view: &str) -> String {
        self.key
            .as_ref()
            .map(RememberKey::resolve)
            .unwrap_or_else(|| view.to_string())
    }
}

impl From<&str> for RememberOption {
    fn from(field: &str) -> Self {
        RememberOption::fields([field])
    }
}

impl From<Vec<&str>> for RememberOption {
    fn from(fields: Vec<&str>) -> Self {
        RememberOption::fields(fields)
    }
}

#[derive(Clone)]
pub struct RememberMixin {
    store: Rc<dyn RememberStore>,
}

impl RememberMixin {
    pub fn new(store: Rc<dyn RememberStore>) -> Self {
        Self { store }
    }

    /// Overwrites the declared fields in `fields` with the stored values.
    /// Returns how many fields were restored.
    pub fn created(&self, view: &str, option: &RememberOption, fields: &mut Props) -> usize {
        let key = option.storage_key(view);
        let Some(Value::Object(stored)) = self.store.restore(&key) else {
            return 0;
        };
        let mut restored = 0;
        for name in &option.data {
            if let Some(value) = stored.get(name) {
                fields.insert(name.clone(), value.clone());
                restored += 1;
            }
        }
        log::trace!("restored {restored} remembered field(s) for `{key}`");
        restored
    }

    /// Stores the declared subset of `fields`.
    pub fn changed(&self, view: &str, option: &RememberOption, fields: &Props) {
        let snapshot: Props = option
            .data
            .iter()
            .filter_map(|name| fields.get(name).map(|value| (name.clone(), value.clone())))
            .collect();
        self.store
            .remember(Value::Object(snapshot), &option.storage_key(view));
    }
}

impl fmt::Debug for RememberMixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RememberMixin").finish_non_exhaustive()
    }
}
