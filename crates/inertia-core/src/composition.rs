use crate::runtime::RuntimeHandle;
use crate::scope::{with_scope, RecomposeScope};

/// A render function bound to a recompose scope.
///
/// The content closure is evaluated lazily: once on the first [`render`], then
/// again on [`recompose`] whenever a state it read has been written since.
///
/// [`render`]: Composition::render
/// [`recompose`]: Composition::recompose
pub struct Composition<T> {
    runtime: RuntimeHandle,
    scope: RecomposeScope,
    content: Box<dyn FnMut() -> T>,
    output: Option<T>,
    generation: u64,
}

impl<T> Composition<T> {
    pub fn new(runtime: RuntimeHandle, content: impl FnMut() -> T + 'static) -> Self {
        Self {
            scope: RecomposeScope::new(runtime.clone()),
            runtime,
            content: Box::new(content),
            output: None,
            generation: 0,
        }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    /// Evaluates the content unconditionally and returns the fresh output.
    pub fn render(&mut self) -> &T {
        self.scope.mark_recomposed();
        let content = &mut self.content;
        let output = with_scope(&self.scope, || content());
        self.generation += 1;
        log::trace!("composition produced generation {}", self.generation);
        self.output.insert(output)
    }

    pub fn should_render(&self) -> bool {
        self.output.is_none() || self.scope.is_invalid()
    }

    /// Re-evaluates the content if it was invalidated. Returns `None` when the
    /// previous output is still current.
    pub fn recompose(&mut self) -> Option<&T> {
        if self.should_render() {
            Some(self.render())
        } else {
            None
        }
    }

    pub fn output(&self) -> Option<&T> {
        self.output.as_ref()
    }

    /// Number of times the content has been evaluated.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
