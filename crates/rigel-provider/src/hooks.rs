//! User-supplied transformation hooks.
//!
//! Hooks run at two fixed pipeline stages: pre-compilation hooks rewrite
//! Quil source text before it reaches the compiler, and pre-execution hooks
//! rewrite the native program after compilation. Each stage takes an
//! ordered chain; the artifact threads through every hook in order, each
//! hook's output becoming the next hook's input.

use std::sync::Arc;

use rigel_quil::{Program, QuilInstruction};

use crate::error::{ProviderError, ProviderResult};

/// A single hook: a pure transformation of one artifact into another of the
/// same type. Failures propagate out of the pipeline unmodified.
pub type HookFn<T> = dyn Fn(T) -> anyhow::Result<T> + Send + Sync;

/// An ordered chain of hooks applied at one pipeline stage.
///
/// The single-hook convenience form is [`HookChain::single`]; ordered
/// collections come from [`HookChain::push`], the [`HookChain::with`]
/// builder, or `FromIterator`. Ordering is caller-significant and preserved
/// exactly.
pub struct HookChain<T> {
    hooks: Vec<Arc<HookFn<T>>>,
}

impl<T> HookChain<T> {
    /// Create an empty chain (the identity transformation).
    pub fn new() -> Self {
        Self { hooks: vec![] }
    }

    /// Create a chain holding a single hook.
    pub fn single(hook: impl Fn(T) -> anyhow::Result<T> + Send + Sync + 'static) -> Self {
        Self::new().with(hook)
    }

    /// Append a hook to the end of the chain.
    pub fn push(&mut self, hook: impl Fn(T) -> anyhow::Result<T> + Send + Sync + 'static) {
        self.hooks.push(Arc::new(hook));
    }

    /// Append a hook, builder style.
    #[must_use]
    pub fn with(mut self, hook: impl Fn(T) -> anyhow::Result<T> + Send + Sync + 'static) -> Self {
        self.push(hook);
        self
    }

    /// Number of hooks in the chain.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether the chain has no hooks.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Thread an artifact through every hook in order.
    ///
    /// An empty chain returns the artifact unchanged. A hook error aborts
    /// the chain and propagates.
    pub fn apply(&self, artifact: T) -> ProviderResult<T> {
        let mut artifact = artifact;
        for hook in &self.hooks {
            artifact = hook(artifact).map_err(ProviderError::Hook)?;
        }
        Ok(artifact)
    }
}

impl<T> Default for HookChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HookChain<T> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
        }
    }
}

impl<T> FromIterator<Arc<HookFn<T>>> for HookChain<T> {
    fn from_iter<I: IntoIterator<Item = Arc<HookFn<T>>>>(iter: I) -> Self {
        Self {
            hooks: iter.into_iter().collect(),
        }
    }
}

impl<T> std::fmt::Debug for HookChain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookChain")
            .field("len", &self.hooks.len())
            .finish()
    }
}

/// Pre-execution hook that prepends an active `RESET` to the program.
pub fn enable_active_reset(mut program: Program) -> anyhow::Result<Program> {
    program.prepend(QuilInstruction::Reset);
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain_is_identity() {
        let chain: HookChain<String> = HookChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.apply("unchanged".to_string()).unwrap(), "unchanged");
    }

    #[test]
    fn test_single_hook() {
        let chain = HookChain::single(|s: String| Ok(format!("{s}!")));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.apply("x".to_string()).unwrap(), "x!");
    }

    #[test]
    fn test_hooks_apply_in_order() {
        // g(f(x)): append then double.
        let chain = HookChain::new()
            .with(|s: String| Ok(format!("{s}a")))
            .with(|s: String| Ok(format!("{s}{s}")));
        assert_eq!(chain.apply("x".to_string()).unwrap(), "xaxa");
    }

    #[test]
    fn test_hook_error_propagates() {
        let chain = HookChain::new()
            .with(|_: String| anyhow::bail!("boom"))
            .with(|s: String| Ok(format!("{s}never")));
        let err = chain.apply("x".to_string()).unwrap_err();
        match err {
            ProviderError::Hook(inner) => assert_eq!(inner.to_string(), "boom"),
            other => panic!("expected hook error, got {other}"),
        }
    }

    #[test]
    fn test_enable_active_reset() {
        let mut program = Program::new();
        program.push(QuilInstruction::Declare {
            name: "ro".into(),
            size: 1,
        });
        let program = enable_active_reset(program).unwrap();
        assert!(matches!(program.instructions()[0], QuilInstruction::Reset));
        assert_eq!(program.len(), 2);
    }
}
