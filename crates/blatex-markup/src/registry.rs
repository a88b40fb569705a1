//! Fragment registry.
//!
//! Maps directive keys to the factories producing their rendered fragments.
//! Keys are case-insensitive.

use std::collections::HashMap;
use std::fmt;

/// Boxed factory ignoring the directive value.
pub type NoArgFn<F> = dyn Fn() -> F + Send + Sync;

/// Boxed factory receiving the directive value.
pub type WithArgFn<F> = dyn Fn(&str) -> F + Send + Sync;

/// Produces the fragment substituted for a directive.
pub enum FragmentFactory<F> {
    /// Context-free factory: the directive value is ignored.
    NoArg(Box<NoArgFn<F>>),
    /// Contextual factory: receives the directive value (empty if absent).
    WithArg(Box<WithArgFn<F>>),
}

impl<F> FragmentFactory<F> {
    /// Create a factory that ignores the directive value.
    pub fn no_arg(f: impl Fn() -> F + Send + Sync + 'static) -> Self {
        Self::NoArg(Box::new(f))
    }

    /// Create a factory that receives the directive value.
    pub fn with_arg(f: impl Fn(&str) -> F + Send + Sync + 'static) -> Self {
        Self::WithArg(Box::new(f))
    }

    /// Produce a fragment for `value`.
    pub fn invoke(&self, value: &str) -> F {
        match self {
            Self::NoArg(f) => f(),
            Self::WithArg(f) => f(value),
        }
    }
}

impl<F> fmt::Debug for FragmentFactory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoArg(_) => f.write_str("FragmentFactory::NoArg"),
            Self::WithArg(_) => f.write_str("FragmentFactory::WithArg"),
        }
    }
}

/// Case-insensitive mapping from directive key to [`FragmentFactory`].
///
/// # Example
///
/// ```
/// use blatex_markup::{FragmentFactory, FragmentRegistry};
///
/// let registry = FragmentRegistry::new()
///     .with("Sqrt", FragmentFactory::with_arg(|v| format!("√{v}")))
///     .with("pi", FragmentFactory::no_arg(|| "π".to_owned()));
///
/// assert_eq!(registry.get("SQRT").unwrap().invoke("2"), "√2");
/// assert_eq!(registry.get("pi").unwrap().invoke("ignored"), "π");
/// ```
pub struct FragmentRegistry<F> {
    factories: HashMap<String, FragmentFactory<F>>,
}

impl<F> Default for FragmentRegistry<F> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<F> fmt::Debug for FragmentRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("FragmentRegistry")
            .field("keys", &keys)
            .finish()
    }
}

impl<F> FragmentRegistry<F> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, builder style.
    #[must_use]
    pub fn with(mut self, key: &str, factory: FragmentFactory<F>) -> Self {
        self.insert(key, factory);
        self
    }

    /// Register a factory, replacing any factory already registered for the
    /// same key (compared case-insensitively).
    pub fn insert(&mut self, key: &str, factory: FragmentFactory<F>) {
        if self.factories.insert(fold_key(key), factory).is_some() {
            tracing::warn!(key, "Replacing fragment factory registered under the same key");
        }
    }

    /// Look up the factory for `key`.
    pub fn get(&self, key: &str) -> Option<&FragmentFactory<F>> {
        self.factories.get(&fold_key(key))
    }

    /// Whether a factory is registered for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(&fold_key(key))
    }

    /// Registered keys, lowercased, in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

fn fold_key(key: &str) -> String {
    key.to_lowercase()
}
