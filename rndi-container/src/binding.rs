//! Binding table — the keyword registry filled by service providers.
//!
//! The table maps a keyword to a [`Binding`]: a pre-built instance, a class
//! to construct, or a factory closure. Insertion order is kept; binding an
//! existing keyword replaces its descriptor in place (last write wins).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::class::{Arguments, ClassRef, Parameter, Value};
use crate::error::GraphError;
use crate::key::TypeKey;

/// Type alias for instance producers.
///
/// Hands out a clone of the bound value on every call. Bind an `Arc<T>` to
/// make every consumer share one allocation.
pub type InstanceFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Type alias for factory closures, fed with their resolved parameters.
pub type FactoryFn = Arc<dyn Fn(&mut Arguments) -> Result<Value, GraphError> + Send + Sync>;

/// How a keyword is satisfied.
#[derive(Clone)]
pub enum BindingKind {
    /// A pre-built value, never reconstructed.
    Instance(InstanceFn),
    /// A class constructed anew on every resolution.
    Class(ClassRef),
    /// A closure called on every resolution with its own parameters.
    Factory {
        parameters: Vec<Parameter>,
        factory: FactoryFn,
    },
}

impl BindingKind {
    /// Short label for logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            BindingKind::Instance(_) => "instance",
            BindingKind::Class(_) => "class",
            BindingKind::Factory { .. } => "factory",
        }
    }
}

/// A single binding descriptor.
#[derive(Clone)]
pub struct Binding {
    keyword: String,
    produces: TypeKey,
    kind: BindingKind,
}

impl Binding {
    /// An instance binding. The value is cloned on every resolution.
    pub fn instance<V>(keyword: impl Into<String>, value: V) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        Self {
            keyword: keyword.into(),
            produces: TypeKey::of::<V>(),
            kind: BindingKind::Instance(Arc::new(move || Box::new(value.clone()) as Value)),
        }
    }

    /// A class binding.
    pub fn class(keyword: impl Into<String>, class: ClassRef) -> Self {
        Self {
            keyword: keyword.into(),
            produces: class.key(),
            kind: BindingKind::Class(class),
        }
    }

    /// A factory binding producing `V`.
    pub fn factory<V, F>(keyword: impl Into<String>, parameters: Vec<Parameter>, factory: F) -> Self
    where
        V: Send + Sync + 'static,
        F: Fn(&mut Arguments) -> Result<V, GraphError> + Send + Sync + 'static,
    {
        Self {
            keyword: keyword.into(),
            produces: TypeKey::of::<V>(),
            kind: BindingKind::Factory {
                parameters,
                factory: Arc::new(move |args: &mut Arguments| {
                    factory(args).map(|value| Box::new(value) as Value)
                }),
            },
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The type this binding hands out.
    pub fn produces(&self) -> TypeKey {
        self.produces
    }

    pub fn kind(&self) -> &BindingKind {
        &self.kind
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("keyword", &self.keyword)
            .field("kind", &self.kind.label())
            .field("produces", &self.produces)
            .finish()
    }
}

/// Ordered keyword → binding mapping.
#[derive(Debug, Default, Clone)]
pub struct BindingTable {
    bindings: Vec<Binding>,
    index: HashMap<String, usize>,
}

impl BindingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `binding`, replacing any earlier binding with the same keyword.
    pub fn insert(&mut self, binding: Binding) {
        match self.index.get(binding.keyword()) {
            Some(&slot) => {
                debug!(
                    keyword = binding.keyword(),
                    previous = self.bindings[slot].kind.label(),
                    kind = binding.kind.label(),
                    "Overriding binding"
                );
                self.bindings[slot] = binding;
            }
            None => {
                debug!(
                    keyword = binding.keyword(),
                    kind = binding.kind.label(),
                    produces = %binding.produces,
                    "Bound keyword"
                );
                self.index.insert(binding.keyword.clone(), self.bindings.len());
                self.bindings.push(binding);
            }
        }
    }

    /// Looks up the binding for `keyword`.
    pub fn get(&self, keyword: &str) -> Option<&Binding> {
        self.index.get(keyword).map(|&slot| &self.bindings[slot])
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains_key(keyword)
    }

    /// Returns the keywords in order of first registration.
    pub fn keywords(&self) -> Vec<&str> {
        self.bindings.iter().map(Binding::keyword).collect()
    }

    /// Iterates over the bindings in order of first registration.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
