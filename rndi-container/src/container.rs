//! # The Container — heart of rndi
//!
//! Holds the ordered list of service providers and resolves classes
//! against the bindings they declare.
//!
//! # Lifecycle
//! ```text
//! Container::new(providers)          Unbuilt
//!          │
//!     first get()  ── register() every provider, in order
//!          │        ── compile the shared BindingTable
//!          ▼
//!   Built(ObjectGraph)  ── reused by every later get()
//! ```
//!
//! The build runs at most once per container. It goes through a
//! [`OnceCell`], so concurrent first calls wait for a single build; still,
//! prefer [`Container::warm_up`] before sharing a container across threads.
//!
//! # Examples
//! ```rust
//! use rndi_container::prelude::*;
//! use rndi_container::class::{Arguments, Parameter};
//!
//! struct Mailer {
//!     host: String,
//! }
//!
//! impl Injectable for Mailer {
//!     fn parameters() -> Vec<Parameter> {
//!         vec![Parameter::required::<String>("host")]
//!     }
//!
//!     fn construct(args: &mut Arguments) -> std::result::Result<Self, GraphError> {
//!         Ok(Self { host: args.take("host")? })
//!     }
//! }
//!
//! rndi_container::inventory::submit! { ClassRef::of::<Mailer>() }
//!
//! struct MailProvider;
//!
//! impl ServiceProvider for MailProvider {
//!     fn register(&self, binder: &mut Binder<'_>) {
//!         binder.bind_instance("host", String::from("localhost"));
//!     }
//! }
//!
//! fn main() {
//!     let container = Container::builder().add_provider(MailProvider).build();
//!     let mailer: Mailer = container.get().expect("Failed to resolve");
//!     assert_eq!(mailer.host, "localhost");
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::binding::BindingTable;
use crate::class::{self, ClassRef, Value};
use crate::error::{ContainerError, GraphError, NotConstructibleError, Result};
use crate::graph::ObjectGraph;
use crate::key::TypeKey;
use crate::provider::{Binder, ServiceProvider};

// ═══════════════════════════════════════════
// ContainerBuilder
// ═══════════════════════════════════════════

/// Collects the providers of a [`Container`], in registration order.
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .add_provider(DatabaseProvider)
///     .add_provider(MailProvider)
///     .add_shared_provider(overrides.clone())
///     .build();
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    providers: Vec<Arc<dyn ServiceProvider>>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Append a provider. Later providers override earlier keywords.
    pub fn add_provider(mut self, provider: impl ServiceProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Append a provider the caller keeps a handle to.
    pub fn add_shared_provider(mut self, provider: Arc<dyn ServiceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Create the container. No provider runs until the first resolution.
    pub fn build(self) -> Container {
        Container::new(self.providers)
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Dependency injection container over an ordered list of providers.
pub struct Container {
    providers: Vec<Arc<dyn ServiceProvider>>,
    graph: OnceCell<ObjectGraph>,
}

impl Container {
    /// Create a container over `providers`. Their `register` hooks run
    /// lazily, on the first [`get`](Self::get).
    pub fn new(providers: Vec<Arc<dyn ServiceProvider>>) -> Self {
        Self {
            providers,
            graph: OnceCell::new(),
        }
    }

    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Instantiate `T`, injecting its parameters from the bindings.
    ///
    /// ```rust,ignore
    /// let service: Sample = container.get()?;
    /// ```
    ///
    /// # Errors
    /// - [`ContainerError::InvalidClassType`] if `T` is not constructible or
    ///   a bound value has the wrong type for its parameter
    /// - [`ContainerError::DependencyBuildingFailure`] if a required
    ///   parameter has no binding
    /// - [`ContainerError::CircularDependency`] if the bindings form a cycle
    #[instrument(skip(self), fields(requested = %TypeKey::of::<T>()))]
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<T> {
        let requested = TypeKey::of::<T>();
        let class = class::lookup(requested.type_id()).ok_or_else(|| {
            GraphError::NotConstructible(NotConstructibleError { requested })
        })?;

        let boxed = self.get_class(&class)?;

        // The catalog is keyed by `T`'s TypeId, so the class always builds a `T`.
        match boxed.downcast::<T>() {
            Ok(instance) => Ok(*instance),
            Err(_) => unreachable!("class catalog entry for {} built another type", requested),
        }
    }

    /// Instantiate the class behind `class`, type-erased.
    pub fn get_class(&self, class: &ClassRef) -> Result<Value> {
        Ok(self.graph().provide(class)?)
    }

    /// Run the providers and compile the graph now, if not done yet.
    pub fn warm_up(&self) {
        let _ = self.graph();
    }

    /// Returns `true` once the providers have been registered.
    pub fn is_built(&self) -> bool {
        self.graph.get().is_some()
    }

    /// The providers, in registration order.
    pub fn providers(&self) -> &[Arc<dyn ServiceProvider>] {
        &self.providers
    }

    fn graph(&self) -> &ObjectGraph {
        self.graph.get_or_init(|| self.build_graph())
    }

    #[instrument(skip(self), name = "container_build")]
    fn build_graph(&self) -> ObjectGraph {
        info!(providers = self.providers.len(), "Building object graph");

        let mut table = BindingTable::new();
        for provider in &self.providers {
            provider.register(&mut Binder::new(&mut table));
            debug!(provider = provider.name(), bindings = table.len(), "Registered provider");
        }

        let graph = ObjectGraph::compile(table);
        info!(bindings = graph.bindings().len(), "Object graph built ✓");
        graph
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("providers", &self.providers.len())
            .field("built", &self.is_built())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::class::{ClassRef, Injectable};
    pub use crate::error::{ContainerError, GraphError, Result};
    pub use crate::provider::{Binder, Bindings, ServiceProvider};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
