//! Core container implementation for rndi.

pub mod binding;
pub mod class;
pub mod container;
pub mod error;
pub mod graph;
pub mod key;
pub mod provider;

pub use binding::{Binding, BindingKind, BindingTable};
pub use class::{Arguments, ClassRef, Injectable, Parameter};
pub use container::{Container, ContainerBuilder, prelude};
pub use error::{ContainerError, GraphError, Result};
pub use graph::ObjectGraph;
pub use key::TypeKey;
pub use provider::{Binder, Bindings, ServiceProvider};

#[doc(hidden)]
pub use inventory;
