//! Constructible classes and their parameter tables.
//!
//! A type takes part in resolution by implementing [`Injectable`], which
//! describes its constructor: an ordered list of [`Parameter`]s and a
//! `construct` function fed with resolved [`Arguments`]. The
//! `#[derive(Injectable)]` macro generates both and submits the type to the
//! class catalog, so the container can tell constructible types from
//! everything else at run time.
//!
//! # Examples
//! ```
//! use rndi_container::class::{Arguments, ClassRef, Injectable, Parameter};
//! use rndi_container::error::GraphError;
//!
//! struct Greeter {
//!     greeting: String,
//!     loud: bool,
//! }
//!
//! impl Injectable for Greeter {
//!     fn parameters() -> Vec<Parameter> {
//!         vec![
//!             Parameter::required::<String>("greeting"),
//!             Parameter::optional::<bool>("loud"),
//!         ]
//!     }
//!
//!     fn construct(args: &mut Arguments) -> Result<Self, GraphError> {
//!         Ok(Self {
//!             greeting: args.take("greeting")?,
//!             loud: args.take_or_else("loud", || false)?,
//!         })
//!     }
//! }
//!
//! let class = ClassRef::of::<Greeter>();
//! assert_eq!(class.parameters().len(), 2);
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{ArgumentTypeMismatchError, GraphError, MissingBindingError};
use crate::key::TypeKey;

/// Type-erased value flowing through the graph.
pub type Value = Box<dyn Any + Send + Sync>;

/// A type the container can construct by resolving its parameters.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// The constructor's parameters, in declaration order.
    fn parameters() -> Vec<Parameter>;

    /// Builds an instance from resolved arguments.
    ///
    /// Parameters with a default are absent from `args` when no binding
    /// matched them.
    fn construct(args: &mut Arguments) -> Result<Self, GraphError>;
}

/// One constructor parameter: the keyword it is resolved by, its declared
/// type and whether it may be left unbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    name: &'static str,
    declared: TypeKey,
    has_default: bool,
}

impl Parameter {
    /// A parameter that must be satisfied by a binding.
    pub fn required<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            declared: TypeKey::of::<T>(),
            has_default: false,
        }
    }

    /// A parameter that falls back to a default when nothing is bound.
    pub fn optional<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            declared: TypeKey::of::<T>(),
            has_default: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn declared(&self) -> TypeKey {
        self.declared
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }
}

/// Resolved parameter values handed to a constructor or factory.
///
/// Parameters sharing a keyword each get their own value, taken in
/// declaration order.
pub struct Arguments {
    owner: String,
    values: HashMap<&'static str, VecDeque<(TypeKey, Value)>>,
}

impl Arguments {
    /// Creates an empty argument set for `owner`, the label used in errors.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            values: HashMap::new(),
        }
    }

    /// Stores the value resolved for parameter `name`, after any value
    /// already resolved under the same name.
    pub fn insert(&mut self, name: &'static str, produced: TypeKey, value: Value) {
        self.values.entry(name).or_default().push_back((produced, value));
    }

    /// Removes and returns the next argument for `name`.
    ///
    /// # Errors
    /// [`GraphError::MissingBinding`] if nothing was resolved for `name`,
    /// [`GraphError::ArgumentTypeMismatch`] if the value is not a `T`.
    pub fn take<T: 'static>(&mut self, name: &'static str) -> Result<T, GraphError> {
        match self.take_opt::<T>(name)? {
            Some(value) => Ok(value),
            None => Err(GraphError::MissingBinding(MissingBindingError {
                parameter: name,
                declared: TypeKey::of::<T>(),
                required_by: self.owner.clone(),
                suggestions: Vec::new(),
            })),
        }
    }

    /// Like [`take`](Self::take), falling back to `default` when `name` was
    /// left unbound.
    pub fn take_or_else<T: 'static>(
        &mut self,
        name: &'static str,
        default: impl FnOnce() -> T,
    ) -> Result<T, GraphError> {
        Ok(self.take_opt::<T>(name)?.unwrap_or_else(default))
    }

    fn take_opt<T: 'static>(&mut self, name: &'static str) -> Result<Option<T>, GraphError> {
        let Some(queue) = self.values.get_mut(name) else {
            return Ok(None);
        };
        let Some((produced, value)) = queue.pop_front() else {
            return Ok(None);
        };
        if queue.is_empty() {
            self.values.remove(name);
        }

        value.downcast::<T>().map(|boxed| Some(*boxed)).map_err(|_| {
            GraphError::ArgumentTypeMismatch(ArgumentTypeMismatchError {
                parameter: name,
                expected: TypeKey::of::<T>(),
                found: produced,
                required_by: self.owner.clone(),
            })
        })
    }

    /// Returns `true` if a value was resolved for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("owner", &self.owner)
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Copyable handle to an [`Injectable`] type.
///
/// Built in a `const` context so it can be submitted to the class catalog.
#[derive(Clone, Copy)]
pub struct ClassRef {
    type_id: fn() -> TypeId,
    type_name: fn() -> &'static str,
    parameters: fn() -> Vec<Parameter>,
    construct: fn(&mut Arguments) -> Result<Value, GraphError>,
}

impl ClassRef {
    /// The handle for `C`.
    pub const fn of<C: Injectable>() -> Self {
        Self {
            type_id: TypeId::of::<C>,
            type_name: type_name::<C>,
            parameters: C::parameters,
            construct: construct_erased::<C>,
        }
    }

    pub fn key(&self) -> TypeKey {
        TypeKey::from_raw((self.type_id)(), (self.type_name)())
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        (self.parameters)()
    }

    /// Runs the constructor on already resolved arguments.
    pub fn construct(&self, args: &mut Arguments) -> Result<Value, GraphError> {
        (self.construct)(args)
    }
}

fn construct_erased<C: Injectable>(args: &mut Arguments) -> Result<Value, GraphError> {
    C::construct(args).map(|instance| Box::new(instance) as Value)
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        (self.type_id)() == (other.type_id)()
    }
}

impl Eq for ClassRef {}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", (self.type_name)())
    }
}

// Every `#[derive(Injectable)]` submits its ClassRef here.
inventory::collect!(ClassRef);

static CATALOG: Lazy<HashMap<TypeId, ClassRef>> = Lazy::new(|| {
    inventory::iter::<ClassRef>
        .into_iter()
        .map(|class| ((class.type_id)(), *class))
        .collect()
});

/// Looks up the constructible class registered for `type_id`.
pub fn lookup(type_id: TypeId) -> Option<ClassRef> {
    CATALOG.get(&type_id).copied()
}
