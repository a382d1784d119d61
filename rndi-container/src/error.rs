//! Error types for rndi container operations.
//!
//! Two layers:
//! - [`GraphError`] is the object graph's own vocabulary, with detailed,
//!   actionable messages. Constructors and factories return it.
//! - [`ContainerError`] is what [`Container::get`](crate::container::Container::get)
//!   returns. Every `GraphError` is translated into one of its stable kinds
//!   by the `From` impl below, and nowhere else.

use std::fmt;

use rndi_support::rendering::render_chain;

use crate::key::TypeKey;

/// Errors raised by the object graph while resolving a class.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A required parameter has no binding with a matching keyword.
    #[error("{}", .0)]
    MissingBinding(MissingBindingError),

    /// A bound value does not have the parameter's declared type.
    #[error("{}", .0)]
    ArgumentTypeMismatch(ArgumentTypeMismatchError),

    /// The requested type has no `Injectable` implementation in the catalog.
    #[error("{}", .0)]
    NotConstructible(NotConstructibleError),

    /// A binding was re-entered while it was still being resolved.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// A constructor or factory reported its own failure.
    #[error("Failed to construct {target}: {source}")]
    ConstructionFailed {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl GraphError {
    /// Wraps a failure reported by user code inside a constructor or factory.
    ///
    /// ```
    /// use rndi_container::error::GraphError;
    ///
    /// let err = GraphError::construction("Mailer", "port out of range");
    /// assert!(err.to_string().contains("Mailer"));
    /// ```
    pub fn construction(
        target: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConstructionFailed {
            target: target.into(),
            source: source.into(),
        }
    }
}

/// A required parameter could not be matched to any binding.
#[derive(Debug)]
pub struct MissingBindingError {
    /// Name of the unmet parameter, which is also the keyword looked up.
    pub parameter: &'static str,
    /// Declared type of the parameter.
    pub declared: TypeKey,
    /// The class or factory that declared the parameter.
    pub required_by: String,
    /// Registered keywords that look like the missing one.
    pub suggestions: Vec<String>,
}

impl fmt::Display for MissingBindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nothing injectable for parameter `{}: {}` required by {}",
            self.parameter, self.declared, self.required_by,
        )?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: bind `{}` in a service provider, or give the parameter a default",
            self.parameter,
        )
    }
}

/// A binding produced a value of a different type than the parameter declares.
#[derive(Debug)]
pub struct ArgumentTypeMismatchError {
    pub parameter: &'static str,
    pub expected: TypeKey,
    pub found: TypeKey,
    pub required_by: String,
}

impl fmt::Display for ArgumentTypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrong argument type for parameter `{}` of {}: expected {}, binding provides {}",
            self.parameter, self.required_by, self.expected, self.found,
        )
    }
}

/// The requested type cannot be constructed by the container.
#[derive(Debug)]
pub struct NotConstructibleError {
    pub requested: TypeKey,
}

impl fmt::Display for NotConstructibleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a constructible class type", self.requested.type_name())?;
        write!(f, "\n  Hint: derive `Injectable` for {}", self.requested)
    }
}

/// A cycle among class or factory bindings.
///
/// The chain starts at the requested class and ends with the binding that
/// was entered twice.
#[derive(Debug)]
pub struct CircularDependencyError {
    pub chain: Vec<String>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular dependency detected:\n  {}", render_chain(&self.chain))
    }
}

/// Errors returned to callers of the container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// A required dependency could not be built.
    #[error("{0}")]
    DependencyBuildingFailure(String),

    /// The requested type is not constructible, or a bound value has the
    /// wrong type for the parameter it was injected into.
    #[error("{0}")]
    InvalidClassType(String),

    /// Resolution re-entered a binding that was still being built.
    #[error("{0}")]
    CircularDependency(String),
}

impl ContainerError {
    /// The human-readable message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            Self::DependencyBuildingFailure(msg)
            | Self::InvalidClassType(msg)
            | Self::CircularDependency(msg) => msg,
        }
    }
}

impl From<GraphError> for ContainerError {
    fn from(err: GraphError) -> Self {
        let message = err.to_string();
        match err {
            GraphError::MissingBinding(_) | GraphError::ConstructionFailed { .. } => {
                Self::DependencyBuildingFailure(message)
            }
            GraphError::ArgumentTypeMismatch(_) | GraphError::NotConstructible(_) => {
                Self::InvalidClassType(message)
            }
            GraphError::CircularDependency(_) => Self::CircularDependency(message),
        }
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
