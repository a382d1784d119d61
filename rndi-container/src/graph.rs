//! Object graph — resolves classes against a compiled binding table.
//!
//! [`ObjectGraph::provide`] constructs a class by walking its parameter
//! table:
//! - each parameter is matched to a binding by **name**;
//! - instance bindings hand out their stored value;
//! - class and factory bindings are resolved recursively, anew every time;
//! - unbound parameters fall back to their default, or fail.
//!
//! Every bound value is checked against the parameter's declared type
//! before it reaches a constructor.
//!
//! # Cycles
//! Each `provide` call keeps the stack of bindings being resolved. Entering
//! a binding that is already on the stack fails with
//! [`GraphError::CircularDependency`], carrying the whole path from the
//! requested class, instead of recursing forever.

use tracing::{debug, instrument, trace, warn};

use rndi_support::rendering::suggest_similar;

use crate::binding::{Binding, BindingKind, BindingTable};
use crate::class::{Arguments, ClassRef, Parameter, Value};
use crate::error::{
    ArgumentTypeMismatchError, CircularDependencyError, GraphError, MissingBindingError,
};

const MAX_SUGGESTIONS: usize = 3;

/// A binding table compiled for resolution.
///
/// Immutable once compiled.
#[derive(Debug)]
pub struct ObjectGraph {
    table: BindingTable,
}

/// One entry of the resolution stack.
struct Frame {
    /// Keyword of the binding being resolved; `None` for the requested class.
    keyword: Option<String>,
    label: String,
}

impl ObjectGraph {
    /// Compiles a populated binding table.
    pub fn compile(table: BindingTable) -> Self {
        debug!(bindings = table.len(), "Compiled object graph");
        Self { table }
    }

    /// The table this graph resolves against.
    pub fn bindings(&self) -> &BindingTable {
        &self.table
    }

    /// Constructs an instance of `class`.
    ///
    /// # Errors
    /// - [`GraphError::MissingBinding`] — required parameter with no binding
    /// - [`GraphError::ArgumentTypeMismatch`] — bound value of the wrong type
    /// - [`GraphError::CircularDependency`] — a binding depends on itself
    /// - [`GraphError::ConstructionFailed`] — a constructor or factory failed
    #[instrument(skip_all, fields(class = %class.key()))]
    pub fn provide(&self, class: &ClassRef) -> Result<Value, GraphError> {
        let mut stack = vec![Frame {
            keyword: None,
            label: class.key().to_string(),
        }];
        self.instantiate(class, &mut stack)
    }

    fn instantiate(&self, class: &ClassRef, stack: &mut Vec<Frame>) -> Result<Value, GraphError> {
        let owner = class.key().to_string();
        let mut args = self.resolve_parameters(&owner, &class.parameters(), stack)?;
        class.construct(&mut args)
    }

    fn resolve_parameters(
        &self,
        owner: &str,
        parameters: &[Parameter],
        stack: &mut Vec<Frame>,
    ) -> Result<Arguments, GraphError> {
        let mut args = Arguments::new(owner);

        for param in parameters {
            let Some(binding) = self.table.get(param.name()) else {
                if param.has_default() {
                    trace!(owner, parameter = param.name(), "Using default");
                    continue;
                }
                return Err(self.missing(owner, param));
            };

            if binding.produces() != param.declared() {
                return Err(GraphError::ArgumentTypeMismatch(ArgumentTypeMismatchError {
                    parameter: param.name(),
                    expected: param.declared(),
                    found: binding.produces(),
                    required_by: owner.to_string(),
                }));
            }

            trace!(
                owner,
                parameter = param.name(),
                kind = binding.kind().label(),
                "Resolving parameter"
            );
            let value = self.resolve_binding(binding, stack)?;
            args.insert(param.name(), binding.produces(), value);
        }

        Ok(args)
    }

    fn resolve_binding(
        &self,
        binding: &Binding,
        stack: &mut Vec<Frame>,
    ) -> Result<Value, GraphError> {
        match binding.kind() {
            BindingKind::Instance(produce) => Ok(produce()),
            BindingKind::Class(class) => {
                self.enter(binding, stack)?;
                let result = self.instantiate(class, stack);
                stack.pop();
                result
            }
            BindingKind::Factory { parameters, factory } => {
                self.enter(binding, stack)?;
                let owner = format!("factory `{}`", binding.keyword());
                let result = self
                    .resolve_parameters(&owner, parameters, stack)
                    .and_then(|mut args| factory(&mut args));
                stack.pop();
                result
            }
        }
    }

    /// Pushes `binding` onto the resolution stack, failing if it is already there.
    fn enter(&self, binding: &Binding, stack: &mut Vec<Frame>) -> Result<(), GraphError> {
        let keyword = binding.keyword();

        if stack.iter().any(|frame| frame.keyword.as_deref() == Some(keyword)) {
            let mut chain: Vec<String> = stack.iter().map(|frame| frame.label.clone()).collect();
            chain.push(keyword.to_string());

            warn!(cycle = ?chain, "Circular dependency detected");
            return Err(GraphError::CircularDependency(CircularDependencyError { chain }));
        }

        stack.push(Frame {
            keyword: Some(keyword.to_string()),
            label: keyword.to_string(),
        });
        Ok(())
    }

    fn missing(&self, owner: &str, param: &Parameter) -> GraphError {
        let keywords = self.table.keywords();
        GraphError::MissingBinding(MissingBindingError {
            parameter: param.name(),
            declared: param.declared(),
            required_by: owner.to_string(),
            suggestions: suggest_similar(param.name(), &keywords, MAX_SUGGESTIONS),
        })
    }
}
