//! Executable generators
//!
//! An [`Executable`] is a constructor or factory function taking generated
//! argument values. An [`ExecutableGenerator`] resolves one
//! [`TargetedGenerator`] per argument when built, synthesizes the arguments
//! in declaration order and invokes the executable.

use super::{envelope, priority, Generator, ParameterizableGenerator, TargetedGenerator};
use crate::error::GenerationError;
use crate::metadata::{ExecutableId, Group, TargetSite};
use crate::params::GenerationParameters;
use crate::registry::GeneratorRegistry;
use crate::types::{RawType, TypeDescriptor};
use crate::value::{ObjectValue, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Body = dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutableKind {
    Constructor,
    Factory,
}

/// Constructor or factory producing instances of its owner type.
#[derive(Clone)]
pub struct Executable {
    id: ExecutableId,
    kind: ExecutableKind,
    arguments: Vec<TypeDescriptor>,
    body: Arc<Body>,
}

impl Executable {
    /// Constructor of `owner` taking arguments of the given declared types.
    pub fn constructor<T, F>(
        owner: impl Into<RawType>,
        arguments: impl IntoIterator<Item = TypeDescriptor>,
        body: F,
    ) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&[Value]) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let id = ExecutableId::constructor(owner);
        Self::build(id, ExecutableKind::Constructor, arguments, body)
    }

    /// Named factory function returning instances of `owner`.
    pub fn factory<T, F>(
        owner: impl Into<RawType>,
        name: impl AsRef<str>,
        arguments: impl IntoIterator<Item = TypeDescriptor>,
        body: F,
    ) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&[Value]) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let id = ExecutableId::factory(owner, name);
        Self::build(id, ExecutableKind::Factory, arguments, body)
    }

    fn build<T, F>(
        id: ExecutableId,
        kind: ExecutableKind,
        arguments: impl IntoIterator<Item = TypeDescriptor>,
        body: F,
    ) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&[Value]) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let owner = id.owner.clone();
        let body = move |args: &[Value]| -> anyhow::Result<Value> {
            let instance = body(args)?;
            Ok(Value::Object(ObjectValue::new(owner.clone(), instance)))
        };
        Self {
            id,
            kind,
            arguments: arguments.into_iter().collect(),
            body: Arc::new(body),
        }
    }

    pub fn id(&self) -> &ExecutableId {
        &self.id
    }

    pub fn owner(&self) -> &RawType {
        &self.id.owner
    }

    pub fn kind(&self) -> ExecutableKind {
        self.kind
    }

    pub fn arguments(&self) -> &[TypeDescriptor] {
        &self.arguments
    }

    /// Call the executable; arity mismatches and errors raised by the body
    /// become `GenerationFailure`.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, GenerationError> {
        if args.len() != self.arguments.len() {
            return Err(GenerationError::failure(format!(
                "{} expects {} arguments, got {}",
                self.id,
                self.arguments.len(),
                args.len()
            )));
        }
        (self.body)(args).map_err(|err| {
            GenerationError::failure_caused_by(format!("{} failed", self.id), err)
        })
    }
}

impl fmt::Debug for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executable")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Generator producing values by invoking an [`Executable`].
#[derive(Debug, Clone)]
pub struct ExecutableGenerator {
    executable: Executable,
    arguments: Vec<TargetedGenerator>,
    priority: i32,
}

impl ExecutableGenerator {
    /// Resolve argument generators from `registry`.
    ///
    /// Fails with `UnsupportedValueType` when an argument type has no
    /// generator.
    pub fn new(registry: &GeneratorRegistry, executable: Executable) -> Result<Self, GenerationError> {
        let arguments = executable
            .arguments()
            .iter()
            .enumerate()
            .map(|(index, declared)| {
                let site = TargetSite::parameter(executable.id().clone(), index);
                TargetedGenerator::resolve(registry, site, declared.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            executable = %executable.id(),
            arguments = arguments.len(),
            "Resolved executable argument generators"
        );
        Ok(Self {
            executable,
            arguments,
            priority: priority::DEFAULT,
        })
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn executable(&self) -> &Executable {
        &self.executable
    }

    pub fn arguments(&self) -> &[TargetedGenerator] {
        &self.arguments
    }

    /// Invoke with each argument's nullable default.
    pub fn default_value_in(
        &self,
        registry: &GeneratorRegistry,
        groups: &[Group],
    ) -> Result<Value, GenerationError> {
        let args = self
            .arguments
            .iter()
            .map(|argument| argument.nullable_default_value(registry, groups))
            .collect::<Result<Vec<_>, _>>()?;
        self.executable.invoke(&args)
    }

    /// Invoke with each argument's nullable random value, in declaration
    /// order.
    pub fn random_value_in(
        &self,
        registry: &GeneratorRegistry,
        groups: &[Group],
    ) -> Result<Value, GenerationError> {
        let args = self
            .arguments
            .iter()
            .map(|argument| argument.nullable_random_value(registry, groups))
            .collect::<Result<Vec<_>, _>>()?;
        self.executable.invoke(&args)
    }
}

impl Generator for ExecutableGenerator {
    fn name(&self) -> &str {
        &self.executable.id.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn exact_types(&self) -> Vec<RawType> {
        vec![self.executable.owner().clone()]
    }

    fn supports(&self, ty: &RawType, _registry: &GeneratorRegistry) -> bool {
        ty == self.executable.owner()
    }

    fn default_value(&self, ty: &RawType, registry: &GeneratorRegistry) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        self.default_value_in(registry, &[])
    }

    fn random_value(&self, ty: &RawType, registry: &GeneratorRegistry) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        self.random_value_in(registry, &[])
    }

    fn as_parameterizable(&self) -> Option<&dyn ParameterizableGenerator> {
        Some(self)
    }
}

impl ParameterizableGenerator for ExecutableGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::default()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        self.default_value(ty, registry)
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        self.random_value(ty, registry)
    }
}
