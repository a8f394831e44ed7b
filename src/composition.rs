//! Recursive Container Composition
//!
//! Helpers container generators use to generate their components through the
//! registry. A component descriptor may itself carry type arguments, which
//! are propagated as a type-declaration source into a fresh parameter object
//! for the component's generator.

use crate::error::GenerationError;
use crate::generator::Request;
use crate::metadata::MetadataSource;
use crate::params::{GenerationParameters, SizeRange};
use crate::registry::GeneratorRegistry;
use crate::types::TypeDescriptor;
use crate::value::Value;
use rand::Rng;
use std::ops::RangeInclusive;

/// Extra draws allowed per requested unique component before giving up.
pub const UNIQUE_ATTEMPTS_PER_COMPONENT: usize = 20;

/// Random non-null component of type `component`.
pub fn random_component(
    registry: &GeneratorRegistry,
    component: Option<&TypeDescriptor>,
) -> Result<Value, GenerationError> {
    generate_component(registry, component, Request::Random)
}

/// Random component, null with the registry's null probability.
pub fn nullable_random_component(
    registry: &GeneratorRegistry,
    component: Option<&TypeDescriptor>,
) -> Result<Value, GenerationError> {
    generate_component(registry, component, Request::NullableRandom)
}

/// Canonical non-null component.
pub fn default_component(
    registry: &GeneratorRegistry,
    component: Option<&TypeDescriptor>,
) -> Result<Value, GenerationError> {
    generate_component(registry, component, Request::Default)
}

fn generate_component(
    registry: &GeneratorRegistry,
    component: Option<&TypeDescriptor>,
    request: Request,
) -> Result<Value, GenerationError> {
    let descriptor = component.ok_or(GenerationError::NullArgument("component type"))?;
    let raw = descriptor.raw_type();
    let generator = registry.resolve(&raw).ok_or_else(|| {
        GenerationError::failure(format!("Unsupported component type: {}", descriptor))
    })?;
    match generator.as_parameterizable() {
        Some(parameterizable) if descriptor.has_type_arguments() => {
            let params = registry.build_parameters(
                parameterizable.create_parameters(),
                &[MetadataSource::TypeDeclaration(descriptor.clone())],
            )?;
            request.invoke_with(parameterizable, &raw, &params, registry)
        }
        _ => request.invoke(generator.as_ref(), &raw, registry),
    }
}

/// Random component honouring the container's component nullability.
///
/// Sequence elements, array elements and map values take their nullability
/// from the container's merged parameters: a nullable container may hold
/// null components, a `NotNull` one never does. Set elements and map keys
/// do not go through here and are always non-null.
pub fn component(
    registry: &GeneratorRegistry,
    component: Option<&TypeDescriptor>,
    nullable: bool,
) -> Result<Value, GenerationError> {
    if nullable {
        nullable_random_component(registry, component)
    } else {
        random_component(registry, component)
    }
}

/// Size window for one container value.
pub fn size_window(
    params: &GenerationParameters,
    window: SizeRange,
) -> Result<RangeInclusive<usize>, GenerationError> {
    params.size().effective(window)
}

/// Uniform size draw from the effective window.
pub fn random_size(params: &GenerationParameters, window: SizeRange) -> Result<usize, GenerationError> {
    let range = size_window(params, window)?;
    Ok(rand::thread_rng().gen_range(range))
}

/// Size of a default container: the requested minimum.
pub fn default_size(params: &GenerationParameters, window: SizeRange) -> Result<usize, GenerationError> {
    // Validates the window even though only the lower bound is used.
    size_window(params, window)?;
    Ok(params.size().min)
}

/// `size` independent components.
pub fn fill<F>(size: usize, mut draw: F) -> Result<Vec<Value>, GenerationError>
where
    F: FnMut() -> Result<Value, GenerationError>,
{
    (0..size).map(|_| draw()).collect()
}

/// `size` pairwise distinct components.
///
/// Fails once the draw budget is spent, which happens when the component
/// type has fewer distinct values than requested.
pub fn fill_unique<F>(size: usize, mut draw: F) -> Result<Vec<Value>, GenerationError>
where
    F: FnMut() -> Result<Value, GenerationError>,
{
    let budget = size.saturating_mul(UNIQUE_ATTEMPTS_PER_COMPONENT).max(UNIQUE_ATTEMPTS_PER_COMPONENT);
    let mut components: Vec<Value> = Vec::with_capacity(size);
    let mut attempts = 0;
    while components.len() < size {
        if attempts == budget {
            return Err(GenerationError::failure(format!(
                "Could not generate {} distinct components after {} attempts",
                size, attempts
            )));
        }
        attempts += 1;
        let candidate = draw()?;
        if !components.contains(&candidate) {
            components.push(candidate);
        }
    }
    Ok(components)
}
