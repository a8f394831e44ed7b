//! Generation Parameters
//!
//! Normalized constraint bag handed to parameterizable generators. Each
//! parameter object declares the capabilities its generator understands;
//! merges into undeclared capabilities are ignored.
//!
//! Merge operations only ever tighten: bounds intersect, nullability is a
//! logical AND, and generic type slots keep their first writer.

use crate::error::GenerationError;
use crate::types::TypeDescriptor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// One optional facet of a parameter object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Nullable,
    Sized,
    Bounded,
    SingleGeneric,
    PairGeneric,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Nullable,
        Capability::Sized,
        Capability::Bounded,
        Capability::SingleGeneric,
        Capability::PairGeneric,
    ];

    fn bit(self) -> u8 {
        match self {
            Capability::Nullable => 1,
            Capability::Sized => 1 << 1,
            Capability::Bounded => 1 << 2,
            Capability::SingleGeneric => 1 << 3,
            Capability::PairGeneric => 1 << 4,
        }
    }
}

/// Set of capabilities; doubles as the "parameter type" extraction
/// pipelines are cached by.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub const fn empty() -> Self {
        CapabilitySet(0)
    }

    pub fn of(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        capabilities
            .into_iter()
            .fold(Self::empty(), |set, capability| set.with(capability))
    }

    pub fn with(self, capability: Capability) -> Self {
        CapabilitySet(self.0 | capability.bit())
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Inclusive size window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: usize::MAX,
        }
    }
}

impl SizeRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Intersect the requested window with a generator's default window.
    ///
    /// The generator window only applies where the request leaves room: an
    /// explicit minimum above the default maximum is honoured, an explicit
    /// maximum below the default minimum is honoured.
    pub fn effective(&self, window: SizeRange) -> Result<RangeInclusive<usize>, GenerationError> {
        let lo = self.min.max(window.min.min(self.max));
        let hi = self.max.min(window.max.max(lo));
        if lo > hi {
            return Err(GenerationError::configuration(format!(
                "Empty size range: min {} is greater than max {}",
                lo, hi
            )));
        }
        Ok(lo..=hi)
    }
}

/// Inclusive numeric bounds; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberBounds {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl NumberBounds {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn tighten_min(&mut self, value: Decimal) {
        self.min = Some(match self.min {
            Some(current) => current.max(value),
            None => value,
        });
    }

    pub fn tighten_max(&mut self, value: Decimal) {
        self.max = Some(match self.max {
            Some(current) => current.min(value),
            None => value,
        });
    }

    /// Intersection of both bound pairs.
    pub fn intersect(&mut self, other: &NumberBounds) {
        if let Some(min) = other.min {
            self.tighten_min(min);
        }
        if let Some(max) = other.max {
            self.tighten_max(max);
        }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }
}

/// Parameter object for one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParameters {
    capabilities: CapabilitySet,
    nullable: bool,
    size: SizeRange,
    bounds: NumberBounds,
    element_type: Option<TypeDescriptor>,
    key_type: Option<TypeDescriptor>,
    value_type: Option<TypeDescriptor>,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self::new(CapabilitySet::of([Capability::Nullable]))
    }
}

impl GenerationParameters {
    /// Empty parameter object declaring the given capabilities.
    pub fn new(capabilities: CapabilitySet) -> Self {
        Self {
            capabilities,
            nullable: true,
            size: SizeRange::default(),
            bounds: NumberBounds::default(),
            element_type: None,
            key_type: None,
            value_type: None,
        }
    }

    /// Nullable + Bounded
    pub fn number() -> Self {
        Self::new(CapabilitySet::of([Capability::Nullable, Capability::Bounded]))
    }

    /// Nullable + Sized
    pub fn sized() -> Self {
        Self::new(CapabilitySet::of([Capability::Nullable, Capability::Sized]))
    }

    /// Nullable + Sized + SingleGeneric
    pub fn collection() -> Self {
        Self::new(CapabilitySet::of([
            Capability::Nullable,
            Capability::Sized,
            Capability::SingleGeneric,
        ]))
    }

    /// Nullable + Sized + PairGeneric
    pub fn map() -> Self {
        Self::new(CapabilitySet::of([
            Capability::Nullable,
            Capability::Sized,
            Capability::PairGeneric,
        ]))
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Whether null results are allowed. Objects without the nullable
    /// capability never forbid nulls.
    pub fn is_nullable(&self) -> bool {
        !self.supports(Capability::Nullable) || self.nullable
    }

    pub fn size(&self) -> SizeRange {
        self.size
    }

    pub fn bounds(&self) -> NumberBounds {
        self.bounds
    }

    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        self.element_type.as_ref()
    }

    pub fn key_type(&self) -> Option<&TypeDescriptor> {
        self.key_type.as_ref()
    }

    pub fn value_type(&self) -> Option<&TypeDescriptor> {
        self.value_type.as_ref()
    }

    // Merge operations used by extractors.

    /// AND the nullability with `nullable`.
    pub fn restrict_nullable(&mut self, nullable: bool) {
        if self.supports(Capability::Nullable) {
            self.nullable = self.nullable && nullable;
        }
    }

    pub fn tighten_min(&mut self, value: Decimal) {
        if self.supports(Capability::Bounded) {
            self.bounds.tighten_min(value);
        }
    }

    pub fn tighten_max(&mut self, value: Decimal) {
        if self.supports(Capability::Bounded) {
            self.bounds.tighten_max(value);
        }
    }

    pub fn intersect_bounds(&mut self, other: &NumberBounds) {
        if self.supports(Capability::Bounded) {
            self.bounds.intersect(other);
        }
    }

    pub fn tighten_size(&mut self, min: Option<usize>, max: Option<usize>) {
        if !self.supports(Capability::Sized) {
            return;
        }
        if let Some(min) = min {
            self.size.min = self.size.min.max(min);
        }
        if let Some(max) = max {
            self.size.max = self.size.max.min(max);
        }
    }

    /// Set the element type unless an earlier source already did.
    /// Returns whether the slot was written.
    pub fn offer_element_type(&mut self, element: &TypeDescriptor) -> bool {
        if !self.supports(Capability::SingleGeneric) || self.element_type.is_some() {
            return false;
        }
        self.element_type = Some(element.clone());
        true
    }

    /// Set key and value types unless an earlier source already did.
    pub fn offer_key_value_types(&mut self, key: &TypeDescriptor, value: &TypeDescriptor) -> bool {
        if !self.supports(Capability::PairGeneric)
            || self.key_type.is_some()
            || self.value_type.is_some()
        {
            return false;
        }
        self.key_type = Some(key.clone());
        self.value_type = Some(value.clone());
        true
    }

    // Builder methods for callers supplying a parameter object directly.
    // Each one declares the capability it touches.

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.capabilities = self.capabilities.with(Capability::Nullable);
        self.nullable = nullable;
        self
    }

    pub fn with_min(mut self, min: impl Into<Decimal>) -> Self {
        self.capabilities = self.capabilities.with(Capability::Bounded);
        self.bounds.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<Decimal>) -> Self {
        self.capabilities = self.capabilities.with(Capability::Bounded);
        self.bounds.max = Some(max.into());
        self
    }

    pub fn with_min_size(mut self, min: usize) -> Self {
        self.capabilities = self.capabilities.with(Capability::Sized);
        self.size.min = min;
        self
    }

    pub fn with_max_size(mut self, max: usize) -> Self {
        self.capabilities = self.capabilities.with(Capability::Sized);
        self.size.max = max;
        self
    }

    pub fn with_size(self, min: usize, max: usize) -> Self {
        self.with_min_size(min).with_max_size(max)
    }

    pub fn with_element_type(mut self, element: TypeDescriptor) -> Self {
        self.capabilities = self.capabilities.with(Capability::SingleGeneric);
        self.element_type = Some(element);
        self
    }

    pub fn with_key_value_types(mut self, key: TypeDescriptor, value: TypeDescriptor) -> Self {
        self.capabilities = self.capabilities.with(Capability::PairGeneric);
        self.key_type = Some(key);
        self.value_type = Some(value);
        self
    }
}
