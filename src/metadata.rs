//! Metadata Sources
//!
//! Declarative constraints, call-site descriptors and the provider that maps
//! a call site to its constraints. Constraint metadata is registered by hand
//! in a [`MetadataCatalog`]; nothing is discovered automatically.

use crate::params::GenerationParameters;
use crate::types::{RawType, TypeDescriptor};
use rust_decimal::Decimal;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Constraint group name.
pub type Group = Arc<str>;

/// Group applied when a constraint or a request names none.
pub const DEFAULT_GROUP: &str = "Default";

/// Declarative constraint attached to a call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    NotNull,
    Min(i64),
    Max(i64),
    DecimalMin(Decimal),
    DecimalMax(Decimal),
    Positive,
    PositiveOrZero,
    Negative,
    NegativeOrZero,
    Size { min: usize, max: usize },
    /// Non-null with at least one component.
    NotEmpty,
}

impl Constraint {
    pub fn size(min: usize, max: usize) -> Self {
        Constraint::Size { min, max }
    }

    pub fn min_size(min: usize) -> Self {
        Constraint::Size {
            min,
            max: usize::MAX,
        }
    }

    pub fn max_size(max: usize) -> Self {
        Constraint::Size { min: 0, max }
    }
}

/// Constraint plus the groups it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredConstraint {
    pub constraint: Constraint,
    pub groups: Vec<Group>,
}

impl DeclaredConstraint {
    pub fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            groups: Vec::new(),
        }
    }

    pub fn in_groups<G: AsRef<str>>(constraint: Constraint, groups: impl IntoIterator<Item = G>) -> Self {
        Self {
            constraint,
            groups: groups.into_iter().map(|g| Arc::from(g.as_ref())).collect(),
        }
    }

    /// Whether the constraint applies to a request for `groups`.
    /// Empty group lists on either side mean the default group.
    pub fn applies_to(&self, groups: &[Group]) -> bool {
        let declared_default = self.groups.is_empty();
        if groups.is_empty() {
            return declared_default || self.groups.iter().any(|g| &**g == DEFAULT_GROUP);
        }
        groups.iter().any(|requested| {
            if declared_default {
                &**requested == DEFAULT_GROUP
            } else {
                self.groups.contains(requested)
            }
        })
    }
}

/// Extension payload for third-party extractors.
#[derive(Clone)]
pub struct CustomSource {
    kind: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl CustomSource {
    pub fn new<T: Any + Send + Sync>(kind: impl AsRef<str>, payload: T) -> Self {
        Self {
            kind: Arc::from(kind.as_ref()),
            payload: Arc::new(payload),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSource").field("kind", &self.kind).finish()
    }
}

/// Any item consumed during constraint extraction.
#[derive(Debug, Clone)]
pub enum MetadataSource {
    Constraint(Constraint),
    TypeDeclaration(TypeDescriptor),
    Parameters(GenerationParameters),
    Custom(CustomSource),
}

/// Shape of a metadata source, used to rank extractor specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Constraint,
    TypeDeclaration,
    Parameters,
    Custom,
}

impl MetadataSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            MetadataSource::Constraint(_) => SourceKind::Constraint,
            MetadataSource::TypeDeclaration(_) => SourceKind::TypeDeclaration,
            MetadataSource::Parameters(_) => SourceKind::Parameters,
            MetadataSource::Custom(_) => SourceKind::Custom,
        }
    }
}

impl From<Constraint> for MetadataSource {
    fn from(constraint: Constraint) -> Self {
        MetadataSource::Constraint(constraint)
    }
}

impl From<TypeDescriptor> for MetadataSource {
    fn from(declaration: TypeDescriptor) -> Self {
        MetadataSource::TypeDeclaration(declaration)
    }
}

impl From<GenerationParameters> for MetadataSource {
    fn from(params: GenerationParameters) -> Self {
        MetadataSource::Parameters(params)
    }
}

/// Identity of a constructor or factory function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutableId {
    pub owner: RawType,
    pub name: Arc<str>,
}

impl ExecutableId {
    /// Name used for constructors.
    pub const CONSTRUCTOR: &'static str = "new";

    pub fn constructor(owner: impl Into<RawType>) -> Self {
        Self {
            owner: owner.into(),
            name: Arc::from(Self::CONSTRUCTOR),
        }
    }

    pub fn factory(owner: impl Into<RawType>, name: impl AsRef<str>) -> Self {
        Self {
            owner: owner.into(),
            name: Arc::from(name.as_ref()),
        }
    }
}

impl fmt::Display for ExecutableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

/// Call site a value is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetSite {
    Property { owner: RawType, name: Arc<str> },
    Parameter { executable: ExecutableId, index: usize },
    ReturnValue { executable: ExecutableId },
}

impl TargetSite {
    pub fn property(owner: impl Into<RawType>, name: impl AsRef<str>) -> Self {
        TargetSite::Property {
            owner: owner.into(),
            name: Arc::from(name.as_ref()),
        }
    }

    pub fn parameter(executable: ExecutableId, index: usize) -> Self {
        TargetSite::Parameter { executable, index }
    }

    pub fn return_value(executable: ExecutableId) -> Self {
        TargetSite::ReturnValue { executable }
    }
}

impl fmt::Display for TargetSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSite::Property { owner, name } => write!(f, "{}.{}", owner, name),
            TargetSite::Parameter { executable, index } => write!(f, "{}#{}", executable, index),
            TargetSite::ReturnValue { executable } => write!(f, "{}->", executable),
        }
    }
}

/// Metadata Source Provider: constraint lookup per call site.
pub trait MetadataProvider: Send + Sync {
    /// Constraints at `site` applicable to `groups`, in declaration order.
    fn constraints_at(&self, site: &TargetSite, groups: &[Group]) -> Vec<Constraint>;

    /// Declared type of a site, when known.
    fn declared_type(&self, site: &TargetSite) -> Option<TypeDescriptor>;
}

#[derive(Debug, Clone, Default)]
struct SiteMetadata {
    declared_type: Option<TypeDescriptor>,
    constraints: Vec<DeclaredConstraint>,
}

/// Hand-authored constraint catalog.
#[derive(Debug, Clone, Default)]
pub struct MetadataCatalog {
    sites: HashMap<TargetSite, SiteMetadata>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the declared type of a property.
    pub fn declare_property(
        &mut self,
        owner: impl Into<RawType>,
        name: impl AsRef<str>,
        declared_type: TypeDescriptor,
    ) -> &mut Self {
        let site = TargetSite::property(owner, name);
        self.declare(site, declared_type)
    }

    /// Record the declared type of any site.
    pub fn declare(&mut self, site: TargetSite, declared_type: TypeDescriptor) -> &mut Self {
        self.sites.entry(site).or_default().declared_type = Some(declared_type);
        self
    }

    /// Attach a default-group constraint to a site.
    pub fn constrain(&mut self, site: TargetSite, constraint: Constraint) -> &mut Self {
        self.constrain_declared(site, DeclaredConstraint::new(constraint))
    }

    /// Attach a constraint belonging to the given groups.
    pub fn constrain_in<G: AsRef<str>>(
        &mut self,
        site: TargetSite,
        constraint: Constraint,
        groups: impl IntoIterator<Item = G>,
    ) -> &mut Self {
        self.constrain_declared(site, DeclaredConstraint::in_groups(constraint, groups))
    }

    pub fn constrain_declared(&mut self, site: TargetSite, declared: DeclaredConstraint) -> &mut Self {
        self.sites.entry(site).or_default().constraints.push(declared);
        self
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl MetadataProvider for MetadataCatalog {
    fn constraints_at(&self, site: &TargetSite, groups: &[Group]) -> Vec<Constraint> {
        self.sites
            .get(site)
            .map(|metadata| {
                metadata
                    .constraints
                    .iter()
                    .filter(|declared| declared.applies_to(groups))
                    .map(|declared| declared.constraint.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn declared_type(&self, site: &TargetSite) -> Option<TypeDescriptor> {
        self.sites.get(site).and_then(|m| m.declared_type.clone())
    }
}

/// Build a group list from string names.
pub fn groups<G: AsRef<str>>(names: impl IntoIterator<Item = G>) -> Vec<Group> {
    names.into_iter().map(|g| Arc::from(g.as_ref())).collect()
}
