//! Type Descriptors
//!
//! Without runtime reflection, requested types are described explicitly. A
//! [`RawType`] is the registry lookup key; a [`TypeDescriptor`] additionally
//! carries the generic arguments that container generators propagate into
//! nested generation requests.

use std::fmt;
use std::sync::Arc;

/// Raw (erased) type: the key generators are resolved by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RawType {
    /// A named type: `i32`, `String`, `Vec`, `HashMap`, `Person`.
    Named(Arc<str>),
    /// An array of the component raw type.
    Array(Box<RawType>),
}

impl RawType {
    pub fn named(name: impl AsRef<str>) -> Self {
        RawType::Named(Arc::from(name.as_ref()))
    }

    pub fn array_of(component: RawType) -> Self {
        RawType::Array(Box::new(component))
    }

    /// Name of a named type, `None` for arrays.
    pub fn name(&self) -> Option<&str> {
        match self {
            RawType::Named(name) => Some(name),
            RawType::Array(_) => None,
        }
    }

    /// Component type of an array type.
    pub fn component(&self) -> Option<&RawType> {
        match self {
            RawType::Array(component) => Some(component),
            RawType::Named(_) => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, RawType::Array(_))
    }

    /// True for a named type with the given name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawType::Named(name) => write!(f, "{}", name),
            RawType::Array(component) => write!(f, "[{}]", component),
        }
    }
}

impl From<&str> for RawType {
    fn from(name: &str) -> Self {
        RawType::named(name)
    }
}

impl From<String> for RawType {
    fn from(name: String) -> Self {
        RawType::Named(Arc::from(name))
    }
}

/// Full type description, possibly carrying generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Simple(RawType),
    Parameterized(RawType, Vec<TypeDescriptor>),
    GenericArray(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn simple(raw: impl Into<RawType>) -> Self {
        TypeDescriptor::Simple(raw.into())
    }

    pub fn parameterized(
        raw: impl Into<RawType>,
        arguments: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        TypeDescriptor::Parameterized(raw.into(), arguments.into_iter().collect())
    }

    pub fn generic_array(component: TypeDescriptor) -> Self {
        TypeDescriptor::GenericArray(Box::new(component))
    }

    /// `Vec<element>`
    pub fn vec_of(element: TypeDescriptor) -> Self {
        Self::parameterized("Vec", [element])
    }

    /// `HashSet<element>`
    pub fn set_of(element: TypeDescriptor) -> Self {
        Self::parameterized("HashSet", [element])
    }

    /// `HashMap<key, value>`
    pub fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::parameterized("HashMap", [key, value])
    }

    /// Registry lookup key for this descriptor.
    pub fn raw_type(&self) -> RawType {
        match self {
            TypeDescriptor::Simple(raw) | TypeDescriptor::Parameterized(raw, _) => raw.clone(),
            TypeDescriptor::GenericArray(component) => RawType::array_of(component.raw_type()),
        }
    }

    /// Generic arguments carried by the descriptor (empty for simple types).
    pub fn type_arguments(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Parameterized(_, arguments) => arguments,
            _ => &[],
        }
    }

    /// True when the descriptor carries nested type information beyond its
    /// raw type.
    pub fn has_type_arguments(&self) -> bool {
        match self {
            TypeDescriptor::Simple(_) => false,
            TypeDescriptor::Parameterized(_, arguments) => !arguments.is_empty(),
            TypeDescriptor::GenericArray(_) => true,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Simple(raw) => write!(f, "{}", raw),
            TypeDescriptor::Parameterized(raw, arguments) => {
                write!(f, "{}<", raw)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ">")
            }
            TypeDescriptor::GenericArray(component) => write!(f, "[{}]", component),
        }
    }
}

impl From<RawType> for TypeDescriptor {
    fn from(raw: RawType) -> Self {
        TypeDescriptor::Simple(raw)
    }
}

impl From<&str> for TypeDescriptor {
    fn from(name: &str) -> Self {
        TypeDescriptor::Simple(RawType::named(name))
    }
}
