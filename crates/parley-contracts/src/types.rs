//! Semantic type descriptors for function parameters.
//!
//! A `TypeDescriptor` is the declared shape of one parameter. Functions carry
//! their descriptors explicitly (see `DescribeType`), so schemas are derived
//! at construction time without runtime reflection.
//!
//! Descriptors are owned trees: a descriptor cannot refer back to itself, so
//! the schema mapper always terminates.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParleyError;

/// The scalar kinds the schema family can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
}

impl Primitive {
    /// The JSON Schema `type` keyword for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Primitive {
    type Err = ParleyError;

    /// Parse a type tag such as `"integer"`. Unknown tags are unsupported.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Primitive::String),
            "integer" => Ok(Primitive::Integer),
            "number" => Ok(Primitive::Number),
            "boolean" => Ok(Primitive::Boolean),
            other => Err(ParleyError::UnsupportedType {
                type_name: other.to_string(),
            }),
        }
    }
}

/// An abstract, language-neutral description of a value's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// A scalar.
    Primitive(Primitive),

    /// A closed set of string values, in declaration order.
    Enumeration(Vec<String>),

    /// A record whose fields are all required, in declaration order.
    Structured(Vec<(String, TypeDescriptor)>),

    /// Any of the member types, in declaration order.
    Union(Vec<TypeDescriptor>),

    /// A homogeneous list. `None` means the element type was not declared.
    List(Option<Box<TypeDescriptor>>),

    /// A key/value mapping. Undeclared key or value types are `None`.
    ///
    /// The schema family can only express a single entry, see
    /// `parley_schema::mapper`.
    Mapping {
        key: Option<Box<TypeDescriptor>>,
        value: Option<Box<TypeDescriptor>>,
    },

    /// A named type with no schema mapping. Mapping it always fails.
    Opaque(String),
}

impl TypeDescriptor {
    pub fn string() -> Self {
        Self::Primitive(Primitive::String)
    }

    pub fn integer() -> Self {
        Self::Primitive(Primitive::Integer)
    }

    pub fn number() -> Self {
        Self::Primitive(Primitive::Number)
    }

    pub fn boolean() -> Self {
        Self::Primitive(Primitive::Boolean)
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enumeration(values.into_iter().map(Into::into).collect())
    }

    pub fn structured<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeDescriptor)>,
        S: Into<String>,
    {
        Self::Structured(
            fields
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }

    pub fn union(members: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self::Union(members.into_iter().collect())
    }

    pub fn list(element: TypeDescriptor) -> Self {
        Self::List(Some(Box::new(element)))
    }

    pub fn mapping(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Mapping {
            key: Some(Box::new(key)),
            value: Some(Box::new(value)),
        }
    }

    pub fn opaque(name: impl Into<String>) -> Self {
        Self::Opaque(name.into())
    }
}

impl From<Primitive> for TypeDescriptor {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl FromStr for TypeDescriptor {
    type Err = ParleyError;

    /// Parse a bare primitive tag, e.g. from a config file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Primitive>().map(Self::Primitive)
    }
}

// ── Static descriptors for Rust types ────────────────────────────────────────

/// A Rust type with a statically declared `TypeDescriptor`.
///
/// Used by `Function::param::<T>()` so parameter schemas follow the Rust
/// signature the handler actually reads.
pub trait DescribeType {
    fn describe() -> TypeDescriptor;
}

impl DescribeType for String {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::string()
    }
}

impl DescribeType for str {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::string()
    }
}

impl DescribeType for bool {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::boolean()
    }
}

macro_rules! describe_as {
    ($ctor:ident: $($ty:ty),+) => {
        $(
            impl DescribeType for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::$ctor()
                }
            }
        )+
    };
}

describe_as!(integer: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_as!(number: f32, f64);

impl<T: DescribeType + ?Sized> DescribeType for &T {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: DescribeType + ?Sized> DescribeType for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: DescribeType> DescribeType for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::list(T::describe())
    }
}

impl<T: DescribeType> DescribeType for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::list(T::describe())
    }
}

impl<K: DescribeType, V: DescribeType, S> DescribeType for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::mapping(K::describe(), V::describe())
    }
}

impl<K: DescribeType, V: DescribeType> DescribeType for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::mapping(K::describe(), V::describe())
    }
}
