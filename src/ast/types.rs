//! Type system definitions for the AST.
//!
//! - Primitive types (int, float, string, boolean, and the game's
//!   enumerated types such as item or location)
//! - Aggregates: an element type indexed by one or more dimensions, each
//!   with its own key type
//! - Records: ordered, uniquely named fields
//!
//! Types are plain values. Nodes carry a copy of their static type rather
//! than a reference into the registry, and types are compared structurally.

use std::fmt::Display;

/// The primitive types of the language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literals {
    Void,
    Boolean,
    Int,
    Float,
    String,
    Buffer,
    /// Game data types (item, location, skill, ...) known only by name.
    Enumerated(String),
}

impl Literals {
    pub fn name(&self) -> &str {
        match self {
            Literals::Void => "void",
            Literals::Boolean => "boolean",
            Literals::Int => "int",
            Literals::Float => "float",
            Literals::String => "string",
            Literals::Buffer => "buffer",
            Literals::Enumerated(name) => name,
        }
    }
}

impl Display for Literals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Fixed(u32),
    /// Growable, declared with an empty slot or a key type name.
    Unbounded,
}

/// One dimension of an aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub key: Literals,
    pub bound: Bound,
}

impl Dimension {
    pub fn sized(size: u32) -> Self {
        Dimension {
            key: Literals::Int,
            bound: Bound::Fixed(size),
        }
    }

    pub fn unbounded() -> Self {
        Dimension {
            key: Literals::Int,
            bound: Bound::Unbounded,
        }
    }

    pub fn keyed(key: Literals) -> Self {
        Dimension {
            key,
            bound: Bound::Unbounded,
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.key, self.bound) {
            (_, Bound::Fixed(size)) => write!(f, "{}", size),
            (Literals::Int, Bound::Unbounded) => Ok(()),
            (key, Bound::Unbounded) => write!(f, "{}", key),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateType {
    pub element: Box<Type>,
    /// Consumed left to right by indexing.
    pub dimensions: Vec<Dimension>,
}

impl AggregateType {
    /// Builds an aggregate over `element`. An aggregate element is folded in,
    /// so its dimensions come after the new ones: `row[3]` with
    /// `typedef int[5] row` is `int[3,5]`.
    pub fn new(element: Type, dimensions: Vec<Dimension>) -> Self {
        match element {
            Type::Aggregate(inner) => {
                let mut all = dimensions;
                all.extend(inner.dimensions);
                AggregateType {
                    element: inner.element,
                    dimensions: all,
                }
            }
            element => AggregateType {
                element: Box::new(element),
                dimensions,
            },
        }
    }

    pub fn arity(&self) -> usize {
        self.dimensions.len()
    }

    /// The type left after `keys` dimensions have been indexed.
    pub fn consume(&self, keys: usize) -> Type {
        if keys >= self.dimensions.len() {
            (*self.element).clone()
        } else {
            Type::Aggregate(AggregateType {
                element: self.element.clone(),
                dimensions: self.dimensions[keys..].to_vec(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    /// `None` for a record declared inline with a variable.
    pub name: Option<String>,
    pub fields: Vec<(String, Type)>,
}

impl RecordType {
    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(field, _)| field.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Literals),
    Aggregate(AggregateType),
    Record(RecordType),
    /// Stands in for a node whose error was already reported. Compatible
    /// with everything so one mistake is reported once.
    Error,
}

impl Type {
    pub fn int() -> Self {
        Type::Primitive(Literals::Int)
    }

    pub fn float() -> Self {
        Type::Primitive(Literals::Float)
    }

    pub fn string() -> Self {
        Type::Primitive(Literals::String)
    }

    pub fn boolean() -> Self {
        Type::Primitive(Literals::Boolean)
    }

    pub fn void() -> Self {
        Type::Primitive(Literals::Void)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(Literals::Void))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Primitive(Literals::Int | Literals::Float))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Primitive(Literals::Boolean))
    }

    /// Whether a value of this type may be stored where `target` is expected.
    ///
    /// Structural: record names are ignored, fields and dimensions must match
    /// exactly. The only widening is a top-level int stored into a float.
    pub fn is_compatible_with(&self, target: &Type) -> bool {
        match (self, target) {
            (Type::Primitive(Literals::Int), Type::Primitive(Literals::Float)) => true,
            _ => self.same_structure(target),
        }
    }

    /// Structural equality with no widening; `Error` matches anything.
    pub fn same_structure(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Error, _) | (_, Type::Error) => true,
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Aggregate(a), Type::Aggregate(b)) => {
                a.dimensions == b.dimensions && a.element.same_structure(&b.element)
            }
            (Type::Record(a), Type::Record(b)) => {
                a.fields.len() == b.fields.len()
                    && a.fields
                        .iter()
                        .zip(b.fields.iter())
                        .all(|((name_a, ty_a), (name_b, ty_b))| {
                            name_a == name_b && ty_a.same_structure(ty_b)
                        })
            }
            _ => false,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(literal) => write!(f, "{}", literal),
            Type::Aggregate(aggregate) => {
                let dimensions = aggregate
                    .dimensions
                    .iter()
                    .map(|dimension| dimension.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{}[{}]", aggregate.element, dimensions)
            }
            Type::Record(record) => match &record.name {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "record"),
            },
            Type::Error => write!(f, "error"),
        }
    }
}
