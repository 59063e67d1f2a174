use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;

use crate::{
    ast::types::{Literals, Type},
    errors::errors::{Error, ErrorImpl},
    Span,
};

lazy_static! {
    /// Primitive types every compilation unit starts with.
    pub static ref BUILTIN_TYPES: HashMap<&'static str, Literals> = {
        let mut map = HashMap::new();
        map.insert("void", Literals::Void);
        map.insert("boolean", Literals::Boolean);
        map.insert("int", Literals::Int);
        map.insert("float", Literals::Float);
        map.insert("string", Literals::String);
        map.insert("buffer", Literals::Buffer);
        for name in [
            "item", "location", "class", "stat", "skill", "effect", "familiar", "slot",
            "monster", "element", "coinmaster", "phylum", "bounty", "thrall", "servant",
            "vykea", "path",
        ] {
            map.insert(name, Literals::Enumerated(name.to_string()));
        }
        map
    };
}

/// Type names visible to one parse.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Type>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry holding the built-in primitive catalog.
    pub fn new() -> Self {
        let types = BUILTIN_TYPES
            .iter()
            .map(|(name, literal)| (name.to_string(), Type::Primitive(literal.clone())))
            .collect();

        TypeRegistry { types }
    }

    /// Adds an enumerated primitive to the catalog. Returns false if the name is taken.
    pub fn declare_primitive(&mut self, name: &str) -> bool {
        if self.types.contains_key(name) {
            return false;
        }

        self.types.insert(
            name.to_string(),
            Type::Primitive(Literals::Enumerated(name.to_string())),
        );
        true
    }

    /// Registers a named type (a named record or a typedef).
    pub fn declare_type(&mut self, name: &str, ty: Type, span: &Span) -> Result<(), Error> {
        if self.types.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::TypeAlreadyDeclared {
                    type_: name.to_string(),
                },
                span.clone(),
            ));
        }

        debug!("registered type {} = {}", name, ty);
        self.types.insert(name.to_string(), ty);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        from.is_compatible_with(to)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|name| name.as_str())
    }
}
