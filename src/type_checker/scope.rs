use std::collections::HashMap;

use log::trace;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    Span,
};

/// A declared variable: its static type and where it was declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeEntry {
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    pub return_type: Type,
    pub parameters: Vec<(String, Type)>,
    pub span: Span,
}

#[derive(Debug, Default, Clone)]
pub struct Scope {
    variables: HashMap<String, ScopeEntry>,
}

impl Scope {
    pub fn get_variable(&self, name: &str) -> Option<&ScopeEntry> {
        self.variables.get(name)
    }
}

/// Nested lexical scopes, innermost last. The outermost (global) scope is
/// never popped. Functions live in one top-level table.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    functions: HashMap<String, FunctionSignature>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    pub fn new() -> Self {
        ScopeTable {
            scopes: vec![Scope::default()],
            functions: HashMap::new(),
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!("push scope (depth {})", self.scopes.len());
    }

    /// Discards the innermost scope, uncovering anything it shadowed.
    pub fn pop_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() == 1 {
            trace!("refusing to pop the global scope");
            return None;
        }

        trace!("pop scope (depth {})", self.scopes.len());
        self.scopes.pop()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `name` in the innermost scope. A duplicate in the same scope
    /// is an error and the original entry is kept.
    pub fn declare(&mut self, name: &str, ty: Type, span: Span) -> Result<(), Error> {
        let scope = self
            .scopes
            .last_mut()
            .expect("scope table always holds the global scope");

        if scope.variables.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.to_string(),
                },
                span,
            ));
        }

        scope.variables.insert(name.to_string(), ScopeEntry { ty, span });
        Ok(())
    }

    /// Innermost-first lookup.
    pub fn lookup(&self, name: &str) -> Option<&ScopeEntry> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get_variable(name))
    }

    /// Every variable name currently visible, for suggestions.
    pub fn visible_names(&self) -> Vec<&str> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.variables.keys().map(|name| name.as_str()))
            .collect()
    }

    pub fn declare_function(&mut self, signature: FunctionSignature) -> Result<(), Error> {
        if self.functions.contains_key(&signature.name) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared {
                    function: signature.name.clone(),
                },
                signature.span.clone(),
            ));
        }

        self.functions.insert(signature.name.clone(), signature);
        Ok(())
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.get(name)
    }
}
