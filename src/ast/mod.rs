/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Core AST definitions and traits
/// - expressions: Literals, operators, calls and resolved references
/// - statements: Declarations, blocks and control flow
/// - types: The static types every node is annotated with
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
