//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable, record, typedef and function declarations
//! - Expressions and their static types
//! - Control flow statements
//! - Scoping
//! - Error recovery and reporting

use std::rc::Rc;

use super::parser::{
    parse, parse_with_options, ParseOptions, ParseResult, Parser, MAX_NESTING_DEPTH,
};
use crate::{
    ast::{
        ast::{Expr, ExprType, Stmt, StmtType},
        expressions::{BinaryExpr, CompositeReferenceExpr, VariableReferenceExpr},
        statements::{ExpressionStmt, FnDeclStmt, ForeachStmt, TypeDeclStmt, VarDeclStmt},
        types::Type,
    },
    errors::{
        diagnostics::DiagnosticMode,
        errors::{ErrorCategory, ErrorTip},
    },
    lexer::{lexer::tokenize, tokens::TokenKind},
};

fn parse_str(source: &str) -> ParseResult {
    let file = Rc::new("test.ash".to_string());
    let tokens = tokenize(source, Rc::clone(&file));
    let (_, result) = parse(tokens, file);
    result
}

fn messages(result: &ParseResult) -> Vec<String> {
    result
        .diagnostics
        .iter()
        .map(|error| error.get_message())
        .collect()
}

fn assert_valid(source: &str) -> ParseResult {
    let result = parse_str(source);
    assert!(
        result.is_ok(),
        "expected no diagnostics for {:?}, got {:?}",
        source,
        messages(&result)
    );
    result
}

fn assert_errors(source: &str, expected: &[&str]) {
    let result = parse_str(source);
    assert_eq!(messages(&result), expected, "for source {:?}", source);
}

fn expression(result: &ParseResult, index: usize) -> &ExpressionStmt {
    result.tree.body[index]
        .downcast_ref::<ExpressionStmt>()
        .expect("expected an expression statement")
}

#[test]
fn test_parse_variable_declaration() {
    let result = assert_valid("int x = 42;");

    let declaration = result.tree.body[0].downcast_ref::<VarDeclStmt>().unwrap();
    assert_eq!(declaration.identifier, "x");
    assert_eq!(declaration.var_type, Type::int());
    assert!(declaration.assigned_value.is_some());
}

#[test]
fn test_parse_empty_program() {
    let result = assert_valid("");
    assert!(result.tree.is_empty());
}

#[test]
fn test_initializer_type_mismatch() {
    assert_errors("int x = 'a';", &["Cannot store string in x of type int"]);
}

#[test]
fn test_int_widens_to_float() {
    assert_valid("float f = 1; f = 2;");
    assert_errors("int x; float y; x = y;", &["Cannot store float in x of type int"]);
}

#[test]
fn test_operator_precedence() {
    let result = assert_valid("int x = 1 + 2 * 3;");

    let declaration = result.tree.body[0].downcast_ref::<VarDeclStmt>().unwrap();
    let sum = declaration
        .assigned_value
        .as_ref()
        .unwrap()
        .downcast_ref::<BinaryExpr>()
        .unwrap();
    assert_eq!(sum.operator.kind, TokenKind::Plus);
    let product = sum.right.downcast_ref::<BinaryExpr>().unwrap();
    assert_eq!(product.operator.kind, TokenKind::Star);
}

#[test]
fn test_unary_binds_tighter_than_binary() {
    let result = assert_valid("int x = -1 + 2;");

    let declaration = result.tree.body[0].downcast_ref::<VarDeclStmt>().unwrap();
    let sum = declaration.assigned_value.as_ref().unwrap();
    assert_eq!(sum.get_expr_type(), ExprType::Binary);
}

#[test]
fn test_expression_types() {
    assert_valid("boolean b = 1 < 2 && 3 > 2 || !true;");
    assert_valid("string s = 'a' + 1;");
    assert_valid("float f = 1 + 2.5;");
    assert_valid("int r = 7 % 2;");
    assert_valid("boolean same = 'a' == \"a\";");
}

#[test]
fn test_invalid_operands_are_reported_once() {
    assert_errors(
        "int x = 'a' * 2;",
        &["Cannot apply operator * to string and int"],
    );
    assert_errors("boolean b = !1;", &["Cannot apply operator ! to int"]);
    assert_errors("boolean b = 1 && true;", &["Cannot apply operator && to int and boolean"]);
}

#[test]
fn test_named_record_declaration() {
    let result = assert_valid("record point { int x; int y; }; point p; p.y = 3;");

    let declaration = result.tree.body[0].downcast_ref::<TypeDeclStmt>().unwrap();
    assert_eq!(declaration.name, "point");
    assert_eq!(result.tree.body[1].get_stmt_type(), StmtType::VarDeclStmt);
}

#[test]
fn test_named_record_with_variable() {
    assert_valid("record point { int x; } origin; point other; other = origin;");
}

#[test]
fn test_records_are_structural() {
    assert_valid("record a { int x; }; record b { int x; }; a first; b second; first = second;");
    assert_errors(
        "record a { int x; }; record b { int y; }; a first; b second; first = second;",
        &["Cannot store b in first of type a"],
    );
}

#[test]
fn test_duplicate_field() {
    assert_errors(
        "record { int a; string a; } r; r.a = 1;",
        &["Field 'a' is already defined"],
    );
}

#[test]
fn test_duplicate_type() {
    assert_errors(
        "record point { int x; }; typedef int point;",
        &["Type 'point' is already defined"],
    );
}

#[test]
fn test_typedef_aggregate_folds_dimensions() {
    let result = assert_valid("typedef int[5] row; row[3] grid; grid[0][4]; grid[0,1];");

    let declaration = result.tree.body[1].downcast_ref::<VarDeclStmt>().unwrap();
    assert_eq!(declaration.var_type.to_string(), "int[3,5]");

    let reference = expression(&result, 2)
        .expression
        .downcast_ref::<VariableReferenceExpr>()
        .unwrap();
    assert_eq!(reference.indices.len(), 2);
    assert_eq!(reference.ty, Type::int());
}

#[test]
fn test_chained_dimension_groups() {
    let result = assert_valid("int[5][3] x; x[4, 2];");

    let declaration = result.tree.body[0].downcast_ref::<VarDeclStmt>().unwrap();
    assert_eq!(declaration.var_type.to_string(), "int[5,3]");
}

#[test]
fn test_partial_indexing_leaves_aggregate() {
    let result = assert_valid("int[5,5] x; x[0];");

    let reference = expression(&result, 1)
        .expression
        .downcast_ref::<VariableReferenceExpr>()
        .unwrap();
    assert_eq!(reference.ty.to_string(), "int[5]");
}

#[test]
fn test_unbounded_dimension() {
    assert_valid("string[] names; names[10] = 'x';");
    assert_errors("int[5,] x;", &["Dimension expected"]);
}

#[test]
fn test_map_keys() {
    assert_valid("int[string] m; m['a'] = 1;");
    assert_errors(
        "int[string] m; m[1];",
        &["Index for 'm' has wrong data type (expected string, got int)"],
    );
    assert_errors(
        "int[item, 3] m; m[1];",
        &["Index for 'm' has wrong data type (expected item, got int)"],
    );
}

#[test]
fn test_index_keys_do_not_widen() {
    assert_errors(
        "int[5] x; x[1.5];",
        &["Index for 'x' has wrong data type (expected int, got float)"],
    );
}

#[test]
fn test_composite_reference_into_aggregate_field() {
    let result = assert_valid("record { int[2] xs; } r; r.xs[1];");

    let reference = expression(&result, 1)
        .expression
        .downcast_ref::<CompositeReferenceExpr>()
        .unwrap();
    assert_eq!(reference.field(), Some("xs"));
    assert_eq!(reference.accessors.len(), 2);
    assert_eq!(reference.ty, Type::int());
}

#[test]
fn test_nested_records() {
    assert_valid("record { record { int b; } a; } r; r.a.b = 1;");
    assert_errors(
        "record { record { int b; } a; } r; r.a.c;",
        &["Invalid field name 'c'"],
    );
}

#[test]
fn test_field_of_indexed_element() {
    assert_errors(
        "record { int[2] xs; } r; r.xs[1].a;",
        &["Record expected"],
    );
    assert_errors("record { int[2] xs; } r; r.xs.a;", &["Record expected"]);
}

#[test]
fn test_index_path_after_field() {
    assert_errors(
        "record { int[2,2] xs; } r; r.xs[0]['s'];",
        &["Index for 'r.xs[]' has wrong data type (expected int, got string)"],
    );
}

#[test]
fn test_record_cannot_be_indexed() {
    assert_errors("record { int a; } r; r[0];", &["Variable 'r' cannot be indexed"]);
}

#[test]
fn test_first_reference_error_poisons_the_chain() {
    // Only the first bad step of one reference is reported.
    assert_errors("int x; x[0][1].a;", &["Variable 'x' cannot be indexed"]);
}

#[test]
fn test_invalid_field_suggestion() {
    let result = parse_str("record { int count; } r; r.cont;");

    assert_eq!(messages(&result), vec!["Invalid field name 'cont'"]);
    match result.diagnostics[0].get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "did you mean `count`?"),
        ErrorTip::None => panic!("expected a suggestion"),
    }
}

#[test]
fn test_function_declaration_and_call() {
    let result = assert_valid("int add(int a, int b) { return a + b; } int s = add(1, 2);");

    let function = result.tree.body[0].downcast_ref::<FnDeclStmt>().unwrap();
    assert_eq!(function.identifier, "add");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.return_type, Type::int());
    assert_eq!(function.body.len(), 1);
}

#[test]
fn test_recursive_function() {
    assert_valid("int fact(int n) { if (n <= 1) return 1; return n * fact(n - 1); }");
}

#[test]
fn test_call_checks() {
    assert_errors(
        "int add(int a) { return a; } add(1, 2);",
        &["Function 'add' expects 1 arguments, got 2"],
    );
    assert_errors(
        "int add(int a) { return a; } add('x');",
        &["Argument 1 of 'add' has wrong data type (expected int, got string)"],
    );
    assert_errors("foo();", &["Function 'foo' undefined"]);
}

#[test]
fn test_parameters_are_scoped_to_the_body() {
    assert_errors("void f(int a) { a = 1; } a = 2;", &["Unknown variable 'a'"]);
}

#[test]
fn test_return_checks() {
    assert_errors("void f() { return 1; }", &["Cannot return int from a function returning void"]);
    assert_errors("int f() { return; }", &["Cannot return void from a function returning int"]);
    assert_errors("return;", &["Return outside of function"]);
    assert_valid("float f() { return 1; }");
}

#[test]
fn test_nested_function() {
    assert_errors(
        "void f() { void g() { } }",
        &["Functions may only be declared at top level"],
    );
}

#[test]
fn test_loops() {
    assert_valid("int i; while (i < 3) { i += 1; if (i == 2) break; else continue; }");
    assert_errors("break;", &["'break' outside of loop"]);
    assert_errors("continue;", &["'continue' outside of loop"]);
    assert_errors("while (1) { }", &["'while' requires a boolean condition"]);
    assert_errors("if ('a') { }", &["'if' requires a boolean condition"]);
}

#[test]
fn test_break_inside_function_inside_loop_body_is_rejected() {
    assert_errors("void f() { break; }", &["'break' outside of loop"]);
}

#[test]
fn test_foreach_variable_types() {
    let result = assert_valid(
        "int[string, 3] m; foreach k, i, v in m { string s = k; int j = i; int w = v; }",
    );

    let foreach = result.tree.body[1].downcast_ref::<ForeachStmt>().unwrap();
    let types: Vec<String> = foreach
        .variables
        .iter()
        .map(|(_, ty)| ty.to_string())
        .collect();
    assert_eq!(types, vec!["string", "int", "int"]);
}

#[test]
fn test_foreach_errors() {
    assert_errors(
        "int[3] m; foreach a, b, c in m { }",
        &["Too many key variables specified"],
    );
    assert_errors("int n; foreach k in n { }", &["Aggregate reference expected"]);
    assert_errors("int[3] m; foreach k in m { } k;", &["Unknown variable 'k'"]);
}

#[test]
fn test_scoping_and_shadowing() {
    assert_errors("{ int x; } x;", &["Unknown variable 'x'"]);
    assert_valid("int x; { string x; x = 'a'; } x = 1;");
    assert_errors("if (true) int y = 1; y;", &["Unknown variable 'y'"]);
}

#[test]
fn test_duplicate_declaration_keeps_first() {
    assert_errors("int x; string x; x = 1;", &["Variable 'x' is already defined"]);
}

#[test]
fn test_unknown_variable_suggestion() {
    let result = parse_str("int count; cont = 1;");

    assert_eq!(messages(&result), vec!["Unknown variable 'cont'"]);
    assert_eq!(
        result.diagnostics[0].get_tip().to_string(),
        "did you mean `count`?"
    );
}

#[test]
fn test_unknown_type() {
    let result = parse_str("itm x; x = 1;");

    assert_eq!(messages(&result), vec!["Unknown type 'itm'"]);
    assert_eq!(
        result.diagnostics[0].get_tip().to_string(),
        "did you mean `item`?"
    );
}

#[test]
fn test_void_variable() {
    assert_errors("void x;", &["Variable 'x' cannot be void"]);
}

#[test]
fn test_invalid_assignment_target() {
    assert_errors("1 = 2;", &["Invalid assignment target"]);
}

#[test]
fn test_compound_assignment() {
    assert_valid("string s; s += 1; float f; f *= 2; int i; i -= 1;");
    assert_errors("int i; i += 'a';", &["Cannot store string in i of type int"]);
}

#[test]
fn test_lexical_errors_are_reported_by_the_parser() {
    assert_errors("int x = 1 @ 2;", &["Invalid character '@'"]);
    assert_errors("string s = 'abc", &["No closing ' found"]);
}

#[test]
fn test_recovery_reports_every_error() {
    assert_errors(
        "int x = ; int y; y[0]; z;",
        &[
            "Expected expression, found ;",
            "Variable 'y' cannot be indexed",
            "Unknown variable 'z'",
        ],
    );
}

#[test]
fn test_recovery_inside_block() {
    assert_errors(
        "void f() { int x = ; x = 'a'; } int y;",
        &["Expected expression, found ;", "Cannot store string in x of type int"],
    );
}

#[test]
fn test_unterminated_block() {
    assert_errors("{ int x;", &["Expected }, found end of file"]);
}

#[test]
fn test_first_error_mode() {
    let file = Rc::new("test.ash".to_string());
    let tokens = tokenize("int x = ; int y; y[0]; z;", Rc::clone(&file));
    let (_, result) = parse_with_options(
        tokens,
        ParseOptions {
            file,
            mode: DiagnosticMode::FirstError,
        },
    );

    assert_eq!(messages(&result), vec!["Expected expression, found ;"]);
    assert!(result.tree.is_empty());
}

#[test]
fn test_garbage_terminates() {
    let result = parse_str("}}}] ( [ ;; else in . ,");
    assert!(!result.is_ok());

    let result = parse_str("record { int");
    assert_eq!(messages(&result), vec!["Expected identifier, found end of file"]);
}

#[test]
fn test_environment_carries_over() {
    let file = Rc::new("shell".to_string());
    let (parser, result) = parse(tokenize("record point { int x; }; int y;", Rc::clone(&file)), file);
    assert!(result.is_ok());

    let (registry, scopes) = parser.into_environment();
    let file = Rc::new("shell".to_string());
    let mut parser = Parser::with_environment(
        tokenize("point p; p.x = y;", Rc::clone(&file)),
        ParseOptions {
            file,
            ..ParseOptions::default()
        },
        registry,
        scopes,
    );
    let result = parser.parse_unit();
    assert!(result.is_ok(), "{:?}", messages(&result));
}

#[test]
fn test_tree_spans() {
    let result = assert_valid("int[5] x;\nx[0];");

    let declaration = &result.tree.body[0];
    assert_eq!(declaration.get_span().start.to_string(), "1-1");
    assert_eq!(declaration.get_span().end.to_string(), "1-9");

    let reference = &expression(&result, 1).expression;
    assert_eq!(reference.get_span().start.to_string(), "2-1");
    assert_eq!(reference.get_span().end.to_string(), "2-4");
}

#[test]
fn test_type_name_as_variable() {
    assert_errors(
        "int item;",
        &["Type name 'item' cannot be used as a variable name"],
    );
    assert_errors(
        "typedef int count; string count;",
        &["Type name 'count' cannot be used as a variable name"],
    );
    assert_errors(
        "void f(int slot) {}",
        &["Type name 'slot' cannot be used as a variable name"],
    );
    assert_errors(
        "int[string] m; foreach path in m {}",
        &["Type name 'path' cannot be used as a variable name"],
    );
    assert_valid("int items; string location_name; items = 1;");

    let result = parse_str("int item;");
    let error = &result.diagnostics[0];
    assert_eq!(error.get_category(), ErrorCategory::Declaration);
    assert_eq!(error.get_span().start.to_string(), "1-5");
    assert_eq!(error.get_span().end.to_string(), "1-8");
}

#[test]
fn test_nesting_within_limit() {
    let depth = 100;
    assert_valid(&format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth)));
    assert_valid(&format!("{}{}", "{".repeat(depth), "}".repeat(depth)));
    assert_valid(&format!("int x = {}1;", "-".repeat(depth)));
}

#[test]
fn test_nesting_past_limit_halts() {
    let depth = MAX_NESTING_DEPTH * 2;
    let source = format!(
        "int before; {}{} int after; after = \"text\";",
        "{".repeat(depth),
        "}".repeat(depth)
    );
    let result = parse_str(&source);

    assert_eq!(
        messages(&result),
        vec![format!("Too deeply nested (limit {})", MAX_NESTING_DEPTH)]
    );
    assert_eq!(result.diagnostics[0].get_category(), ErrorCategory::Syntax);
    assert_eq!(result.tree.body.len(), 1);
}

#[test]
fn test_nesting_limit_resets_between_statements() {
    let group = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_valid(&format!("int x = {}; int y = {}; x = {};", group, group, group));
}
