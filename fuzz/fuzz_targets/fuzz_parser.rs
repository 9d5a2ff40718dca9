#![no_main]

use libfuzzer_sys::fuzz_target;
use topo_core::ast::{self, Expr, Program, Stmt};
use topo_core::parser;

fuzz_target!(|data: &[u8]| {
    // Expression nesting recurses in the parser; keep inputs small enough
    // to stay within the default thread stack.
    if data.len() > 512 {
        return;
    }
    let source = String::from_utf8_lossy(data);

    match parser::parse(&source, "<fuzz>") {
        Ok(tree) => {
            check_program(&tree);
            // The debug dump must render any tree the parser accepts.
            let _ = ast::dump(&tree);
        }
        Err(failure) => {
            assert!(
                !failure.diagnostics.is_empty(),
                "failure must carry diagnostics"
            );
            for d in &failure.diagnostics {
                assert!(d.line >= 1, "diagnostic lines are 1-based");
                assert!(d.column >= 1, "diagnostic columns are 1-based");
            }
        }
    }
});

fn check_program(tree: &Program) {
    for stmt in &tree.body {
        check_stmt(stmt);
    }
}

fn check_stmt(stmt: &Stmt) {
    let (line, column) = stmt.position();
    assert!(line >= 1 && column >= 1, "statement positions are 1-based");

    match stmt {
        Stmt::VarDecl(s) => {
            if s.is_const {
                assert!(s.value.is_some(), "const always carries a value");
            }
            if let Some(value) = &s.value {
                check_expr(value);
            }
        }
        Stmt::FuncDecl(s) => check_stmt(&s.body),
        Stmt::If(s) => {
            check_expr(&s.condition);
            check_stmt(&s.then_branch);
            for branch in &s.elif_branches {
                check_expr(&branch.condition);
                check_stmt(&branch.body);
            }
            if let Some(else_branch) = &s.else_branch {
                check_stmt(else_branch);
            }
        }
        Stmt::While(s) => {
            check_expr(&s.condition);
            check_stmt(&s.body);
        }
        Stmt::For(s) => {
            check_expr(&s.iterable);
            check_stmt(&s.body);
        }
        Stmt::Return(s) => {
            if let Some(value) = &s.value {
                check_expr(value);
            }
        }
        Stmt::Break(_) | Stmt::Continue(_) => {}
        Stmt::FromImport(s) => {
            if s.import_all {
                assert!(s.imports.is_empty(), "wildcard imports carry no name list");
            }
        }
        Stmt::Expr(s) => check_expr(&s.expr),
        Stmt::Block(s) => {
            for stmt in &s.statements {
                check_stmt(stmt);
            }
        }
    }
}

fn check_expr(expr: &Expr) {
    let (line, column) = expr.position();
    assert!(line >= 1 && column >= 1, "expression positions are 1-based");

    match expr {
        Expr::Literal(_) | Expr::Ident(_) => {}
        Expr::Unary(e) => check_expr(&e.operand),
        Expr::Binary(e) => {
            check_expr(&e.left);
            check_expr(&e.right);
        }
        Expr::Assign(e) => {
            check_expr(&e.target);
            check_expr(&e.value);
        }
        Expr::Member(e) => check_expr(&e.object),
        Expr::Call(e) => {
            check_expr(&e.callee);
            for argument in &e.arguments {
                check_expr(argument);
            }
        }
        Expr::Array(e) => {
            for element in &e.elements {
                check_expr(element);
            }
        }
        Expr::Dict(e) => {
            assert_eq!(
                e.keys().len(),
                e.values().len(),
                "dictionary keys and values stay parallel"
            );
            assert_eq!(e.pair_count(), e.keys().len());
            for value in e.values() {
                check_expr(value);
            }
        }
    }
}
