//! Topo syntax tree node definitions.
//!
//! Every node struct carries the 1-based `line` and `column` of the token
//! that introduced it. Ordered constructs (block statements, `elif` chains,
//! call arguments, array elements, dictionary pairs) are owned vectors on
//! the relevant node, appended through small helpers while the parser is
//! building that node.
//!
//! # Structure
//!
//! - [`Program`] — root node.
//! - [`Stmt`] — statement nodes.
//! - [`Expr`] — expression nodes.
//! - [`LiteralValue`] — payload of a literal expression.
//! - [`dump`] — indented debug rendering of a tree.

// ─────────────────────────────────────────────────────────────────────────────
// Program
// ─────────────────────────────────────────────────────────────────────────────

/// The root node of a parsed Topo source file.
#[derive(Debug, Clone)]
pub struct Program {
    /// Top-level statements in source order.
    pub body: Vec<Stmt>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// A Topo statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `var name [= value]` or `const name = value`.
    VarDecl(VarDecl),
    /// `func name(params) body`.
    FuncDecl(FuncDecl),
    /// `if cond body [elif cond body]* [else body]`.
    If(IfStmt),
    /// `while cond body`.
    While(WhileStmt),
    /// `for name in iterable body`.
    For(ForStmt),
    /// `return [value]`.
    Return(ReturnStmt),
    /// `break`.
    Break(BreakStmt),
    /// `continue`.
    Continue(ContinueStmt),
    /// `from module using a, b` or `from module using *`.
    FromImport(FromImport),
    /// Expression statement (including bare assignments).
    Expr(ExprStmt),
    /// `{ statements }` block.
    Block(BlockStmt),
}

impl Stmt {
    /// Returns the source line/column of this statement.
    pub fn position(&self) -> (u32, u32) {
        match self {
            Stmt::VarDecl(s) => (s.line, s.column),
            Stmt::FuncDecl(s) => (s.line, s.column),
            Stmt::If(s) => (s.line, s.column),
            Stmt::While(s) => (s.line, s.column),
            Stmt::For(s) => (s.line, s.column),
            Stmt::Return(s) => (s.line, s.column),
            Stmt::Break(s) => (s.line, s.column),
            Stmt::Continue(s) => (s.line, s.column),
            Stmt::FromImport(s) => (s.line, s.column),
            Stmt::Expr(s) => (s.line, s.column),
            Stmt::Block(s) => (s.line, s.column),
        }
    }
}

/// `var name [= value]` or `const name = value`.
#[derive(Debug, Clone)]
pub struct VarDecl {
    /// The declared name.
    pub name: String,
    /// `true` for `const` declarations; a `const` always has a value.
    pub is_const: bool,
    /// The initializer, if present.
    pub value: Option<Expr>,
    /// 1-based source line of the declared name.
    pub line: u32,
    /// 1-based source column of the declared name.
    pub column: u32,
}

/// `func name(params) body` — function declaration.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    /// The function name.
    pub name: String,
    /// Parameter names in order.
    pub params: Vec<String>,
    /// Function body (block or single statement).
    pub body: Box<Stmt>,
    /// 1-based source line of the function name.
    pub line: u32,
    /// 1-based source column of the function name.
    pub column: u32,
}

/// `if cond body [elif cond body]* [else body]`.
#[derive(Debug, Clone)]
pub struct IfStmt {
    /// The `if` condition.
    pub condition: Expr,
    /// The taken branch.
    pub then_branch: Box<Stmt>,
    /// `elif` branches in source order.
    pub elif_branches: Vec<ElifBranch>,
    /// The `else` branch, if present.
    pub else_branch: Option<Box<Stmt>>,
    /// 1-based source line of the `if` keyword.
    pub line: u32,
    /// 1-based source column of the `if` keyword.
    pub column: u32,
}

impl IfStmt {
    /// Append an `elif` branch, preserving source order.
    pub fn push_elif(&mut self, branch: ElifBranch) {
        self.elif_branches.push(branch);
    }
}

/// One `elif cond body` clause attached to an [`IfStmt`].
#[derive(Debug, Clone)]
pub struct ElifBranch {
    /// The branch condition.
    pub condition: Expr,
    /// The branch body.
    pub body: Stmt,
    /// 1-based source line of the `elif` keyword.
    pub line: u32,
    /// 1-based source column of the `elif` keyword.
    pub column: u32,
}

/// `while cond body`.
#[derive(Debug, Clone)]
pub struct WhileStmt {
    /// Loop condition.
    pub condition: Expr,
    /// Loop body.
    pub body: Box<Stmt>,
    /// 1-based source line of the `while` keyword.
    pub line: u32,
    /// 1-based source column of the `while` keyword.
    pub column: u32,
}

/// `for name in iterable body`.
#[derive(Debug, Clone)]
pub struct ForStmt {
    /// The iterator variable name.
    pub iterator: String,
    /// The iterated expression.
    pub iterable: Expr,
    /// Loop body.
    pub body: Box<Stmt>,
    /// 1-based source line of the `for` keyword.
    pub line: u32,
    /// 1-based source column of the `for` keyword.
    pub column: u32,
}

/// `return [value]`.
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    /// The returned value; `None` at a newline, `}`, or end of input.
    pub value: Option<Expr>,
    /// 1-based source line of the `return` keyword.
    pub line: u32,
    /// 1-based source column of the `return` keyword.
    pub column: u32,
}

/// `break`.
#[derive(Debug, Clone)]
pub struct BreakStmt {
    /// 1-based source line of the `break` keyword.
    pub line: u32,
    /// 1-based source column of the `break` keyword.
    pub column: u32,
}

/// `continue`.
#[derive(Debug, Clone)]
pub struct ContinueStmt {
    /// 1-based source line of the `continue` keyword.
    pub line: u32,
    /// 1-based source column of the `continue` keyword.
    pub column: u32,
}

/// `from module using a, b, c` or `from module using *`.
#[derive(Debug, Clone)]
pub struct FromImport {
    /// The module name.
    pub module: String,
    /// Imported names in source order; empty for a wildcard import.
    pub imports: Vec<String>,
    /// `true` for `using *`.
    pub import_all: bool,
    /// 1-based source line of the `from` keyword.
    pub line: u32,
    /// 1-based source column of the `from` keyword.
    pub column: u32,
}

/// Expression statement (including bare assignments).
#[derive(Debug, Clone)]
pub struct ExprStmt {
    /// The expression.
    pub expr: Expr,
    /// 1-based source line of the expression start.
    pub line: u32,
    /// 1-based source column of the expression start.
    pub column: u32,
}

/// `{ statements }` block.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    /// Statements in the block, in source order.
    pub statements: Vec<Stmt>,
    /// 1-based source line of the opening `{`.
    pub line: u32,
    /// 1-based source column of the opening `{`.
    pub column: u32,
}

impl BlockStmt {
    /// Append a statement to the block.
    pub fn push(&mut self, stmt: Stmt) {
        self.statements.push(stmt);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

/// A Topo expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal value (`10`, `3.14`, `"s"`, `true`, `null`).
    Literal(LiteralExpr),
    /// A plain identifier.
    Ident(IdentExpr),
    /// Unary prefix operator (`-`, `!`, `not`).
    Unary(Box<UnaryExpr>),
    /// Binary infix operator.
    Binary(Box<BinaryExpr>),
    /// `target = value` assignment.
    Assign(Box<AssignExpr>),
    /// `object.property` member access.
    Member(Box<MemberExpr>),
    /// `callee(arguments)` function call.
    Call(Box<CallExpr>),
    /// `[elements]` array literal.
    Array(Box<ArrayExpr>),
    /// `{key: value, ...}` dictionary literal.
    Dict(Box<DictExpr>),
}

impl Expr {
    /// Returns the source line/column of this expression.
    pub fn position(&self) -> (u32, u32) {
        match self {
            Expr::Literal(e) => (e.line, e.column),
            Expr::Ident(e) => (e.line, e.column),
            Expr::Unary(e) => (e.line, e.column),
            Expr::Binary(e) => (e.line, e.column),
            Expr::Assign(e) => (e.line, e.column),
            Expr::Member(e) => (e.line, e.column),
            Expr::Call(e) => (e.line, e.column),
            Expr::Array(e) => (e.line, e.column),
            Expr::Dict(e) => (e.line, e.column),
        }
    }
}

/// The decoded payload of a literal expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Integer literal.
    Int(i64),
    /// Floating-point literal.
    Float(f64),
    /// String literal (escapes already decoded).
    Str(String),
    /// `true` / `false`.
    Bool(bool),
    /// `null`.
    Null,
}

/// A literal value in expression position.
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    /// The decoded value.
    pub value: LiteralValue,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column.
    pub column: u32,
}

/// A plain identifier in expression position.
#[derive(Debug, Clone)]
pub struct IdentExpr {
    /// The identifier text.
    pub name: String,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column.
    pub column: u32,
}

/// Unary prefix expression: `op operand`.
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    /// The operator as spelled in the source (`-`, `!`, or `not`).
    pub op: String,
    /// The operand.
    pub operand: Box<Expr>,
    /// 1-based source line of the operator.
    pub line: u32,
    /// 1-based source column of the operator.
    pub column: u32,
}

/// Binary infix expression: `left op right`.
///
/// The operator keeps its source spelling, so `&&` and `and` stay
/// distinguishable.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    /// The operator as spelled in the source.
    pub op: String,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
    /// 1-based source line of the operator.
    pub line: u32,
    /// 1-based source column of the operator.
    pub column: u32,
}

/// Assignment expression: `target = value`.
#[derive(Debug, Clone)]
pub struct AssignExpr {
    /// The assignment target.
    pub target: Box<Expr>,
    /// The assigned value.
    pub value: Box<Expr>,
    /// 1-based source line of the `=` operator.
    pub line: u32,
    /// 1-based source column of the `=` operator.
    pub column: u32,
}

/// Member access: `object.property`.
#[derive(Debug, Clone)]
pub struct MemberExpr {
    /// The accessed object.
    pub object: Box<Expr>,
    /// The member name.
    pub property: String,
    /// 1-based source line of the member name.
    pub line: u32,
    /// 1-based source column of the member name.
    pub column: u32,
}

/// Function call: `callee(arguments)`.
#[derive(Debug, Clone)]
pub struct CallExpr {
    /// The called expression.
    pub callee: Box<Expr>,
    /// Arguments in source order.
    pub arguments: Vec<Expr>,
    /// 1-based source line of the opening `(`.
    pub line: u32,
    /// 1-based source column of the opening `(`.
    pub column: u32,
}

impl CallExpr {
    /// Append a call argument, preserving source order.
    pub fn push_argument(&mut self, argument: Expr) {
        self.arguments.push(argument);
    }
}

/// Array literal: `[elements]`.
#[derive(Debug, Clone)]
pub struct ArrayExpr {
    /// Elements in source order.
    pub elements: Vec<Expr>,
    /// 1-based source line of the opening `[`.
    pub line: u32,
    /// 1-based source column of the opening `[`.
    pub column: u32,
}

impl ArrayExpr {
    /// Append an element, preserving source order.
    pub fn push_element(&mut self, element: Expr) {
        self.elements.push(element);
    }
}

/// Dictionary literal: `{key: value, ...}`.
///
/// Keys and values are parallel sequences and always have equal length;
/// [`DictExpr::push_pair`] is the only way to extend them, so they cannot
/// drift apart.
#[derive(Debug, Clone)]
pub struct DictExpr {
    /// Keys in source order. String and identifier keys are both stored as
    /// their text.
    keys: Vec<String>,
    /// Values in source order, parallel to `keys`.
    values: Vec<Expr>,
    /// 1-based source line of the opening `{`.
    pub line: u32,
    /// 1-based source column of the opening `{`.
    pub column: u32,
}

impl DictExpr {
    /// Create an empty dictionary literal.
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            line,
            column,
        }
    }

    /// Append a key/value pair, keeping both sequences in step.
    pub fn push_pair(&mut self, key: String, value: Expr) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Number of key/value pairs.
    pub fn pair_count(&self) -> usize {
        self.keys.len()
    }

    /// Keys in source order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Values in source order, parallel to [`DictExpr::keys`].
    pub fn values(&self) -> &[Expr] {
        &self.values
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Debug dump
// ─────────────────────────────────────────────────────────────────────────────

/// Render a tree as indented text, one node per line, for humans and tests.
pub fn dump(program: &Program) -> String {
    let mut out = String::new();
    push_line(&mut out, 0, "PROGRAM:");
    for stmt in &program.body {
        dump_stmt(&mut out, stmt, 1);
    }
    out
}

fn push_line(out: &mut String, indent: usize, text: &str) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

fn dump_stmt(out: &mut String, stmt: &Stmt, indent: usize) {
    match stmt {
        Stmt::VarDecl(s) => {
            let kind = if s.is_const { "CONST_DECL" } else { "VAR_DECL" };
            push_line(out, indent, &format!("{} {}", kind, s.name));
            if let Some(value) = &s.value {
                push_line(out, indent + 1, "value:");
                dump_expr(out, value, indent + 2);
            }
        }
        Stmt::FuncDecl(s) => {
            push_line(out, indent, &format!("FUNC_DECL {}", s.name));
            if !s.params.is_empty() {
                push_line(out, indent + 1, &format!("params: {}", s.params.join(", ")));
            }
            push_line(out, indent + 1, "body:");
            dump_stmt(out, &s.body, indent + 2);
        }
        Stmt::If(s) => {
            push_line(out, indent, "IF_STMT:");
            push_line(out, indent + 1, "condition:");
            dump_expr(out, &s.condition, indent + 2);
            push_line(out, indent + 1, "then:");
            dump_stmt(out, &s.then_branch, indent + 2);
            for branch in &s.elif_branches {
                push_line(out, indent + 1, "ELIF_STMT:");
                push_line(out, indent + 2, "condition:");
                dump_expr(out, &branch.condition, indent + 3);
                push_line(out, indent + 2, "then:");
                dump_stmt(out, &branch.body, indent + 3);
            }
            if let Some(else_branch) = &s.else_branch {
                push_line(out, indent + 1, "else:");
                dump_stmt(out, else_branch, indent + 2);
            }
        }
        Stmt::While(s) => {
            push_line(out, indent, "WHILE_STMT:");
            push_line(out, indent + 1, "condition:");
            dump_expr(out, &s.condition, indent + 2);
            push_line(out, indent + 1, "body:");
            dump_stmt(out, &s.body, indent + 2);
        }
        Stmt::For(s) => {
            push_line(out, indent, &format!("FOR_STMT {} in:", s.iterator));
            push_line(out, indent + 1, "iterable:");
            dump_expr(out, &s.iterable, indent + 2);
            push_line(out, indent + 1, "body:");
            dump_stmt(out, &s.body, indent + 2);
        }
        Stmt::Return(s) => {
            push_line(out, indent, "RETURN_STMT");
            if let Some(value) = &s.value {
                push_line(out, indent + 1, "value:");
                dump_expr(out, value, indent + 2);
            }
        }
        Stmt::Break(_) => push_line(out, indent, "BREAK_STMT"),
        Stmt::Continue(_) => push_line(out, indent, "CONTINUE_STMT"),
        Stmt::FromImport(s) => {
            if s.import_all {
                push_line(out, indent, &format!("FROM_IMPORT from {} import *", s.module));
            } else {
                push_line(out, indent, &format!("FROM_IMPORT from {} import:", s.module));
                for name in &s.imports {
                    push_line(out, indent + 1, name);
                }
            }
        }
        Stmt::Expr(s) => {
            push_line(out, indent, "EXPR_STMT:");
            dump_expr(out, &s.expr, indent + 1);
        }
        Stmt::Block(s) => {
            push_line(
                out,
                indent,
                &format!("BLOCK ({} statements):", s.statements.len()),
            );
            for stmt in &s.statements {
                dump_stmt(out, stmt, indent + 1);
            }
        }
    }
}

fn dump_expr(out: &mut String, expr: &Expr, indent: usize) {
    match expr {
        Expr::Literal(e) => {
            let text = match &e.value {
                LiteralValue::Int(v) => format!("LITERAL int: {v}"),
                LiteralValue::Float(v) => format!("LITERAL float: {v}"),
                LiteralValue::Str(v) => format!("LITERAL string: \"{v}\""),
                LiteralValue::Bool(v) => format!("LITERAL bool: {v}"),
                LiteralValue::Null => "LITERAL null".to_string(),
            };
            push_line(out, indent, &text);
        }
        Expr::Ident(e) => push_line(out, indent, &format!("IDENTIFIER {}", e.name)),
        Expr::Unary(e) => {
            push_line(out, indent, &format!("UNARY_EXPR {}", e.op));
            push_line(out, indent + 1, "operand:");
            dump_expr(out, &e.operand, indent + 2);
        }
        Expr::Binary(e) => {
            push_line(out, indent, &format!("BINARY_EXPR {}", e.op));
            push_line(out, indent + 1, "left:");
            dump_expr(out, &e.left, indent + 2);
            push_line(out, indent + 1, "right:");
            dump_expr(out, &e.right, indent + 2);
        }
        Expr::Assign(e) => {
            push_line(out, indent, "ASSIGNMENT:");
            push_line(out, indent + 1, "target:");
            dump_expr(out, &e.target, indent + 2);
            push_line(out, indent + 1, "value:");
            dump_expr(out, &e.value, indent + 2);
        }
        Expr::Member(e) => {
            push_line(out, indent, &format!("MEMBER_ACCESS {}:", e.property));
            push_line(out, indent + 1, "object:");
            dump_expr(out, &e.object, indent + 2);
        }
        Expr::Call(e) => {
            push_line(
                out,
                indent,
                &format!("CALL_EXPR ({} args):", e.arguments.len()),
            );
            push_line(out, indent + 1, "callee:");
            dump_expr(out, &e.callee, indent + 2);
            if !e.arguments.is_empty() {
                push_line(out, indent + 1, "arguments:");
                for argument in &e.arguments {
                    dump_expr(out, argument, indent + 2);
                }
            }
        }
        Expr::Array(e) => {
            push_line(
                out,
                indent,
                &format!("ARRAY_LITERAL ({} elements):", e.elements.len()),
            );
            for element in &e.elements {
                dump_expr(out, element, indent + 1);
            }
        }
        Expr::Dict(e) => {
            push_line(
                out,
                indent,
                &format!("DICT_LITERAL ({} pairs):", e.pair_count()),
            );
            for (key, value) in e.keys().iter().zip(e.values()) {
                push_line(out, indent + 1, &format!("\"{key}\":"));
                dump_expr(out, value, indent + 2);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
