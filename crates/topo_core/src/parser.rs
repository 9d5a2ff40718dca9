//! Topo recursive-descent parser.
//!
//! Pulls tokens from the [`Scanner`] and builds the [`crate::ast`] tree.
//! Expressions are parsed by precedence climbing, tightest binding first:
//! primary, unary, multiplicative, additive, comparison, logical AND,
//! logical OR, assignment. Assignment is the only right-associative level.
//!
//! A failed statement is recovered at line granularity so a single pass can
//! report several diagnostics, but any recorded error (lexical or syntax)
//! makes the whole parse fail. See [`parse`] for the public entry point.

use crate::ast::{
    ArrayExpr, AssignExpr, BinaryExpr, BlockStmt, BreakStmt, CallExpr, ContinueStmt, DictExpr,
    ElifBranch, Expr, ExprStmt, ForStmt, FromImport, FuncDecl, IdentExpr, IfStmt, LiteralExpr,
    LiteralValue, MemberExpr, Program, ReturnStmt, Stmt, UnaryExpr, VarDecl, WhileStmt,
};
use crate::error::{Diagnostic, ParseFailure, TopoResult};
use crate::scanner::{Scanner, Token, TokenKind, TokenValue};

// ─────────────────────────────────────────────────────────────────────────────
// Public entry point
// ─────────────────────────────────────────────────────────────────────────────

/// Parse `source` into a syntax tree.
///
/// `label` is opaque to the parser and only names the source in a failure
/// report (a file name, or something like `"<inline>"`).
///
/// The parse succeeds only when zero diagnostics were recorded across the
/// whole run. On failure the partially built tree is dropped and the caller
/// receives the accumulated diagnostics, ordered by source position.
pub fn parse(source: &str, label: &str) -> TopoResult<Program> {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    let diagnostics = parser.into_diagnostics();

    if diagnostics.is_empty() {
        Ok(program)
    } else {
        Err(ParseFailure {
            label: label.to_string(),
            diagnostics,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Recursive-descent parser over a [`Scanner`] token stream.
///
/// The only long-lived state is the current lookahead token and the
/// diagnostics recorded so far; everything else lives on the call stack.
/// Productions return `None` after recording a diagnostic, and the
/// statement loops skip to the next line before trying again.
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    /// The current lookahead token.
    current: Token,
    /// Syntax diagnostics recorded so far.
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    /// Create a parser over `source`, primed with its first token.
    pub fn new(source: &'src str) -> Self {
        let mut scanner = Scanner::new(source);
        let current = scanner.current().clone();
        Self {
            scanner,
            current,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole token stream into a [`Program`].
    ///
    /// The tree is returned regardless of errors; use
    /// [`Parser::into_diagnostics`] (or the [`parse`] wrapper) to decide
    /// whether it counts as a successful parse.
    pub fn parse_program(&mut self) -> Program {
        let mut body = Vec::new();

        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Newline) {
                self.advance();
                continue;
            }

            match self.parse_statement() {
                Some(stmt) => body.push(stmt),
                None => {
                    self.recover_to_line_end();
                    continue;
                }
            }

            // Optional semicolon, then at most one newline.
            self.match_value(TokenKind::Punctuation, ";");
            if self.check(TokenKind::Newline) {
                self.advance();
            }
        }

        Program { body }
    }

    /// Consume the parser and return every recorded diagnostic, lexical and
    /// syntax alike, ordered by source position. Lexical sorts before
    /// syntax on position ties.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        let mut diagnostics = self.scanner.into_diagnostics();
        diagnostics.extend(self.diagnostics);
        diagnostics.sort_by_key(|d| (d.line, d.column, d.severity));
        diagnostics
    }

    // ── Token helpers ───────────────────────────────────────────────────────

    /// Record a syntax diagnostic at the current token.
    fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::syntax(
            self.current.line,
            self.current.column,
            message,
        ));
    }

    /// Move to the next token.
    fn advance(&mut self) {
        self.scanner.skip();
        self.current = self.scanner.current().clone();
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn check_value(&self, kind: TokenKind, value: &str) -> bool {
        self.current.kind == kind && self.current.text() == Some(value)
    }

    /// Consume the current token if it matches kind and payload text.
    fn match_value(&mut self, kind: TokenKind, value: &str) -> bool {
        if self.check_value(kind, value) {
            self.advance();
            return true;
        }
        false
    }

    /// Consume the current token if it matches the kind.
    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    /// Require kind and payload text: consumed on success, `error_msg`
    /// recorded (token left in place) on failure.
    fn expect_value(&mut self, kind: TokenKind, value: &str, error_msg: &str) -> bool {
        if self.check_value(kind, value) {
            self.advance();
            return true;
        }
        self.error(error_msg);
        false
    }

    /// Require a token kind: consumed on success, `error_msg` recorded on
    /// failure.
    fn expect_kind(&mut self, kind: TokenKind, error_msg: &str) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        self.error(error_msg);
        false
    }

    /// Payload text of the current token, empty for payload-free kinds.
    fn current_text(&self) -> String {
        self.current.text().unwrap_or("").to_string()
    }

    /// Discard tokens up to the next line break or end of input.
    fn recover_to_line_end(&mut self) {
        while !self.check(TokenKind::Newline) && !self.check(TokenKind::Eof) {
            self.advance();
        }
    }

    // ── Statements ──────────────────────────────────────────────────────────

    /// Parse one statement, dispatching on the introducing token.
    fn parse_statement(&mut self) -> Option<Stmt> {
        if self.match_kind(TokenKind::Var) {
            return self.parse_var_decl(false);
        }
        if self.match_kind(TokenKind::Const) {
            return self.parse_var_decl(true);
        }
        if self.check(TokenKind::Return) {
            return self.parse_return();
        }
        if self.check(TokenKind::Break) {
            let token = self.current.clone();
            self.advance();
            return Some(Stmt::Break(BreakStmt {
                line: token.line,
                column: token.column,
            }));
        }
        if self.check(TokenKind::Continue) {
            let token = self.current.clone();
            self.advance();
            return Some(Stmt::Continue(ContinueStmt {
                line: token.line,
                column: token.column,
            }));
        }
        if self.check(TokenKind::If) {
            return self.parse_if();
        }
        if self.check(TokenKind::While) {
            return self.parse_while();
        }
        if self.check(TokenKind::For) {
            return self.parse_for();
        }
        if self.check(TokenKind::From) {
            return self.parse_from_import();
        }
        if self.match_kind(TokenKind::Func) {
            return self.parse_func_decl();
        }

        // Expression statement, including bare assignments.
        let token = self.current.clone();
        if let Some(expr) = self.parse_expression() {
            return Some(Stmt::Expr(ExprStmt {
                expr,
                line: token.line,
                column: token.column,
            }));
        }

        self.error("Expected statement");
        None
    }

    /// `var name [= value]` / `const name = value` (keyword already
    /// consumed). The node position is the name token's.
    fn parse_var_decl(&mut self, is_const: bool) -> Option<Stmt> {
        if !self.check(TokenKind::Identifier) {
            if is_const {
                self.error("Expected constant name after 'const'");
            } else {
                self.error("Expected variable name after 'var'");
            }
            return None;
        }

        let name_token = self.current.clone();
        self.advance();

        let mut value = None;
        if is_const {
            if !self.expect_value(TokenKind::Operator, "=", "Expected '=' after constant name") {
                return None;
            }
            match self.parse_expression() {
                Some(expr) => value = Some(expr),
                None => {
                    self.error("Expected expression after '='");
                    return None;
                }
            }
        } else if self.match_value(TokenKind::Operator, "=") {
            match self.parse_expression() {
                Some(expr) => value = Some(expr),
                None => {
                    self.error("Expected expression after '='");
                    return None;
                }
            }
        }

        Some(Stmt::VarDecl(VarDecl {
            name: name_token.text().unwrap_or("").to_string(),
            is_const,
            value,
            line: name_token.line,
            column: name_token.column,
        }))
    }

    /// `return [value]`; the value is omitted at a newline, `}`, or end of
    /// input.
    fn parse_return(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        self.advance();

        let mut value = None;
        if !(self.check(TokenKind::Newline)
            || self.check(TokenKind::Eof)
            || self.check_value(TokenKind::Punctuation, "}"))
        {
            value = self.parse_expression();
        }

        Some(Stmt::Return(ReturnStmt {
            value,
            line: token.line,
            column: token.column,
        }))
    }

    /// `if cond body [elif cond body]* [else body]`.
    fn parse_if(&mut self) -> Option<Stmt> {
        let if_token = self.current.clone();
        self.advance();

        let condition = self.parse_condition("Expected condition after 'if'")?;
        let then_branch = self.parse_body("Expected statement after 'if' condition")?;

        let mut node = IfStmt {
            condition,
            then_branch: Box::new(then_branch),
            elif_branches: Vec::new(),
            else_branch: None,
            line: if_token.line,
            column: if_token.column,
        };

        while self.check(TokenKind::Elif) {
            let elif_token = self.current.clone();
            self.advance();

            let Some(condition) = self.parse_condition("Expected condition after 'elif'") else {
                break;
            };
            let Some(body) = self.parse_body("Expected statement after 'elif' condition") else {
                break;
            };

            node.push_elif(ElifBranch {
                condition,
                body,
                line: elif_token.line,
                column: elif_token.column,
            });
        }

        if self.match_kind(TokenKind::Else) {
            self.match_value(TokenKind::Punctuation, ":");
            let body = self.parse_body("Expected statement after 'else'")?;
            node.else_branch = Some(Box::new(body));
        }

        Some(Stmt::If(node))
    }

    /// `while cond body`.
    fn parse_while(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        self.advance();

        let condition = self.parse_condition("Expected condition after 'while'")?;
        let body = self.parse_body("Expected statement after 'while' condition")?;

        Some(Stmt::While(WhileStmt {
            condition,
            body: Box::new(body),
            line: token.line,
            column: token.column,
        }))
    }

    /// `for name in iterable body`.
    fn parse_for(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        self.advance();

        if !self.check(TokenKind::Identifier) {
            self.error("Expected iterator variable after 'for'");
            return None;
        }
        let iterator_token = self.current.clone();
        self.advance();

        if !self.expect_kind(TokenKind::In, "Expected 'in' after iterator variable") {
            return None;
        }

        let Some(iterable) = self.parse_expression() else {
            self.error("Expected iterable expression after 'in'");
            return None;
        };

        self.match_value(TokenKind::Punctuation, ":");

        let body = self.parse_body("Expected statement after 'for' header")?;

        Some(Stmt::For(ForStmt {
            iterator: iterator_token.text().unwrap_or("").to_string(),
            iterable,
            body: Box::new(body),
            line: token.line,
            column: token.column,
        }))
    }

    /// `from module using a, b, c` or `from module using *`.
    fn parse_from_import(&mut self) -> Option<Stmt> {
        let token = self.current.clone();
        self.advance();

        if !self.check(TokenKind::Identifier) {
            self.error("Expected module name after 'from'");
            return None;
        }
        let module_token = self.current.clone();
        self.advance();

        if !self.expect_kind(TokenKind::Using, "Expected 'using' after module name") {
            return None;
        }

        let mut imports = Vec::new();
        let mut import_all = false;

        if self.match_value(TokenKind::Operator, "*") {
            import_all = true;
        } else {
            loop {
                if !self.check(TokenKind::Identifier) {
                    self.error("Expected identifier in import list");
                    break;
                }
                imports.push(self.current_text());
                self.advance();

                if self.match_value(TokenKind::Punctuation, ",") {
                    continue;
                }
                break;
            }
        }

        Some(Stmt::FromImport(FromImport {
            module: module_token.text().unwrap_or("").to_string(),
            imports,
            import_all,
            line: token.line,
            column: token.column,
        }))
    }

    /// `func name(params) body` (keyword already consumed). The node
    /// position is the name token's.
    fn parse_func_decl(&mut self) -> Option<Stmt> {
        if !self.check(TokenKind::Identifier) {
            self.error("Expected function name after 'func'");
            return None;
        }
        let name_token = self.current.clone();
        self.advance();

        if !self.expect_value(TokenKind::Punctuation, "(", "Expected '(' after function name") {
            return None;
        }

        let mut params = Vec::new();
        if !self.match_value(TokenKind::Punctuation, ")") {
            loop {
                if !self.check(TokenKind::Identifier) {
                    self.error("Expected parameter name");
                    return None;
                }
                params.push(self.current_text());
                self.advance();

                if self.match_value(TokenKind::Punctuation, ",") {
                    continue;
                }
                if self.match_value(TokenKind::Punctuation, ")") {
                    break;
                }
                self.error("Expected ',' or ')' in parameter list");
                return None;
            }
        }

        self.match_value(TokenKind::Punctuation, ":");

        let body = self.parse_body("Expected statement after function parameters")?;

        Some(Stmt::FuncDecl(FuncDecl {
            name: name_token.text().unwrap_or("").to_string(),
            params,
            body: Box::new(body),
            line: name_token.line,
            column: name_token.column,
        }))
    }

    /// Optionally parenthesized condition after `if`/`elif`/`while`, plus
    /// the optional `:` that may follow it.
    fn parse_condition(&mut self, missing_msg: &str) -> Option<Expr> {
        let has_paren = self.match_value(TokenKind::Punctuation, "(");

        let Some(condition) = self.parse_expression() else {
            self.error(missing_msg);
            return None;
        };

        if has_paren && !self.expect_value(TokenKind::Punctuation, ")", "Expected ')' after condition")
        {
            return None;
        }

        self.match_value(TokenKind::Punctuation, ":");
        Some(condition)
    }

    /// A statement body: either a brace-delimited block or a single
    /// statement.
    fn parse_body(&mut self, missing_msg: &str) -> Option<Stmt> {
        if self.check_value(TokenKind::Punctuation, "{") {
            let brace = self.current.clone();
            self.advance();

            let block = self.parse_block(brace.line, brace.column);
            if !self.expect_value(TokenKind::Punctuation, "}", "Expected '}' after block") {
                return None;
            }
            return Some(Stmt::Block(block));
        }

        let stmt = self.parse_statement();
        if stmt.is_none() {
            self.error(missing_msg);
        }
        stmt
    }

    /// Statements until `}`, which is left for the caller to consume.
    /// Failed statements are skipped to the end of their line.
    fn parse_block(&mut self, line: u32, column: u32) -> BlockStmt {
        let mut block = BlockStmt {
            statements: Vec::new(),
            line,
            column,
        };

        while !self.check_value(TokenKind::Punctuation, "}") {
            if self.check(TokenKind::Newline) {
                self.advance();
                continue;
            }
            if self.check(TokenKind::Eof) {
                self.error("Unexpected end of file in block");
                break;
            }

            match self.parse_statement() {
                Some(stmt) => block.push(stmt),
                None => {
                    self.recover_to_line_end();
                    continue;
                }
            }

            self.match_value(TokenKind::Punctuation, ";");
            if self.check(TokenKind::Newline) {
                self.advance();
            }
        }

        block
    }

    // ── Expressions ─────────────────────────────────────────────────────────

    /// Entry point of the expression grammar.
    fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    /// `target = value`, right-associative. Compound forms (`+=` …) are
    /// recognized and deliberately rejected.
    fn parse_assignment(&mut self) -> Option<Expr> {
        let left = self.parse_logical_or()?;

        let is_assign = self.check(TokenKind::Operator)
            && matches!(
                self.current.text(),
                Some("=" | "+=" | "-=" | "*=" | "/=" | "%=")
            );
        if !is_assign {
            return Some(left);
        }

        let op = self.current_text();
        let (line, column) = (self.current.line, self.current.column);
        self.advance();

        if op != "=" {
            self.error("Compound assignment not fully implemented yet");
            return None;
        }

        let Some(value) = self.parse_assignment() else {
            self.error("Expected right side of assignment");
            return None;
        };

        Some(Expr::Assign(Box::new(AssignExpr {
            target: Box::new(left),
            value: Box::new(value),
            line,
            column,
        })))
    }

    /// `||` / `or`, left-associative.
    fn parse_logical_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_logical_and()?;

        loop {
            let op = if self.check(TokenKind::Or) {
                "or".to_string()
            } else if self.check_value(TokenKind::Operator, "||") {
                "||".to_string()
            } else {
                break;
            };
            let (line, column) = (self.current.line, self.current.column);
            self.advance();

            let Some(right) = self.parse_logical_and() else {
                self.error("Expected right operand for logical OR");
                return None;
            };
            left = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line,
                column,
            }));
        }

        Some(left)
    }

    /// `&&` / `and`, left-associative.
    fn parse_logical_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_comparison()?;

        loop {
            let op = if self.check(TokenKind::And) {
                "and".to_string()
            } else if self.check_value(TokenKind::Operator, "&&") {
                "&&".to_string()
            } else {
                break;
            };
            let (line, column) = (self.current.line, self.current.column);
            self.advance();

            let Some(right) = self.parse_comparison() else {
                self.error("Expected right operand for logical AND");
                return None;
            };
            left = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line,
                column,
            }));
        }

        Some(left)
    }

    /// `< > <= >= == !=`, left-associative.
    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut left = self.parse_additive()?;

        while let Some(op) = self.binary_op(&["<", ">", "<=", ">=", "==", "!="]) {
            let (line, column) = (self.current.line, self.current.column);
            self.advance();

            let Some(right) = self.parse_additive() else {
                self.error("Expected right operand for comparison operator");
                return None;
            };
            left = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line,
                column,
            }));
        }

        Some(left)
    }

    /// `+ -`, left-associative.
    fn parse_additive(&mut self) -> Option<Expr> {
        let mut left = self.parse_multiplicative()?;

        while let Some(op) = self.binary_op(&["+", "-"]) {
            let (line, column) = (self.current.line, self.current.column);
            self.advance();

            let Some(right) = self.parse_multiplicative() else {
                self.error("Expected right operand for binary operator");
                return None;
            };
            left = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line,
                column,
            }));
        }

        Some(left)
    }

    /// `* / %`, left-associative.
    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.binary_op(&["*", "/", "%"]) {
            let (line, column) = (self.current.line, self.current.column);
            self.advance();

            let Some(right) = self.parse_unary() else {
                self.error("Expected right operand for binary operator");
                return None;
            };
            left = Expr::Binary(Box::new(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line,
                column,
            }));
        }

        Some(left)
    }

    /// The current token's operator spelling when it is one of `ops`.
    fn binary_op(&self, ops: &[&str]) -> Option<String> {
        if self.current.kind != TokenKind::Operator {
            return None;
        }
        let text = self.current.text()?;
        ops.contains(&text).then(|| text.to_string())
    }

    /// Unary prefix operators `-`, `!`, `not`; right-nested.
    fn parse_unary(&mut self) -> Option<Expr> {
        let op = if self.check_value(TokenKind::Operator, "-") {
            Some("-")
        } else if self.check_value(TokenKind::Operator, "!") {
            Some("!")
        } else if self.check(TokenKind::Not) {
            Some("not")
        } else {
            None
        };

        if let Some(op) = op {
            let (line, column) = (self.current.line, self.current.column);
            self.advance();

            let Some(operand) = self.parse_unary() else {
                self.error("Expected operand after unary operator");
                return None;
            };
            return Some(Expr::Unary(Box::new(UnaryExpr {
                op: op.to_string(),
                operand: Box::new(operand),
                line,
                column,
            })));
        }

        self.parse_primary()
    }

    /// Highest-precedence forms: literals, identifiers with at most one
    /// member-access or call suffix, array and dictionary literals, and
    /// parenthesized expressions.
    ///
    /// A member access cannot itself be called and a call result cannot be
    /// further accessed; `a.b.c` and `f()()` are not part of the grammar.
    fn parse_primary(&mut self) -> Option<Expr> {
        if let Some(literal) = self.parse_literal() {
            return Some(literal);
        }

        if self.check(TokenKind::Identifier) {
            let token = self.current.clone();
            self.advance();
            let node = Expr::Ident(IdentExpr {
                name: token.text().unwrap_or("").to_string(),
                line: token.line,
                column: token.column,
            });

            // One member-access suffix.
            if self.match_value(TokenKind::Punctuation, ".") {
                if !self.check(TokenKind::Identifier) {
                    self.error("Expected member name after '.'");
                    return None;
                }
                let member_token = self.current.clone();
                self.advance();

                return Some(Expr::Member(Box::new(MemberExpr {
                    object: Box::new(node),
                    property: member_token.text().unwrap_or("").to_string(),
                    line: member_token.line,
                    column: member_token.column,
                })));
            }

            // One call suffix.
            if self.check_value(TokenKind::Punctuation, "(") {
                let paren = self.current.clone();
                self.advance();

                let mut call = CallExpr {
                    callee: Box::new(node),
                    arguments: Vec::new(),
                    line: paren.line,
                    column: paren.column,
                };

                if !self.match_value(TokenKind::Punctuation, ")") {
                    loop {
                        let Some(argument) = self.parse_expression() else {
                            self.error("Expected expression in function call");
                            break;
                        };
                        call.push_argument(argument);

                        if self.match_value(TokenKind::Punctuation, ",") {
                            continue;
                        }
                        if self.match_value(TokenKind::Punctuation, ")") {
                            break;
                        }
                        self.error("Expected ',' or ')' in function call");
                        break;
                    }
                }

                return Some(Expr::Call(Box::new(call)));
            }

            return Some(node);
        }

        if self.check_value(TokenKind::Punctuation, "[") {
            return self.parse_array_literal();
        }

        if self.check_value(TokenKind::Punctuation, "{") {
            return self.parse_dict_literal();
        }

        if self.match_value(TokenKind::Punctuation, "(") {
            let Some(expr) = self.parse_expression() else {
                self.error("Expected expression after '('");
                return None;
            };
            if !self.expect_value(TokenKind::Punctuation, ")", "Expected ')' after expression") {
                return None;
            }
            return Some(expr);
        }

        self.error("Expected expression");
        None
    }

    /// A literal token in expression position.
    fn parse_literal(&mut self) -> Option<Expr> {
        let value = match (self.current.kind, &self.current.value) {
            (TokenKind::NumberInt, TokenValue::Int(v)) => LiteralValue::Int(*v),
            (TokenKind::NumberFloat, TokenValue::Float(v)) => LiteralValue::Float(*v),
            (TokenKind::String, TokenValue::Str(s)) => LiteralValue::Str(s.clone()),
            (TokenKind::True, _) => LiteralValue::Bool(true),
            (TokenKind::False, _) => LiteralValue::Bool(false),
            (TokenKind::Null, _) => LiteralValue::Null,
            _ => return None,
        };

        let (line, column) = (self.current.line, self.current.column);
        self.advance();

        Some(Expr::Literal(LiteralExpr {
            value,
            line,
            column,
        }))
    }

    /// `[elements]`.
    fn parse_array_literal(&mut self) -> Option<Expr> {
        let bracket = self.current.clone();
        self.advance();

        let mut array = ArrayExpr {
            elements: Vec::new(),
            line: bracket.line,
            column: bracket.column,
        };

        if !self.match_value(TokenKind::Punctuation, "]") {
            loop {
                let Some(element) = self.parse_expression() else {
                    self.error("Expected expression in array");
                    break;
                };
                array.push_element(element);

                if self.match_value(TokenKind::Punctuation, ",") {
                    continue;
                }
                if self.match_value(TokenKind::Punctuation, "]") {
                    break;
                }
                self.error("Expected ',' or ']' in array");
                break;
            }
        }

        Some(Expr::Array(Box::new(array)))
    }

    /// `{key: value, ...}` with string or identifier keys. A pair is stored
    /// only once both its key and value parsed, so keys and values cannot
    /// go out of step.
    fn parse_dict_literal(&mut self) -> Option<Expr> {
        let brace = self.current.clone();
        self.advance();

        let mut dict = DictExpr::new(brace.line, brace.column);

        if !self.match_value(TokenKind::Punctuation, "}") {
            loop {
                let key = if self.check(TokenKind::String) || self.check(TokenKind::Identifier) {
                    let key = self.current_text();
                    self.advance();
                    key
                } else {
                    self.error("Expected string or identifier as dictionary key");
                    break;
                };

                if !self.expect_value(TokenKind::Punctuation, ":", "Expected ':' after dictionary key")
                {
                    break;
                }

                let Some(value) = self.parse_expression() else {
                    self.error("Expected expression as dictionary value");
                    break;
                };

                dict.push_pair(key, value);

                if self.match_value(TokenKind::Punctuation, ",") {
                    continue;
                }
                if self.match_value(TokenKind::Punctuation, "}") {
                    break;
                }
                self.error("Expected ',' or '}' in dictionary");
                break;
            }
        }

        Some(Expr::Dict(Box::new(dict)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;

    /// Parse `src`, panicking on any diagnostic.
    fn parse_ok(src: &str) -> Program {
        match parse(src, "<test>") {
            Ok(program) => program,
            Err(failure) => panic!("unexpected parse failure: {failure:?}"),
        }
    }

    /// Parse `src`, panicking if it unexpectedly succeeds.
    fn parse_err(src: &str) -> ParseFailure {
        match parse(src, "<test>") {
            Ok(_) => panic!("expected parse failure for {src:?}"),
            Err(failure) => failure,
        }
    }

    /// The single top-level statement of `src`.
    fn only_stmt(src: &str) -> Stmt {
        let mut program = parse_ok(src);
        assert_eq!(program.body.len(), 1, "expected one statement in {src:?}");
        program.body.remove(0)
    }

    /// The expression of a single expression statement.
    fn only_expr(src: &str) -> Expr {
        match only_stmt(src) {
            Stmt::Expr(s) => s.expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn assert_int(expr: &Expr, expected: i64) {
        match expr {
            Expr::Literal(l) => assert_eq!(l.value, LiteralValue::Int(expected)),
            other => panic!("expected integer literal, got {other:?}"),
        }
    }

    // ── Programs and declarations ───────────────────────────────────────────

    #[test]
    fn test_empty_source() {
        assert!(parse_ok("").body.is_empty());
        assert!(parse_ok("\n\n  // comment\n").body.is_empty());
    }

    #[test]
    fn test_var_decl_with_initializer() {
        match only_stmt("var x = 10") {
            Stmt::VarDecl(decl) => {
                assert_eq!(decl.name, "x");
                assert!(!decl.is_const);
                assert_int(decl.value.as_ref().unwrap(), 10);
                assert_eq!((decl.line, decl.column), (1, 5));
            }
            other => panic!("expected var declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_var_decl_without_initializer() {
        match only_stmt("var x") {
            Stmt::VarDecl(decl) => {
                assert_eq!(decl.name, "x");
                assert!(decl.value.is_none());
            }
            other => panic!("expected var declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_const_decl() {
        match only_stmt("const PI = 3.14") {
            Stmt::VarDecl(decl) => {
                assert_eq!(decl.name, "PI");
                assert!(decl.is_const);
                assert!(decl.value.is_some());
            }
            other => panic!("expected const declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_const_requires_initializer() {
        let failure = parse_err("const x");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.message == "Expected '=' after constant name"));
    }

    #[test]
    fn test_func_decl() {
        match only_stmt("func add(a, b) { return a + b }") {
            Stmt::FuncDecl(decl) => {
                assert_eq!(decl.name, "add");
                assert_eq!(decl.params, ["a", "b"]);
                match decl.body.as_ref() {
                    Stmt::Block(block) => assert_eq!(block.statements.len(), 1),
                    other => panic!("expected block body, got {other:?}"),
                }
            }
            other => panic!("expected function declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_func_decl_without_params() {
        match only_stmt("func main() { x }") {
            Stmt::FuncDecl(decl) => assert!(decl.params.is_empty()),
            other => panic!("expected function declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_func_decl_colon_body() {
        match only_stmt("func f(): return 1") {
            Stmt::FuncDecl(decl) => {
                assert_eq!(decl.name, "f");
                assert!(decl.params.is_empty());
                match decl.body.as_ref() {
                    Stmt::Return(ret) => assert_int(ret.value.as_ref().unwrap(), 1),
                    other => panic!("expected return body, got {other:?}"),
                }
            }
            other => panic!("expected function declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_func_decl_missing_paren() {
        let failure = parse_err("func add a, b");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.message == "Expected '(' after function name"));
    }

    // ── Expressions ─────────────────────────────────────────────────────────

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        match only_expr("1 + 2 * 3") {
            Expr::Binary(add) => {
                assert_eq!(add.op, "+");
                assert_int(&add.left, 1);
                match add.right.as_ref() {
                    Expr::Binary(mul) => {
                        assert_eq!(mul.op, "*");
                        assert_int(&mul.left, 2);
                        assert_int(&mul.right, 3);
                    }
                    other => panic!("expected multiplication on the right, got {other:?}"),
                }
            }
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn test_binary_operators_are_left_associative() {
        match only_expr("10 - 2 - 3") {
            Expr::Binary(outer) => {
                assert_eq!(outer.op, "-");
                assert_int(&outer.right, 3);
                match outer.left.as_ref() {
                    Expr::Binary(inner) => {
                        assert_int(&inner.left, 10);
                        assert_int(&inner.right, 2);
                    }
                    other => panic!("expected nested subtraction, got {other:?}"),
                }
            }
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match only_expr("a = b = 3") {
            Expr::Assign(outer) => {
                match outer.target.as_ref() {
                    Expr::Ident(i) => assert_eq!(i.name, "a"),
                    other => panic!("expected identifier target, got {other:?}"),
                }
                match outer.value.as_ref() {
                    Expr::Assign(inner) => assert_int(&inner.value, 3),
                    other => panic!("expected nested assignment, got {other:?}"),
                }
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_logical_operators_keep_their_spelling() {
        match only_expr("a and b") {
            Expr::Binary(e) => assert_eq!(e.op, "and"),
            other => panic!("expected binary expression, got {other:?}"),
        }
        match only_expr("a && b") {
            Expr::Binary(e) => assert_eq!(e.op, "&&"),
            other => panic!("expected binary expression, got {other:?}"),
        }
        match only_expr("a or b == 1") {
            Expr::Binary(e) => {
                assert_eq!(e.op, "or");
                // Comparison binds tighter than logical OR.
                match e.right.as_ref() {
                    Expr::Binary(cmp) => assert_eq!(cmp.op, "=="),
                    other => panic!("expected comparison on the right, got {other:?}"),
                }
            }
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_operators() {
        for (src, op) in [("-x", "-"), ("!x", "!"), ("not x", "not")] {
            match only_expr(src) {
                Expr::Unary(e) => assert_eq!(e.op, op),
                other => panic!("expected unary expression for {src:?}, got {other:?}"),
            }
        }
        // Unary operators nest.
        match only_expr("not not x") {
            Expr::Unary(outer) => match outer.operand.as_ref() {
                Expr::Unary(inner) => assert_eq!(inner.op, "not"),
                other => panic!("expected nested unary, got {other:?}"),
            },
            other => panic!("expected unary expression, got {other:?}"),
        }
    }

    #[test]
    fn test_parenthesized_expression() {
        match only_expr("(1 + 2) * 3") {
            Expr::Binary(mul) => {
                assert_eq!(mul.op, "*");
                match mul.left.as_ref() {
                    Expr::Binary(add) => assert_eq!(add.op, "+"),
                    other => panic!("expected parenthesized addition, got {other:?}"),
                }
            }
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn test_literal_expressions() {
        assert_int(&only_expr("42"), 42);
        match only_expr("3.5") {
            Expr::Literal(l) => assert_eq!(l.value, LiteralValue::Float(3.5)),
            other => panic!("expected literal, got {other:?}"),
        }
        match only_expr("\"a\\nb\"") {
            Expr::Literal(l) => assert_eq!(l.value, LiteralValue::Str("a\nb".into())),
            other => panic!("expected literal, got {other:?}"),
        }
        match only_expr("true") {
            Expr::Literal(l) => assert_eq!(l.value, LiteralValue::Bool(true)),
            other => panic!("expected literal, got {other:?}"),
        }
        match only_expr("null") {
            Expr::Literal(l) => assert_eq!(l.value, LiteralValue::Null),
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn test_member_access() {
        match only_expr("obj.size") {
            Expr::Member(m) => {
                assert_eq!(m.property, "size");
                match m.object.as_ref() {
                    Expr::Ident(i) => assert_eq!(i.name, "obj"),
                    other => panic!("expected identifier object, got {other:?}"),
                }
            }
            other => panic!("expected member access, got {other:?}"),
        }
    }

    #[test]
    fn test_member_access_takes_no_call_suffix() {
        // The grammar attaches suffixes only to a leading identifier, so
        // `obj.method(1)` splits into a member access and a separate
        // parenthesized expression statement.
        let program = parse_ok("obj.method(1)");
        assert_eq!(program.body.len(), 2);
        match &program.body[0] {
            Stmt::Expr(s) => assert!(matches!(s.expr, Expr::Member(_))),
            other => panic!("expected expression statement, got {other:?}"),
        }
        match &program.body[1] {
            Stmt::Expr(s) => assert_int(&s.expr, 1),
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_call_with_arguments() {
        match only_expr("f(1, x)") {
            Expr::Call(call) => {
                assert_eq!(call.arguments.len(), 2);
                assert_int(&call.arguments[0], 1);
                match call.callee.as_ref() {
                    Expr::Ident(i) => assert_eq!(i.name, "f"),
                    other => panic!("expected identifier callee, got {other:?}"),
                }
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_call_without_arguments() {
        match only_expr("f()") {
            Expr::Call(call) => assert!(call.arguments.is_empty()),
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_call_missing_separator() {
        let failure = parse_err("f(1 2)");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.message == "Expected ',' or ')' in function call"));
    }

    #[test]
    fn test_nested_literals_as_arguments() {
        match only_expr("f(g(1), [2], {a: 3})") {
            Expr::Call(call) => {
                assert_eq!(call.arguments.len(), 3);
                assert!(matches!(call.arguments[0], Expr::Call(_)));
                assert!(matches!(call.arguments[1], Expr::Array(_)));
                assert!(matches!(call.arguments[2], Expr::Dict(_)));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_array_literal() {
        match only_expr("[1, 2, 3]") {
            Expr::Array(array) => {
                assert_eq!(array.elements.len(), 3);
                assert_int(&array.elements[2], 3);
            }
            other => panic!("expected array literal, got {other:?}"),
        }
        match only_expr("[]") {
            Expr::Array(array) => assert!(array.elements.is_empty()),
            other => panic!("expected array literal, got {other:?}"),
        }
    }

    #[test]
    fn test_dict_literal_pairs_in_order() {
        match only_expr("{a: 1, b: 2}") {
            Expr::Dict(dict) => {
                assert_eq!(dict.pair_count(), 2);
                assert_eq!(dict.keys(), ["a", "b"]);
                assert_int(&dict.values()[0], 1);
                assert_int(&dict.values()[1], 2);
            }
            other => panic!("expected dictionary literal, got {other:?}"),
        }
    }

    #[test]
    fn test_dict_string_keys() {
        match only_expr("{\"a\": 1}") {
            Expr::Dict(dict) => assert_eq!(dict.keys(), ["a"]),
            other => panic!("expected dictionary literal, got {other:?}"),
        }
    }

    #[test]
    fn test_dict_rejects_non_name_keys() {
        let failure = parse_err("{1: 2}");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.message == "Expected string or identifier as dictionary key"));
    }

    #[test]
    fn test_compound_assignment_is_rejected() {
        let failure = parse_err("x += 5");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.message == "Compound assignment not fully implemented yet"));
    }

    // ── Control flow ────────────────────────────────────────────────────────

    #[test]
    fn test_if_elif_else_chain() {
        let src = "if (x) {\n  a\n} elif (y) {\n  b\n} else {\n  c\n}";
        match only_stmt(src) {
            Stmt::If(node) => {
                assert_eq!(node.elif_branches.len(), 1);
                assert!(node.else_branch.is_some());
                assert!(matches!(node.then_branch.as_ref(), Stmt::Block(_)));
                assert!(matches!(node.elif_branches[0].body, Stmt::Block(_)));
            }
            other => panic!("expected if statement, got {other:?}"),
        }
    }

    #[test]
    fn test_if_single_statement_body() {
        match only_stmt("if x: y = 1") {
            Stmt::If(node) => match node.then_branch.as_ref() {
                Stmt::Expr(s) => assert!(matches!(s.expr, Expr::Assign(_))),
                other => panic!("expected expression statement body, got {other:?}"),
            },
            other => panic!("expected if statement, got {other:?}"),
        }
    }

    #[test]
    fn test_while_loop() {
        match only_stmt("while (x) {\n  x = x - 1\n}") {
            Stmt::While(node) => match node.body.as_ref() {
                Stmt::Block(block) => assert_eq!(block.statements.len(), 1),
                other => panic!("expected block body, got {other:?}"),
            },
            other => panic!("expected while statement, got {other:?}"),
        }
    }

    #[test]
    fn test_for_loop() {
        match only_stmt("for i in xs {\n  y\n}") {
            Stmt::For(node) => {
                assert_eq!(node.iterator, "i");
                assert!(matches!(node.iterable, Expr::Ident(_)));
            }
            other => panic!("expected for statement, got {other:?}"),
        }
    }

    #[test]
    fn test_for_requires_in_keyword() {
        let failure = parse_err("for i of xs { y }");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.message == "Expected 'in' after iterator variable"));
    }

    #[test]
    fn test_return_forms() {
        match only_stmt("return") {
            Stmt::Return(node) => assert!(node.value.is_none()),
            other => panic!("expected return statement, got {other:?}"),
        }
        match only_stmt("return 5") {
            Stmt::Return(node) => assert_int(node.value.as_ref().unwrap(), 5),
            other => panic!("expected return statement, got {other:?}"),
        }
    }

    #[test]
    fn test_break_and_continue() {
        match only_stmt("while x {\n  break\n  continue\n}") {
            Stmt::While(node) => match node.body.as_ref() {
                Stmt::Block(block) => {
                    assert!(matches!(block.statements[0], Stmt::Break(_)));
                    assert!(matches!(block.statements[1], Stmt::Continue(_)));
                }
                other => panic!("expected block body, got {other:?}"),
            },
            other => panic!("expected while statement, got {other:?}"),
        }
    }

    #[test]
    fn test_semicolons_separate_statements_on_one_line() {
        let program = parse_ok("var x = 1; var y = 2");
        assert_eq!(program.body.len(), 2);
    }

    // ── Imports ─────────────────────────────────────────────────────────────

    #[test]
    fn test_from_import_named() {
        match only_stmt("from math using sin, cos") {
            Stmt::FromImport(node) => {
                assert_eq!(node.module, "math");
                assert!(!node.import_all);
                assert_eq!(node.imports, ["sin", "cos"]);
            }
            other => panic!("expected import statement, got {other:?}"),
        }
    }

    #[test]
    fn test_from_import_wildcard() {
        match only_stmt("from math using *") {
            Stmt::FromImport(node) => {
                assert!(node.import_all);
                assert!(node.imports.is_empty());
            }
            other => panic!("expected import statement, got {other:?}"),
        }
    }

    #[test]
    fn test_from_import_requires_using() {
        let failure = parse_err("from math import sin");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.message == "Expected 'using' after module name"));
    }

    // ── Errors and recovery ─────────────────────────────────────────────────

    #[test]
    fn test_recovery_parses_statement_after_error() {
        // The tree is built past the bad line, then the entry point
        // discards it because an error was recorded.
        let mut parser = Parser::new("var = 5\nvar y = 2");
        let program = parser.parse_program();
        let diagnostics = parser.into_diagnostics();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected variable name after 'var'");
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Stmt::VarDecl(decl) => assert_eq!(decl.name, "y"),
            other => panic!("expected var declaration, got {other:?}"),
        }

        assert!(parse("var = 5\nvar y = 2", "<test>").is_err());
    }

    #[test]
    fn test_multiple_errors_reported_in_position_order() {
        let failure = parse_err("var = 1\nvar ok = 2\nconst broken");
        assert_eq!(failure.diagnostics.len(), 2);
        assert_eq!(failure.diagnostics[0].line, 1);
        assert_eq!(failure.diagnostics[1].line, 3);
    }

    #[test]
    fn test_lexical_sorts_before_syntax_on_position_tie() {
        // In `1.2.3` the malformed-number diagnostic and the rescanned
        // `.3` token that breaks the argument list share one position.
        let failure = parse_err("f(1.2.3)");
        let first = &failure.diagnostics[0];
        let second = &failure.diagnostics[1];
        assert_eq!((first.line, first.column), (1, 6));
        assert_eq!((second.line, second.column), (1, 6));
        assert_eq!(first.severity, Severity::Lexical);
        assert_eq!(first.message, "Invalid number format");
        assert_eq!(second.severity, Severity::Syntax);
        assert_eq!(second.message, "Expected ',' or ')' in function call");
    }

    #[test]
    fn test_lexical_error_fails_the_parse() {
        let failure = parse_err("var s = \"abc");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Lexical && d.message == "Unclosed string"));
    }

    #[test]
    fn test_unexpected_eof_in_block() {
        let failure = parse_err("while x {\n  y\n");
        assert!(failure
            .diagnostics
            .iter()
            .any(|d| d.message == "Unexpected end of file in block"));
    }

    #[test]
    fn test_failure_carries_label() {
        match parse("var", "main.topo") {
            Err(failure) => {
                assert_eq!(failure.label, "main.topo");
                assert_eq!(
                    failure.to_string(),
                    "main.topo: parsing failed with 1 error(s)"
                );
            }
            Ok(_) => panic!("expected parse failure"),
        }
    }

    #[test]
    fn test_statement_positions() {
        let program = parse_ok("var x = 1\nwhile x {\n  break\n}");
        assert_eq!(program.body[0].position(), (1, 5));
        assert_eq!(program.body[1].position(), (2, 1));
    }
}
