//! Topo lexer (scanner).
//!
//! Converts UTF-8 source text into a stream of [`Token`]s. Newlines are
//! significant (they separate statements) and are emitted as tokens;
//! horizontal whitespace and comments are skipped. See [`Scanner`] for the
//! main entry point and the two-slot lookahead protocol the parser relies
//! on.

use std::fmt;

use smallvec::SmallVec;

use crate::error::Diagnostic;

// ─────────────────────────────────────────────────────────────────────────────
// Limits
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed lookahead depth: the parser may inspect tokens 0 and 1.
pub const MAX_LOOKAHEAD: usize = 2;

/// Maximum decoded length of a string literal, in bytes. Reaching it is a
/// lexical error, not a silent truncation.
pub const MAX_STRING_LENGTH: usize = 4096;

/// Maximum length of an identifier, in bytes. Reaching it is a lexical
/// error that terminates the lexeme.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

// ─────────────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic category of a Topo lexical token.
///
/// Every reserved word and every built-in name gets its own kind; reserved
/// tokens carry no payload (the kind is the information).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // ── Declaration keywords ──────────────────────────────────────────────
    /// `var`
    Var,
    /// `const`
    Const,
    /// `func`
    Func,

    // ── Flow-control keywords ─────────────────────────────────────────────
    /// `if`
    If,
    /// `else`
    Else,
    /// `elif`
    Elif,
    /// `while`
    While,
    /// `for`
    For,
    /// `in`
    In,
    /// `return`
    Return,
    /// `break`
    Break,
    /// `continue`
    Continue,

    // ── Literal keywords ──────────────────────────────────────────────────
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // ── Logical-operator keywords ─────────────────────────────────────────
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,

    // ── Built-in names ────────────────────────────────────────────────────
    /// `console`
    Console,
    /// `input`
    Input,
    /// `len`
    Len,
    /// `append`
    Append,
    /// `pop`
    Pop,
    /// `keys`
    Keys,
    /// `values`
    Values,
    /// `type`
    Type,
    /// `int`
    Int,
    /// `float`
    Float,
    /// `str`
    Str,
    /// `bool`
    Bool,
    /// `array`
    Array,
    /// `dict`
    Dict,
    /// `range`
    Range,
    /// `from`
    From,
    /// `using`
    Using,

    // ── Structural kinds ──────────────────────────────────────────────────
    /// An identifier that is not a reserved word or built-in name.
    Identifier,
    /// Integer literal (decimal, `0x…` hexadecimal, or `0b…` binary).
    NumberInt,
    /// Floating-point literal (decimal point and/or exponent).
    NumberFloat,
    /// String literal enclosed in `"` or `'`.
    String,
    /// A symbolic operator from the fixed operator table.
    Operator,
    /// One of `( ) { } [ ] . , ; :`.
    Punctuation,
    /// A line break. Newlines separate statements and are real tokens.
    Newline,
    /// End of input. Scanning past the end keeps producing this kind.
    Eof,
    /// Sentinel produced when scanning fails; a [`Diagnostic`] has been
    /// recorded alongside it.
    Error,
}

impl TokenKind {
    /// Stable uppercase name for dumps and tests.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Var => "VAR",
            TokenKind::Const => "CONST",
            TokenKind::Func => "FUNC",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Elif => "ELIF",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::In => "IN",
            TokenKind::Return => "RETURN",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Console => "CONSOLE",
            TokenKind::Input => "INPUT",
            TokenKind::Len => "LEN",
            TokenKind::Append => "APPEND",
            TokenKind::Pop => "POP",
            TokenKind::Keys => "KEYS",
            TokenKind::Values => "VALUES",
            TokenKind::Type => "TYPE",
            TokenKind::Int => "INT_FUNC",
            TokenKind::Float => "FLOAT_FUNC",
            TokenKind::Str => "STR_FUNC",
            TokenKind::Bool => "BOOL_FUNC",
            TokenKind::Array => "ARRAY_FUNC",
            TokenKind::Dict => "DICT_FUNC",
            TokenKind::Range => "RANGE",
            TokenKind::From => "FROM",
            TokenKind::Using => "USING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::NumberInt => "NUMBER_INT",
            TokenKind::NumberFloat => "NUMBER_FLOAT",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Punctuation => "PUNCTUATION",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Eof => "EOF",
            TokenKind::Error => "ERROR",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenValue / Token
// ─────────────────────────────────────────────────────────────────────────────

/// Payload carried by a token. Exactly one shape is meaningful per
/// [`TokenKind`]: keywords, newline, and EOF carry [`TokenValue::None`];
/// identifiers, strings, operators, and punctuation carry
/// [`TokenValue::Str`]; numeric literals carry their decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No payload.
    None,
    /// Text payload (identifier lexeme, decoded string content, operator or
    /// punctuation spelling, error tag).
    Str(String),
    /// Decoded integer value.
    Int(i64),
    /// Decoded floating-point value.
    Float(f64),
}

impl TokenValue {
    /// The text payload, if this value carries one.
    pub fn text(&self) -> Option<&str> {
        match self {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category.
    pub kind: TokenKind,
    /// The associated payload, if any.
    pub value: TokenValue,
    /// 1-based line of the token start.
    pub line: u32,
    /// 1-based column of the token start, counted in bytes.
    pub column: u32,
    /// Byte length of the lexeme (0 for sentinel error tokens).
    pub length: u32,
}

impl Token {
    /// The text payload, if any.
    pub fn text(&self) -> Option<&str> {
        self.value.text()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.kind.name())?;
        match &self.value {
            TokenValue::None => {}
            TokenValue::Str(s) => write!(f, " '{s}'")?,
            TokenValue::Int(v) => write!(f, " (value={v})")?,
            TokenValue::Float(v) => write!(f, " (value={v})")?,
        }
        write!(f, " at {}:{}]", self.line, self.column)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classification tables
// ─────────────────────────────────────────────────────────────────────────────

/// Symbolic operators. Two-character operators come first so that the first
/// table entry matching a source prefix is always the longest one.
const OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "+=", "-=", "*=", "/=", "%=", // two-character
    "+", "-", "*", "/", "%", "=", "<", ">", "!", "&", "|", "^", "~", // one-character
];

/// Longest operator that is a prefix of `rest`, if any.
fn longest_operator(rest: &[u8]) -> Option<&'static str> {
    OPERATORS
        .iter()
        .find(|op| rest.starts_with(op.as_bytes()))
        .copied()
}

fn is_punctuation(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'{' | b'}' | b'[' | b']' | b'.' | b',' | b';' | b':'
    )
}

/// Bytes that may start an identifier: ASCII letters, `_`, or any UTF-8
/// lead byte (`>= 0xC0`). Classification is by raw byte ranges; the scanner
/// does not consult Unicode tables.
fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0xC0
}

/// Bytes that may continue an identifier: ASCII alphanumerics, `_`, or any
/// non-ASCII byte (`>= 0x80`, lead or continuation alike).
fn is_identifier_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Map an identifier lexeme to its reserved-word or built-in [`TokenKind`],
/// or return `None` for plain identifiers. Matching is case-sensitive.
fn keyword_kind(s: &str) -> Option<TokenKind> {
    match s {
        "var" => Some(TokenKind::Var),
        "const" => Some(TokenKind::Const),
        "func" => Some(TokenKind::Func),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "elif" => Some(TokenKind::Elif),
        "while" => Some(TokenKind::While),
        "for" => Some(TokenKind::For),
        "in" => Some(TokenKind::In),
        "return" => Some(TokenKind::Return),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "null" => Some(TokenKind::Null),
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "not" => Some(TokenKind::Not),
        "console" => Some(TokenKind::Console),
        "input" => Some(TokenKind::Input),
        "len" => Some(TokenKind::Len),
        "append" => Some(TokenKind::Append),
        "pop" => Some(TokenKind::Pop),
        "keys" => Some(TokenKind::Keys),
        "values" => Some(TokenKind::Values),
        "type" => Some(TokenKind::Type),
        "int" => Some(TokenKind::Int),
        "float" => Some(TokenKind::Float),
        "str" => Some(TokenKind::Str),
        "bool" => Some(TokenKind::Bool),
        "array" => Some(TokenKind::Array),
        "dict" => Some(TokenKind::Dict),
        "range" => Some(TokenKind::Range),
        "from" => Some(TokenKind::From),
        "using" => Some(TokenKind::Using),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lenient numeric conversion
// ─────────────────────────────────────────────────────────────────────────────

/// `strtol`-shaped integer conversion: decode the longest valid digit
/// prefix of `digits` in the given radix, 0 when there is none, saturating
/// on overflow.
fn lenient_int(digits: &str, radix: u32) -> i64 {
    let mut value: i64 = 0;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value.saturating_mul(radix as i64).saturating_add(d as i64),
            None => break,
        }
    }
    value
}

/// `atof`-shaped float conversion: decode the longest prefix of `text` that
/// parses as a float, 0.0 when there is none. Needed because lexemes like
/// `1e` or `2e+` are reachable and must decode as `1.0` / `2.0`.
fn lenient_float(text: &str) -> f64 {
    for end in (1..=text.len()).rev() {
        if let Ok(v) = text[..end].parse::<f64>() {
            return v;
        }
    }
    0.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// The Topo tokenizer.
///
/// Pulls bytes from the source text and produces [`Token`]s one at a time.
/// The parser reads through the lookahead protocol: [`Scanner::current`] is
/// the logical current token, [`Scanner::peek`] inspects tokens 0 and 1
/// without consuming, [`Scanner::skip`] consumes the current token.
/// [`Scanner::next_token`] is the raw pull used when no lookahead is needed.
///
/// Lexical failures record a [`Diagnostic`] and, where the grammar needs a
/// placeholder, yield a [`TokenKind::Error`] sentinel; scanning always
/// continues and always makes progress, so a caller may keep pulling tokens
/// after an error.
///
/// A NUL byte ends the input wherever it appears, exactly like the real end
/// of the source string.
pub struct Scanner<'src> {
    /// The complete source text.
    source: &'src str,
    /// Current byte position within `source`.
    pos: usize,
    /// Current 1-based line number.
    line: u32,
    /// Current 1-based column number, counted in bytes.
    column: u32,
    /// Byte position where the token being scanned started.
    start_pos: usize,
    /// Line where the token being scanned started.
    start_line: u32,
    /// Column where the token being scanned started.
    start_column: u32,
    /// Fixed-depth lookahead buffer; slot 0 is the logical current token.
    lookahead: SmallVec<[Token; MAX_LOOKAHEAD]>,
    /// Scratch buffer for decoding string literals, reused across tokens.
    scratch: Vec<u8>,
    /// Lexical diagnostics recorded so far.
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner over the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
            lookahead: SmallVec::new(),
            scratch: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Scan `source` to completion and return every produced token (the
    /// final [`TokenKind::Eof`] token included) together with the
    /// diagnostics recorded along the way.
    pub fn tokenize_all(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, scanner.into_diagnostics())
    }

    /// Lexical diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `true` when at least one lexical error has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Consume the scanner and hand back its accumulated diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ── Low-level byte helpers ──────────────────────────────────────────────

    fn peek_byte(&self) -> u8 {
        self.source.as_bytes().get(self.pos).copied().unwrap_or(0)
    }

    fn peek_byte_at(&self, offset: usize) -> u8 {
        self.source
            .as_bytes()
            .get(self.pos + offset)
            .copied()
            .unwrap_or(0)
    }

    /// Consume one byte, maintaining line/column bookkeeping. Returns 0 and
    /// does not move at end of input.
    fn advance(&mut self) -> u8 {
        let b = self.peek_byte();
        if b == 0 {
            return 0;
        }
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        b
    }

    /// Mark the current position as the start of the next token.
    fn start_token(&mut self) {
        self.start_pos = self.pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    /// Build a token spanning from the recorded start to the current
    /// position.
    fn make_token(&self, kind: TokenKind, value: TokenValue) -> Token {
        Token {
            kind,
            value,
            line: self.start_line,
            column: self.start_column,
            length: (self.pos - self.start_pos) as u32,
        }
    }

    /// Record a lexical diagnostic at the current scan position.
    fn error(&mut self, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::lexical(self.line, self.column, message));
    }

    // ── Trivia ──────────────────────────────────────────────────────────────

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_byte(), b' ' | b'\t' | b'\r') {
            self.advance();
        }
    }

    /// Skip a `//` comment up to (not including) the line break. Returns
    /// `true` when a comment was consumed.
    fn skip_line_comment(&mut self) -> bool {
        if self.peek_byte() == b'/' && self.peek_byte_at(1) == b'/' {
            self.advance();
            self.advance();
            while self.peek_byte() != b'\n' && self.peek_byte() != 0 {
                self.advance();
            }
            return true;
        }
        false
    }

    /// Skip a `/* … */` comment, honoring nested delimiters. Line numbers
    /// keep advancing across embedded newlines. Returns `true` when a
    /// comment was consumed; an unterminated comment records a diagnostic.
    fn skip_block_comment(&mut self) -> bool {
        if self.peek_byte() == b'/' && self.peek_byte_at(1) == b'*' {
            self.advance();
            self.advance();

            let mut depth = 1u32;
            while depth > 0 && self.peek_byte() != 0 {
                if self.peek_byte() == b'/' && self.peek_byte_at(1) == b'*' {
                    depth += 1;
                    self.advance();
                    self.advance();
                } else if self.peek_byte() == b'*' && self.peek_byte_at(1) == b'/' {
                    depth -= 1;
                    self.advance();
                    self.advance();
                } else {
                    self.advance();
                }
            }

            if depth > 0 {
                self.error("Unclosed multi-line comment");
            }
            return true;
        }
        false
    }

    // ── Literal scanners ────────────────────────────────────────────────────

    /// Scan a numeric literal: decimal, `0x`/`0X` hexadecimal, `0b`/`0B`
    /// binary, or a float with a single `.` and/or a single exponent. A
    /// second `.` or exponent marker is a lexical error that ends the
    /// lexeme without consuming the offending character; the partial number
    /// token is still produced.
    fn read_number(&mut self) -> Token {
        self.start_token();

        let mut is_float = false;
        let mut has_exponent = false;
        let mut is_hex = false;
        let mut is_binary = false;

        if self.peek_byte() == b'0' {
            match self.peek_byte_at(1) {
                b'x' | b'X' => {
                    is_hex = true;
                    self.advance();
                    self.advance();
                }
                b'b' | b'B' => {
                    is_binary = true;
                    self.advance();
                    self.advance();
                }
                _ => {}
            }
        }

        loop {
            let b = self.peek_byte();

            if is_hex {
                if !b.is_ascii_hexdigit() {
                    break;
                }
            } else if is_binary {
                if b != b'0' && b != b'1' {
                    break;
                }
            } else if b == b'.' {
                if is_float || has_exponent {
                    self.error("Invalid number format");
                    break;
                }
                is_float = true;
            } else if b == b'e' || b == b'E' {
                if has_exponent {
                    self.error("Invalid number format");
                    break;
                }
                has_exponent = true;
                // An exponent always makes the literal floating point.
                is_float = true;

                let next = self.peek_byte_at(1);
                if next == b'+' || next == b'-' {
                    self.advance();
                    self.advance();
                    continue;
                }
            } else if !b.is_ascii_digit() {
                break;
            }

            self.advance();
        }

        // Number lexemes are pure ASCII, so byte indices are char
        // boundaries.
        let text = &self.source[self.start_pos..self.pos];
        if is_float {
            self.make_token(TokenKind::NumberFloat, TokenValue::Float(lenient_float(text)))
        } else if is_hex {
            // Either prefix spelling is stripped before the base-16
            // conversion.
            let digits = text
                .strip_prefix("0x")
                .or_else(|| text.strip_prefix("0X"))
                .unwrap_or(text);
            self.make_token(TokenKind::NumberInt, TokenValue::Int(lenient_int(digits, 16)))
        } else if is_binary {
            // The 0b prefix is excluded from the conversion.
            self.make_token(
                TokenKind::NumberInt,
                TokenValue::Int(lenient_int(&text[2..], 2)),
            )
        } else {
            self.make_token(TokenKind::NumberInt, TokenValue::Int(lenient_int(text, 10)))
        }
    }

    /// Scan a string literal delimited by `"` or `'`. Escapes `n t r " ' \ 0`
    /// map to their character; `\xHH` yields the byte named by the longest
    /// hex prefix of the next two characters (consumed unconditionally);
    /// `\uXXXX` validates four hex digits but always yields the placeholder
    /// `?`; an unknown escape records a diagnostic, keeps the backslash, and
    /// drops the escape character. Newlines are legal inside strings.
    fn read_string(&mut self) -> Token {
        self.start_token();

        let quote = self.advance();
        self.scratch.clear();

        while self.peek_byte() != quote && self.peek_byte() != 0 {
            let mut b = self.advance();

            if b == b'\\' {
                let next = self.advance();
                match next {
                    b'n' => b = b'\n',
                    b't' => b = b'\t',
                    b'r' => b = b'\r',
                    b'"' => b = b'"',
                    b'\'' => b = b'\'',
                    b'\\' => b = b'\\',
                    b'0' => b = 0,
                    b'x' => {
                        let h1 = self.advance();
                        let h2 = self.advance();
                        let mut value: u32 = 0;
                        for h in [h1, h2] {
                            match (h as char).to_digit(16) {
                                Some(d) => value = value * 16 + d,
                                None => break,
                            }
                        }
                        b = value as u8;
                    }
                    b'u' => {
                        for _ in 0..4 {
                            let h = self.advance();
                            if !h.is_ascii_hexdigit() {
                                self.error("Invalid Unicode escape");
                                break;
                            }
                        }
                        // Code points are not decoded in this version; the
                        // placeholder keeps output compatible.
                        b = b'?';
                    }
                    _ => {
                        self.error(format!(
                            "Unknown escape sequence: \\{}",
                            char::from(next)
                        ));
                    }
                }
            }

            if self.scratch.len() >= MAX_STRING_LENGTH - 1 {
                self.error("String too long");
                break;
            }
            self.scratch.push(b);
        }

        if self.peek_byte() != quote {
            self.error("Unclosed string");
            let mut token =
                self.make_token(TokenKind::Error, TokenValue::Str("Unclosed string".into()));
            token.length = 0;
            return token;
        }
        self.advance();

        let content = String::from_utf8_lossy(&self.scratch).into_owned();
        self.make_token(TokenKind::String, TokenValue::Str(content))
    }

    /// Scan an identifier and classify it against the keyword/built-in
    /// table. An identifier reaching [`MAX_IDENTIFIER_LENGTH`] bytes is a
    /// lexical error that ends the lexeme.
    fn read_identifier(&mut self) -> Token {
        self.start_token();
        self.advance();

        while is_identifier_continue(self.peek_byte()) {
            if self.pos - self.start_pos >= MAX_IDENTIFIER_LENGTH {
                self.error("Identifier too long");
                break;
            }
            self.advance();
        }

        // The length cutoff can split a multi-byte character; lossy
        // conversion keeps the lexeme representable.
        let bytes = &self.source.as_bytes()[self.start_pos..self.pos];
        let text = String::from_utf8_lossy(bytes);

        match keyword_kind(&text) {
            Some(kind) => self.make_token(kind, TokenValue::None),
            None => self.make_token(TokenKind::Identifier, TokenValue::Str(text.into_owned())),
        }
    }

    /// Consume a previously matched operator.
    fn read_operator(&mut self, op: &'static str) -> Token {
        self.start_token();
        for _ in 0..op.len() {
            self.advance();
        }
        self.make_token(TokenKind::Operator, TokenValue::Str(op.to_string()))
    }

    // ── Token production ────────────────────────────────────────────────────

    /// Scan exactly one token from the input, skipping trivia first.
    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            if self.skip_line_comment() || self.skip_block_comment() {
                continue;
            }

            if self.peek_byte() == 0 {
                self.start_token();
                return self.make_token(TokenKind::Eof, TokenValue::None);
            }

            if self.peek_byte() == b'\n' {
                self.start_token();
                self.advance();
                return self.make_token(TokenKind::Newline, TokenValue::None);
            }

            break;
        }

        let b = self.peek_byte();

        if b.is_ascii_digit() || (b == b'.' && self.peek_byte_at(1).is_ascii_digit()) {
            return self.read_number();
        }

        if b == b'"' || b == b'\'' {
            return self.read_string();
        }

        if is_identifier_start(b) {
            return self.read_identifier();
        }

        if let Some(op) = longest_operator(&self.source.as_bytes()[self.pos..]) {
            return self.read_operator(op);
        }

        if is_punctuation(b) {
            self.start_token();
            let b = self.advance();
            return self.make_token(
                TokenKind::Punctuation,
                TokenValue::Str(char::from(b).to_string()),
            );
        }

        self.start_token();
        self.error(format!(
            "Unknown character: '{}' (0x{:02x})",
            char::from(b),
            b
        ));
        self.advance();
        let mut token = self.make_token(TokenKind::Error, TokenValue::Str("Unknown character".into()));
        token.length = 0;
        token
    }

    /// Produce the next token: the buffered lookahead token if one is
    /// waiting, otherwise a freshly scanned one.
    pub fn next_token(&mut self) -> Token {
        if !self.lookahead.is_empty() {
            return self.lookahead.remove(0);
        }
        self.scan_token()
    }

    /// Inspect token `k` (0 or 1) without consuming anything. Slots
    /// `0..=k` are materialized by scanning as needed; the logical current
    /// token never moves.
    pub fn peek(&mut self, k: usize) -> &Token {
        debug_assert!(k < MAX_LOOKAHEAD, "lookahead depth is fixed at {MAX_LOOKAHEAD}");
        let k = k.min(MAX_LOOKAHEAD - 1);
        while self.lookahead.len() <= k {
            let token = self.scan_token();
            self.lookahead.push(token);
        }
        &self.lookahead[k]
    }

    /// The logical current token (scanned on demand, then held until
    /// [`Scanner::skip`]).
    pub fn current(&mut self) -> &Token {
        self.peek(0)
    }

    /// Consume the current token.
    pub fn skip(&mut self) {
        if self.lookahead.is_empty() {
            self.scan_token();
        } else {
            self.lookahead.remove(0);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
