//! `topo_core` — the language front end for the Topo scripting language.
//!
//! # Crate layout
//!
//! - [`scanner`] — Tokenizer (keywords, literals, operators, lookahead).
//! - [`ast`] — Syntax tree node definitions and the debug dump.
//! - [`parser`] — Recursive-descent parser with statement-level recovery.
//! - [`error`] — Diagnostics and the parse failure type.

/// Syntax tree node definitions and the debug dump.
pub mod ast;
/// Diagnostics and the parse failure type.
pub mod error;
/// Recursive-descent parser with statement-level recovery.
pub mod parser;
/// Tokenizer: keywords, literals, operators, lookahead.
pub mod scanner;
