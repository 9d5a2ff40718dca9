#![no_main]

use libfuzzer_sys::fuzz_target;
use topo_core::scanner::{Scanner, TokenKind};

fuzz_target!(|data: &[u8]| {
    // The scanner takes UTF-8; arbitrary bytes are made valid lossily.
    let source = String::from_utf8_lossy(data);

    let (tokens, diagnostics) = Scanner::tokenize_all(&source);

    // The stream always ends with exactly one EOF token.
    assert!(!tokens.is_empty(), "token stream must not be empty");
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    assert_eq!(
        tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
        1,
        "exactly one EOF token per stream"
    );

    for token in &tokens {
        assert!(token.line >= 1, "lines are 1-based");
        assert!(token.column >= 1, "columns are 1-based");
    }

    // An error token is always accompanied by a recorded diagnostic.
    if tokens.iter().any(|t| t.kind == TokenKind::Error) {
        assert!(
            !diagnostics.is_empty(),
            "error tokens must record diagnostics"
        );
    }
});
