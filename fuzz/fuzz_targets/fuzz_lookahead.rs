#![no_main]

use libfuzzer_sys::fuzz_target;
use topo_core::scanner::{Scanner, TokenKind};

// The buffered lookahead protocol (peek(0)/peek(1)/skip) must observe
// exactly the token stream a raw next_token() loop produces, for any input.
fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    let (reference, _) = Scanner::tokenize_all(&source);

    let mut scanner = Scanner::new(&source);
    for (i, expected) in reference.iter().enumerate() {
        assert_eq!(scanner.peek(0), expected, "peek(0) diverged at token {i}");
        match reference.get(i + 1) {
            Some(next) => {
                assert_eq!(scanner.peek(1), next, "peek(1) diverged at token {i}");
            }
            None => {
                // Peeking past the end keeps producing EOF.
                assert_eq!(scanner.peek(1).kind, TokenKind::Eof);
            }
        }
        scanner.skip();
    }

    // Consuming past the end keeps producing EOF.
    assert_eq!(scanner.peek(0).kind, TokenKind::Eof);
    scanner.skip();
    assert_eq!(scanner.peek(0).kind, TokenKind::Eof);
});
