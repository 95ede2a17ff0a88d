#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{Scanner, TokenKind};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut scanner = Scanner::new(input, 0);
    let mut expected_start = 0;
    loop {
        let kind = scanner.scan_token();
        if kind == TokenKind::Eos {
            break;
        }
        // Tokens tile the input and always make progress.
        assert_eq!(scanner.token_offset(), expected_start);
        assert!(scanner.token_end() > scanner.token_offset());
        expected_start = scanner.token_end();
    }
    assert_eq!(expected_start, input.len());
});
