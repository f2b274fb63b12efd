#![no_main]

use libfuzzer_sys::fuzz_target;
use xml::{Token, Tokenizer};

fuzz_target!(|data: &[u8]| {
    let mut tokenizer = Tokenizer::new(data);
    let mut last_line = tokenizer.line();
    loop {
        match tokenizer.next_token() {
            Ok(Token::Eof) | Err(_) => break,
            Ok(_) => {
                assert!(tokenizer.line() >= last_line, "line counter went backwards");
                last_line = tokenizer.line();
            }
        }
    }
});
