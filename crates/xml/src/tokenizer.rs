//! Line-oriented tokenizer for the tag markup.
//!
//! The character classes are fixed:
//! - `\n`, `\r` and `\r\n` each produce one [`Token::Eol`]; line breaks are
//!   significant because tag declarations are one per line.
//! - `//` skips to the end of the line (the line break itself is still
//!   emitted) and `/* ... */` is skipped entirely.
//! - `<`, `>`, `/` and `=` are single-character symbols and never part of a
//!   word. So is any other punctuation.
//! - Words start with an ASCII letter, digit, `_` or a character at or above
//!   U+00A0, and continue through those plus `.` and `-`.
//! - `"` quotes strings. The raw text between the quotes is the token value,
//!   line breaks included; there is no escape processing. `'` is an ordinary
//!   symbol.
//! - Everything else at or below U+0020 is whitespace.
use crate::error::{XmlError, XmlResult};
use crate::source::CharSource;
use memchr::{memchr2, memchr3};
use std::io::Read;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Word(String),
    /// Contents of a quoted string, without the quotes.
    Str(String),
    Eol,
    Symbol(char),
    Eof,
}

impl Token {
    pub fn is_symbol(&self, ch: char) -> bool {
        matches!(self, Token::Symbol(c) if *c == ch)
    }
}

pub struct Tokenizer<R> {
    source: CharSource<R>,
    line: usize,
}

impl<'a> Tokenizer<&'a [u8]> {
    pub fn for_str(input: &'a str) -> Self {
        Self::new(input.as_bytes())
    }
}

impl<R: Read> Tokenizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            source: CharSource::new(reader),
            line: 1,
        }
    }

    /// 1-based line of the cursor.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Classify and consume the next token. Returns [`Token::Eof`] forever
    /// once the input is exhausted.
    pub fn next_token(&mut self) -> XmlResult<Token> {
        loop {
            let Some(ch) = self.source.peek()? else {
                log::trace!(target: "xml.tokenizer", "end of input at line {}", self.line);
                return Ok(Token::Eof);
            };
            match ch {
                '\n' => {
                    self.source.bump();
                    self.line += 1;
                    return Ok(Token::Eol);
                }
                '\r' => {
                    self.source.bump();
                    if self.source.peek()? == Some('\n') {
                        self.source.bump();
                    }
                    self.line += 1;
                    return Ok(Token::Eol);
                }
                '/' => match self.source.peek_nth(1)? {
                    Some('/') => self.skip_line_comment()?,
                    Some('*') => {
                        self.source.bump();
                        self.source.bump();
                        self.skip_block_comment()?;
                    }
                    _ => {
                        self.source.bump();
                        return Ok(Token::Symbol('/'));
                    }
                },
                '"' => {
                    self.source.bump();
                    return self.quoted();
                }
                c if is_whitespace(c) => self.source.bump(),
                c if is_word_start(c) => return self.word(),
                c => {
                    self.source.bump();
                    return Ok(Token::Symbol(c));
                }
            }
        }
    }

    fn word(&mut self) -> XmlResult<Token> {
        let mut word = String::new();
        while let Some(ch) = self.source.peek()? {
            if !is_word_part(ch) {
                break;
            }
            word.push(ch);
            self.source.bump();
        }
        Ok(Token::Word(word))
    }

    /// Read through the closing `"`, counting line breaks inside the string.
    fn quoted(&mut self) -> XmlResult<Token> {
        let start_line = self.line;
        let mut value = String::new();
        loop {
            let window = self.source.buffered();
            let Some(hit) = memchr3(b'"', b'\n', b'\r', window.as_bytes()) else {
                value.push_str(window);
                let len = window.len();
                self.source.consume(len);
                if !self.source.fill()? {
                    return Err(XmlError::UnterminatedString { line: start_line });
                }
                continue;
            };
            let found = window.as_bytes()[hit];
            value.push_str(&window[..hit]);
            self.source.consume(hit + 1);
            match found {
                b'"' => return Ok(Token::Str(value)),
                b'\r' => {
                    value.push('\r');
                    if self.source.peek()? == Some('\n') {
                        self.source.bump();
                        value.push('\n');
                    }
                    self.line += 1;
                }
                _ => {
                    value.push('\n');
                    self.line += 1;
                }
            }
        }
    }

    /// Skip up to, but not including, the line break.
    fn skip_line_comment(&mut self) -> XmlResult<()> {
        loop {
            let window = self.source.buffered();
            match memchr2(b'\n', b'\r', window.as_bytes()) {
                Some(end) => {
                    self.source.consume(end);
                    return Ok(());
                }
                None => {
                    let len = window.len();
                    self.source.consume(len);
                    if !self.source.fill()? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Skip past the closing `*/`, counting line breaks inside the comment.
    fn skip_block_comment(&mut self) -> XmlResult<()> {
        let start_line = self.line;
        loop {
            let window = self.source.buffered();
            let Some(hit) = memchr3(b'*', b'\n', b'\r', window.as_bytes()) else {
                let len = window.len();
                self.source.consume(len);
                if !self.source.fill()? {
                    return Err(XmlError::UnterminatedComment { line: start_line });
                }
                continue;
            };
            let found = window.as_bytes()[hit];
            self.source.consume(hit + 1);
            match found {
                b'*' => {
                    if self.source.peek()? == Some('/') {
                        self.source.bump();
                        log::trace!(
                            target: "xml.tokenizer",
                            "skipped block comment, lines {start_line}..={}",
                            self.line
                        );
                        return Ok(());
                    }
                }
                b'\r' => {
                    if self.source.peek()? == Some('\n') {
                        self.source.bump();
                    }
                    self.line += 1;
                }
                _ => self.line += 1,
            }
            if self.source.peek()?.is_none() {
                return Err(XmlError::UnterminatedComment { line: start_line });
            }
        }
    }
}

fn is_whitespace(ch: char) -> bool {
    ch <= ' '
}

fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch >= '\u{A0}'
}

fn is_word_part(ch: char) -> bool {
    is_word_start(ch) || ch == '.' || ch == '-'
}

/// Whether `s` reads back as exactly one [`Token::Word`], i.e. is usable as a
/// tag name or attribute key.
pub fn is_word(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_word_start) && chars.all(is_word_part)
}

/// Tokenize a whole string. The trailing [`Token::Eof`] is not included.
pub fn tokenize(input: &str) -> XmlResult<Vec<Token>> {
    let mut tokenizer = Tokenizer::for_str(input);
    let mut out = Vec::new();
    loop {
        match tokenizer.next_token()? {
            Token::Eof => return Ok(out),
            token => out.push(token),
        }
    }
}
