//! Recursive tree builder over the token stream.
//!
//! One tag per line: after a tag's `>` the rest of the line is discarded, then
//! child tags are read until the matching `</name>`. Text content is not
//! modelled; tokens that fit no production are skipped.
use crate::error::{XmlError, XmlResult};
use crate::tokenizer::{Token, Tokenizer};
use crate::tree::{TagId, TagTree};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the tree builder.
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Reject `</x>` that does not name the open tag. When off, any close
    /// tag closes the innermost open tag.
    pub strict_closing_tags: bool,
    /// Deepest allowed nesting, counting the root as depth 0. `None` means
    /// unlimited.
    pub max_depth: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_closing_tags: true,
            max_depth: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TagParser {
    config: ParserConfig,
}

impl TagParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse_str(&self, input: &str) -> XmlResult<TagTree> {
        self.parse_reader(input.as_bytes())
    }

    /// Parse one document from `reader`. The reader is consumed only up to
    /// the root's close tag plus whatever the last buffered read pulled in.
    pub fn parse_reader<R: Read>(&self, reader: R) -> XmlResult<TagTree> {
        let mut cursor = TokenCursor::new(Tokenizer::new(reader));
        let tree = parse_document(&mut cursor, &self.config)?;
        log::trace!(
            target: "xml.parser",
            "parsed <{}> with {} tags, stopped at line {}",
            tree.name(tree.root()),
            tree.len(),
            cursor.line()
        );
        Ok(tree)
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> XmlResult<TagTree> {
        let path = path.as_ref();
        log::trace!(target: "xml.parser", "parsing file {}", path.display());
        let file = File::open(path)?;
        self.parse_reader(file)
    }
}

/// Parse with the default configuration.
pub fn parse_str(input: &str) -> XmlResult<TagTree> {
    TagParser::default().parse_str(input)
}

pub fn parse_reader<R: Read>(reader: R) -> XmlResult<TagTree> {
    TagParser::default().parse_reader(reader)
}

pub fn parse_file(path: impl AsRef<Path>) -> XmlResult<TagTree> {
    TagParser::default().parse_file(path)
}

/// Token stream with one token of lookahead and the line of the last
/// consumed token.
struct TokenCursor<R> {
    tokenizer: Tokenizer<R>,
    peeked: Option<(Token, usize)>,
    line: usize,
}

impl<R: Read> TokenCursor<R> {
    fn new(tokenizer: Tokenizer<R>) -> Self {
        Self {
            tokenizer,
            peeked: None,
            line: 1,
        }
    }

    fn line(&self) -> usize {
        self.line
    }

    fn read(&mut self) -> XmlResult<(Token, usize)> {
        let token = self.tokenizer.next_token()?;
        // An EOL has already advanced the tokenizer to the next line.
        let line = match token {
            Token::Eol => self.tokenizer.line() - 1,
            _ => self.tokenizer.line(),
        };
        Ok((token, line))
    }

    fn peek(&mut self) -> XmlResult<&Token> {
        let next = match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.read()?,
        };
        Ok(&self.peeked.insert(next).0)
    }

    fn advance(&mut self) -> XmlResult<Token> {
        let (token, line) = match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.read()?,
        };
        self.line = line;
        Ok(token)
    }
}

fn parse_document<R: Read>(
    cursor: &mut TokenCursor<R>,
    config: &ParserConfig,
) -> XmlResult<TagTree> {
    skip_to_open_bracket(cursor, None)?;
    if cursor.peek()?.is_symbol('/') {
        cursor.advance()?;
        return Err(XmlError::UnexpectedClosingTag {
            line: cursor.line(),
        });
    }
    let name = read_tag_name(cursor, None)?;
    log::trace!(target: "xml.parser", "open root <{name}> line={}", cursor.line());
    let mut tree = TagTree::new(name)?;
    let root = tree.root();
    parse_tag_body(cursor, config, &mut tree, root, 0)?;
    Ok(tree)
}

/// Consume tokens through the next `<`. `open_tag` names the innermost open
/// tag for the end-of-input error.
fn skip_to_open_bracket<R: Read>(
    cursor: &mut TokenCursor<R>,
    open_tag: Option<&str>,
) -> XmlResult<()> {
    loop {
        match cursor.advance()? {
            Token::Symbol('<') => return Ok(()),
            Token::Eof => return Err(unexpected_eof(cursor, open_tag)),
            _ => {}
        }
    }
}

fn read_tag_name<R: Read>(
    cursor: &mut TokenCursor<R>,
    open_tag: Option<&str>,
) -> XmlResult<String> {
    loop {
        match cursor.advance()? {
            Token::Word(name) => return Ok(name),
            Token::Eof => return Err(unexpected_eof(cursor, open_tag)),
            _ => {}
        }
    }
}

fn unexpected_eof<R>(cursor: &TokenCursor<R>, open_tag: Option<&str>) -> XmlError {
    XmlError::UnexpectedEof {
        tag: open_tag.map(str::to_string),
        line: cursor.line,
    }
}

/// Attributes, the end of the tag line, then children up to the close tag.
fn parse_tag_body<R: Read>(
    cursor: &mut TokenCursor<R>,
    config: &ParserConfig,
    tree: &mut TagTree,
    id: TagId,
    depth: usize,
) -> XmlResult<()> {
    let self_closing = parse_attributes(cursor, tree, id)?;
    skip_rest_of_line(cursor)?;
    if self_closing {
        log::trace!(target: "xml.parser", "self-closing <{}>", tree.name(id));
        return Ok(());
    }

    loop {
        skip_to_open_bracket(cursor, Some(tree.name(id)))?;
        if cursor.peek()?.is_symbol('/') {
            cursor.advance()?;
            return parse_close_tag(cursor, config, tree.name(id));
        }

        let child_depth = depth + 1;
        if let Some(max_depth) = config.max_depth.filter(|&max| child_depth > max) {
            return Err(XmlError::MaxDepthExceeded {
                max_depth,
                line: cursor.line(),
            });
        }
        let name = read_tag_name(cursor, Some(tree.name(id)))?;
        log::trace!(
            target: "xml.parser",
            "open <{name}> depth={child_depth} line={}",
            cursor.line()
        );
        let child = tree.create(name)?;
        tree.add_child(id, child);
        parse_tag_body(cursor, config, tree, child, child_depth)?;
    }
}

/// Read `key="value"` pairs up to `>`. Returns whether a `/` marked the tag
/// self-closing.
fn parse_attributes<R: Read>(
    cursor: &mut TokenCursor<R>,
    tree: &mut TagTree,
    id: TagId,
) -> XmlResult<bool> {
    let mut self_closing = false;
    loop {
        match cursor.advance()? {
            Token::Symbol('>') => return Ok(self_closing),
            Token::Symbol('/') => self_closing = true,
            Token::Word(key) => {
                if !cursor.peek()?.is_symbol('=') {
                    // Bare word, no value.
                    continue;
                }
                cursor.advance()?;
                match cursor.advance()? {
                    Token::Str(value) => {
                        if !tree.add_attribute(id, key.as_str(), value) {
                            log::trace!(
                                target: "xml.parser",
                                "duplicate attribute '{key}' on <{}> ignored",
                                tree.name(id)
                            );
                        }
                    }
                    Token::Eof => return Err(unexpected_eof(cursor, Some(tree.name(id)))),
                    _ => {
                        return Err(XmlError::MalformedAttribute {
                            tag: tree.name(id).to_string(),
                            attribute: key,
                            line: cursor.line(),
                        });
                    }
                }
            }
            Token::Eof => return Err(unexpected_eof(cursor, Some(tree.name(id)))),
            _ => {}
        }
    }
}

/// Drop what is left of the tag line, stopping before a `<` so a tag that
/// shares the line is still seen.
fn skip_rest_of_line<R: Read>(cursor: &mut TokenCursor<R>) -> XmlResult<()> {
    loop {
        match cursor.peek()? {
            Token::Eof | Token::Symbol('<') => return Ok(()),
            Token::Eol => {
                cursor.advance()?;
                return Ok(());
            }
            _ => {
                cursor.advance()?;
            }
        }
    }
}

/// Called after `</`. Reads the name and consumes through `>`.
fn parse_close_tag<R: Read>(
    cursor: &mut TokenCursor<R>,
    config: &ParserConfig,
    open_tag: &str,
) -> XmlResult<()> {
    let mut found = None;
    loop {
        match cursor.advance()? {
            Token::Symbol('>') => break,
            Token::Word(name) if found.is_none() => found = Some(name),
            Token::Eof => return Err(unexpected_eof(cursor, Some(open_tag))),
            _ => {}
        }
    }
    let found = found.unwrap_or_default();
    if config.strict_closing_tags && found != open_tag {
        return Err(XmlError::MismatchedClosingTag {
            expected: open_tag.to_string(),
            found,
            line: cursor.line(),
        });
    }
    log::trace!(target: "xml.parser", "close </{found}> line={}", cursor.line());
    Ok(())
}
