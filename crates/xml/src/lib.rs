//! Line-oriented tag markup: tokenizer, recursive tree builder, and a tag
//! tree that renders back to the same textual form.
//!
//! ```
//! let tree = xml::parse_str("<root>\n<child a=\"x\" />\n</root>\n").unwrap();
//! let child = tree.root_tag().find_child("child").unwrap();
//! assert_eq!(child.value("a"), Some("x"));
//! assert_eq!(
//!     tree.to_external(tree.root()),
//!     "<root>\n\t<child a=\"x\" />\n</root>\n"
//! );
//! ```

pub mod perf_fixtures;
#[cfg(test)]
mod streaming_parity;
#[cfg(test)]
pub mod test_harness;
#[cfg(any(test, feature = "tree-snapshot"))]
pub mod tree_snapshot;

mod error;
mod parser;
mod source;
mod tokenizer;
mod tree;

pub use error::{XmlError, XmlResult};
pub use parser::{ParserConfig, TagParser, parse_file, parse_reader, parse_str};
pub use tokenizer::{Token, Tokenizer, is_word, tokenize};
pub use tree::{Descendants, External, TagId, TagRef, TagTree};
