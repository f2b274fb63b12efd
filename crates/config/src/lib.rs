//! Property configuration stored as tag markup.
//!
//! A document has a `configuration` root; every `property` tag below it
//! contributes all of its attributes as key/value pairs:
//!
//! ```text
//! <configuration>
//! 	<property port="8080" />
//! 	<property timeout="30 SECONDS" />
//! </configuration>
//! ```

mod configuration;
mod error;
mod exporter;
mod importer;
mod time;

pub use configuration::Configuration;
pub use error::{ConfigError, ConfigResult};
pub use exporter::{export, export_to_writer, to_external, to_tree};
pub use importer::{from_tree, load_file, load_reader, load_str};
pub use time::{TimeData, TimeUnit};

/// Name of the document root.
pub const ROOT_TAG: &str = "configuration";
/// Name of the tags that carry key/value attributes.
pub const PROPERTY_TAG: &str = "property";
