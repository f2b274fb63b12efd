use crate::configuration::Configuration;
use crate::error::{ConfigError, ConfigResult};
use crate::{PROPERTY_TAG, ROOT_TAG};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use xml::TagTree;

/// One `property` tag per key/value pair under a `configuration` root, keys
/// in sorted order and values in insertion order.
///
/// Fails with `InvalidValue` for pairs that would not read back: keys that
/// are not a single word and values containing `"`.
pub fn to_tree(config: &Configuration) -> ConfigResult<TagTree> {
    let mut tree = TagTree::new(ROOT_TAG)?;
    let root = tree.root();
    for (key, values) in config.iter() {
        if !xml::is_word(key) {
            return Err(ConfigError::invalid_value(key, "", "key is not a valid attribute name"));
        }
        for value in values {
            if value.contains('"') {
                return Err(ConfigError::invalid_value(key, value, "value contains '\"'"));
            }
            let property = tree.create(PROPERTY_TAG)?;
            tree.add_attribute(property, key, value.as_str());
            tree.add_child(root, property);
        }
    }
    Ok(tree)
}

pub fn to_external(config: &Configuration) -> ConfigResult<String> {
    let tree = to_tree(config)?;
    Ok(tree.to_external(tree.root()))
}

pub fn export_to_writer<W: Write>(config: &Configuration, writer: &mut W) -> ConfigResult<()> {
    let tree = to_tree(config)?;
    tree.write_external(tree.root(), writer)?;
    Ok(())
}

/// Write `config` to `path`, replacing any previous content.
pub fn export(config: &Configuration, path: impl AsRef<Path>) -> ConfigResult<()> {
    let path = path.as_ref();
    let tree = to_tree(config)?;
    let mut writer = BufWriter::new(File::create(path)?);
    tree.write_external(tree.root(), &mut writer)?;
    writer.flush()?;
    log::debug!(
        target: "config",
        "exported {} properties to {}",
        tree.children(tree.root()).len(),
        path.display()
    );
    Ok(())
}
