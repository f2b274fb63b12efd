use crate::configuration::Configuration;
use crate::error::{ConfigError, ConfigResult};
use crate::{PROPERTY_TAG, ROOT_TAG};
use std::io::Read;
use std::path::Path;
use xml::{TagRef, TagTree};

pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Configuration> {
    let path = path.as_ref();
    log::debug!(target: "config", "loading {}", path.display());
    from_tree(&xml::parse_file(path)?)
}

pub fn load_reader<R: Read>(reader: R) -> ConfigResult<Configuration> {
    from_tree(&xml::parse_reader(reader)?)
}

pub fn load_str(text: &str) -> ConfigResult<Configuration> {
    from_tree(&xml::parse_str(text)?)
}

/// Collect the attributes of every `property` tag reachable from the root
/// through `property` tags only. Other tags and their subtrees are skipped.
pub fn from_tree(tree: &TagTree) -> ConfigResult<Configuration> {
    let root = tree.root_tag();
    if root.name() != ROOT_TAG {
        return Err(ConfigError::InvalidRoot {
            found: root.name().to_string(),
        });
    }
    let mut config = Configuration::new();
    for child in root.children() {
        insert_property(child, &mut config);
    }
    log::debug!(target: "config", "loaded {} keys", config.len());
    Ok(config)
}

fn insert_property(tag: TagRef<'_>, config: &mut Configuration) {
    if tag.name() != PROPERTY_TAG {
        log::debug!(target: "config", "skipping <{}> subtree", tag.name());
        return;
    }
    for (key, value) in tag.attributes() {
        config.insert(key.as_str(), value);
    }
    for child in tag.children() {
        insert_property(child, config);
    }
}
