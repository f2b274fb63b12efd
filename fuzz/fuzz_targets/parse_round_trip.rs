#![no_main]

use libfuzzer_sys::fuzz_target;
use xml::tree_snapshot::{TreeSnapshotOptions, compare_trees};
use xml::{ParserConfig, TagParser};

fuzz_target!(|data: &[u8]| {
    let parser = TagParser::new(ParserConfig {
        max_depth: Some(256),
        ..ParserConfig::default()
    });
    let Ok(tree) = parser.parse_reader(data) else {
        return;
    };
    // Parsed names are words and parsed values hold no `"`, so the external
    // form always reads back.
    let text = tree.to_external(tree.root());
    let reparsed = match parser.parse_str(&text) {
        Ok(reparsed) => reparsed,
        Err(err) => panic!("external form failed to parse: {err}\n{text}"),
    };
    if let Err(mismatch) = compare_trees(&tree, &reparsed, TreeSnapshotOptions::default()) {
        panic!("{mismatch}");
    }
});
