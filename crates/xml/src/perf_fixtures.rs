//! Synthetic documents for benchmarks and size-scaling tests.

pub const PROPERTY_TEMPLATE: &str = "\t<property name=\"key\" value=\"some value\" />\n";

/// A `configuration` document with `count` property lines.
pub fn make_properties(count: usize) -> String {
    let mut doc = String::with_capacity(PROPERTY_TEMPLATE.len() * count + 32);
    doc.push_str("<configuration>\n");
    for _ in 0..count {
        doc.push_str(PROPERTY_TEMPLATE);
    }
    doc.push_str("</configuration>\n");
    doc
}

/// A chain of `depth` nested `level` tags around one leaf.
pub fn make_nested(depth: usize) -> String {
    let mut doc = String::new();
    for i in 0..depth {
        doc.push_str(&"\t".repeat(i));
        doc.push_str("<level>\n");
    }
    doc.push_str(&"\t".repeat(depth));
    doc.push_str("<leaf />\n");
    for i in (0..depth).rev() {
        doc.push_str(&"\t".repeat(i));
        doc.push_str("</level>\n");
    }
    doc
}
