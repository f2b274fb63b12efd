use crate::tree::{TagRef, TagTree};
use std::fmt::{self, Write};
use std::sync::OnceLock;

/// Deterministic tree rendering and comparison for parser and corpus tests.
/// Not a stable format.
///
/// Equivalence rules:
/// - Tag names must match.
/// - Attribute keys and values must match. Order is ignored unless
///   `ignore_attribute_order` is off.
/// - Child count and child order must match.
/// - Parent links and detached nodes play no part.
#[derive(Clone, Copy, Debug)]
pub struct TreeSnapshotOptions {
    pub ignore_attribute_order: bool,
}

impl Default for TreeSnapshotOptions {
    fn default() -> Self {
        Self {
            ignore_attribute_order: true,
        }
    }
}

#[derive(Debug)]
pub struct TreeSnapshot {
    lines: Vec<String>,
}

impl TreeSnapshot {
    pub fn new(tag: TagRef<'_>, options: TreeSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(tag, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn of_tree(tree: &TagTree) -> Self {
        Self::new(tree.root_tag(), TreeSnapshotOptions::default())
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for TreeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct TreeMismatch<'a> {
    path: String,
    detail: String,
    expected: String,
    actual: String,
    expected_tag: TagRef<'a>,
    actual_tag: TagRef<'a>,
    options: TreeSnapshotOptions,
    expected_subtree: OnceLock<String>,
    actual_subtree: OnceLock<String>,
}

impl TreeMismatch<'_> {
    /// Slash-separated location, e.g. `/configuration/property[1]`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for TreeMismatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected_subtree = self
            .expected_subtree
            .get_or_init(|| TreeSnapshot::new(self.expected_tag, self.options).render());
        let actual_subtree = self
            .actual_subtree
            .get_or_init(|| TreeSnapshot::new(self.actual_tag, self.options).render());
        writeln!(f, "tree mismatch at {}: {}", self.path, self.detail)?;
        writeln!(f, "expected: {}", self.expected)?;
        writeln!(f, "actual:   {}", self.actual)?;
        writeln!(f, "expected subtree:\n{expected_subtree}")?;
        writeln!(f, "actual subtree:\n{actual_subtree}")?;
        Ok(())
    }
}

impl std::error::Error for TreeMismatch<'_> {}

pub fn assert_tree_eq(expected: &TagTree, actual: &TagTree, options: TreeSnapshotOptions) {
    if let Err(mismatch) = compare_trees(expected, actual, options) {
        panic!("{mismatch}");
    }
}

pub fn compare_trees<'a>(
    expected: &'a TagTree,
    actual: &'a TagTree,
    options: TreeSnapshotOptions,
) -> Result<(), Box<TreeMismatch<'a>>> {
    compare_tags(expected.root_tag(), actual.root_tag(), options)
}

/// Compare two subtrees, which may come from different trees.
pub fn compare_tags<'a>(
    expected: TagRef<'a>,
    actual: TagRef<'a>,
    options: TreeSnapshotOptions,
) -> Result<(), Box<TreeMismatch<'a>>> {
    let mut path = vec![expected.name().to_string()];
    compare_nodes(expected, actual, &options, &mut path)
}

fn compare_nodes<'a>(
    expected: TagRef<'a>,
    actual: TagRef<'a>,
    options: &TreeSnapshotOptions,
    path: &mut Vec<String>,
) -> Result<(), Box<TreeMismatch<'a>>> {
    if expected.name() != actual.name() {
        return Err(Box::new(mismatch(path, "tag name", expected, actual, options)));
    }
    if sorted_attributes(expected, options) != sorted_attributes(actual, options) {
        return Err(Box::new(mismatch(path, "attributes", expected, actual, options)));
    }
    let expected_children: Vec<TagRef<'a>> = expected.children().collect();
    let actual_children: Vec<TagRef<'a>> = actual.children().collect();
    if expected_children.len() != actual_children.len() {
        return Err(Box::new(mismatch(
            path,
            &format!(
                "child count (expected {}, actual {})",
                expected_children.len(),
                actual_children.len()
            ),
            expected,
            actual,
            options,
        )));
    }
    for (idx, (exp, act)) in expected_children.into_iter().zip(actual_children).enumerate() {
        path.push(format!("{}[{}]", exp.name(), idx));
        let result = compare_nodes(exp, act, options, path);
        path.pop();
        result?;
    }
    Ok(())
}

fn sorted_attributes<'a>(
    tag: TagRef<'a>,
    options: &TreeSnapshotOptions,
) -> Vec<&'a (String, String)> {
    let mut attrs: Vec<&(String, String)> = tag.attributes().iter().collect();
    if options.ignore_attribute_order {
        attrs.sort();
    }
    attrs
}

fn mismatch<'a>(
    path: &[String],
    detail: &str,
    expected: TagRef<'a>,
    actual: TagRef<'a>,
    options: &TreeSnapshotOptions,
) -> TreeMismatch<'a> {
    TreeMismatch {
        path: format!("/{}", path.join("/")),
        detail: detail.to_string(),
        expected: truncate_line(format_tag_line(expected, options), 160),
        actual: truncate_line(format_tag_line(actual, options), 160),
        expected_tag: expected,
        actual_tag: actual,
        options: *options,
        expected_subtree: OnceLock::new(),
        actual_subtree: OnceLock::new(),
    }
}

fn truncate_line(mut line: String, max_len: usize) -> String {
    if line.len() > max_len {
        let mut cut = max_len.saturating_sub(3);
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
        line.push_str("...");
    }
    line
}

fn walk_snapshot(
    tag: TagRef<'_>,
    options: &TreeSnapshotOptions,
    depth: usize,
    out: &mut Vec<String>,
) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(depth * INDENT_STEP);
    write_tag_line(&mut line, tag, options);
    out.push(line);
    for child in tag.children() {
        walk_snapshot(child, options, depth + 1, out);
    }
}

fn format_tag_line(tag: TagRef<'_>, options: &TreeSnapshotOptions) -> String {
    let mut line = String::new();
    write_tag_line(&mut line, tag, options);
    line
}

fn write_tag_line(out: &mut String, tag: TagRef<'_>, options: &TreeSnapshotOptions) {
    out.push('<');
    out.push_str(tag.name());
    for (key, value) in sorted_attributes(tag, options) {
        let _ = write!(out, " {key}=\"{value}\"");
    }
    out.push('>');
}
