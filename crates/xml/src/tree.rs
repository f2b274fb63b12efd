//! Tag tree: an arena of named, attributed nodes.
//!
//! Nodes are addressed by [`TagId`]. A node owns its children through the
//! arena; the parent link is a plain index used only to compute depth for
//! indentation, and it takes no part in equality.
use crate::error::{XmlError, XmlResult};
use crate::tokenizer::is_word;
use std::fmt;
use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u32);

impl TagId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct TagNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<TagId>,
    parent: Option<TagId>,
}

/// A tree of tags with a fixed root.
///
/// Nodes made with [`TagTree::create`] stay detached until passed to
/// [`TagTree::add_child`]. Detached nodes are never rendered and are ignored
/// by equality.
///
/// Ids are only meaningful for the tree that issued them; passing an id from
/// another tree panics on an out-of-range index or silently addresses an
/// unrelated node.
#[derive(Clone, Debug)]
pub struct TagTree {
    nodes: Vec<TagNode>,
    root: TagId,
}

impl TagTree {
    pub fn new(root_name: impl Into<String>) -> XmlResult<Self> {
        let mut tree = Self {
            nodes: Vec::new(),
            root: TagId(0),
        };
        tree.root = tree.create(root_name)?;
        Ok(tree)
    }

    pub fn root(&self) -> TagId {
        self.root
    }

    pub fn root_tag(&self) -> TagRef<'_> {
        self.tag(self.root)
    }

    pub fn tag(&self, id: TagId) -> TagRef<'_> {
        TagRef { tree: self, id }
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached node. The name must be a single word.
    pub fn create(&mut self, name: impl Into<String>) -> XmlResult<TagId> {
        let name = name.into();
        if name.is_empty() {
            return Err(XmlError::EmptyTagName);
        }
        if !is_word(&name) {
            return Err(XmlError::InvalidTagName { name });
        }
        let id = TagId(self.nodes.len() as u32);
        self.nodes.push(TagNode {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        });
        Ok(id)
    }

    /// Insert an attribute unless the key is already present (first insertion
    /// wins). Keys that are not a single word are rejected. Returns whether the
    /// attribute was added.
    ///
    /// Values are written back verbatim between `"`, so a value containing
    /// `"` does not survive externalization.
    pub fn add_attribute(
        &mut self,
        id: TagId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let key = key.into();
        if !is_word(&key) {
            return false;
        }
        let node = &mut self.nodes[id.index()];
        if node.attributes.iter().any(|(k, _)| *k == key) {
            return false;
        }
        node.attributes.push((key, value.into()));
        true
    }

    /// Attach `child` as the last child of `parent` and set its back
    /// reference.
    ///
    /// Rejected (returns `false`, tree unchanged) when the child is the root,
    /// already has a parent (including `parent` itself, so the same node
    /// cannot be added twice), or is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: TagId, child: TagId) -> bool {
        if child == self.root || self.nodes[child.index()].parent.is_some() {
            return false;
        }
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return false;
            }
            cursor = self.nodes[ancestor.index()].parent;
        }
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        true
    }

    pub fn name(&self, id: TagId) -> &str {
        &self.nodes[id.index()].name
    }

    pub fn keys(&self, id: TagId) -> impl Iterator<Item = &str> + '_ {
        self.nodes[id.index()]
            .attributes
            .iter()
            .map(|(k, _)| k.as_str())
    }

    pub fn value(&self, id: TagId, key: &str) -> Option<&str> {
        self.nodes[id.index()]
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self, id: TagId) -> &[(String, String)] {
        &self.nodes[id.index()].attributes
    }

    pub fn children(&self, id: TagId) -> &[TagId] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: TagId) -> Option<TagId> {
        self.nodes[id.index()].parent
    }

    /// Number of ancestors.
    pub fn depth(&self, id: TagId) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            depth += 1;
            cursor = self.parent(p);
        }
        depth
    }

    /// Textual form of `id` and its subtree, indented by one tab per
    /// ancestor of `id`.
    pub fn external(&self, id: TagId) -> External<'_> {
        External { tree: self, id }
    }

    pub fn to_external(&self, id: TagId) -> String {
        self.external(id).to_string()
    }

    pub fn write_external<W: io::Write>(&self, id: TagId, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self.external(id))
    }
}

/// Structural equality of the rooted trees: names, attribute sets and child
/// order. Parent links, attribute order and detached nodes are ignored.
impl PartialEq for TagTree {
    fn eq(&self, other: &Self) -> bool {
        self.root_tag().same_structure(other.root_tag())
    }
}

impl Eq for TagTree {}

/// Borrowed view of one node.
#[derive(Clone, Copy)]
pub struct TagRef<'a> {
    tree: &'a TagTree,
    id: TagId,
}

impl<'a> TagRef<'a> {
    pub fn id(self) -> TagId {
        self.id
    }

    pub fn name(self) -> &'a str {
        self.tree.name(self.id)
    }

    pub fn keys(self) -> impl Iterator<Item = &'a str> + 'a {
        self.tree.keys(self.id)
    }

    pub fn value(self, key: &str) -> Option<&'a str> {
        self.tree.value(self.id, key)
    }

    pub fn attributes(self) -> &'a [(String, String)] {
        self.tree.attributes(self.id)
    }

    pub fn has_children(self) -> bool {
        !self.tree.children(self.id).is_empty()
    }

    pub fn children(self) -> impl Iterator<Item = TagRef<'a>> + 'a {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .map(move |&id| TagRef { tree, id })
    }

    pub fn children_named<'n>(self, name: &'n str) -> impl Iterator<Item = TagRef<'a>> + 'n
    where
        'a: 'n,
    {
        self.children().filter(move |child| child.name() == name)
    }

    pub fn find_child(self, name: &str) -> Option<TagRef<'a>> {
        self.children().find(|child| child.name() == name)
    }

    pub fn parent(self) -> Option<TagRef<'a>> {
        self.tree.parent(self.id).map(|id| self.tree.tag(id))
    }

    pub fn depth(self) -> usize {
        self.tree.depth(self.id)
    }

    /// All nodes below this one in document order.
    pub fn descendants(self) -> Descendants<'a> {
        let mut stack: Vec<TagId> = self.tree.children(self.id).to_vec();
        stack.reverse();
        Descendants {
            tree: self.tree,
            stack,
        }
    }

    /// Same name, same attribute set and structurally equal children in the
    /// same order.
    pub fn same_structure(self, other: TagRef<'_>) -> bool {
        if self.name() != other.name() || !same_attribute_set(self.attributes(), other.attributes())
        {
            return false;
        }
        let ours = self.tree.children(self.id);
        let theirs = other.tree.children(other.id);
        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs)
                .all(|(&a, &b)| self.tree.tag(a).same_structure(other.tree.tag(b)))
    }
}

impl fmt::Debug for TagRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("attributes", &self.attributes())
            .finish()
    }
}

fn same_attribute_set(a: &[(String, String)], b: &[(String, String)]) -> bool {
    // Keys are unique per node, so equal length plus containment is set equality.
    a.len() == b.len() && a.iter().all(|(k, v)| b.iter().any(|(bk, bv)| bk == k && bv == v))
}

pub struct Descendants<'a> {
    tree: &'a TagTree,
    stack: Vec<TagId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = TagRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(self.tree.tag(id))
    }
}

/// `Display` adapter returned by [`TagTree::external`].
pub struct External<'a> {
    tree: &'a TagTree,
    id: TagId,
}

impl fmt::Display for External<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tag(f, self.tree, self.id, self.tree.depth(self.id))
    }
}

const INDENT: &str = "\t";

fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_tag(f: &mut fmt::Formatter<'_>, tree: &TagTree, id: TagId, depth: usize) -> fmt::Result {
    write_indent(f, depth)?;
    write!(f, "<{}", tree.name(id))?;
    for (key, value) in tree.attributes(id) {
        write!(f, " {key}=\"{value}\"")?;
    }
    let children = tree.children(id);
    if children.is_empty() {
        return f.write_str(" />\n");
    }
    f.write_str(">\n")?;
    for &child in children {
        write_tag(f, tree, child, depth + 1)?;
    }
    write_indent(f, depth)?;
    writeln!(f, "</{}>", tree.name(id))
}
