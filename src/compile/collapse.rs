//! Key collapse: flattening a directory-shaped tree into addressable names.
//!
//! A [`KeyNode`] tree mirrors a directory listing. Named groups are
//! directories (their key carries a trailing `/`), indexed leaves are files
//! whose value is the file name. Collapsing concatenates every named ancestor
//! key with the leaf's own segment, so `{"sub/": ["a.coffee"], 0: "b.coffee"}`
//! becomes `["sub/a.coffee", "b.coffee"]`.
//!
//! Traversal is depth-first, pre-order, left-to-right and iterative: the
//! depth of a directory tree is bounded only by the filesystem.

/// Key of a node within its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A named key; contributes itself to collapsed names.
    Named(String),
    /// A positional key; a leaf under it contributes its value instead.
    Index(usize),
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// A node of a collapsible tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyNode {
    /// Internal node holding ordered children.
    Group {
        /// Key of the group within its parent
        key: Key,
        /// Ordered children
        children: Vec<KeyNode>,
    },
    /// Scalar leaf.
    Leaf {
        /// Key of the leaf within its parent
        key: Key,
        /// Leaf value, used as the final segment under an index key
        value: String,
    },
}

impl KeyNode {
    /// Build a named group.
    pub fn group(key: impl Into<Key>, children: Vec<KeyNode>) -> Self {
        Self::Group {
            key: key.into(),
            children,
        }
    }

    /// Build a leaf.
    pub fn leaf(key: impl Into<Key>, value: impl Into<String>) -> Self {
        Self::Leaf {
            key: key.into(),
            value: value.into(),
        }
    }
}

enum Step<'a> {
    Enter(&'a KeyNode),
    Leave {
        pushed: bool,
    },
}

/// Collapse a forest of nodes into one name per leaf, in pre-order.
#[must_use]
pub fn collapse(nodes: &[KeyNode]) -> Vec<String> {
    let mut names = Vec::new();
    let mut path: Vec<&str> = Vec::new();
    let mut pending: Vec<Step<'_>> = nodes.iter().rev().map(Step::Enter).collect();

    while let Some(step) = pending.pop() {
        match step {
            Step::Enter(KeyNode::Group { key, children }) => {
                let pushed = match key {
                    Key::Named(segment) => {
                        path.push(segment);
                        true
                    }
                    Key::Index(_) => false,
                };
                pending.push(Step::Leave {
                    pushed,
                });
                pending.extend(children.iter().rev().map(Step::Enter));
            }
            Step::Enter(KeyNode::Leaf { key, value }) => {
                let last = match key {
                    Key::Named(segment) => segment.as_str(),
                    Key::Index(_) => value.as_str(),
                };
                let mut name = path.concat();
                name.push_str(last);
                names.push(name);
            }
            Step::Leave { pushed } => {
                if pushed {
                    path.pop();
                }
            }
        }
    }

    names
}
