// File: hashlog-merkle/src/node.rs
use hashlog_hash::{Digest, Hasher};
use hashlog_proof::{Direction, PathEntry};

/// Node of a perfect subtree. Interior nodes own their children outright and
/// cache their hash; nothing is rehashed after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf { hash: Digest, data: Vec<u8> },
    Interior { hash: Digest, height: u32, left: Box<Node>, right: Box<Node> },
}

impl Node {
    pub fn leaf(data: Vec<u8>, hash: Digest) -> Self { Node::Leaf { hash, data } }

    /// Parent of two equal-height subtrees.
    pub fn join(hasher: &Hasher, left: Node, right: Node) -> Self {
        debug_assert_eq!(left.height(), right.height());
        let hash = hasher.hash_pair(left.hash().as_bytes(), right.hash().as_bytes());
        let height = left.height() + 1;
        Node::Interior { hash, height, left: Box::new(left), right: Box::new(right) }
    }

    pub fn hash(&self) -> &Digest {
        match self {
            Node::Leaf { hash, .. } | Node::Interior { hash, .. } => hash,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Interior { height, .. } => *height,
        }
    }

    /// Number of leaves below.
    pub fn size(&self) -> u64 { 1 << self.height() }

    /// Walk down to the node of `height` covering leaf `index` (relative to
    /// this subtree), pushing the sibling passed at every level, top first.
    pub fn descend(&self, index: u64, height: u32, siblings: &mut Vec<PathEntry>) -> &Node {
        let mut node = self;
        while node.height() > height {
            let Node::Interior { left, right, height: h, .. } = node else { break };
            if (index >> (h - 1)) & 1 == 0 {
                siblings.push(PathEntry::new(Direction::Right, right.hash().clone()));
                node = &**left;
            } else {
                siblings.push(PathEntry::new(Direction::Left, left.hash().clone()));
                node = &**right;
            }
        }
        node
    }

    /// Relative index of the leftmost leaf hashing to `target`.
    pub fn position_of(&self, target: &Digest) -> Option<u64> {
        match self {
            Node::Leaf { hash, .. } => (hash == target).then_some(0),
            Node::Interior { left, right, .. } => {
                left.position_of(target).or_else(|| right.position_of(target).map(|i| i + left.size()))
            }
        }
    }
}
