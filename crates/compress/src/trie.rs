//! Binary trie used by [`crate::Dictionary::decode`] to walk a compressed
//! bitstream back into bytes.

/// A node in the decode trie. A code of length 0 is represented by the root
/// itself being a [`TrieNode::Leaf`].
pub enum TrieNode {
    /// Interior node with an optional child for each bit value.
    Branch(Option<Box<TrieNode>>, Option<Box<TrieNode>>),
    /// A complete code terminates here, yielding the original byte.
    Leaf(u8),
}

impl TrieNode {
    /// An empty interior node.
    pub fn empty_branch() -> Self {
        Self::Branch(None, None)
    }

    /// Inserts `byte`'s `code` into the trie rooted at `self`. `code` may be
    /// up to 255 bits long, per the dictionary format's code-length range.
    ///
    /// An empty code replaces the root with a leaf outright (an unreachable
    /// case in practice, since decoding always consumes at least one bit
    /// before testing for a match — see [`crate::Dictionary::decode`]).
    pub fn insert(&mut self, code: &[bool], byte: u8) {
        let mut node = self;
        for &bit in code {
            let (left, right) = match node {
                Self::Branch(left, right) => (left, right),
                Self::Leaf(_) => unreachable!("dictionary codes must be prefix-free"),
            };
            let slot = if bit { right } else { left };
            if slot.is_none() {
                *slot = Some(Box::new(Self::empty_branch()));
            }
            node = slot.as_mut().unwrap();
        }
        *node = Self::Leaf(byte);
    }

    /// Follows `bit` from this node, returning the child reached.
    pub fn step(&self, bit: bool) -> Option<&TrieNode> {
        match self {
            Self::Branch(left, right) => {
                let slot = if bit { right } else { left };
                slot.as_deref()
            }
            Self::Leaf(_) => None,
        }
    }

    /// Returns the byte carried by this node if it is a leaf.
    pub fn leaf_byte(&self) -> Option<u8> {
        match self {
            Self::Leaf(byte) => Some(*byte),
            Self::Branch(..) => None,
        }
    }
}
