//! Encoder façade: owns a built tree and exposes the tree frame plus
//! block-frame encoding over arbitrary byte slices.

use crate::frame::{encode_blocks, encode_tree_frame};
use crate::freq::FreqCounter;
use crate::tree::Tree;

pub struct Encoder {
    tree: Tree,
    tree_frame: Vec<u8>,
}

impl Encoder {
    /// Builds the Huffman tree for `freq` and pre-computes its serialized
    /// frame.
    pub fn new(freq: &FreqCounter) -> Self {
        let tree = Tree::build(freq);
        let tree_frame = encode_tree_frame(&tree);
        Self { tree, tree_frame }
    }

    pub fn tree_frame(&self) -> &[u8] {
        &self.tree_frame
    }

    /// Encodes `bytes` into one or more concatenated, independently
    /// verifiable block frames.
    pub fn encode(&self, bytes: &[u8]) -> Vec<u8> {
        encode_blocks(&self.tree, bytes)
    }
}
