//! Huffman tree construction and codeword assignment.
//!
//! The tree is stored as an arena of nodes addressed by small integer ids
//! rather than as linked pointers, so teardown is a plain `Vec` drop and
//! restoration (see `decode.rs`) can allocate nodes without an allocator
//! per call.

use crate::bitbuf::BitBuf;
use crate::freq::{FreqCounter, ALPHABET_SIZE};

pub type NodeId = u32;

#[derive(Debug, Clone, Copy)]
pub enum NodeKind {
    Leaf { byte: u8, leaf_id: u32 },
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub freq: usize,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub is_right_child: bool,
    /// Placeholder leaf manufactured for a single-symbol alphabet so the
    /// root has degree 2. Its byte value is arbitrary and must never claim
    /// a codebook slot, since that slot may belong to the real symbol.
    pub is_synthetic: bool,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}

/// An immutable, built Huffman tree plus the codebook and leaf table
/// derived from it by a single DFS pass.
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    codebook: Box<[BitBuf; ALPHABET_SIZE]>,
    leaf_bytes: Vec<u8>,
    shape_bits: BitBuf,
    num_leaves: u32,
}

impl Tree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn codeword(&self, byte: u8) -> &BitBuf {
        &self.codebook[byte as usize]
    }

    pub fn leaf_byte(&self, leaf_id: u32) -> u8 {
        self.leaf_bytes[leaf_id as usize]
    }

    pub fn num_leaves(&self) -> u32 {
        self.num_leaves
    }

    pub fn shape_bits(&self) -> &BitBuf {
        &self.shape_bits
    }

    pub fn leaf_bytes(&self) -> &[u8] {
        &self.leaf_bytes
    }

    /// Builds a tree from a frequency histogram using the linear-time
    /// two-queue construction over a frequency-sorted alphabet.
    pub fn build(freq: &FreqCounter) -> Tree {
        let mut symbols = freq.symbols();
        symbols.sort_by_key(|s| s.count);
        let live_start = symbols.iter().position(|s| s.count > 0).unwrap_or(ALPHABET_SIZE);
        let live = &symbols[live_start..];

        let mut nodes: Vec<Node> = Vec::new();
        let alloc = |nodes: &mut Vec<Node>, node: Node| -> NodeId {
            nodes.push(node);
            (nodes.len() - 1) as NodeId
        };

        let root;
        if live.is_empty() {
            root = alloc(
                &mut nodes,
                Node {
                    freq: 0,
                    kind: NodeKind::Internal { left: 0, right: 0 },
                    parent: None,
                    is_right_child: false,
                    is_synthetic: false,
                },
            );
            // zero-leaf tree: degenerate root with no usable children; kept
            // as a valid anchor so serialization always has something to
            // write (a single `0` shape bit, no leaf bytes).
            nodes[root as usize].kind = NodeKind::Leaf { byte: 0, leaf_id: 0 };
        } else if live.len() == 1 {
            let leaf = alloc(
                &mut nodes,
                Node {
                    freq: live[0].count,
                    kind: NodeKind::Leaf {
                        byte: live[0].symbol,
                        leaf_id: 0,
                    },
                    parent: None,
                    is_right_child: false,
                    is_synthetic: false,
                },
            );
            let synthetic = alloc(
                &mut nodes,
                Node {
                    freq: 0,
                    kind: NodeKind::Leaf { byte: 0, leaf_id: 1 },
                    parent: None,
                    is_right_child: true,
                    is_synthetic: true,
                },
            );
            root = alloc(
                &mut nodes,
                Node {
                    freq: live[0].count,
                    kind: NodeKind::Internal {
                        left: leaf,
                        right: synthetic,
                    },
                    parent: None,
                    is_right_child: false,
                    is_synthetic: false,
                },
            );
            nodes[leaf as usize].parent = Some(root);
            nodes[synthetic as usize].parent = Some(root);
        } else {
            // Q1: ascending leaves (built directly from the sorted suffix).
            let q1: Vec<NodeId> = live
                .iter()
                .map(|s| {
                    alloc(
                        &mut nodes,
                        Node {
                            freq: s.count,
                            kind: NodeKind::Leaf {
                                byte: s.symbol,
                                leaf_id: 0, // filled in by the DFS pass below
                            },
                            parent: None,
                            is_right_child: false,
                            is_synthetic: false,
                        },
                    )
                })
                .collect();
            let mut q2: Vec<NodeId> = Vec::with_capacity(live.len() - 1);
            let mut i1 = 0usize;
            let mut i2 = 0usize;

            let freq_of = |nodes: &[Node], id: NodeId| nodes[id as usize].freq;

            for _ in 0..live.len() - 1 {
                let take_two_from_q1 = i1 + 1 < q1.len();
                let take_one_one = i1 < q1.len() && i2 < q2.len();
                let take_two_from_q2 = i2 + 1 < q2.len();

                let sum_11 = if take_two_from_q1 {
                    Some(freq_of(&nodes, q1[i1]) + freq_of(&nodes, q1[i1 + 1]))
                } else {
                    None
                };
                let sum_12 = if take_one_one {
                    Some(freq_of(&nodes, q1[i1]) + freq_of(&nodes, q2[i2]))
                } else {
                    None
                };
                let sum_22 = if take_two_from_q2 {
                    Some(freq_of(&nodes, q2[i2]) + freq_of(&nodes, q2[i2 + 1]))
                } else {
                    None
                };

                // Prefer, in order: two leaves, one of each, two internals;
                // on equal sums the earlier option in this list wins so the
                // construction is fully deterministic.
                let use_11 = match (sum_11, sum_12, sum_22) {
                    (Some(a), b, c) => b.map_or(true, |b| a <= b) && c.map_or(true, |c| a <= c),
                    _ => false,
                };
                let use_12 = !use_11
                    && match (sum_12, sum_22) {
                        (Some(a), Some(c)) => a <= c,
                        (Some(_), None) => true,
                        _ => false,
                    };

                let (left, right) = if use_11 {
                    let pair = (q1[i1], q1[i1 + 1]);
                    i1 += 2;
                    pair
                } else if use_12 {
                    let pair = (q1[i1], q2[i2]);
                    i1 += 1;
                    i2 += 1;
                    pair
                } else {
                    let pair = (q2[i2], q2[i2 + 1]);
                    i2 += 2;
                    pair
                };

                let merged_freq = freq_of(&nodes, left) + freq_of(&nodes, right);
                let parent = alloc(
                    &mut nodes,
                    Node {
                        freq: merged_freq,
                        kind: NodeKind::Internal { left, right },
                        parent: None,
                        is_right_child: false,
                        is_synthetic: false,
                    },
                );
                nodes[left as usize].parent = Some(parent);
                nodes[left as usize].is_right_child = false;
                nodes[right as usize].parent = Some(parent);
                nodes[right as usize].is_right_child = true;
                q2.push(parent);
            }

            root = *q2.last().unwrap();
        }

        let mut tree = Tree {
            nodes,
            root,
            codebook: Box::new(std::array::from_fn(|_| BitBuf::new())),
            leaf_bytes: Vec::new(),
            shape_bits: BitBuf::new(),
            num_leaves: 0,
        };
        tree.assign_codes();
        tree
    }

    fn assign_codes(&mut self) {
        let mut code = BitBuf::new();
        let mut next_leaf_id = 0u32;
        self.dfs_assign(self.root, &mut code, &mut next_leaf_id);
        self.num_leaves = next_leaf_id;
    }

    fn dfs_assign(&mut self, id: NodeId, code: &mut BitBuf, next_leaf_id: &mut u32) {
        match self.nodes[id as usize].kind {
            NodeKind::Leaf { byte, .. } => {
                let leaf_id = *next_leaf_id;
                *next_leaf_id += 1;
                self.nodes[id as usize].kind = NodeKind::Leaf { byte, leaf_id };
                self.shape_bits.push(false);
                self.leaf_bytes.push(byte);
                if !self.nodes[id as usize].is_synthetic {
                    self.codebook[byte as usize] = code.clone();
                }
            }
            NodeKind::Internal { left, right } => {
                self.shape_bits.push(true);
                code.push(false);
                self.dfs_assign(left, code, next_leaf_id);
                code.pop();
                code.push(true);
                self.dfs_assign(right, code, next_leaf_id);
                code.pop();
            }
        }
    }
}
