//! Streaming decoder: tree restoration followed by block-by-block decode.
//!
//! Both phases are driven by a cursor that can stop at any byte boundary
//! and resume on the next call, so callers can feed the compressed stream
//! in arbitrarily-sized chunks.

use std::collections::VecDeque;

use bytemuck::Pod;

use crate::crc32::{crc32, Crc32};
use crate::error::CorruptedStream;

type NodeId = u32;

#[derive(Debug, Clone, Copy)]
struct DNode {
    left: Option<NodeId>,
    right: Option<NodeId>,
    leaf_id: Option<u32>,
    parent: Option<NodeId>,
    is_right: bool,
}

enum State {
    TreeHeader {
        buf: [u8; 8],
        cnt: usize,
    },
    TreeBody {
        expected_crc: u32,
        body_len: u32,
        header: [u8; 8],
        body: Vec<u8>,
        received: usize,
    },
    BlockHeader {
        buf: [u8; 8],
        cnt: usize,
    },
    BlockBody {
        expected_crc: u32,
        remaining: u32,
        crc: Crc32,
        cursor: NodeId,
    },
}

/// Reconstructs a tree from its serialized frame, then decodes a stream of
/// block frames against it.
pub struct Decoder {
    nodes: Vec<DNode>,
    root: NodeId,
    leaf_table: Vec<u8>,
    state: State,
    tree_ready: bool,
    last_block_ok: bool,
    decoded: VecDeque<u8>,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: 0,
            leaf_table: Vec::new(),
            state: State::TreeHeader { buf: [0; 8], cnt: 0 },
            tree_ready: false,
            last_block_ok: true,
            decoded: VecDeque::new(),
        }
    }

    fn alloc_node(&mut self, parent: Option<NodeId>, is_right: bool) -> NodeId {
        self.nodes.push(DNode {
            left: None,
            right: None,
            leaf_id: None,
            parent,
            is_right,
        });
        (self.nodes.len() - 1) as NodeId
    }

    /// Feeds bytes into the tree-header/tree-body state machine. Idempotent
    /// once the tree is restored. Returns the number of bytes consumed from
    /// `chunk`; the caller should re-feed any unconsumed tail to `prepare`.
    pub fn initialize_tree(&mut self, chunk: &[u8]) -> Result<usize, CorruptedStream> {
        if self.tree_ready {
            return Ok(0);
        }
        let mut pos = 0;
        loop {
            match &mut self.state {
                State::TreeHeader { buf, cnt } => {
                    while *cnt < 8 && pos < chunk.len() {
                        buf[*cnt] = chunk[pos];
                        *cnt += 1;
                        pos += 1;
                    }
                    if *cnt < 8 {
                        return Ok(pos);
                    }
                    let expected_crc = u32::from_le_bytes(buf[0..4].try_into().unwrap());
                    let body_len = u32::from_le_bytes(buf[4..8].try_into().unwrap());
                    if body_len == 0 {
                        return Err(CorruptedStream::new("tree frame has zero-length body"));
                    }
                    let header = *buf;
                    self.state = State::TreeBody {
                        expected_crc,
                        body_len,
                        header,
                        body: Vec::with_capacity(body_len as usize),
                        received: 0,
                    };
                }
                State::TreeBody {
                    expected_crc,
                    body_len,
                    header,
                    body,
                    received,
                } => {
                    while *received < *body_len as usize && pos < chunk.len() {
                        body.push(chunk[pos]);
                        pos += 1;
                        *received += 1;
                    }
                    if *received < *body_len as usize {
                        return Ok(pos);
                    }
                    let mut full = Vec::with_capacity(8 + body.len());
                    full.extend_from_slice(&[0, 0, 0, 0]);
                    full.extend_from_slice(&header[4..8]);
                    full.extend_from_slice(body);
                    let actual = crc32(&full);
                    if actual != *expected_crc {
                        return Err(CorruptedStream::new("tree frame CRC mismatch"));
                    }
                    let body = std::mem::take(body);
                    self.restore_tree(&body)?;
                    self.tree_ready = true;
                    self.state = State::BlockHeader { buf: [0; 8], cnt: 0 };
                    return Ok(pos);
                }
                _ => unreachable!("tree already restored"),
            }
        }
    }

    fn restore_tree(&mut self, body: &[u8]) -> Result<(), CorruptedStream> {
        self.nodes.clear();
        let root = self.alloc_node(None, false);
        self.root = root;
        let mut cursor = root;
        let mut leaf_order: Vec<NodeId> = Vec::new();
        let mut bit_index = 0usize;

        loop {
            let byte_idx = bit_index / 8;
            if byte_idx >= body.len() {
                return Err(CorruptedStream::new("tree shape bits truncated"));
            }
            let bit = body[byte_idx] & (1 << (7 - bit_index % 8)) != 0;
            bit_index += 1;

            if bit {
                let child = self.alloc_node(Some(cursor), false);
                self.nodes[cursor as usize].left = Some(child);
                cursor = child;
                continue;
            }

            let leaf_id = leaf_order.len() as u32;
            self.nodes[cursor as usize].leaf_id = Some(leaf_id);
            leaf_order.push(cursor);

            loop {
                if !self.nodes[cursor as usize].is_right {
                    break;
                }
                cursor = self.nodes[cursor as usize].parent.unwrap();
            }

            if cursor == root {
                let shape_bytes = bit_index.div_ceil(8);
                return self.fill_leaf_bytes(body, shape_bytes, leaf_order);
            }

            let parent = self.nodes[cursor as usize].parent.unwrap();
            let new_node = self.alloc_node(Some(parent), true);
            self.nodes[parent as usize].right = Some(new_node);
            cursor = new_node;
        }
    }

    fn fill_leaf_bytes(
        &mut self,
        body: &[u8],
        shape_bytes: usize,
        leaf_order: Vec<NodeId>,
    ) -> Result<(), CorruptedStream> {
        let needed = leaf_order.len();
        if body.len() < shape_bytes + needed {
            return Err(CorruptedStream::new("tree body truncated before leaf bytes"));
        }
        self.leaf_table = body[shape_bytes..shape_bytes + needed].to_vec();
        Ok(())
    }

    /// Feeds block-frame bytes, appending decoded bytes to the internal
    /// FIFO that `decode` drains from.
    pub fn prepare(&mut self, chunk: &[u8]) -> Result<(), CorruptedStream> {
        if !self.tree_ready {
            return Err(CorruptedStream::new("prepare called before tree restored"));
        }
        let mut pos = 0;
        while pos < chunk.len() {
            match &mut self.state {
                State::BlockHeader { buf, cnt } => {
                    while *cnt < 8 && pos < chunk.len() {
                        buf[*cnt] = chunk[pos];
                        *cnt += 1;
                        pos += 1;
                    }
                    if *cnt < 8 {
                        return Ok(());
                    }
                    let expected_crc = u32::from_le_bytes(buf[0..4].try_into().unwrap());
                    let remaining = u32::from_le_bytes(buf[4..8].try_into().unwrap());
                    let mut crc = Crc32::new();
                    crc.update_slice(&buf[4..8]);
                    self.state = State::BlockBody {
                        expected_crc,
                        remaining,
                        crc,
                        cursor: self.root,
                    };
                }
                State::BlockBody {
                    expected_crc,
                    remaining,
                    crc,
                    cursor,
                } => {
                    while *remaining > 0 && pos < chunk.len() {
                        let byte = chunk[pos];
                        pos += 1;
                        crc.update(byte);
                        for bit_i in 0..8u8 {
                            let bit = byte & (1 << (7 - bit_i)) != 0;
                            let node = &self.nodes[*cursor as usize];
                            let next = if bit { node.right } else { node.left };
                            *cursor = next.ok_or_else(|| {
                                CorruptedStream::new("decode walk reached a missing child")
                            })?;
                            let landed = &self.nodes[*cursor as usize];
                            if landed.left.is_none() && landed.right.is_none() {
                                let byte_out = self.leaf_table[landed.leaf_id.unwrap() as usize];
                                self.decoded.push_back(byte_out);
                                *cursor = self.root;
                                *remaining -= 1;
                                if *remaining == 0 {
                                    break;
                                }
                            }
                        }
                    }
                    if *remaining == 0 {
                        let matched = crc.finalize() == *expected_crc;
                        self.last_block_ok = matched;
                        if !matched {
                            return Err(CorruptedStream::new("block frame CRC mismatch"));
                        }
                        self.state = State::BlockHeader { buf: [0; 8], cnt: 0 };
                    } else {
                        return Ok(());
                    }
                }
                _ => unreachable!("prepare called before tree restored"),
            }
        }
        Ok(())
    }

    /// Drains decoded bytes into `out`, reinterpreting them as `T`. Leaves
    /// any trailing partial element buffered for the next call.
    pub fn decode<T: Pod>(&mut self, out: &mut Vec<T>) -> usize {
        let elem_size = std::mem::size_of::<T>();
        let whole = self.decoded.len() / elem_size.max(1);
        let mut buf = vec![0u8; elem_size];
        for _ in 0..whole {
            for slot in buf.iter_mut() {
                *slot = self.decoded.pop_front().unwrap();
            }
            out.push(bytemuck::pod_read_unaligned(&buf));
        }
        whole
    }

    /// Empties the decoded-byte FIFO without disturbing tree or stream state.
    pub fn clear(&mut self) {
        self.decoded.clear();
    }

    /// Deallocates the tree and resets all header/hash state to zero.
    pub fn free_tree(&mut self) {
        *self = Decoder::new();
    }

    /// Whether tree restoration has completed and `prepare` can be called.
    pub fn is_tree_ready(&self) -> bool {
        self.tree_ready
    }

    /// True iff decoding sits at a block-header boundary with no partial
    /// header buffered and the last completed block's CRC matched.
    pub fn read_finished_success(&self) -> bool {
        self.tree_ready
            && matches!(&self.state, State::BlockHeader { cnt, .. } if *cnt == 0)
            && self.last_block_ok
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
