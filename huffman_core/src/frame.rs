//! Tree-frame and block-frame serialization (encode side).
//!
//! Layout, all integers little-endian:
//! ```text
//! tree_frame  := crc32(tree_body) .. u32_le(len(tree_body)) .. tree_body
//! tree_body   := shape_bits_padded .. leaf_bytes
//! block_frame := crc32(block_bits) .. u32_le(symbol_count) .. block_bits_padded
//! ```
//! The tree frame zeroes its CRC field before hashing the whole header+body
//! and patches the result back in (`patch_crc`), since the original byte
//! count needs to travel inside the hashed region. Block frames don't share
//! that constraint and instead hash only bytes `[4..end)`, leaving the CRC
//! field itself untouched and out of band, per the block wire format.

use crate::bitbuf::BitBuf;
use crate::crc32::crc32;
use crate::tree::Tree;

pub const HEADER_SIZE: usize = 8;

fn patch_crc(buf: &mut [u8]) {
    buf[0..4].copy_from_slice(&[0, 0, 0, 0]);
    let crc = crc32(buf);
    buf[0..4].copy_from_slice(&crc.to_le_bytes());
}

/// Serializes a tree's shape bits and leaf-byte table into a framed buffer.
pub fn encode_tree_frame(tree: &Tree) -> Vec<u8> {
    let mut body = Vec::from(tree.shape_bits().bytes());
    body.extend_from_slice(tree.leaf_bytes());

    let mut out = vec![0u8; HEADER_SIZE];
    out[4..8].copy_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    patch_crc(&mut out);
    out
}

/// Encodes one contiguous run of bytes into a single self-contained block
/// frame using `tree`'s codebook.
pub fn encode_block(tree: &Tree, bytes: &[u8]) -> Vec<u8> {
    let mut bits = BitBuf::new();
    for &b in bytes {
        let codeword = tree.codeword(b);
        debug_assert!(!codeword.is_empty(), "byte {b} has no codeword");
        bits.append(codeword);
    }

    let mut out = vec![0u8; HEADER_SIZE];
    out[4..8].copy_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bits.bytes());
    let crc = crc32(&out[4..]);
    out[0..4].copy_from_slice(&crc.to_le_bytes());
    out
}

/// Encodes `bytes` as a sequence of independent block frames, splitting the
/// work across the parallel dispatcher when the input is large enough.
/// Shards are concatenated in input order, which the streaming decoder
/// depends on.
pub fn encode_blocks(tree: &Tree, bytes: &[u8]) -> Vec<u8> {
    crate::parallel::parallel_calc(
        bytes,
        |shard| encode_block(tree, shard),
        |shards: Vec<Vec<u8>>| shards.into_iter().flatten().collect(),
    )
}
