//! Canonical-free Huffman codec: the tree's shape is serialized directly
//! (depth-first pre-order bits plus a flat leaf-byte list) rather than as
//! canonical code lengths, so the decoder rebuilds the exact same tree
//! shape the encoder walked instead of re-deriving codes from lengths.

pub mod bitbuf;
pub mod codec;
pub mod crc32;
pub mod decode;
pub mod error;
pub mod frame;
pub mod freq;
pub mod parallel;
pub mod tree;

pub use bitbuf::BitBuf;
pub use codec::Encoder;
pub use decode::Decoder;
pub use error::CorruptedStream;
pub use freq::FreqCounter;
pub use tree::Tree;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn roundtrip(data: &[u8]) {
        let mut freq = FreqCounter::new();
        freq.update_bytes(data);
        let encoder = Encoder::new(&freq);

        let mut stream = Vec::new();
        stream.extend_from_slice(encoder.tree_frame());
        stream.extend_from_slice(&encoder.encode(data));

        let mut decoder = Decoder::new();
        let consumed = decoder.initialize_tree(&stream).expect("tree restore");
        decoder.prepare(&stream[consumed..]).expect("block decode");

        let mut out: Vec<u8> = Vec::new();
        decoder.decode(&mut out);

        assert_eq!(out, data);
        assert!(decoder.read_finished_success());
    }

    #[test]
    fn empty_input_round_trips() {
        roundtrip(&[]);
    }

    #[test]
    fn single_byte_round_trips() {
        roundtrip(b"a");
    }

    #[test]
    fn repeated_single_symbol_round_trips() {
        roundtrip(&[b'x'; 4096]);
    }

    #[test]
    fn two_symbol_codewords_are_length_one() {
        let mut freq = FreqCounter::new();
        freq.update_bytes(b"ababababab");
        let tree = Tree::build(&freq);
        assert_eq!(tree.codeword(b'a').size(), 1);
        assert_eq!(tree.codeword(b'b').size(), 1);
    }

    #[test]
    fn small_english_round_trips() {
        roundtrip(b"abracadabrac");
    }

    #[test]
    fn codebook_is_prefix_free() {
        let mut freq = FreqCounter::new();
        freq.update_bytes(b"the quick brown fox jumps over the lazy dog");
        let tree = Tree::build(&freq);
        let mut present = Vec::new();
        for b in 0u16..256 {
            let code = tree.codeword(b as u8);
            if !code.is_empty() {
                present.push(code.to_bit_string());
            }
        }
        for (i, a) in present.iter().enumerate() {
            for (j, b) in present.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_str()), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn histogram_merge_is_commutative_across_chunks() {
        let mut rng = rand::rng();
        let data: Vec<u8> = (0..10_000).map(|_| rng.random::<u8>()).collect();

        let mut whole = FreqCounter::new();
        whole.update_bytes(&data);

        let mut chunked = FreqCounter::new();
        let mut pos = 0;
        while pos < data.len() {
            let take = rng.random_range(1..=137).min(data.len() - pos);
            chunked.update_bytes(&data[pos..pos + take]);
            pos += take;
        }

        for b in 0u16..256 {
            assert_eq!(whole.count(b as u8), chunked.count(b as u8));
        }
    }

    #[test]
    fn chunked_encode_matches_single_shot_encode() {
        let mut rng = rand::rng();
        let data: Vec<u8> = (0..10_000).map(|_| rng.random::<u8>()).collect();

        let mut freq = FreqCounter::new();
        freq.update_bytes(&data);
        let encoder = Encoder::new(&freq);

        let mut chunked_stream = Vec::new();
        chunked_stream.extend_from_slice(encoder.tree_frame());
        let mut pos = 0;
        let mut chunk_count = 0;
        while pos < data.len() {
            let take = rng.random_range(1..=90).min(data.len() - pos);
            chunked_stream.extend_from_slice(&encoder.encode(&data[pos..pos + take]));
            pos += take;
            chunk_count += 1;
        }
        assert!(chunk_count > 1);

        let mut decoder = Decoder::new();
        let consumed = decoder.initialize_tree(&chunked_stream).unwrap();
        decoder.prepare(&chunked_stream[consumed..]).unwrap();
        let mut out: Vec<u8> = Vec::new();
        decoder.decode(&mut out);
        assert_eq!(out, data);
        assert!(decoder.read_finished_success());
    }

    #[test]
    fn chunked_decode_input_matches_single_shot_decode() {
        let mut rng = rand::rng();
        let data: Vec<u8> = (0..10_000).map(|_| rng.random::<u8>()).collect();

        let mut freq = FreqCounter::new();
        freq.update_bytes(&data);
        let encoder = Encoder::new(&freq);
        let mut stream = Vec::new();
        stream.extend_from_slice(encoder.tree_frame());
        stream.extend_from_slice(&encoder.encode(&data));

        let mut decoder = Decoder::new();
        let mut pos = 0;
        while pos < stream.len() {
            let take = rng.random_range(1..=97).min(stream.len() - pos);
            let slice = &stream[pos..pos + take];
            pos += take;
            if !decoder.is_tree_ready() {
                let used = decoder.initialize_tree(slice).unwrap();
                if used < slice.len() {
                    decoder.prepare(&slice[used..]).unwrap();
                }
            } else {
                decoder.prepare(slice).unwrap();
            }
        }

        let mut out: Vec<u8> = Vec::new();
        decoder.decode(&mut out);
        assert_eq!(out, data);
        assert!(decoder.read_finished_success());
    }

    #[test]
    fn mixed_type_payload_round_trips_by_byte_serialization() {
        let mut rng = rand::rng();
        let values: Vec<u64> = (0..10_000).map(|_| rng.random::<u64>()).collect();
        let bytes: &[u8] = bytemuck::cast_slice(&values);

        let mut freq = FreqCounter::new();
        freq.update(&values);
        let encoder = Encoder::new(&freq);

        let mut stream = Vec::new();
        stream.extend_from_slice(encoder.tree_frame());
        stream.extend_from_slice(&encoder.encode(bytes));

        let mut decoder = Decoder::new();
        let consumed = decoder.initialize_tree(&stream).unwrap();
        decoder.prepare(&stream[consumed..]).unwrap();

        let mut out: Vec<u64> = Vec::new();
        decoder.decode(&mut out);
        assert_eq!(out, values);
    }

    #[test]
    fn flipped_tree_frame_byte_is_detected() {
        let data = vec![b'a'; 100_000];
        let mut freq = FreqCounter::new();
        freq.update_bytes(&data);
        let encoder = Encoder::new(&freq);

        let mut tree_frame = encoder.tree_frame().to_vec();
        let flip_at = tree_frame.len() / 2;
        tree_frame[flip_at] ^= 0x01;

        let mut decoder = Decoder::new();
        assert!(decoder.initialize_tree(&tree_frame).is_err());
    }

    #[test]
    fn flipped_block_frame_byte_is_detected() {
        let data = vec![b'a'; 100_000];
        let mut freq = FreqCounter::new();
        freq.update_bytes(&data);
        let encoder = Encoder::new(&freq);

        let tree_frame = encoder.tree_frame().to_vec();
        let mut block = encoder.encode(&data);
        let flip_at = block.len() / 2;
        block[flip_at] ^= 0x01;

        let mut decoder = Decoder::new();
        let consumed = decoder.initialize_tree(&tree_frame).unwrap();
        assert_eq!(consumed, tree_frame.len());
        assert!(decoder.prepare(&block).is_err());
    }
}
