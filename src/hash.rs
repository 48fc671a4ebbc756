//! The hash collaborator: SHA-512 over one or more byte strings,
//! finalized straight into a buffer that is wiped on drop.

use sha2::digest::generic_array::GenericArray;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

/// Size of the working state, the derived constant and every hash output.
pub(crate) const BLOCK_LEN: usize = 64;

pub(crate) type Block = [u8; BLOCK_LEN];

/// Domain separation tags, prepended to the state before hashing.
pub(crate) mod tag {
    pub(crate) const CONSTANT: u8 = 0x00;
    pub(crate) const RESEED: u8 = 0x01;
    pub(crate) const UPDATE: u8 = 0x03;
    pub(crate) const COUNTER: u8 = 0x04;
}

/// Hashes the concatenation of `parts`.
pub(crate) fn digest(parts: &[&[u8]]) -> Zeroizing<Block> {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = Zeroizing::new([0_u8; BLOCK_LEN]);
    hasher.finalize_into(GenericArray::from_mut_slice(&mut output[..]));
    output
}

/// Hashes `tag ‖ data`.
pub(crate) fn tagged(tag: u8, data: &Block) -> Zeroizing<Block> {
    digest(&[&[tag], data])
}

/// XORs the little-endian bytes of `counter` into the first eight bytes of `block`.
/// The remaining bytes are left untouched.
pub(crate) fn xor_counter(block: &mut Block, counter: u64) {
    for (byte, counter_byte) in block.iter_mut().zip(counter.to_le_bytes()) {
        *byte ^= counter_byte;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_parts_equals_digest_of_concatenation() {
        let data = [7_u8; BLOCK_LEN];
        let mut joined = vec![tag::UPDATE];
        joined.extend_from_slice(&data);
        assert_eq!(*tagged(tag::UPDATE, &data), *digest(&[&joined[..]]));
    }

    #[test]
    fn tags_separate_domains() {
        let data = [0_u8; BLOCK_LEN];
        let outputs = [
            tagged(tag::CONSTANT, &data),
            tagged(tag::RESEED, &data),
            tagged(tag::UPDATE, &data),
            tagged(tag::COUNTER, &data),
        ];
        for (i, a) in outputs.iter().enumerate() {
            for b in &outputs[i + 1..] {
                assert_ne!(**a, **b);
            }
        }
    }

    #[test]
    fn digest_matches_sha512_test_vector() {
        // FIPS 180-2 "abc" example
        let output = digest(&[b"a", b"bc"]);
        assert_eq!(
            output[..8],
            [0xdd, 0xaf, 0x35, 0xa1, 0x93, 0x61, 0x7a, 0xba]
        );
        assert_eq!(
            output[56..],
            [0x2a, 0x9a, 0xc9, 0x4f, 0xa5, 0x4c, 0xa4, 0x9f]
        );
    }

    #[test]
    fn counter_only_touches_first_eight_bytes() {
        let mut block = [0xff_u8; BLOCK_LEN];
        xor_counter(&mut block, 0x0102_0304_0506_0708);
        assert_eq!(
            block[..8],
            [0xf7, 0xf8, 0xf9, 0xfa, 0xfb, 0xfc, 0xfd, 0xfe]
        );
        assert!(block[8..].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn zero_counter_is_a_no_op() {
        let mut block = [0x5a_u8; BLOCK_LEN];
        xor_counter(&mut block, 0);
        assert_eq!(block, [0x5a; BLOCK_LEN]);
    }
}
