use zeroize::Zeroizing;

use crate::hash::{self, Block, BLOCK_LEN};

/// Fills `destination` with output derived from a snapshot of the working state.
///
/// Block `j` of the output is `Hash(snapshot ^ j)`, with `j` XORed into the first
/// eight bytes only. The snapshot itself never reaches the output.
pub(crate) fn fill_from_snapshot(snapshot: &Block, destination: &mut [u8]) {
    let mut block = Zeroizing::new([0_u8; BLOCK_LEN]);
    for (position, chunk) in (0_u64..).zip(destination.chunks_mut(BLOCK_LEN)) {
        block.copy_from_slice(snapshot);
        hash::xor_counter(&mut block, position);
        let output = hash::digest(&[&block[..]]);
        chunk.copy_from_slice(&output[..chunk.len()]);
    }
}
