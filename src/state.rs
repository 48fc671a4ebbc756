use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::hash::{self, tag, Block, BLOCK_LEN};
use crate::{EntropySource, Error};

/// The secret state of the generator.
///
/// `v` is the working state, `c` a constant derived from `v` on every (re)seed,
/// and `counter` the reseed-interval counter. All three are only meaningful
/// once `initialized` is set, and a reseed always replaces all three.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct State {
    v: Block,
    c: Block,
    counter: u64,
    initialized: bool,
}

impl State {
    pub(crate) fn new() -> Self {
        Self {
            v: [0; BLOCK_LEN],
            c: [0; BLOCK_LEN],
            counter: 0,
            initialized: false,
        }
    }

    pub(crate) fn is_seeded(&self) -> bool {
        self.initialized
    }

    /// Seeds the state from the entropy source, unless this has already been done.
    ///
    /// On failure the state stays unseeded, so a later call tries again.
    pub(crate) fn seed_if_needed<T>(&mut self, entropy_source: &mut T) -> Result<(), Error>
    where
        T: EntropySource + ?Sized,
    {
        if self.initialized {
            return Ok(());
        }
        let mut seed = Zeroizing::new([0_u8; BLOCK_LEN]);
        entropy_source.fill(&mut seed[..])?;
        self.v.copy_from_slice(&seed[..]);
        self.derive_constants();
        self.update(entropy_source)?;
        self.initialized = true;
        log::debug!("generator seeded");
        Ok(())
    }

    /// Copies out the current working state, then advances it,
    /// so the copy can never be observed again through this state.
    pub(crate) fn advance<T>(&mut self, entropy_source: &mut T) -> Result<Zeroizing<Block>, Error>
    where
        T: EntropySource + ?Sized,
    {
        let snapshot = Zeroizing::new(self.v);
        self.update(entropy_source)?;
        Ok(snapshot)
    }

    /// Mixes `v` with its own hash, the constant and the counter,
    /// reseeding first if the counter has wrapped around.
    fn update<T>(&mut self, entropy_source: &mut T) -> Result<(), Error>
    where
        T: EntropySource + ?Sized,
    {
        let mut digest = hash::tagged(tag::UPDATE, &self.v);
        for ((v, d), c) in self.v.iter_mut().zip(digest.iter()).zip(self.c.iter()) {
            *v ^= d ^ c;
        }
        hash::xor_counter(&mut self.v, self.counter);
        digest.zeroize();

        if self.counter == 0 {
            log::debug!("reseed counter wrapped around");
            // The counter stays at zero on failure, so the next update retries.
            self.reseed(entropy_source)?;
        }
        self.counter = self.counter.wrapping_add(1);
        Ok(())
    }

    /// Mixes fresh entropy into `v` and derives a new constant and counter from it.
    ///
    /// On failure the state is left exactly as it was.
    pub(crate) fn reseed<T>(&mut self, entropy_source: &mut T) -> Result<(), Error>
    where
        T: EntropySource + ?Sized,
    {
        let pre = hash::tagged(tag::RESEED, &self.v);
        let mut fresh = Zeroizing::new([0_u8; BLOCK_LEN]);
        entropy_source.fill(&mut fresh[..])?;
        let v = hash::digest(&[&pre[..], &fresh[..]]);
        self.v.copy_from_slice(&v[..]);
        self.derive_constants();
        log::debug!("generator reseeded");
        Ok(())
    }

    fn derive_constants(&mut self) {
        let c = hash::tagged(tag::CONSTANT, &self.v);
        self.c.copy_from_slice(&c[..]);
        let counter_seed = hash::tagged(tag::COUNTER, &self.v);
        let mut raw = [0_u8; 8];
        raw.copy_from_slice(&counter_seed[..8]);
        self.counter = u64::from_le_bytes(raw);
        raw.zeroize();
    }
}
