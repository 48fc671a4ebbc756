use std::io::Read;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand_core::{CryptoRng, RngCore};

use crate::derive::fill_from_snapshot;
use crate::state::State;
#[cfg(any(unix, feature = "allow-getrandom"))]
use crate::{CheckedEntropy, DefaultEntropy};
use crate::{EntropySource, Error};

/// A SHA-512 hash DRBG, seeded lazily from an [EntropySource].
///
/// The generator seeds itself on first use and reseeds automatically when its
/// internal counter wraps around. It can be shared between threads (for example
/// in an `Arc`): each call holds the internal lock only long enough to advance
/// the state once, and derives its output after releasing it,
/// so a large request does not block other callers.
///
/// Every call advances the internal state before any output is derived,
/// so output from earlier calls cannot be recomputed from the state
/// of the generator at a later point.
pub struct HashDrbg<T>
where
    T: EntropySource,
{
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    state: State,
    entropy_source: T,
}

#[cfg(any(unix, feature = "allow-getrandom"))]
impl HashDrbg<CheckedEntropy<DefaultEntropy>> {
    /// Creates a new generator that seeds from the system entropy source,
    /// with health tests on the entropy.
    ///
    /// No entropy is read until the first call that needs it,
    /// so creating the generator never fails.
    ///
    /// returns: `HashDrbg`
    #[must_use]
    pub fn new() -> Self {
        Self::from_entropy(CheckedEntropy::new(DefaultEntropy::new()))
    }
}

#[cfg(any(unix, feature = "allow-getrandom"))]
impl Default for HashDrbg<CheckedEntropy<DefaultEntropy>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HashDrbg<T>
where
    T: EntropySource,
{
    /// Creates a new generator that seeds from an [EntropySource].
    ///
    /// # Arguments
    ///
    /// * `entropy_source`: The entropy source to seed and reseed from
    ///
    /// returns: `HashDrbg`
    pub fn from_entropy(entropy_source: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: State::new(),
                entropy_source,
            }),
        }
    }

    /// Fills a slice with random bytes.
    ///
    /// # Arguments
    ///
    /// * `destination`: The slice to fill
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropySourceUnavailable`] if seeding or an automatic reseed
    /// fails. `destination` is not written to in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// let drbg = hashdrbg::HashDrbg::new();
    /// let mut key = [0_u8; 32];
    /// drbg.generate(&mut key)?;
    /// # Ok::<(), hashdrbg::Error>(())
    /// ```
    pub fn generate(&self, destination: &mut [u8]) -> Result<(), Error> {
        let snapshot = {
            let mut inner = self.lock();
            let Inner {
                state,
                entropy_source,
            } = &mut *inner;
            state.seed_if_needed(entropy_source)?;
            state.advance(entropy_source)?
        };
        fill_from_snapshot(&snapshot, destination);
        Ok(())
    }

    /// Generates an array of random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropySourceUnavailable`] if seeding or an automatic reseed fails.
    ///
    /// # Examples
    ///
    /// ```
    /// let drbg = hashdrbg::HashDrbg::new();
    /// let nonce: [u8; 12] = drbg.generate_array()?;
    /// # Ok::<(), hashdrbg::Error>(())
    /// ```
    pub fn generate_array<const N: usize>(&self) -> Result<[u8; N], Error> {
        let mut result = [0; N];
        self.generate(&mut result)?;
        Ok(result)
    }

    /// Mixes fresh entropy into the generator state.
    /// If the generator has not been seeded yet, it is seeded instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropySourceUnavailable`] if the entropy source fails.
    /// The generator state is unchanged in that case.
    pub fn reseed(&self) -> Result<(), Error> {
        let mut inner = self.lock();
        let Inner {
            state,
            entropy_source,
        } = &mut *inner;
        if state.is_seeded() {
            state.reseed(entropy_source)
        } else {
            state.seed_if_needed(entropy_source)
        }
    }

    /// Returns true once the generator has been successfully seeded.
    pub fn is_seeded(&self) -> bool {
        self.lock().state.is_seeded()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // The state is only ever replaced as a whole, so a panic elsewhere
        // cannot leave it half updated.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reading always fills the whole buffer, or fails without writing to it.
impl<T> Read for &HashDrbg<T>
where
    T: EntropySource,
{
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.generate(buf)?;
        Ok(buf.len())
    }
}

impl<T> Read for HashDrbg<T>
where
    T: EntropySource,
{
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.generate(buf)?;
        Ok(buf.len())
    }
}

impl<T> RngCore for HashDrbg<T>
where
    T: EntropySource,
{
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    /// # Panics
    ///
    /// Panics if the generator cannot be seeded or reseeded.
    /// Use `try_fill_bytes` to handle this instead.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = self.generate(dest) {
            panic!("HashDrbg failed to generate random data: {err}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Ok(self.generate(dest)?)
    }
}

impl<T> CryptoRng for HashDrbg<T> where T: EntropySource {}
