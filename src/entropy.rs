#![allow(clippy::module_name_repetitions)]

#[cfg(unix)]
use std::fs::File;
#[cfg(unix)]
use std::io::Read;

use crate::Error;

/// This is a trait for entropy sources, used to seed and reseed the generator.
pub trait EntropySource {
    /// Fills a buffer with unpredictable data.
    ///
    /// The whole buffer must be filled. A source that cannot do so must return
    /// an error, and the contents of `destination` are then unspecified.
    ///
    /// # Arguments
    ///
    /// * `destination`: The buffer to fill with random data
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropySourceUnavailable`] if the source is unavailable or broken.
    fn fill(&mut self, destination: &mut [u8]) -> Result<(), Error>;
}

impl<T> EntropySource for &mut T
where
    T: EntropySource + ?Sized,
{
    fn fill(&mut self, destination: &mut [u8]) -> Result<(), Error> {
        (**self).fill(destination)
    }
}

/// This is an alias that maps to `DevUrandom` or `GetRandom`, depending on the platform
#[cfg(unix)]
pub type DefaultEntropy = DevUrandom;
#[cfg(all(not(unix), feature = "allow-getrandom"))]
pub type DefaultEntropy = GetRandom;

/// This is an entropy source that reads from /dev/urandom.
///
/// The device is opened on first use, so creating a [DevUrandom] never fails.
/// If opening or reading fails, the error is reported from `fill`
/// and the next call tries again.
#[cfg(unix)]
#[derive(Default)]
pub struct DevUrandom {
    dev_urandom: Option<File>,
}

#[cfg(unix)]
impl DevUrandom {
    const PATH: &'static str = "/dev/urandom";

    /// Creates a new [DevUrandom] entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self { dev_urandom: None }
    }

    fn device(&mut self) -> Result<&mut File, Error> {
        let file = match self.dev_urandom.take() {
            Some(file) => file,
            None => File::open(Self::PATH).map_err(|err| {
                log::warn!("failed to open {}: {err}", Self::PATH);
                Error::EntropySourceUnavailable
            })?,
        };
        Ok(self.dev_urandom.insert(file))
    }
}

#[cfg(unix)]
impl EntropySource for DevUrandom {
    fn fill(&mut self, destination: &mut [u8]) -> Result<(), Error> {
        let result = self.device()?.read_exact(destination);
        if let Err(err) = result {
            log::warn!("failed to read from {}: {err}", Self::PATH);
            self.dev_urandom = None;
            return Err(Error::EntropySourceUnavailable);
        }
        if !destination.is_empty() && destination.iter().all(|v| *v == 0) {
            log::warn!("{} generated all zeros", Self::PATH);
            return Err(Error::EntropySourceUnavailable);
        }
        Ok(())
    }
}

/// This is an entropy source that uses the getrandom crate,
/// which maps to `random_get` on WASI.
#[cfg(all(not(unix), feature = "allow-getrandom"))]
#[derive(Default)]
pub struct GetRandom;

#[cfg(all(not(unix), feature = "allow-getrandom"))]
impl GetRandom {
    /// Creates a new `GetRandom` entropy source
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }
}

#[cfg(all(not(unix), feature = "allow-getrandom"))]
impl EntropySource for GetRandom {
    fn fill(&mut self, destination: &mut [u8]) -> Result<(), Error> {
        getrandom::fill(destination).map_err(|err| {
            log::warn!("getrandom::fill failed: {err}");
            Error::EntropySourceUnavailable
        })?;
        if !destination.is_empty() && destination.iter().all(|v| *v == 0) {
            log::warn!("getrandom generated all zeros");
            return Err(Error::EntropySourceUnavailable);
        }
        Ok(())
    }
}

/// Adapts a host-provided "fill this buffer with raw entropy" primitive
/// into an [EntropySource].
///
/// # Examples
///
/// ```
/// use hashdrbg::{Error, HashDrbg, HostEntropy};
///
/// let host = HostEntropy::new(|destination: &mut [u8]| {
///     for (i, byte) in destination.iter_mut().enumerate() {
///         *byte = i as u8; // a real host call goes here
///     }
///     Ok::<(), Error>(())
/// });
/// let drbg = HashDrbg::from_entropy(host);
/// let mut key = [0_u8; 32];
/// drbg.generate(&mut key).unwrap();
/// ```
pub struct HostEntropy<F> {
    fill_random: F,
}

impl<F> HostEntropy<F>
where
    F: FnMut(&mut [u8]) -> Result<(), Error>,
{
    /// Wraps a host fill function.
    ///
    /// # Arguments
    ///
    /// * `fill_random`: Must fill the whole buffer, or fail
    pub fn new(fill_random: F) -> Self {
        Self { fill_random }
    }
}

impl<F> EntropySource for HostEntropy<F>
where
    F: FnMut(&mut [u8]) -> Result<(), Error>,
{
    fn fill(&mut self, destination: &mut [u8]) -> Result<(), Error> {
        (self.fill_random)(destination)
    }
}

/// This implementation of `EntropySource` generates an arbitrary length output from a u64 seed
/// using the SplitMix algorithm from <https://prng.di.unimi.it/splitmix64.c>
///
/// It is deterministic and never fails, which makes it useful for reproducible tests.
/// It must not be used to seed a generator whose output needs to be secret.
pub struct SplitMix {
    state: u64,
}

impl SplitMix {
    /// Creates a new [SplitMix] using a u64 seed.
    ///
    /// # Arguments
    ///
    /// * `seed`: The seed value to initialize with
    ///
    /// returns: [SplitMix]
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl EntropySource for SplitMix {
    fn fill(&mut self, destination: &mut [u8]) -> Result<(), Error> {
        for chunk in destination.chunks_mut(core::mem::size_of::<u64>()) {
            let num = chunk.len();
            chunk.copy_from_slice(&self.next().to_be_bytes()[0..num]);
        }
        Ok(())
    }
}
