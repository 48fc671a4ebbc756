//! A deterministic random bit generator (DRBG) that turns a slow or low quality
//! source of entropy into a fast stream of cryptographically strong bytes.
//!
//! The construction is a hash DRBG over SHA-512 with a 64-bit reseed counter:
//! the generator seeds itself from its [EntropySource] on first use,
//! advances its secret state once per request under a short lock,
//! and derives the requested bytes from a snapshot of that state outside the lock.
//!
//! ```
//! use std::io::Read;
//!
//! let drbg = hashdrbg::HashDrbg::new();
//! let mut key = [0_u8; 32];
//! (&drbg).read_exact(&mut key).unwrap();
//! drbg.reseed().unwrap();
//! ```
//!
//! There is no process-wide instance: create one generator and share it,
//! for example in an `Arc`.
#![forbid(unsafe_code)]

mod derive;
mod drbg;
mod entropy;
mod error;
mod hash;
mod health;
mod state;

pub use drbg::HashDrbg;
#[cfg(any(unix, feature = "allow-getrandom"))]
pub use entropy::DefaultEntropy;
#[cfg(unix)]
pub use entropy::DevUrandom;
#[cfg(all(not(unix), feature = "allow-getrandom"))]
pub use entropy::GetRandom;
pub use entropy::{EntropySource, HostEntropy, SplitMix};
pub use error::Error;
pub use health::CheckedEntropy;
