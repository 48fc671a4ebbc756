use core::fmt;

/// Errors reported by the generator and its entropy sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The entropy source could not supply the requested bytes,
    /// or the bytes it supplied failed the health tests.
    /// Raised only while seeding or reseeding.
    EntropySourceUnavailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntropySourceUnavailable => f.write_str("no entropy source"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        std::io::Error::other(err)
    }
}

impl From<Error> for rand_core::Error {
    fn from(err: Error) -> Self {
        rand_core::Error::new(err)
    }
}
