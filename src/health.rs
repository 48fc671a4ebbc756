use crate::{EntropySource, Error};

/// This is an [EntropySource] which wraps another source and performs
/// health tests on its data, to detect a source that is broken.
///
/// A failed test is reported as [`Error::EntropySourceUnavailable`],
/// so a generator seeded from a broken source fails instead of
/// producing predictable output.
pub struct CheckedEntropy<T>
where
    T: EntropySource,
{
    previous: Option<[u8; 8]>,
    source: T,
    repetition_count_tester: RepetitionCountTester,
    adaptive_proportion_tester: AdaptiveProportionTester,
}

impl<T> CheckedEntropy<T>
where
    T: EntropySource,
{
    /// Wraps an entropy source in health tests.
    ///
    /// # Arguments
    ///
    /// * `source`: The entropy source to check
    ///
    /// returns: `CheckedEntropy`
    pub fn new(source: T) -> Self {
        Self {
            previous: None,
            source,
            repetition_count_tester: RepetitionCountTester::default(),
            adaptive_proportion_tester: AdaptiveProportionTester::default(),
        }
    }

    fn run_tests(&mut self, data: &[u8]) -> Result<(), Error> {
        // NIST SP 800-90B "Repetition Count Test" (section 4.4.1)
        self.repetition_count_tester.test(data)?;
        // NIST SP 800-90B "Adaptive Proportion Test" (section 4.4.2)
        self.adaptive_proportion_tester.test(data)
    }
}

impl<T> Default for CheckedEntropy<T>
where
    T: EntropySource + Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> EntropySource for CheckedEntropy<T>
where
    T: EntropySource,
{
    fn fill(&mut self, destination: &mut [u8]) -> Result<(), Error> {
        if self.previous.is_none() {
            let mut first = [0; 8];
            self.source.fill(&mut first)?;
            self.run_tests(&first)?;
            self.previous = Some(first);
        }

        // Ensure that the entropy source does not repeat itself,
        // by getting 8 bytes every time and comparing them to
        // the 8 bytes from last time.
        // These 8 bytes are never part of the data returned to the caller,
        // so holding on to them does not retain any secret output.
        let mut new_random = [0; 8];
        self.source.fill(&mut new_random)?;
        if self.previous == Some(new_random) {
            return Err(health_failure("the source repeats data"));
        }

        self.source.fill(destination)?;

        if destination
            .windows(new_random.len())
            .any(|candidate| candidate == new_random)
        {
            return Err(health_failure(
                "found earlier data as a substring in new data",
            ));
        }

        self.run_tests(&new_random)?;
        self.run_tests(destination)?;

        self.previous = Some(new_random);
        Ok(())
    }
}

fn health_failure(reason: &str) -> Error {
    log::warn!("entropy source health test failed: {reason}");
    Error::EntropySourceUnavailable
}

// This is the Repetition Count Test algorithm from NIST 800-90B section 4.4.1
#[derive(Default)]
struct RepetitionCountTester {
    current_value: Option<u8>,
    num_found: usize,
}

impl RepetitionCountTester {
    // NIST SP 800-90B section 4.4 proposes that 1:2^20 is a reasonable
    // false positive probability.
    // If we assume that the source has full entropy, then this means that
    // an error requires four identical samples.
    const REPEAT_THRESHOLD: usize = 4;

    fn test(&mut self, data: &[u8]) -> Result<(), Error> {
        for &x in data {
            match self.current_value {
                Some(value) if value == x => {
                    self.num_found += 1;
                    if self.num_found >= Self::REPEAT_THRESHOLD {
                        return Err(health_failure("Repetition Count Test"));
                    }
                }
                _ => {
                    self.current_value = Some(x);
                    self.num_found = 1;
                }
            }
        }
        Ok(())
    }
}

// This is the "Adaptive Proportion Test" algorithm from NIST 800-90B section 4.4.2
#[derive(Default)]
struct AdaptiveProportionTester {
    value_to_count: u8,
    num_found: usize,
    num_processed: usize,
}

impl AdaptiveProportionTester {
    // NIST SP 800-90B section 4.4 proposes that 1:2^20 is a reasonable
    // false positive probability, which results in these constants (section 4.4.2):
    const MAX_NUM: usize = 13;
    const WINDOW_SIZE: usize = 512;

    fn test(&mut self, data: &[u8]) -> Result<(), Error> {
        for &x in data {
            if self.num_processed == 0 {
                self.value_to_count = x;
                self.num_found = 1;
                self.num_processed = 1;
                continue;
            }
            if self.value_to_count == x {
                self.num_found += 1;
                if self.num_found >= Self::MAX_NUM {
                    return Err(health_failure("Adaptive Proportion Test"));
                }
            }
            self.num_processed += 1;
            if self.num_processed == Self::WINDOW_SIZE {
                self.num_processed = 0;
            }
        }
        Ok(())
    }
}
