use std::{fmt, str::FromStr};

use rand::prelude::*;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::ParseSeedError;

/// A 256-bit seed that reproduces a generated puzzle.
///
/// Seeds print as 64 lowercase hex digits and parse back from the same form.
/// Each puzzle type draws its random stream from a SHA-256 of a domain tag and
/// the seed, so one seed yields independent streams for different games.
///
/// # Examples
///
/// ```
/// use puzzlegate_generator::PuzzleSeed;
///
/// let seed = PuzzleSeed::random();
/// let parsed: PuzzleSeed = seed.to_string().parse()?;
/// assert_eq!(seed, parsed);
/// # Ok::<(), puzzlegate_generator::ParseSeedError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PuzzleSeed([u8; 32]);

impl PuzzleSeed {
    /// Draws a fresh seed from the thread-local RNG.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::rng().random())
    }

    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Expands a small integer into a seed. Handy for tests and benchmarks.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(Sha256::digest(value.to_le_bytes()).into())
    }

    /// Returns the raw seed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the random stream for `domain` derived from this seed.
    #[must_use]
    pub fn rng(&self, domain: &str) -> Pcg64 {
        self.rng_for_attempt(domain, 0)
    }

    /// Returns the random stream for retry `attempt` of `domain`.
    ///
    /// Attempt 0 is the stream returned by [`PuzzleSeed::rng`].
    #[must_use]
    pub fn rng_for_attempt(&self, domain: &str, attempt: u32) -> Pcg64 {
        let mut hasher = Sha256::new()
            .chain_update(domain.as_bytes())
            .chain_update([0u8])
            .chain_update(self.0);
        if attempt > 0 {
            hasher.update(attempt.to_le_bytes());
        }
        Pcg64::from_seed(hasher.finalize().into())
    }
}

impl fmt::Display for PuzzleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PuzzleSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PuzzleSeed({self})")
    }
}

impl FromStr for PuzzleSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 {
            return Err(ParseSeedError::InvalidLength { len: s.len() });
        }
        let digit = |index: usize| -> Result<u8, ParseSeedError> {
            let value = char::from(s.as_bytes()[index])
                .to_digit(16)
                .ok_or(ParseSeedError::InvalidDigit { index })?;
            #[expect(clippy::cast_possible_truncation)]
            let value = value as u8;
            Ok(value)
        };
        let mut bytes = [0; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = (digit(2 * i)? << 4) | digit(2 * i + 1)?;
        }
        Ok(Self(bytes))
    }
}

impl From<PuzzleSeed> for String {
    fn from(seed: PuzzleSeed) -> Self {
        seed.to_string()
    }
}

impl TryFrom<String> for PuzzleSeed {
    type Error = ParseSeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1";

    #[test]
    fn test_display_parse_round_trip() {
        let seed: PuzzleSeed = SEED.parse().unwrap();
        assert_eq!(seed.to_string(), SEED);
        assert_eq!(seed.as_bytes()[0], 0xc1);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<PuzzleSeed>(),
            Err(ParseSeedError::InvalidLength { len: 3 })
        );
        let bad = format!("{}g", &SEED[..63]);
        assert_eq!(
            bad.parse::<PuzzleSeed>(),
            Err(ParseSeedError::InvalidDigit { index: 63 })
        );
    }

    #[test]
    fn test_uppercase_hex_is_accepted() {
        let upper = SEED.to_uppercase();
        assert_eq!(upper.parse::<PuzzleSeed>(), SEED.parse::<PuzzleSeed>());
    }

    #[test]
    fn test_streams_are_reproducible_and_domain_separated() {
        let seed = PuzzleSeed::from_u64(5);
        let a: u64 = seed.rng("keen").random();
        let b: u64 = seed.rng("keen").random();
        let c: u64 = seed.rng("map").random();
        let d: u64 = seed.rng_for_attempt("keen", 1).random();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}
