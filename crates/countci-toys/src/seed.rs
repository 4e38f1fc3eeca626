use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Generator used for all toy sampling.
pub type ToyRng = Pcg64Mcg;

/// Seed for reproducible toy sampling.
///
/// A 128-bit seed written as 32 hexadecimal digits, both on the command line and
/// in JSON reports. Running twice with the same seed throws the same toys.
///
/// # Example
///
/// ```
/// use countci_toys::seed::ToySeed;
/// use rand::Rng as _;
///
/// let seed: ToySeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
///
/// let mut a = seed.rng();
/// let mut b = seed.rng();
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToySeed([u8; 16]);

impl ToySeed {
    /// Draws a fresh seed from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        rand::rng().random()
    }

    /// Creates the toy generator for this seed.
    #[must_use]
    pub fn rng(self) -> ToyRng {
        Pcg64Mcg::from_seed(self.0)
    }
}

/// Error returned when a seed is not exactly 32 hexadecimal digits.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed '{input}': expected 32 hexadecimal digits")]
pub struct ParseSeedError {
    #[error(not(source))]
    input: String,
}

impl FromStr for ToySeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        // from_str_radix alone would also accept a leading '+'
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl fmt::Display for ToySeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for ToySeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ToySeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows `rng.random::<ToySeed>()`.
impl Distribution<ToySeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ToySeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ToySeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let seed = ToySeed::random();
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json.len(), 34);
        let back: ToySeed = serde_json::from_str(&json).unwrap();
        assert_eq!(seed, back);
    }

    #[test]
    fn test_accepts_uppercase() {
        let seed: ToySeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(
            seed.0,
            [
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76,
                0x54, 0x32, 0x10
            ]
        );
    }

    #[test]
    fn test_rejects_malformed() {
        for input in [
            "",
            "0123456789abcdef0123456789abcde",
            "0123456789abcdef0123456789abcdef0",
            "ghijklmnopqrstuvwxyzghijklmnopqr",
            "+123456789abcdef0123456789abcdef",
        ] {
            let err = input.parse::<ToySeed>().unwrap_err();
            assert!(err.to_string().contains("invalid hex seed"));
        }
        assert!(serde_json::from_str::<ToySeed>("\"abc\"").is_err());
    }

    #[test]
    fn test_same_seed_same_stream() {
        let seed = ToySeed::random();
        let a = seed.rng().random::<[u64; 4]>();
        let b = seed.rng().random::<[u64; 4]>();
        assert_eq!(a, b);
    }
}
