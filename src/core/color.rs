//! Player Colors
//!
//! Display color derived from a connection identity. Every participant
//! computes the same color for the same identity with no coordination.

use std::fmt;
use serde::{Serialize, Deserialize};

/// RGB display color derived from an identity seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerColor([u8; 3]);

impl PlayerColor {
    /// Minimum channel value so colors stay visible on the space backdrop.
    const CHANNEL_FLOOR: u8 = 0x40;

    /// Derive a color from an identity seed.
    ///
    /// Runs the seed through a SplitMix64 finalizer so adjacent connection
    /// ids land on unrelated colors.
    pub fn from_seed(seed: u64) -> Self {
        let mut z = seed.wrapping_add(0x9E3779B97F4A7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^= z >> 31;

        let bytes = z.to_le_bytes();
        Self([
            bytes[0].max(Self::CHANNEL_FLOOR),
            bytes[1].max(Self::CHANNEL_FLOOR),
            bytes[2].max(Self::CHANNEL_FLOOR),
        ])
    }

    /// Raw RGB channels.
    #[inline]
    pub fn rgb(&self) -> [u8; 3] {
        self.0
    }

    /// CSS-style hex string, e.g. `#7fc8a9`.
    pub fn hex(&self) -> String {
        format!("#{}", hex::encode(self.0))
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_color() {
        assert_eq!(PlayerColor::from_seed(42), PlayerColor::from_seed(42));
    }

    #[test]
    fn test_adjacent_seeds_differ() {
        let a = PlayerColor::from_seed(1);
        let b = PlayerColor::from_seed(2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_channel_floor() {
        for seed in 0..256u64 {
            let [r, g, b] = PlayerColor::from_seed(seed).rgb();
            assert!(r >= PlayerColor::CHANNEL_FLOOR);
            assert!(g >= PlayerColor::CHANNEL_FLOOR);
            assert!(b >= PlayerColor::CHANNEL_FLOOR);
        }
    }

    #[test]
    fn test_hex_format() {
        let hex = PlayerColor::from_seed(7).hex();
        assert_eq!(hex.len(), 7);
        assert!(hex.starts_with('#'));
        assert!(hex[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
