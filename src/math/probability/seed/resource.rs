use bevy::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Additive Konstante aus SplitMix64, verteilt abgeleitete Seeds über den Wertebereich
const SEED_STREAM_INCREMENT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Master-Seed eines Vermessungslaufs.
///
/// Jede Fehlerstufe bekommt daraus einen eigenen, abgeleiteten Zufallsstrom,
/// so dass sich Stufen nicht gegenseitig beeinflussen und ein ganzer Lauf mit
/// demselben Seed reproduzierbar ist.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResource {
    pub seed: u64,
}

impl SeedResource {
    pub fn from_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_text<S: AsRef<str>>(text: S) -> Self {
        let mut hasher = DefaultHasher::new();
        text.as_ref().hash(&mut hasher);
        let seed = hasher.finish();
        Self::from_seed(seed)
    }

    /// Seed für den Zufallsstrom Nummer `stream` (z.B. Index einer Fehlerstufe).
    pub fn derive(&self, stream: u64) -> u64 {
        // SplitMix64-Finalizer
        let mut z = self
            .seed
            .wrapping_add(SEED_STREAM_INCREMENT.wrapping_mul(stream.wrapping_add(1)));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Zahl direkt, sonst Hash des Textes (`--seed reef-survey`).
    pub fn parse(text: &str) -> Self {
        text.trim()
            .parse::<u64>()
            .map(Self::from_seed)
            .unwrap_or_else(|_| Self::from_text(text))
    }
}

impl Default for SeedResource {
    fn default() -> Self {
        let seed_number = rand::random::<u64>();
        Self::from_seed(seed_number)
    }
}
