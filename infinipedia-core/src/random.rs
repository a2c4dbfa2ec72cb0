//! Random topics for the "surprise me" action.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::Topic;

/// Curated starting points.
pub const RANDOM_TOPICS: &[&str] = &[
    "Balance", "Harmony", "Discord", "Entropy", "Serendipity", "Photosynthesis",
    "Black hole", "Aurora", "Tectonic plate", "Mitochondria", "Renaissance", "Algorithm",
    "Metamorphosis", "Nebula", "Symbiosis", "Echo", "Labyrinth", "Tide", "Origami",
    "Paradox", "Gravity", "Silk Road", "Volcano", "Coral reef", "Cipher", "Lighthouse",
    "Quantum entanglement", "Fermentation", "Migration", "Mirage", "Compass", "Glacier",
    "Phoenix", "Haiku", "Equilibrium", "Firefly", "Monsoon", "Archipelago", "Prism",
];

/// Picks a random topic.
pub fn random_topic() -> Topic {
    random_topic_with(&mut rand::thread_rng())
}

/// Picks a random topic from the given RNG.
pub fn random_topic_with<R: Rng + ?Sized>(rng: &mut R) -> Topic {
    Topic::from_static(RANDOM_TOPICS.choose(rng).copied().unwrap_or("Serendipity"))
}
