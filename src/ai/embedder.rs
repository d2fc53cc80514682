//! Mock Embedding Adapter
//!
//! Deterministic stand-in used when no real embedding provider is
//! configured, so the rest of the pipeline can run end-to-end. The vector
//! for a text is derived by seeding a PRNG with the SHA-256 of the text:
//! equal inputs give bit-identical vectors across calls and processes,
//! different inputs diverge with overwhelming probability.
//!
//! Not cryptographically meaningful and not a semantic embedding.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::constants::embedder::DIMENSIONS;

/// Deterministic mock embedder producing fixed-dimension vectors.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimensions: usize,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            dimensions: DIMENSIONS,
        }
    }

    /// Embed one text as a vector with components uniform in [-1, 1].
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);

        let mut rng = StdRng::from_seed(seed);
        (0..self.dimensions)
            .map(|_| rng.random_range(-1.0f32..=1.0))
            .collect()
    }

    /// Embed a batch of texts, preserving order.
    pub fn embed_batch<I, T>(&self, texts: I) -> Vec<Vec<f32>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| self.embed(text.as_ref()))
            .collect()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}
