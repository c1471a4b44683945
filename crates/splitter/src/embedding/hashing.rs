use async_trait::async_trait;
use xxhash_rust::xxh3::xxh3_64;

use super::traits::{Embedder, EmbeddingError};

/// Offline bag-of-words embedder.
///
/// Lowercased alphanumeric tokens are hashed into `dimensions` signed
/// buckets and the result is L2-normalised. Texts without tokens map to the
/// zero vector. Tokens are hashed with XXH3, so vectors are stable across
/// builds and platforms; useful for tests, demos and
/// air-gapped runs where lexical overlap is a good enough signal.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let h = xxh3_64(token.to_lowercase().as_bytes());
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if h >> 63 == 1 { -1.0 } else { 1.0 };
            v[bucket] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider(&self) -> &str {
        "hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn same_text_same_vector() {
        let e = HashingEmbedder::new(64);
        assert_eq!(e.embed_one("The cat sat."), e.embed_one("the CAT sat"));
    }

    #[test]
    fn buckets_are_stable_across_builds() {
        let e = HashingEmbedder::new(1 << 20);
        let h = xxh3_64(b"cat");
        let v = e.embed_one("CAT");
        let bucket = (h % (1u64 << 20)) as usize;
        let sign = if h >> 63 == 1 { -1.0 } else { 1.0 };
        assert_eq!(v[bucket], sign);
        assert_eq!(v.iter().filter(|&&x| x != 0.0).count(), 1);
    }

    #[test]
    fn vectors_are_unit_length() {
        let e = HashingEmbedder::new(64);
        let v = e.embed_one("alpha beta gamma");
        assert!((dot(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn no_tokens_is_zero_vector() {
        let e = HashingEmbedder::new(16);
        assert!(e.embed_one(" ... !? ").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn shared_words_score_higher() {
        let e = HashingEmbedder::new(256);
        let a = e.embed_one("rust borrow checker lifetimes");
        let b = e.embed_one("the borrow checker and lifetimes in rust");
        let c = e.embed_one("banana smoothie recipe with yoghurt");
        assert!(dot(&a, &b) > dot(&a, &c));
    }

    #[tokio::test]
    async fn batch_matches_single() {
        let e = HashingEmbedder::new(32);
        let out = e.embed_batch(&["one two", "three"]).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], e.embed_one("three"));
        assert_eq!(e.dimensions(), 32);
    }
}
