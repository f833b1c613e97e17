use std::path::Path;
use std::sync::Arc;

use ndarray::ArrayView1;
use thiserror::Error;

use crate::analysis::text::{content_tokens, normalize_token};
use crate::config::EmbedderKind;

pub const EMBEDDING_DIM: usize = 384;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Turns text into a fixed-size vector.
pub trait TextEmbedder: Send + Sync {
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Vec<f32>;

    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Feature-hashing embedder over unigrams and bigrams.
///
/// Needs no model files and gives the same vector for the same text on every
/// run, so stored embeddings stay valid across restarts.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = fnv1a(feature.as_bytes());
        let index = (hash % self.dim as u64) as usize;
        // top bit picks the sign so collisions tend to cancel out
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[index] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIM)
    }
}

impl TextEmbedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dim];
        let tokens: Vec<String> = content_tokens(text)
            .iter()
            .map(|t| normalize_token(t).to_string())
            .collect();

        for token in &tokens {
            self.add_feature(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[derive(Debug, Error)]
pub enum EmbedderError {
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Builds the embedder named by the configuration.
pub fn build_embedder(
    kind: EmbedderKind,
    cache_dir: Option<&Path>,
) -> Result<Arc<dyn TextEmbedder>, EmbedderError> {
    match kind {
        EmbedderKind::Hashing => Ok(Arc::new(HashingEmbedder::default())),
        #[cfg(feature = "minilm")]
        EmbedderKind::MiniLm => Ok(Arc::new(minilm::MiniLmEmbedder::load(cache_dir)?)),
        #[cfg(not(feature = "minilm"))]
        EmbedderKind::MiniLm => {
            let _ = cache_dir;
            Err(EmbedderError::ModelUnavailable(
                "built without the `minilm` feature".to_string(),
            ))
        }
    }
}

#[cfg(feature = "minilm")]
pub use minilm::MiniLmEmbedder;

#[cfg(feature = "minilm")]
mod minilm {
    use std::path::Path;
    use std::sync::Mutex;

    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    use super::{EmbedderError, TextEmbedder, EMBEDDING_DIM};

    /// all-MiniLM-L6-v2 sentence embeddings (384 dimensions, normalized).
    ///
    /// The model is downloaded into the cache directory on first use.
    pub struct MiniLmEmbedder {
        model: Mutex<TextEmbedding>,
    }

    impl MiniLmEmbedder {
        pub fn load(cache_dir: Option<&Path>) -> Result<Self, EmbedderError> {
            let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(dir.to_path_buf());
            }
            let model = TextEmbedding::try_new(options).map_err(|e| EmbedderError::ModelUnavailable(e.to_string()))?;
            tracing::info!(model = "all-MiniLM-L6-v2", "sentence embedding model loaded");
            Ok(Self { model: Mutex::new(model) })
        }

        fn run(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, String> {
            let mut model = self.model.lock().map_err(|_| "embedding model lock poisoned".to_string())?;
            model.embed(texts.to_vec(), None).map_err(|e| e.to_string())
        }
    }

    impl TextEmbedder for MiniLmEmbedder {
        fn dimension(&self) -> usize {
            EMBEDDING_DIM
        }

        // inference failures score as "no similarity" rather than failing the request
        fn embed(&self, text: &str) -> Vec<f32> {
            self.embed_batch(&[text.to_string()])
                .pop()
                .unwrap_or_else(|| vec![0.0; EMBEDDING_DIM])
        }

        fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
            match self.run(texts) {
                Ok(vectors) if vectors.len() == texts.len() => vectors,
                Ok(vectors) => {
                    tracing::error!(expected = texts.len(), got = vectors.len(), "embedding count mismatch");
                    vec![vec![0.0; EMBEDDING_DIM]; texts.len()]
                }
                Err(e) => {
                    tracing::error!(error = %e, "sentence embedding failed");
                    vec![vec![0.0; EMBEDDING_DIM]; texts.len()]
                }
            }
        }
    }
}

/// 64-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

/// Cosine similarity in [-1, 1]; 0 when the lengths differ or either vector is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let a = ArrayView1::from(a);
    let b = ArrayView1::from(b);

    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (f64::from(a.dot(&b)) / (f64::from(norm_a) * f64::from(norm_b))).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeddings_are_deterministic_and_normalized() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed("Cloud payments infrastructure for banks");
        let b = embedder.embed("Cloud payments infrastructure for banks");
        assert_eq!(a, b);
        assert_eq!(a.len(), EMBEDDING_DIM);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_embeds_to_zero() {
        let embedder = HashingEmbedder::default();
        let v = embedder.embed("the and of");
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(cosine_similarity(&v, &embedder.embed("payments")), 0.0);
    }

    #[test]
    fn related_text_scores_higher() {
        let embedder = HashingEmbedder::default();
        let thesis = embedder.embed("AI-powered healthcare diagnostics for hospitals");
        let close = embedder.embed("Diagnostics platform using AI for hospitals and clinics");
        let far = embedder.embed("Freight brokerage marketplace for trucking fleets");
        assert!(cosine_similarity(&thesis, &close) > cosine_similarity(&thesis, &far));
    }

    #[test]
    fn hashing_kind_builds_without_a_model() {
        let embedder = build_embedder(EmbedderKind::Hashing, None).unwrap();
        assert_eq!(embedder.dimension(), EMBEDDING_DIM);
        let vectors = embedder.embed_batch(&["payments".to_string(), "biotech".to_string()]);
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], HashingEmbedder::default().embed("payments"));
    }

    #[cfg(not(feature = "minilm"))]
    #[test]
    fn minilm_kind_needs_the_feature() {
        assert!(matches!(
            build_embedder(EmbedderKind::MiniLm, None),
            Err(EmbedderError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn mismatched_lengths_are_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }
}
