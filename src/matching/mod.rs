//! Thesis-to-company matching: text embedders, cosine similarity and ranking.

pub mod embedding;
pub mod scorer;

pub use embedding::{
    build_embedder, cosine_similarity, EmbedderError, HashingEmbedder, TextEmbedder, EMBEDDING_DIM,
};
#[cfg(feature = "minilm")]
pub use embedding::MiniLmEmbedder;
pub use scorer::{
    company_risk_score, rank_companies, recommendation_for, score_company, CompanyMatch,
    MatchOptions, Recommendation,
};
