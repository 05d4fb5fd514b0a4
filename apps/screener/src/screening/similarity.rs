//! Similarity Scorer: semantic closeness of two texts on a 0–10 scale.

use crate::embedding::{cosine_similarity, EmbedError, EmbeddingService};

/// Rounds to 2 decimal places, ties to even (matches the reference numeric behaviour).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `cosine * 10`, rounded to 2 decimals. Negative cosine is not clamped.
pub fn score_vectors(a: &[f32], b: &[f32]) -> f64 {
    round2(cosine_similarity(a, b) * 10.0)
}

pub struct SimilarityScorer<'a> {
    embeddings: &'a EmbeddingService,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(embeddings: &'a EmbeddingService) -> Self {
        Self { embeddings }
    }

    /// Embeds both texts and scores them. The pipeline embeds the job once and
    /// uses `score_against` instead.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn score(&self, text_a: &str, text_b: &str) -> Result<f64, EmbedError> {
        let a = self.embeddings.embed(text_a).await?;
        let b = self.embeddings.embed(text_b).await?;
        Ok(score_vectors(&a, &b))
    }

    /// Scores `text` against an already-embedded reference (the job description).
    pub async fn score_against(&self, reference: &[f32], text: &str) -> Result<f64, EmbedError> {
        let v = self.embeddings.embed(text).await?;
        Ok(score_vectors(&v, reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use std::sync::Arc;

    fn service() -> EmbeddingService {
        EmbeddingService::new(Arc::new(HashingEmbedder::default()))
    }

    #[tokio::test]
    async fn test_identical_text_scores_ten() {
        let embeddings = service();
        let scorer = SimilarityScorer::new(&embeddings);
        let text = "Data analyst with Python, SQL and Tableau experience";
        let score = scorer.score(text, text).await.unwrap();
        assert!((score - 10.0).abs() <= 0.01, "score was {score}");
    }

    #[tokio::test]
    async fn test_unrelated_text_scores_low() {
        let embeddings = service();
        let scorer = SimilarityScorer::new(&embeddings);
        let score = scorer.score("", "anything at all").await.unwrap();
        assert_eq!(score, 0.0);
    }

    #[tokio::test]
    async fn test_score_against_matches_score() {
        let embeddings = service();
        let scorer = SimilarityScorer::new(&embeddings);
        let job = "python sql leadership";
        let resume = "python developer";
        let reference = embeddings.embed(job).await.unwrap();
        assert_eq!(
            scorer.score_against(&reference, resume).await.unwrap(),
            scorer.score(resume, job).await.unwrap()
        );
    }

    #[test]
    fn test_negative_cosine_is_not_clamped() {
        assert_eq!(score_vectors(&[1.0, 0.0], &[-1.0, 0.0]), -10.0);
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(2.675_1), 2.68);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(-3.456), -3.46);
    }
}
