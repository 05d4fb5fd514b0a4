//! Screening pipeline: resumes (+ optional answers) in, ranked cohort out.
//!
//! Stages: skill extraction (once) → per-candidate identity, eligibility,
//! similarity and skill summary (sequential, archive order) → cohort-wide
//! normalization and ranking (only after every candidate is scored).

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::documents::{ResumeDocument, TextExtractor};
use crate::embedding::EmbeddingService;
use crate::errors::AppError;
use crate::models::{AnswerSignals, CandidateResult};
use crate::screening::answers::{AnswerTable, CandidateAnswerRecord};
use crate::screening::names::NameResolver;
use crate::screening::ranking::{rank, RankingMode};
use crate::screening::similarity::SimilarityScorer;
use crate::screening::skills::{summarize, SkillExtractor};

/// Everything one screening run needs.
pub struct ScreeningInput {
    pub job_description: String,
    pub answers: Option<AnswerTable>,
    pub resumes: Vec<ResumeDocument>,
}

/// Why a resume produced no candidate. Ineligible answers are not skips.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    UnresolvedIdentity,
    NoAnswerRow { name: String },
    ExtractionFailed { message: String },
    EmbeddingFailed { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnresolvedIdentity => {
                write!(f, "could not match resume to any name in the answers table")
            }
            SkipReason::NoAnswerRow { name } => write!(f, "no answers row for '{name}'"),
            SkipReason::ExtractionFailed { message } => write!(f, "text extraction failed: {message}"),
            SkipReason::EmbeddingFailed { message } => write!(f, "embedding failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipEvent {
    pub file: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub run_id: Uuid,
    pub mode: RankingMode,
    pub required_skills: BTreeSet<String>,
    /// Descending by final rank; equal ranks keep archive order.
    pub ranked: Vec<CandidateResult>,
    pub skipped: Vec<SkipEvent>,
    /// Candidates dropped by the yes/no screening gates.
    pub ineligible: usize,
    pub completed_at: DateTime<Utc>,
}

impl ScreeningOutcome {
    pub fn has_candidates(&self) -> bool {
        !self.ranked.is_empty()
    }
}

/// Per-resume result before the cohort pass.
enum Screened {
    Candidate(CandidateResult),
    Ineligible,
    Skipped(SkipReason),
}

/// Runs one screening pass over the input batch.
///
/// Per-candidate failures are recorded in `skipped` and never abort the run;
/// only an unreachable embedding backend for the job description does.
pub async fn run_screening(
    input: ScreeningInput,
    embeddings: &EmbeddingService,
    extractor: &dyn TextExtractor,
) -> Result<ScreeningOutcome, AppError> {
    let run_id = Uuid::new_v4();
    let mode = if input.answers.is_some() {
        RankingMode::WithAnswers
    } else {
        RankingMode::ResumeOnly
    };

    info!(
        "Screening run {run_id}: {} resumes, mode {:?}, embeddings via {}",
        input.resumes.len(),
        mode,
        embeddings.backend_name()
    );

    let required_skills = SkillExtractor::default().extract(&input.job_description);
    debug!("Required skills: {:?}", required_skills);

    let job_embedding = embeddings
        .embed(&input.job_description)
        .await
        .map_err(|e| AppError::Embedding(format!("job description: {e}")))?;

    let scorer = SimilarityScorer::new(embeddings);
    let resolver = NameResolver::default();
    let context = CandidateContext {
        answers: input.answers.as_ref(),
        resolver: &resolver,
        scorer: &scorer,
        job_embedding: &job_embedding,
        required_skills: &required_skills,
    };

    let mut cohort = Vec::new();
    let mut skipped = Vec::new();
    let mut ineligible = 0;

    for document in &input.resumes {
        match screen_resume(document, extractor, &context).await {
            Screened::Candidate(candidate) => cohort.push(candidate),
            Screened::Ineligible => {
                debug!("{} did not pass the screening gates", document.file_name);
                ineligible += 1;
            }
            Screened::Skipped(reason) => {
                warn!("Skipping {}: {reason}", document.file_name);
                skipped.push(SkipEvent {
                    file: document.file_name.clone(),
                    reason,
                });
            }
        }
    }

    // Normalization needs the complete cohort, so ranking waits for every candidate.
    let ranked = rank(cohort, mode).map_err(|e| AppError::Internal(e.into()))?;

    if ranked.is_empty() {
        warn!("Screening run {run_id}: no eligible candidates matched");
    } else {
        info!(
            "Screening run {run_id}: ranked {} candidates ({} skipped, {} ineligible)",
            ranked.len(),
            skipped.len(),
            ineligible
        );
    }

    Ok(ScreeningOutcome {
        run_id,
        mode,
        required_skills,
        ranked,
        skipped,
        ineligible,
        completed_at: Utc::now(),
    })
}

struct CandidateContext<'a> {
    answers: Option<&'a AnswerTable>,
    resolver: &'a NameResolver,
    scorer: &'a SimilarityScorer<'a>,
    job_embedding: &'a [f32],
    required_skills: &'a BTreeSet<String>,
}

async fn screen_resume(
    document: &ResumeDocument,
    extractor: &dyn TextExtractor,
    context: &CandidateContext<'_>,
) -> Screened {
    let resume_text = match extractor.extract(&document.bytes, &document.extension) {
        Ok(text) => text,
        Err(e) => {
            return Screened::Skipped(SkipReason::ExtractionFailed {
                message: e.to_string(),
            })
        }
    };

    let (name, candidate_text, answer_signals) = match context.answers {
        None => (
            header_name(&resume_text).unwrap_or_else(|| document.stem().to_string()),
            resume_text,
            None,
        ),
        Some(table) => {
            let Some(name) = context.resolver.resolve(&resume_text, table.known_names()) else {
                return Screened::Skipped(SkipReason::UnresolvedIdentity);
            };
            let Some(raw) = table.lookup(&name) else {
                return Screened::Skipped(SkipReason::NoAnswerRow { name });
            };

            let record = CandidateAnswerRecord::decode(raw);
            if !record.is_eligible() {
                return Screened::Ineligible;
            }

            let text = format!(
                "{resume_text}\n{}\n{}",
                record.experience(),
                record.education()
            );
            let signals = AnswerSignals {
                salary: record.salary(),
                notice: record.notice_raw().to_string(),
                notice_days: record.notice_days(),
            };
            (name, text, Some(signals))
        }
    };

    let similarity = match context
        .scorer
        .score_against(context.job_embedding, &candidate_text)
        .await
    {
        Ok(score) => score,
        Err(e) => {
            return Screened::Skipped(SkipReason::EmbeddingFailed {
                message: e.to_string(),
            })
        }
    };

    let skills = summarize(&candidate_text, context.required_skills);
    let candidate = CandidateResult::new(name, similarity, skills);

    Screened::Candidate(match answer_signals {
        Some(signals) => candidate.with_answers(signals),
        None => candidate,
    })
}

/// First non-empty, trimmed line of the resume.
fn header_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
