use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::screening::skills::SkillMatch;

/// Structured answers attached to a candidate that passed the screening gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSignals {
    pub salary: f64,
    /// Notice period exactly as answered, e.g. "30 days".
    pub notice: String,
    pub notice_days: f64,
}

/// One eligible, successfully processed candidate in a screening run.
///
/// Created while iterating resumes; cohort-relative scores (`salary_score`,
/// `notice_score`) and `final_rank` are filled in by the ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub name: String,
    /// Semantic similarity to the job description, nominally 0–10.
    pub similarity_score: f64,
    pub answers: Option<AnswerSignals>,
    pub skills_matched: BTreeSet<String>,
    pub skills_missing: BTreeSet<String>,
    pub salary_score: Option<f64>,
    pub notice_score: Option<f64>,
    pub final_rank: f64,
}

impl CandidateResult {
    pub fn new(name: impl Into<String>, similarity_score: f64, skills: SkillMatch) -> Self {
        Self {
            name: name.into(),
            similarity_score,
            answers: None,
            skills_matched: skills.matched,
            skills_missing: skills.missing,
            salary_score: None,
            notice_score: None,
            final_rank: similarity_score,
        }
    }

    pub fn with_answers(mut self, answers: AnswerSignals) -> Self {
        self.answers = Some(answers);
        self
    }

    pub fn salary(&self) -> Option<f64> {
        self.answers.as_ref().map(|a| a.salary)
    }

    pub fn notice_days(&self) -> Option<f64> {
        self.answers.as_ref().map(|a| a.notice_days)
    }
}
