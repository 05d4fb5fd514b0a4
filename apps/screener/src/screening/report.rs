//! Output table: JSON rows for the API and a CSV export for download.

use serde::Serialize;
use thiserror::Error;

use crate::models::CandidateResult;
use crate::screening::ranking::RankingMode;

/// Placeholder for salary/notice in runs without structured answers.
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// One row of the ranked table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRow {
    pub name: String,
    pub score: f64,
    pub salary: Option<f64>,
    pub notice: Option<String>,
    pub skills_matched: String,
    pub skills_missing: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_score: Option<f64>,
    pub final_rank: f64,
}

impl From<&CandidateResult> for CandidateRow {
    fn from(candidate: &CandidateResult) -> Self {
        Self {
            name: candidate.name.clone(),
            score: candidate.similarity_score,
            salary: candidate.salary(),
            notice: candidate.answers.as_ref().map(|a| a.notice.clone()),
            skills_matched: join_skills(&candidate.skills_matched),
            skills_missing: join_skills(&candidate.skills_missing),
            salary_score: candidate.salary_score,
            notice_score: candidate.notice_score,
            final_rank: candidate.final_rank,
        }
    }
}

fn join_skills<'a>(skills: impl IntoIterator<Item = &'a String>) -> String {
    skills
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn to_rows(ranked: &[CandidateResult]) -> Vec<CandidateRow> {
    ranked.iter().map(CandidateRow::from).collect()
}

fn headers(mode: RankingMode) -> &'static [&'static str] {
    match mode {
        RankingMode::WithAnswers => &[
            "name",
            "score",
            "salary",
            "notice",
            "skills_matched",
            "skills_missing",
            "salary_score",
            "notice_score",
            "final_rank",
        ],
        RankingMode::ResumeOnly => &[
            "name",
            "score",
            "salary",
            "notice",
            "skills_matched",
            "skills_missing",
            "final_rank",
        ],
    }
}

/// CSV record for runs with structured answers. Floats are written by the
/// `csv` serializer, so whole values keep their `.0`.
#[derive(Serialize)]
struct ScoredRecord<'a> {
    name: &'a str,
    score: f64,
    salary: Option<f64>,
    notice: Option<&'a str>,
    skills_matched: &'a str,
    skills_missing: &'a str,
    salary_score: Option<f64>,
    notice_score: Option<f64>,
    final_rank: f64,
}

/// CSV record for resume-only runs.
#[derive(Serialize)]
struct ResumeOnlyRecord<'a> {
    name: &'a str,
    score: f64,
    salary: &'static str,
    notice: &'static str,
    skills_matched: &'a str,
    skills_missing: &'a str,
    final_rank: f64,
}

/// Renders the ranked table as CSV, header row first, in rank order.
pub fn to_csv(ranked: &[CandidateResult], mode: RankingMode) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(headers(mode))?;

    for row in to_rows(ranked) {
        match mode {
            RankingMode::WithAnswers => writer.serialize(ScoredRecord {
                name: &row.name,
                score: row.score,
                salary: row.salary,
                notice: row.notice.as_deref(),
                skills_matched: &row.skills_matched,
                skills_missing: &row.skills_missing,
                salary_score: row.salary_score,
                notice_score: row.notice_score,
                final_rank: row.final_rank,
            })?,
            RankingMode::ResumeOnly => writer.serialize(ResumeOnlyRecord {
                name: &row.name,
                score: row.score,
                salary: NOT_AVAILABLE,
                notice: NOT_AVAILABLE,
                skills_matched: &row.skills_matched,
                skills_missing: &row.skills_missing,
                final_rank: row.final_rank,
            })?,
        }
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.to_string()))
}
