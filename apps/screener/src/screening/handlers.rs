//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::read_resume_archive;
use crate::errors::AppError;
use crate::screening::answers::AnswerTable;
use crate::screening::jobs::JobConfig;
use crate::screening::pipeline::{run_screening, ScreeningInput, ScreeningOutcome, SkipEvent};
use crate::screening::ranking::RankingMode;
use crate::screening::report::{to_csv, to_rows, CandidateRow};
use crate::state::AppState;

const MISSING_JOB_DESCRIPTION: &str = "Please enter a job description to continue.";
const MISSING_RESUMES: &str = "Please upload a ZIP archive of resumes.";
const NO_ELIGIBLE_CANDIDATES: &str = "No eligible candidates matched.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw multipart form, before any parsing of the uploaded files.
#[derive(Debug, Default)]
pub struct ScreeningForm {
    pub job_description: Option<String>,
    pub job_config: Option<Bytes>,
    pub answers: Option<Bytes>,
    pub resumes: Option<Bytes>,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub run_id: Uuid,
    pub job_id: Option<String>,
    pub mode: RankingMode,
    pub required_skills: Vec<String>,
    pub candidates: Vec<CandidateRow>,
    pub skipped: Vec<SkipEvent>,
    pub ineligible: usize,
    pub message: Option<String>,
    pub completed_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Ranks every resume in the uploaded archive against the job description.
/// An empty cohort is still a 200, with `message` explaining why.
pub async fn handle_screening(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let form = read_form(multipart).await?;
    let (input, job_config) = build_input(form, state.config.max_unpacked_bytes)?;
    let outcome = run_screening(input, &state.embeddings, state.extractor.as_ref()).await?;

    if let Some(band) = job_config.as_ref().and_then(JobConfig::salary_range) {
        let within = outcome
            .ranked
            .iter()
            .filter_map(|c| c.salary())
            .filter(|&salary| band.contains(salary))
            .count();
        info!(
            "Run {}: {within}/{} ranked candidates expect a salary within {band}",
            outcome.run_id,
            outcome.ranked.len()
        );
    }

    Ok(Json(into_response(outcome, job_config.map(|c| c.job_id))))
}

/// POST /api/v1/screenings/export
///
/// Same form as `/screenings`; returns the ranked table as a CSV download.
pub async fn handle_screening_export(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_form(multipart).await?;
    let (input, _) = build_input(form, state.config.max_unpacked_bytes)?;
    let outcome = run_screening(input, &state.embeddings, state.extractor.as_ref()).await?;

    if !outcome.has_candidates() {
        return Err(AppError::UnprocessableEntity(
            NO_ELIGIBLE_CANDIDATES.to_string(),
        ));
    }

    let csv = to_csv(&outcome.ranked, outcome.mode).map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ranked_candidates.csv\"",
            ),
        ],
        csv,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Form handling
// ────────────────────────────────────────────────────────────────────────────

async fn read_form(mut multipart: Multipart) -> Result<ScreeningForm, AppError> {
    let mut form = ScreeningForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{field_name}': {e}")))?;

        match field_name.as_str() {
            "job_description" => {
                form.job_description = Some(String::from_utf8_lossy(&data).into_owned())
            }
            "job_config" => form.job_config = Some(data),
            "answers" => form.answers = Some(data),
            "resumes" => form.resumes = Some(data),
            other => warn!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(form)
}

/// Checks the run preconditions and parses the uploads.
/// Returns the pipeline input and the job config, when one was supplied.
/// `max_unpacked` bounds the uncompressed size of the resume archive.
pub fn build_input(
    form: ScreeningForm,
    max_unpacked: u64,
) -> Result<(ScreeningInput, Option<JobConfig>), AppError> {
    let job_config = form
        .job_config
        .filter(|data| !data.is_empty())
        .map(|data| parse_job_config(&data))
        .transpose()?;

    let job_description = form
        .job_description
        .filter(|text| !text.trim().is_empty())
        .or_else(|| job_config.as_ref().map(|c| c.job_description.clone()))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_JOB_DESCRIPTION.to_string()))?;

    let archive = form
        .resumes
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_RESUMES.to_string()))?;

    let answers = form
        .answers
        .filter(|data| !data.is_empty())
        .map(|data| AnswerTable::from_reader(data.as_ref()))
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    match &answers {
        Some(table) if table.is_empty() => {
            warn!("Answers table has no rows; every resume will be skipped")
        }
        Some(table) => info!("Loaded {} answer rows", table.len()),
        None => {}
    }

    let resumes = read_resume_archive(&archive, max_unpacked)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    Ok((
        ScreeningInput {
            job_description,
            answers,
            resumes,
        },
        job_config,
    ))
}

fn parse_job_config(data: &[u8]) -> Result<JobConfig, AppError> {
    let config: JobConfig = serde_json::from_slice(data)
        .map_err(|e| AppError::Validation(format!("Invalid job config: {e}")))?;
    config
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid job config: {e}")))?;

    info!(
        "Using job config {} ({} questions, salary band: {})",
        config.job_id,
        config.questions.len(),
        config
            .salary_range()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    // Answer blobs are decoded with the yes/no gates in the first two slots.
    let mandatory = config.mandatory_positions();
    if mandatory.iter().any(|&i| i > 1) {
        warn!(
            "Job config {} has mandatory questions at positions {:?}; only the first two answers gate eligibility",
            config.job_id, mandatory
        );
    }

    Ok(config)
}

fn into_response(outcome: ScreeningOutcome, job_id: Option<String>) -> ScreeningResponse {
    let message = (!outcome.has_candidates()).then(|| NO_ELIGIBLE_CANDIDATES.to_string());

    ScreeningResponse {
        run_id: outcome.run_id,
        job_id,
        mode: outcome.mode,
        required_skills: outcome.required_skills.into_iter().collect(),
        candidates: to_rows(&outcome.ranked),
        skipped: outcome.skipped,
        ineligible: outcome.ineligible,
        message,
        completed_at: outcome.completed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::archive::tests::build_zip;

    const UNPACK_LIMIT: u64 = 1024 * 1024;

    fn zip_bytes() -> Bytes {
        Bytes::from(build_zip(&[("jane.pdf", &b"Jane Doe\nPython"[..])]))
    }

    #[test]
    fn test_missing_job_description_is_rejected_first() {
        let form = ScreeningForm {
            job_description: Some("   ".to_string()),
            ..Default::default()
        };
        match build_input(form, UNPACK_LIMIT) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, MISSING_JOB_DESCRIPTION),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_archive_is_rejected() {
        let form = ScreeningForm {
            job_description: Some("Python developer".to_string()),
            ..Default::default()
        };
        match build_input(form, UNPACK_LIMIT) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, MISSING_RESUMES),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_job_config_supplies_description() {
        let config = r#"{
            "job_id": "abc12345",
            "job_description": "Python, SQL",
            "questions": [{"question": "Can you relocate?", "kind": "yes_no_mandatory"}]
        }"#;
        let form = ScreeningForm {
            job_description: None,
            job_config: Some(Bytes::from(config)),
            answers: None,
            resumes: Some(zip_bytes()),
        };
        let (input, job_config) = build_input(form, UNPACK_LIMIT).unwrap();
        assert_eq!(input.job_description, "Python, SQL");
        assert_eq!(job_config.unwrap().job_id, "abc12345");
        assert_eq!(input.resumes.len(), 1);
        assert!(input.answers.is_none());
    }

    #[test]
    fn test_invalid_job_config_is_rejected() {
        let form = ScreeningForm {
            job_description: Some("Python".to_string()),
            job_config: Some(Bytes::from(r#"{"job_id":"x","job_description":"d","questions":[]}"#)),
            answers: None,
            resumes: Some(zip_bytes()),
        };
        assert!(matches!(build_input(form, UNPACK_LIMIT), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_answers_csv_is_parsed() {
        let form = ScreeningForm {
            job_description: Some("Python".to_string()),
            job_config: None,
            answers: Some(Bytes::from("name,answers\nJane Doe,yes|yes\n")),
            resumes: Some(zip_bytes()),
        };
        let (input, _) = build_input(form, UNPACK_LIMIT).unwrap();
        let answers = input.answers.unwrap();
        assert_eq!(answers.lookup("jane doe"), Some("yes|yes"));
    }

    #[test]
    fn test_bad_archive_is_a_validation_error() {
        let form = ScreeningForm {
            job_description: Some("Python".to_string()),
            job_config: None,
            answers: None,
            resumes: Some(Bytes::from_static(b"not a zip")),
        };
        assert!(matches!(build_input(form, UNPACK_LIMIT), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_oversized_archive_is_a_validation_error() {
        let form = ScreeningForm {
            job_description: Some("Python".to_string()),
            job_config: None,
            answers: None,
            resumes: Some(Bytes::from(build_zip(&[("big.pdf", &[b' '; 4096][..])]))),
        };
        match build_input(form, 1024) {
            Err(AppError::Validation(msg)) => assert!(msg.contains("more than 1024 bytes")),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
