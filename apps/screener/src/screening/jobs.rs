//! Job posting configuration: the job description plus its screening questions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A posting asks at most this many screening questions.
pub const MAX_QUESTIONS: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub enum JobConfigError {
    #[error("job description cannot be empty")]
    EmptyDescription,

    #[error("a job needs at least one screening question")]
    NoQuestions,

    #[error("a job can have at most 6 screening questions, got {0}")]
    TooManyQuestions(usize),

    #[error("question {0} has no text")]
    BlankQuestion(usize),

    #[error("invalid salary range '{0}': expected MIN-MAX, e.g. 8000-12000")]
    InvalidSalaryRange(String),
}

/// Inclusive salary band a recruiter expects, written as "8000-12000".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    pub fn contains(&self, salary: f64) -> bool {
        (self.min..=self.max).contains(&salary)
    }
}

impl FromStr for SalaryRange {
    type Err = JobConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || JobConfigError::InvalidSalaryRange(s.to_string());
        let (min, max) = s.split_once('-').ok_or_else(invalid)?;
        let parse = |part: &str| {
            part.trim()
                .replace(',', "")
                .parse::<f64>()
                .map_err(|_| invalid())
        };
        let (min, max) = (parse(min)?, parse(max)?);
        if min > max {
            return Err(invalid());
        }
        Ok(SalaryRange { min, max })
    }
}

impl TryFrom<String> for SalaryRange {
    type Error = JobConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SalaryRange> for String {
    fn from(range: SalaryRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for SalaryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// What a screening question asks for, with the fields each kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Yes/no gate; answering "no" disqualifies the applicant.
    YesNoMandatory,
    SalaryExpectation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        range: Option<SalaryRange>,
    },
    NoticePeriod,
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningQuestion {
    pub question: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub job_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    pub job_description: String,
    #[serde(default)]
    pub questions: Vec<ScreeningQuestion>,
}

impl JobConfig {
    pub fn validate(&self) -> Result<(), JobConfigError> {
        if self.job_description.trim().is_empty() {
            return Err(JobConfigError::EmptyDescription);
        }
        if self.questions.is_empty() {
            return Err(JobConfigError::NoQuestions);
        }
        if self.questions.len() > MAX_QUESTIONS {
            return Err(JobConfigError::TooManyQuestions(self.questions.len()));
        }
        if let Some(index) = self
            .questions
            .iter()
            .position(|q| q.question.trim().is_empty())
        {
            return Err(JobConfigError::BlankQuestion(index + 1));
        }
        Ok(())
    }

    /// Salary band of the first salary question that declares one.
    pub fn salary_range(&self) -> Option<SalaryRange> {
        self.questions.iter().find_map(|q| match q.kind {
            QuestionKind::SalaryExpectation { range } => range,
            _ => None,
        })
    }

    /// Positions (0-based) of the questions whose "no" answer disqualifies.
    pub fn mandatory_positions(&self) -> Vec<usize> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| q.kind == QuestionKind::YesNoMandatory)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_JSON: &str = r#"{
        "job_id": "a1b2c3d4",
        "created_at": "2024-05-01 09:30:00.000000",
        "job_description": "Data analyst. Python, SQL, Tableau.",
        "questions": [
            {"question": "Are you authorised to work in the UAE?", "kind": "yes_no_mandatory"},
            {"question": "Can you work on site?", "kind": "yes_no_mandatory"},
            {"question": "Years of experience?", "kind": "free_text"},
            {"question": "Highest degree?", "kind": "free_text"},
            {"question": "Expected monthly salary?", "kind": "salary_expectation", "range": "8,000 - 12000"},
            {"question": "Notice period?", "kind": "notice_period"}
        ]
    }"#;

    #[test]
    fn test_config_deserializes_tagged_questions() {
        let config: JobConfig = serde_json::from_str(CONFIG_JSON).unwrap();
        assert_eq!(config.questions.len(), 6);
        assert_eq!(config.questions[0].kind, QuestionKind::YesNoMandatory);
        assert_eq!(config.questions[5].kind, QuestionKind::NoticePeriod);
        assert_eq!(
            config.salary_range(),
            Some(SalaryRange {
                min: 8000.0,
                max: 12000.0
            })
        );
        assert_eq!(config.mandatory_positions(), vec![0, 1]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_salary_question_without_range() {
        let json = r#"{"question": "Salary?", "kind": "salary_expectation"}"#;
        let q: ScreeningQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::SalaryExpectation { range: None });
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{"question": "Favourite colour?", "kind": "multiple_choice"}"#;
        assert!(serde_json::from_str::<ScreeningQuestion>(json).is_err());
    }

    #[test]
    fn test_salary_range_parsing() {
        let range: SalaryRange = "8000-12000".parse().unwrap();
        assert!(range.contains(8000.0));
        assert!(range.contains(12000.0));
        assert!(!range.contains(12000.5));
        assert!("12000-8000".parse::<SalaryRange>().is_err());
        assert!("about 10k".parse::<SalaryRange>().is_err());
    }

    #[test]
    fn test_salary_range_serializes_as_string() {
        let q = ScreeningQuestion {
            question: "Salary?".to_string(),
            kind: QuestionKind::SalaryExpectation {
                range: Some(SalaryRange {
                    min: 8000.0,
                    max: 12000.0,
                }),
            },
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["kind"], "salary_expectation");
        assert_eq!(json["range"], "8000-12000");
    }

    #[test]
    fn test_validation_rules() {
        let mut config: JobConfig = serde_json::from_str(CONFIG_JSON).unwrap();

        config.questions[2].question = "   ".to_string();
        assert_eq!(config.validate(), Err(JobConfigError::BlankQuestion(3)));

        config.questions.truncate(2);
        let extra = config.questions[0].clone();
        config.questions.extend(std::iter::repeat(extra).take(5));
        assert_eq!(config.validate(), Err(JobConfigError::TooManyQuestions(7)));

        config.questions.clear();
        assert_eq!(config.validate(), Err(JobConfigError::NoQuestions));

        config.job_description = " ".to_string();
        assert_eq!(config.validate(), Err(JobConfigError::EmptyDescription));
    }
}
