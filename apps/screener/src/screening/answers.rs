//! Answer Decoder: structured screening answers submitted alongside each application.
//!
//! Each row of the answers CSV carries a pipe-delimited blob with a fixed arity of
//! six fields: two mandatory yes/no gates, experience, education, salary, notice.

use std::collections::HashMap;
use std::io::Read;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Number of fields in an answer blob. Extra segments are ignored.
pub const ANSWER_ARITY: usize = 6;

/// Notice period assumed when the answer carries no digits: unknown counts as long.
pub const DEFAULT_NOTICE_DAYS: f64 = 60.0;

static NOT_SALARY_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9.]").unwrap());
static FIRST_DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());
static DECIMAL_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{Nd}$").unwrap());

#[derive(Debug, Error)]
pub enum AnswersError {
    #[error("Invalid answers CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Answers CSV is missing the required '{0}' column")]
    MissingColumn(&'static str),
}

/// Decoded answer blob, index-addressed in the order the questions were asked.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateAnswerRecord {
    fields: [String; ANSWER_ARITY],
}

impl CandidateAnswerRecord {
    /// Splits on `|`, trims each field, keeps the first six and pads with empty strings.
    pub fn decode(raw: &str) -> Self {
        let mut fields: [String; ANSWER_ARITY] = Default::default();
        for (slot, part) in fields.iter_mut().zip(raw.split('|')) {
            *slot = part.trim().to_string();
        }
        Self { fields }
    }

    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn screening_answer(&self) -> &str {
        self.field(0)
    }

    pub fn second_answer(&self) -> &str {
        self.field(1)
    }

    pub fn experience(&self) -> &str {
        self.field(2)
    }

    pub fn education(&self) -> &str {
        self.field(3)
    }

    pub fn salary_raw(&self) -> &str {
        self.field(4)
    }

    pub fn notice_raw(&self) -> &str {
        self.field(5)
    }

    /// Both mandatory gates answered "yes" (any case).
    pub fn is_eligible(&self) -> bool {
        self.screening_answer().eq_ignore_ascii_case("yes")
            && self.second_answer().eq_ignore_ascii_case("yes")
    }

    /// Salary with every non-digit, non-dot character stripped. Empty or unparsable → 0.
    pub fn salary(&self) -> f64 {
        parse_salary(self.salary_raw())
    }

    /// First run of digits in the notice answer, in days. No digits → 60.
    pub fn notice_days(&self) -> f64 {
        parse_notice_days(self.notice_raw())
    }
}

fn is_decimal_digit(c: char) -> bool {
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Value of any Unicode decimal digit (`Nd`). Those are assigned in runs of
/// ten starting at zero, so the offset from the start of the run gives the value.
fn decimal_value(c: char) -> Option<u32> {
    if let Some(digit) = c.to_digit(10) {
        return Some(digit);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((c as u32 - start) % 10)
}

/// Rewrites Arabic-Indic and other non-ASCII decimal digits as ASCII.
fn ascii_digits(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            decimal_value(c)
                .and_then(|d| char::from_digit(d, 10))
                .unwrap_or(c)
        })
        .collect()
}

pub fn parse_salary(raw: &str) -> f64 {
    let raw = ascii_digits(raw);
    let stripped = NOT_SALARY_CHARS.replace_all(&raw, "");
    if stripped.is_empty() {
        return 0.0;
    }
    // "1.2.3" survives stripping but is not a number.
    stripped.parse::<f64>().unwrap_or(0.0)
}

pub fn parse_notice_days(raw: &str) -> f64 {
    FIRST_DIGIT_RUN
        .find(&ascii_digits(raw))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(DEFAULT_NOTICE_DAYS)
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    name: String,
    #[serde(default)]
    answers: Option<String>,
}

/// The structured-answers table, keyed by candidate name (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct AnswerTable {
    names: Vec<String>,
    answers: Vec<String>,
    index: HashMap<String, usize>,
}

impl AnswerTable {
    /// Parses a CSV with a header row. Requires a `name` column; `answers` may be
    /// absent or blank. Other columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnswersError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        if !csv_reader.headers()?.iter().any(|h| h == "name") {
            return Err(AnswersError::MissingColumn("name"));
        }

        let mut table = AnswerTable::default();
        for row in csv_reader.deserialize::<AnswerRow>() {
            let row = row?;
            table.push(row.name, row.answers.unwrap_or_default());
        }
        Ok(table)
    }

    pub fn push(&mut self, name: String, answers: String) {
        let key = name.trim().to_lowercase();
        let position = self.names.len();
        // First row wins on duplicate names.
        self.index.entry(key).or_insert(position);
        self.names.push(name.trim().to_string());
        self.answers.push(answers);
    }

    /// All names, in file order.
    pub fn known_names(&self) -> &[String] {
        &self.names
    }

    /// Raw answer blob for `name`, matched case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&i| self.answers[i].as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
