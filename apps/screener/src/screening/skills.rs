//! Skill extraction from job descriptions and per-candidate skill match summaries.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Known skill and competency terms (domain + soft skills) recognised in job descriptions.
pub const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "NLP",
    "machine learning",
    "communication",
    "data",
    "SQL",
    "deep learning",
    "analytics",
    "modeling",
    "cloud",
    "statistics",
    "leadership",
    "presentation",
    "research",
    "Excel",
    "Tableau",
];

static DEFAULT_EXTRACTOR: LazyLock<SkillExtractor> =
    LazyLock::new(|| SkillExtractor::new(SKILL_VOCABULARY));

/// Whole-word, case-insensitive matcher over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct SkillExtractor {
    pattern: Regex,
}

impl SkillExtractor {
    pub fn new(vocabulary: &[&str]) -> Self {
        let alternation = vocabulary
            .iter()
            .map(|term| regex::escape(term))
            .collect::<Vec<_>>()
            .join("|");
        // Escaped terms cannot produce an invalid pattern.
        let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()
            .expect("escaped vocabulary is a valid regex");
        Self { pattern }
    }

    /// Lower-cased, deduplicated set of vocabulary terms found in `job_text`.
    pub fn extract(&self, job_text: &str) -> BTreeSet<String> {
        self.pattern
            .find_iter(job_text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }
}

impl Default for SkillExtractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

/// Required skills partitioned against one candidate's text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillMatch {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

/// Case-insensitive substring containment of each required skill in `candidate_text`.
/// `matched` and `missing` always partition `required_skills` exactly.
pub fn summarize(candidate_text: &str, required_skills: &BTreeSet<String>) -> SkillMatch {
    let text = candidate_text.to_lowercase();
    let (matched, missing) = required_skills
        .iter()
        .cloned()
        .partition(|skill| text.contains(&skill.to_lowercase()));
    SkillMatch { matched, missing }
}
