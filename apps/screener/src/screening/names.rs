//! Name Resolver: fuzzy-matches a resume header against the names in the answers table.
//!
//! The similarity measure sits behind `StringSimilarity` so the algorithm and
//! cutoff can be swapped without touching the resolver's control flow.

/// Minimum similarity ratio for a header line to count as a name match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Only the header region of a resume is searched.
pub const HEADER_LINES: usize = 5;

/// A string similarity ratio in [0, 1], 1.0 meaning identical.
pub trait StringSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<F> StringSimilarity for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// `1 - levenshtein(a, b) / max(len(a), len(b))`, over chars.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl StringSimilarity for NormalizedLevenshtein {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}

pub struct NameResolver {
    similarity: Box<dyn StringSimilarity>,
    threshold: f64,
}

impl NameResolver {
    pub fn new(similarity: Box<dyn StringSimilarity>, threshold: f64) -> Self {
        Self {
            similarity,
            threshold,
        }
    }

    /// Returns the known name matched by the earliest header line, if any.
    ///
    /// Each of the first `HEADER_LINES` non-empty lines is compared, lower-cased,
    /// against every known name; the closest name at or above the threshold wins
    /// for that line (ties go to the earlier known name). Lines are tried in order.
    pub fn resolve(&self, resume_text: &str, known_names: &[String]) -> Option<String> {
        let lowered: Vec<String> = known_names.iter().map(|n| n.trim().to_lowercase()).collect();

        resume_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(HEADER_LINES)
            .find_map(|line| {
                let line = line.to_lowercase();
                let mut best: Option<(usize, f64)> = None;
                for (index, name) in lowered.iter().enumerate() {
                    let ratio = self.similarity.similarity(&line, name);
                    if ratio >= self.threshold && best.map_or(true, |(_, b)| ratio > b) {
                        best = Some((index, ratio));
                    }
                }
                best.map(|(index, _)| known_names[index].clone())
            })
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(Box::new(NormalizedLevenshtein), DEFAULT_MATCH_THRESHOLD)
    }
}
