//! Ranking Aggregator: folds sub-scores into one final rank and orders the cohort.
//!
//! Skill matches are reported alongside each candidate but carry no weight here.

use serde::{Deserialize, Serialize};

use crate::models::CandidateResult;
use crate::screening::answers::DEFAULT_NOTICE_DAYS;
use crate::screening::normalize::{score_notice_periods, score_salaries, NormalizeError};
use crate::screening::similarity::round2;

pub const SIMILARITY_WEIGHT: f64 = 0.7;
pub const SALARY_WEIGHT: f64 = 0.2;
pub const NOTICE_WEIGHT: f64 = 0.1;

/// Which signals are available for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// An answers table was supplied: similarity, salary and notice all count.
    WithAnswers,
    /// Resumes only: the final rank is the similarity score.
    ResumeOnly,
}

/// Computes `final_rank` for every candidate and sorts descending.
///
/// The sort is stable, so candidates with equal ranks keep their input order.
/// In `WithAnswers` mode the salary and notice scores are normalized over the
/// whole cohort first; a candidate without answers counts as salary 0 and the
/// default notice period.
pub fn rank(
    mut cohort: Vec<CandidateResult>,
    mode: RankingMode,
) -> Result<Vec<CandidateResult>, NormalizeError> {
    if cohort.is_empty() {
        return Ok(cohort);
    }

    match mode {
        RankingMode::WithAnswers => {
            let salaries: Vec<f64> = cohort.iter().map(|c| c.salary().unwrap_or(0.0)).collect();
            let notices: Vec<f64> = cohort
                .iter()
                .map(|c| c.notice_days().unwrap_or(DEFAULT_NOTICE_DAYS))
                .collect();

            let salary_scores = score_salaries(&salaries)?;
            let notice_scores = score_notice_periods(&notices)?;

            for ((candidate, salary_score), notice_score) in
                cohort.iter_mut().zip(salary_scores).zip(notice_scores)
            {
                candidate.salary_score = Some(salary_score);
                candidate.notice_score = Some(notice_score);
                candidate.final_rank = weighted_rank(
                    candidate.similarity_score,
                    salary_score,
                    notice_score,
                );
            }
        }
        RankingMode::ResumeOnly => {
            for candidate in cohort.iter_mut() {
                candidate.salary_score = None;
                candidate.notice_score = None;
                candidate.final_rank = candidate.similarity_score;
            }
        }
    }

    cohort.sort_by(|a, b| b.final_rank.total_cmp(&a.final_rank));
    Ok(cohort)
}

/// `similarity*0.7 + salary*0.2 + notice*0.1`, rounded to 2 decimals.
pub fn weighted_rank(similarity: f64, salary_score: f64, notice_score: f64) -> f64 {
    round2(
        similarity * SIMILARITY_WEIGHT + salary_score * SALARY_WEIGHT + notice_score * NOTICE_WEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerSignals;
    use crate::screening::skills::SkillMatch;

    fn candidate(name: &str, score: f64) -> CandidateResult {
        CandidateResult::new(name, score, SkillMatch::default())
    }

    fn with_answers(name: &str, score: f64, salary: f64, notice_days: f64) -> CandidateResult {
        candidate(name, score).with_answers(AnswerSignals {
            salary,
            notice: format!("{notice_days} days"),
            notice_days,
        })
    }

    fn names(ranked: &[CandidateResult]) -> Vec<&str> {
        ranked.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_resume_only_rank_is_similarity() {
        let ranked = rank(
            vec![candidate("a", 4.5), candidate("b", 8.25), candidate("c", -0.5)],
            RankingMode::ResumeOnly,
        )
        .unwrap();
        assert_eq!(names(&ranked), vec!["b", "a", "c"]);
        assert_eq!(ranked[0].final_rank, 8.25);
        assert!(ranked.iter().all(|c| c.salary_score.is_none()));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(
            vec![
                candidate("first", 5.0),
                candidate("top", 9.0),
                candidate("second", 5.0),
                candidate("third", 5.0),
            ],
            RankingMode::ResumeOnly,
        )
        .unwrap();
        assert_eq!(names(&ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_weighted_rank_with_answers() {
        let ranked = rank(
            vec![
                with_answers("pricey", 8.0, 12000.0, 90.0),
                with_answers("cheap", 8.0, 8000.0, 30.0),
            ],
            RankingMode::WithAnswers,
        )
        .unwrap();

        // cheap: 8*0.7 + 10*0.2 + 10*0.1 = 8.6; pricey: 8*0.7 + 0 + 0 = 5.6
        assert_eq!(names(&ranked), vec!["cheap", "pricey"]);
        assert_eq!(ranked[0].final_rank, 8.6);
        assert_eq!(ranked[0].salary_score, Some(10.0));
        assert_eq!(ranked[0].notice_score, Some(10.0));
        assert_eq!(ranked[1].final_rank, 5.6);
    }

    #[test]
    fn test_single_candidate_cohort_gets_zero_sub_scores() {
        let ranked = rank(
            vec![with_answers("solo", 7.0, 10000.0, 30.0)],
            RankingMode::WithAnswers,
        )
        .unwrap();
        assert_eq!(ranked[0].salary_score, Some(0.0));
        assert_eq!(ranked[0].notice_score, Some(0.0));
        assert_eq!(ranked[0].final_rank, 4.9);
    }

    #[test]
    fn test_empty_cohort_is_empty() {
        assert!(rank(vec![], RankingMode::WithAnswers).unwrap().is_empty());
    }

    #[test]
    fn test_output_is_permutation_of_input() {
        let input = vec![
            with_answers("a", 3.0, 100.0, 10.0),
            with_answers("b", 6.0, 300.0, 20.0),
            with_answers("c", 6.0, 200.0, 60.0),
            with_answers("d", 1.0, 100.0, 5.0),
        ];
        let ranked = rank(input.clone(), RankingMode::WithAnswers).unwrap();
        assert_eq!(ranked.len(), input.len());
        let mut got = names(&ranked);
        got.sort();
        assert_eq!(got, vec!["a", "b", "c", "d"]);
        assert!(ranked.windows(2).all(|w| w[0].final_rank >= w[1].final_rank));
    }

    #[test]
    fn test_weighted_rank_rounds() {
        assert_eq!(weighted_rank(7.77, 3.33, 1.11), 6.22);
    }
}
