pub mod candidate;

pub use candidate::{AnswerSignals, CandidateResult};
