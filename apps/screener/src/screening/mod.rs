pub mod answers;
pub mod handlers;
pub mod jobs;
pub mod names;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod similarity;
pub mod skills;
