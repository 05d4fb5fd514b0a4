//! Document ingestion: resume archive unpacking and PDF/DOCX text extraction.

pub mod archive;
pub mod extract;

pub use archive::{read_resume_archive, ResumeDocument};
pub use extract::{DocumentExtractor, TextExtractor};
