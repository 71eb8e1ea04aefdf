pub mod submission;

pub use submission::{scalar_text, Submission, Timestamp, ValidatedSubmission, COMPANY_SIZES};
