use thiserror::Error;

use crate::validation::FieldErrors;

/// SQLSTATE raised by Postgres when a row-level security policy rejects a write.
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// SubmissionError
///
/// Everything that can go wrong between a form body and its single insert.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Input failed validation; the database was never touched.
    #[error("submission failed validation on {} field(s)", .0.len())]
    Validation(FieldErrors),
    /// The insert reached the database but a row-level access policy refused it.
    #[error("insert rejected by row-level security policy")]
    PolicyRejected,
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for SubmissionError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) {
                return SubmissionError::PolicyRejected;
            }
        }
        SubmissionError::Database(e)
    }
}
