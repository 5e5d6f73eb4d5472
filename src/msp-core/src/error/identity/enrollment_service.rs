use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrollmentServiceError {
    #[error("Enrollment request was rejected: {0}")]
    Rejected(String),

    #[error("Enrollment service is unavailable")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}
