//! Contract with the service that turns enrollment secrets into
//! certificates. Transport, timeouts and retries are the service's concern.
use crate::error::identity::enrollment_service::EnrollmentServiceError;

#[derive(Clone, Copy, Debug)]
pub struct EnrollmentRequest<'a> {
    pub enrollment_id: &'a str,
    pub secret: &'a str,
    pub msp_id: &'a str,

    /// Uncompressed public point of the freshly generated key.
    pub public_key: &'a [u8],
}

#[derive(Clone, Copy, Debug)]
pub struct ReenrollmentRequest<'a> {
    pub enrollment_id: &'a str,
    pub msp_id: &'a str,
    pub current_certificate: &'a [u8],
    pub public_key: &'a [u8],

    /// `public_key` signed with the current identity's key.
    pub signature: &'a [u8],
}

pub trait EnrollmentService: Send + Sync {
    /// Returns the issued PEM certificate.
    fn enroll(&self, request: &EnrollmentRequest<'_>) -> Result<Vec<u8>, EnrollmentServiceError>;

    /// Returns the issued PEM certificate.
    fn reenroll(
        &self,
        request: &ReenrollmentRequest<'_>,
    ) -> Result<Vec<u8>, EnrollmentServiceError>;
}
