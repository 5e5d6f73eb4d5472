use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("Failed to decode certificate PEM")]
    DecodePemFailed(#[source] pem::PemError),

    #[error("Expected a CERTIFICATE PEM block, found '{0}'")]
    UnexpectedPemTag(String),

    #[error("Failed to parse X.509 certificate: {0}")]
    ParseCertificateFailed(String),
}
