use crate::cryptosuite::ski_for_public_key;
use crate::error::certificate::CertificateError;
use crate::error::certificate::CertificateError::{
    DecodePemFailed, ParseCertificateFailed, UnexpectedPemTag,
};

const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// The parts of an X.509 certificate identity resolution cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Subject public key as carried in the certificate (an uncompressed
    /// point for EC keys).
    pub public_key: Vec<u8>,
    pub common_name: Option<String>,
}

pub fn parse_certificate(pem_content: &[u8]) -> Result<CertificateInfo, CertificateError> {
    let pem = pem::parse(pem_content).map_err(DecodePemFailed)?;
    if pem.tag != CERTIFICATE_TAG {
        return Err(UnexpectedPemTag(pem.tag));
    }
    let (_, certificate) = x509_parser::parse_x509_certificate(&pem.contents)
        .map_err(|err| ParseCertificateFailed(err.to_string()))?;
    let common_name = certificate
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string);
    Ok(CertificateInfo {
        public_key: certificate.public_key().subject_public_key.data.to_vec(),
        common_name,
    })
}

/// Returns the subject public key carried by a PEM-encoded X.509 certificate.
pub fn public_key_from_certificate(pem_content: &[u8]) -> Result<Vec<u8>, CertificateError> {
    parse_certificate(pem_content).map(|info| info.public_key)
}

/// Subject key identifier of the certificate's public key; this is how the
/// crypto suite finds the matching private key.
pub fn ski_from_certificate(pem_content: &[u8]) -> Result<Vec<u8>, CertificateError> {
    public_key_from_certificate(pem_content).map(|public_key| ski_for_public_key(&public_key))
}
