use crate::error::identity::enrollment_service::EnrollmentServiceError;
use crate::identity::certificate::public_key_from_certificate;
use crate::identity::enrollment::{EnrollmentRequest, EnrollmentService, ReenrollmentRequest};
use pem::{encode, Pem};
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    RemoteKeyPair, SignatureAlgorithm, PKCS_ECDSA_P256_SHA256,
};
use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, KeyPair as _, UnparsedPublicKey, ECDSA_P256_SHA256_ASN1,
    ECDSA_P256_SHA256_ASN1_SIGNING,
};
use slog::Logger;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) fn test_logger() -> Logger {
    Logger::root(slog::Discard, slog::o!())
}

/// A P-256 key generated outside any crypto suite: PKCS#8 PEM plus the
/// uncompressed public point.
pub(crate) fn generate_key_pair() -> (String, Vec<u8>) {
    let rng = SystemRandom::new();
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng).unwrap();
    let key_pair =
        EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref(), &rng).unwrap();
    let pem = encode(&Pem {
        tag: "PRIVATE KEY".to_owned(),
        contents: pkcs8.as_ref().to_vec(),
    });
    (pem, key_pair.public_key().as_ref().to_vec())
}

/// Certifies a public key the CA never sees the private half of.
struct PublicKeyOnly(Vec<u8>);

impl RemoteKeyPair for PublicKeyOnly {
    fn public_key(&self) -> &[u8] {
        &self.0
    }

    fn sign(&self, _msg: &[u8]) -> Result<Vec<u8>, rcgen::Error> {
        Ok(Vec::new())
    }

    fn algorithm(&self) -> &'static SignatureAlgorithm {
        &PKCS_ECDSA_P256_SHA256
    }
}

/// In-process certificate authority standing in for the enrollment service.
pub(crate) struct TestCertificateAuthority {
    ca: Certificate,
    secrets: Mutex<HashMap<String, String>>,
    issued: AtomicUsize,
    certify_other_key: AtomicBool,
}

impl TestCertificateAuthority {
    pub fn new() -> Self {
        let mut params = CertificateParams::new(Vec::<String>::new());
        params.distinguished_name = DistinguishedName::new();
        params
            .distinguished_name
            .push(DnType::CommonName, "test-ca.example.com");
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.alg = &PKCS_ECDSA_P256_SHA256;
        Self {
            ca: Certificate::from_params(params).unwrap(),
            secrets: Mutex::new(HashMap::new()),
            issued: AtomicUsize::new(0),
            certify_other_key: AtomicBool::new(false),
        }
    }

    pub fn register(&self, enrollment_id: &str, secret: &str) {
        self.secrets
            .lock()
            .unwrap()
            .insert(enrollment_id.to_string(), secret.to_string());
    }

    /// Makes the CA certify a key other than the requested one.
    pub fn misbehave(&self) {
        self.certify_other_key.store(true, Ordering::SeqCst);
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn issue(&self, common_name: &str, public_key: &[u8]) -> Vec<u8> {
        let mut params = CertificateParams::new(Vec::<String>::new());
        params.distinguished_name = DistinguishedName::new();
        params.distinguished_name.push(DnType::CommonName, common_name);
        params.alg = &PKCS_ECDSA_P256_SHA256;
        params.key_pair =
            Some(KeyPair::from_remote(Box::new(PublicKeyOnly(public_key.to_vec()))).unwrap());
        let certificate = Certificate::from_params(params).unwrap();
        self.issued.fetch_add(1, Ordering::SeqCst);
        certificate
            .serialize_pem_with_signer(&self.ca)
            .unwrap()
            .into_bytes()
    }

    fn certify(&self, common_name: &str, public_key: &[u8]) -> Vec<u8> {
        if self.certify_other_key.load(Ordering::SeqCst) {
            let (_, other) = generate_key_pair();
            self.issue(common_name, &other)
        } else {
            self.issue(common_name, public_key)
        }
    }
}

impl EnrollmentService for TestCertificateAuthority {
    fn enroll(&self, request: &EnrollmentRequest<'_>) -> Result<Vec<u8>, EnrollmentServiceError> {
        let registered = self
            .secrets
            .lock()
            .unwrap()
            .get(request.enrollment_id)
            .cloned();
        match registered {
            Some(secret) if secret == request.secret => {
                Ok(self.certify(request.enrollment_id, request.public_key))
            }
            _ => Err(EnrollmentServiceError::Rejected(
                "Authentication failure".to_string(),
            )),
        }
    }

    fn reenroll(
        &self,
        request: &ReenrollmentRequest<'_>,
    ) -> Result<Vec<u8>, EnrollmentServiceError> {
        let current_key = public_key_from_certificate(request.current_certificate)
            .map_err(|err| EnrollmentServiceError::Unavailable(Box::new(err)))?;
        UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, current_key)
            .verify(request.public_key, request.signature)
            .map_err(|_| EnrollmentServiceError::Rejected("Invalid signature".to_string()))?;
        Ok(self.certify(request.enrollment_id, request.public_key))
    }
}
