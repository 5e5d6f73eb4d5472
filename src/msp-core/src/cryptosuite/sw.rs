//! Software crypto suite: ECDSA over P-256 with SHA-256, keys held in a
//! [`KeyStore`] and cached in memory once parsed.
use crate::cryptosuite::{
    CryptoSuite, Key, KeyAlgorithm, KeyGenOptions, KeyImportOptions, KeyStore,
};
use crate::error::crypto_suite::CryptoSuiteError;
use crate::error::crypto_suite::CryptoSuiteError::{
    DecodeKeyPemFailed, GenerateKeyFailed, KeyNotFound, KeyRejected, KeyStoreFailed,
    NotAPrivateKey, SignFailed, UnsupportedKeyFormat,
};
use crate::error::kvstore::KeyValueStoreError;
use pem::{encode, Pem};
use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, KeyPair, UnparsedPublicKey, ECDSA_P256_SHA256_ASN1,
    ECDSA_P256_SHA256_ASN1_SIGNING,
};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";

struct CachedKey {
    key_pair: Arc<EcdsaKeyPair>,
    pkcs8: Arc<[u8]>,
}

pub struct SoftwareCryptoSuite {
    key_store: KeyStore,
    key_pairs: RwLock<HashMap<Vec<u8>, CachedKey>>,
    rng: SystemRandom,
    verify_after_sign: bool,
}

impl SoftwareCryptoSuite {
    pub fn new(key_store: KeyStore) -> Self {
        Self {
            key_store,
            key_pairs: RwLock::new(HashMap::new()),
            rng: SystemRandom::new(),
            verify_after_sign: true,
        }
    }

    /// Whether every signature is checked against the public key before it
    /// is handed out.
    pub fn with_verify_after_sign(mut self, verify_after_sign: bool) -> Self {
        self.verify_after_sign = verify_after_sign;
        self
    }

    fn parse_pkcs8(&self, pkcs8: &[u8]) -> Result<EcdsaKeyPair, CryptoSuiteError> {
        EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8, &self.rng)
            .map_err(KeyRejected)
    }

    /// Parses a PKCS#8 document and caches it by SKI.
    fn remember(&self, pkcs8: &[u8]) -> Result<(Key, Arc<EcdsaKeyPair>), CryptoSuiteError> {
        let key_pair = Arc::new(self.parse_pkcs8(pkcs8)?);
        let key = Key::new(
            KeyAlgorithm::EcdsaP256,
            key_pair.public_key().as_ref().to_vec(),
            true,
        );
        self.key_pairs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key.ski().to_vec(),
                CachedKey {
                    key_pair: key_pair.clone(),
                    pkcs8: pkcs8.into(),
                },
            );
        Ok((key, key_pair))
    }

    /// Caches a PKCS#8 document and persists it unless ephemeral.
    fn admit(&self, pkcs8: &[u8], ephemeral: bool) -> Result<Key, CryptoSuiteError> {
        let (key, _) = self.remember(pkcs8)?;
        if !ephemeral {
            self.store(key.ski(), pkcs8)?;
        }
        Ok(key)
    }

    fn store(&self, ski: &[u8], pkcs8: &[u8]) -> Result<(), CryptoSuiteError> {
        self.key_store
            .store_key(ski, encode_private_key_pem(pkcs8).as_bytes())
            .map_err(KeyStoreFailed)
    }

    fn cached<T>(&self, ski: &[u8], f: impl FnOnce(&CachedKey) -> T) -> Option<T> {
        self.key_pairs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ski)
            .map(f)
    }

    fn key_pair(&self, ski: &[u8]) -> Result<Arc<EcdsaKeyPair>, CryptoSuiteError> {
        if let Some(key_pair) = self.cached(ski, |cached| cached.key_pair.clone()) {
            return Ok(key_pair);
        }
        let stored = self.key_store.load_key(ski).map_err(|err| match err {
            KeyValueStoreError::NotFound(_) => KeyNotFound(hex::encode(ski)),
            err => KeyStoreFailed(err),
        })?;
        let (_, key_pair) = self.remember(&decode_private_key_pem(&stored)?)?;
        Ok(key_pair)
    }
}

impl CryptoSuite for SoftwareCryptoSuite {
    fn key_gen(&self, opts: &KeyGenOptions) -> Result<Key, CryptoSuiteError> {
        match opts.algorithm {
            KeyAlgorithm::EcdsaP256 => {
                let pkcs8 =
                    EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &self.rng)
                        .map_err(GenerateKeyFailed)?;
                self.admit(pkcs8.as_ref(), opts.ephemeral)
            }
        }
    }

    fn key_import(&self, pem: &[u8], opts: &KeyImportOptions) -> Result<Key, CryptoSuiteError> {
        let pkcs8 = decode_private_key_pem(pem)?;
        self.admit(&pkcs8, opts.ephemeral)
    }

    fn persist_key(&self, key: &Key) -> Result<(), CryptoSuiteError> {
        let pkcs8 = self
            .cached(key.ski(), |cached| cached.pkcs8.clone())
            .ok_or_else(|| KeyNotFound(key.ski_hex()))?;
        self.store(key.ski(), &pkcs8)
    }

    fn get_key(&self, ski: &[u8]) -> Result<Key, CryptoSuiteError> {
        let key_pair = self.key_pair(ski)?;
        Ok(Key::new(
            KeyAlgorithm::EcdsaP256,
            key_pair.public_key().as_ref().to_vec(),
            true,
        ))
    }

    fn hash(&self, msg: &[u8]) -> Result<Vec<u8>, CryptoSuiteError> {
        Ok(Sha256::digest(msg).to_vec())
    }

    fn sign(&self, key: &Key, msg: &[u8]) -> Result<Vec<u8>, CryptoSuiteError> {
        if !key.is_private() {
            return Err(NotAPrivateKey(key.ski_hex()));
        }
        let key_pair = self.key_pair(key.ski())?;
        let signature = key_pair.sign(&self.rng, msg).map_err(SignFailed)?;

        if self.verify_after_sign && !self.verify(key, signature.as_ref(), msg)? {
            return Err(SignFailed(ring::error::Unspecified));
        }
        Ok(signature.as_ref().to_vec())
    }

    fn verify(&self, key: &Key, signature: &[u8], msg: &[u8]) -> Result<bool, CryptoSuiteError> {
        let public_key = UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, key.public_key_bytes());
        Ok(public_key.verify(msg, signature).is_ok())
    }
}

fn decode_private_key_pem(pem_content: &[u8]) -> Result<Vec<u8>, CryptoSuiteError> {
    let pem = pem::parse(pem_content).map_err(DecodeKeyPemFailed)?;
    if pem.tag != PRIVATE_KEY_TAG {
        return Err(UnsupportedKeyFormat(pem.tag));
    }
    Ok(pem.contents)
}

fn encode_private_key_pem(key: &[u8]) -> String {
    let pem = Pem {
        tag: PRIVATE_KEY_TAG.to_owned(),
        contents: key.to_vec(),
    };
    encode(&pem)
}
