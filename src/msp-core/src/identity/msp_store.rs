use crate::cryptosuite::keystore::key_name;
use crate::error::fs::FsError;
use std::path::{Path, PathBuf};

/// Read-only view of an organization's MSP directory, where certificates and
/// keys provisioned outside the SDK live:
///
/// ```text
/// <crypto path>/signcerts/<user>@<org dir>-cert.pem
/// <crypto path>/keystore/<hex ski>_sk
/// ```
#[derive(Clone, Debug)]
pub(crate) struct MspCryptoStore {
    path_template: String,
    org_dir: String,
}

impl MspCryptoStore {
    pub fn new(path_template: String, org_name: &str) -> Self {
        // .../<org dir>/users/{username}@<org dir>/msp
        let org_dir = Path::new(&path_template)
            .ancestors()
            .nth(3)
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| org_name.to_string());
        Self {
            path_template,
            org_dir,
        }
    }

    fn user_dir(&self, user_name: &str) -> PathBuf {
        PathBuf::from(
            self.path_template
                .replace("{username}", user_name)
                .replace("{userName}", user_name),
        )
    }

    pub fn cert_path(&self, user_name: &str) -> PathBuf {
        self.user_dir(user_name)
            .join("signcerts")
            .join(format!("{}@{}-cert.pem", user_name, self.org_dir))
    }

    pub fn key_path(&self, user_name: &str, ski: &[u8]) -> PathBuf {
        self.user_dir(user_name).join("keystore").join(key_name(ski))
    }

    pub fn load_cert(&self, user_name: &str) -> Result<Option<Vec<u8>>, FsError> {
        read_if_exists(&self.cert_path(user_name))
    }

    pub fn load_key(&self, user_name: &str, ski: &[u8]) -> Result<Option<Vec<u8>>, FsError> {
        read_if_exists(&self.key_path(user_name, ski))
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, FsError> {
    match crate::fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str =
        "/crypto/peerOrganizations/org1.example.com/users/{username}@org1.example.com/msp";

    #[test]
    fn derives_file_locations_from_the_template() {
        let store = MspCryptoStore::new(TEMPLATE.to_string(), "org1");

        assert_eq!(
            store.cert_path("User1"),
            PathBuf::from(
                "/crypto/peerOrganizations/org1.example.com/users/User1@org1.example.com/msp/signcerts/User1@org1.example.com-cert.pem"
            )
        );
        assert_eq!(
            store.key_path("User1", &[0xab, 0xcd]),
            PathBuf::from(
                "/crypto/peerOrganizations/org1.example.com/users/User1@org1.example.com/msp/keystore/abcd_sk"
            )
        );
    }

    #[test]
    fn falls_back_to_org_name_for_shallow_paths() {
        let store = MspCryptoStore::new("msp".to_string(), "org1");

        assert_eq!(
            store.cert_path("admin"),
            PathBuf::from("msp/signcerts/admin@org1-cert.pem")
        );
    }

    #[test]
    fn missing_files_are_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = MspCryptoStore::new(dir.path().to_string_lossy().into_owned(), "org1");

        assert!(store.load_cert("nobody").unwrap().is_none());
        assert!(store.load_key("nobody", &[1]).unwrap().is_none());
    }
}
