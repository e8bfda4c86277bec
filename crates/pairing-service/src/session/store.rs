//! Disposable per-attempt credential stores.
//!
//! Each pairing attempt gets its own directory keyed by the phone
//! identifier. Provisioning always starts from a clean slate: a leftover
//! store for the same identifier is destroyed first, so concurrent
//! attempts for one number follow a latest-request-wins policy.

use crate::phone::PhoneIdentifier;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};
use wa_gateway_client::CredentialSink;

/// Filename of the credential artifact inside a session store.
pub const CREDENTIALS_FILE: &str = "creds.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential artifact not yet written")]
    ArtifactUnavailable,

    #[error("invalid blob name: {0}")]
    InvalidBlobName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Factory for identifier-keyed session store scopes.
#[derive(Debug, Clone)]
pub struct SessionStores {
    base_dir: PathBuf,
}

impl SessionStores {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Provision a clean store for one pairing attempt.
    ///
    /// A destroy failure on the leftover store is logged and never blocks
    /// provisioning.
    pub async fn provision(&self, id: &PhoneIdentifier) -> Result<SessionStore, StoreError> {
        let dir = self.base_dir.join(id.store_dir_name());

        if let Err(err) = fs::remove_dir_all(&dir).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(dir = %dir.display(), %err, "failed to remove stale session store");
            }
        }
        fs::create_dir_all(&dir).await?;

        debug!(dir = %dir.display(), "session store provisioned");
        Ok(SessionStore { dir })
    }
}

/// One pairing attempt's credential storage scope.
#[derive(Debug)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one named blob atomically (temp file + rename).
    pub async fn write_blob(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if name.is_empty() || name == ".." || name.contains(['/', '\\']) {
            return Err(StoreError::InvalidBlobName(name.into()));
        }

        let path = self.dir.join(name);
        let temp = path.with_extension("tmp");
        fs::write(&temp, bytes).await?;
        fs::rename(&temp, &path).await?;
        Ok(())
    }

    /// Read the credential artifact produced by a successful linkage.
    pub async fn read_credentials(&self) -> Result<Vec<u8>, StoreError> {
        match fs::read(self.dir.join(CREDENTIALS_FILE)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::ArtifactUnavailable)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl CredentialSink for SessionStore {
    async fn persist(&self, name: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.write_blob(name, bytes).await.map_err(|err| match err {
            StoreError::Io(io) => io,
            other => std::io::Error::new(std::io::ErrorKind::InvalidInput, other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_number() -> PhoneIdentifier {
        PhoneIdentifier::normalize("12025550173").unwrap()
    }

    #[tokio::test]
    async fn test_provision_creates_empty_store() {
        let base = tempfile::tempdir().unwrap();
        let stores = SessionStores::new(base.path());

        let store = stores.provision(&test_number()).await.unwrap();

        assert!(store.dir().is_dir());
        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_provision_destroys_previous_store() {
        let base = tempfile::tempdir().unwrap();
        let stores = SessionStores::new(base.path());
        let number = test_number();

        let first = stores.provision(&number).await.unwrap();
        first.write_blob(CREDENTIALS_FILE, b"old").await.unwrap();

        let second = stores.provision(&number).await.unwrap();
        assert_eq!(second.dir(), first.dir());
        assert!(matches!(
            second.read_credentials().await,
            Err(StoreError::ArtifactUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let base = tempfile::tempdir().unwrap();
        let stores = SessionStores::new(base.path());
        let store = stores.provision(&test_number()).await.unwrap();

        let artifact = br#"{"noiseKey": {"private": "abc"}, "registered": true}"#;
        store.write_blob(CREDENTIALS_FILE, artifact).await.unwrap();

        assert_eq!(store.read_credentials().await.unwrap(), artifact);
    }

    #[tokio::test]
    async fn test_artifact_unavailable_before_write() {
        let base = tempfile::tempdir().unwrap();
        let stores = SessionStores::new(base.path());
        let store = stores.provision(&test_number()).await.unwrap();

        assert!(matches!(
            store.read_credentials().await,
            Err(StoreError::ArtifactUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_blob_names_are_scoped_to_the_store() {
        let base = tempfile::tempdir().unwrap();
        let stores = SessionStores::new(base.path());
        let store = stores.provision(&test_number()).await.unwrap();

        assert!(matches!(
            store.write_blob("../escape.json", b"x").await,
            Err(StoreError::InvalidBlobName(_))
        ));
        assert!(matches!(
            store.write_blob("", b"x").await,
            Err(StoreError::InvalidBlobName(_))
        ));
    }

    #[tokio::test]
    async fn test_persist_via_credential_sink() {
        let base = tempfile::tempdir().unwrap();
        let stores = SessionStores::new(base.path());
        let store = stores.provision(&test_number()).await.unwrap();

        let sink: &dyn CredentialSink = &store;
        sink.persist("app-state-sync-key-1.json", b"{}").await.unwrap();
        sink.persist(CREDENTIALS_FILE, b"{\"registered\":true}")
            .await
            .unwrap();

        assert_eq!(
            store.read_credentials().await.unwrap(),
            b"{\"registered\":true}"
        );
    }
}
