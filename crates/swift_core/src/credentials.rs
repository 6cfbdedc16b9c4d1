//! Access token lifecycle for the map service.
//!
//! The token is read once at startup, written when the user supplies one, and
//! cleared when the service rejects it. It is passed explicitly to whatever
//! needs it; nothing here is global.

use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const SETTINGS_FILE_NAME: &str = "swiftride_settings.json";
pub const CREDENTIAL_KEY: &str = "mapbox_public_token";

/// A non-empty, trimmed access token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "Credential({prefix}…)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialStoreError {
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    InvalidFormat(String),
}

pub trait CredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError>;
    fn save(&mut self, credential: &Credential) -> Result<(), CredentialStoreError>;
    fn clear(&mut self) -> Result<(), CredentialStoreError>;
}

/// Load the stored credential. A broken store is logged and treated as
/// "no credential".
pub fn load_credential<S: CredentialStore + ?Sized>(store: &S) -> Option<Credential> {
    match store.load() {
        Ok(credential) => credential,
        Err(error) => {
            warn!(%error, "failed to load map credential; treating as unset");
            None
        }
    }
}

/// In-process store, used by tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    value: Option<Credential>,
}

impl MemoryCredentialStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            value: Some(credential),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, credential: &Credential) -> Result<(), CredentialStoreError> {
        self.value = Some(credential.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CredentialStoreError> {
        self.value = None;
        Ok(())
    }
}

/// Settings file layout. Unknown keys are kept so other tools can share it.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mapbox_public_token: Option<String>,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

/// JSON settings file holding the token under [`CREDENTIAL_KEY`].
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by [`SETTINGS_FILE_NAME`] in the current directory.
    pub fn in_working_dir() -> Result<Self, CredentialStoreError> {
        let cwd = std::env::current_dir().map_err(|error| {
            CredentialStoreError::Io(format!("failed to read current directory: {error}"))
        })?;
        Ok(Self::new(cwd.join(SETTINGS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_settings(&self) -> Result<SettingsFile, CredentialStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SettingsFile::default())
            }
            Err(error) => {
                return Err(CredentialStoreError::Io(format!(
                    "failed to read settings file '{}': {error}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_str(&contents).map_err(|error| {
            CredentialStoreError::InvalidFormat(format!(
                "invalid settings file '{}': {error}",
                self.path.display()
            ))
        })
    }

    /// Like `read_settings`, but a corrupt file is replaced rather than fatal.
    fn read_settings_for_update(&self) -> Result<SettingsFile, CredentialStoreError> {
        match self.read_settings() {
            Ok(settings) => Ok(settings),
            Err(CredentialStoreError::InvalidFormat(message)) => {
                warn!(%message, "overwriting unreadable settings file");
                Ok(SettingsFile::default())
            }
            Err(error) => Err(error),
        }
    }

    fn write_settings(&self, settings: &SettingsFile) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                CredentialStoreError::Io(format!(
                    "failed to create settings directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let serialized = serde_json::to_string_pretty(settings).map_err(|error| {
            CredentialStoreError::Io(format!("failed to serialize settings to json: {error}"))
        })?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or(0);
        let temp_path = self.path.with_extension(format!("json.tmp.{nanos}"));
        let mut temp_file = File::create(&temp_path).map_err(|error| {
            CredentialStoreError::Io(format!(
                "failed to create temp settings file '{}': {error}",
                temp_path.display()
            ))
        })?;
        temp_file
            .write_all(serialized.as_bytes())
            .and_then(|()| temp_file.sync_all())
            .map_err(|error| {
                let _ = fs::remove_file(&temp_path);
                CredentialStoreError::Io(format!(
                    "failed to write temp settings file '{}': {error}",
                    temp_path.display()
                ))
            })?;

        fs::rename(&temp_path, &self.path).map_err(|error| {
            let _ = fs::remove_file(&temp_path);
            CredentialStoreError::Io(format!(
                "failed to move temp settings file '{}' to '{}': {error}",
                temp_path.display(),
                self.path.display()
            ))
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialStoreError> {
        let settings = self.read_settings()?;
        Ok(settings
            .mapbox_public_token
            .as_deref()
            .and_then(Credential::new))
    }

    fn save(&mut self, credential: &Credential) -> Result<(), CredentialStoreError> {
        let mut settings = self.read_settings_for_update()?;
        settings.mapbox_public_token = Some(credential.as_str().to_string());
        self.write_settings(&settings)?;
        info!(path = %self.path.display(), "saved map credential");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CredentialStoreError> {
        let mut settings = self.read_settings_for_update()?;
        if settings.mapbox_public_token.take().is_none() {
            return Ok(());
        }
        self.write_settings(&settings)?;
        info!(path = %self.path.display(), "cleared map credential");
        Ok(())
    }
}
