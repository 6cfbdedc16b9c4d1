use tracing::{info, warn};

use crate::credentials::{load_credential, Credential, CredentialStore, CredentialStoreError};
use crate::route_fetch::RouteResponse;
use crate::services::MapServiceError;

use super::{MapCommand, MapSync, MapSyncConfig, SyncInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapViewState {
    /// No credential: render the "connect" prompt, touch no network.
    ConnectPrompt,
    Ready,
}

/// A [`MapSync`] gated on the service credential.
pub struct MapView<S> {
    store: S,
    credential: Option<Credential>,
    sync: MapSync,
}

impl<S: CredentialStore> MapView<S> {
    /// Start from whatever `store` holds; nothing else is consulted.
    pub fn new(store: S, config: MapSyncConfig) -> Self {
        let credential = load_credential(&store);
        Self {
            store,
            credential,
            sync: MapSync::new(config),
        }
    }

    /// Use `credential` for this session without persisting it.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn state(&self) -> MapViewState {
        if self.credential.is_some() {
            MapViewState::Ready
        } else {
            MapViewState::ConnectPrompt
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Accept a user-supplied token. Blank input is ignored and returns
    /// `Ok(false)`. The token is usable even if persisting it fails.
    pub fn connect(&mut self, raw_token: &str) -> Result<bool, CredentialStoreError> {
        let Some(credential) = Credential::new(raw_token) else {
            return Ok(false);
        };
        self.credential = Some(credential.clone());
        info!("map credential configured");
        self.store.save(&credential)?;
        Ok(true)
    }

    /// Forget the credential and tear the map down.
    pub fn disconnect(&mut self) -> Result<Vec<MapCommand>, CredentialStoreError> {
        let commands = self.close();
        self.credential = None;
        self.store.clear()?;
        Ok(commands)
    }

    pub fn reconcile(&mut self, inputs: &SyncInputs) -> Vec<MapCommand> {
        if self.credential.is_none() {
            return Vec::new();
        }
        self.sync.reconcile(inputs)
    }

    pub fn apply_route_response(&mut self, response: RouteResponse) -> Vec<MapCommand> {
        if self.credential.is_none() {
            return Vec::new();
        }
        if response.result == Err(MapServiceError::Rejected)
            && self.sync.is_pending(response.request.id)
        {
            return self.handle_rejection();
        }
        self.sync.apply_route_response(response)
    }

    /// The service refused the credential: clear it so the user is asked to
    /// reconfigure instead of hitting the same error again.
    pub fn handle_rejection(&mut self) -> Vec<MapCommand> {
        warn!("map service rejected the access token; asking for a new one");
        let commands = self.close();
        self.credential = None;
        if let Err(error) = self.store.clear() {
            warn!(%error, "failed to clear rejected map credential");
        }
        commands
    }

    /// Release markers and route state.
    pub fn close(&mut self) -> Vec<MapCommand> {
        self.sync.close()
    }

    pub fn sync(&self) -> &MapSync {
        &self.sync
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
