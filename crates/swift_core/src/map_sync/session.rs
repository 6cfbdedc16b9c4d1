use std::sync::Arc;
use std::time::Duration;

use crate::credentials::CredentialStore;
use crate::route_fetch::RouteFetcher;
use crate::services::DirectionsService;

use super::{MapCommand, MapView, SyncInputs};

/// A [`MapView`] wired to a [`RouteFetcher`]: route requests emitted by
/// reconciliation are dispatched, and finished requests are fed back.
pub struct MapSession<S> {
    view: MapView<S>,
    fetcher: RouteFetcher,
}

impl<S: CredentialStore> MapSession<S> {
    pub fn new(view: MapView<S>, directions: Arc<dyn DirectionsService>) -> Self {
        Self {
            view,
            fetcher: RouteFetcher::new(directions),
        }
    }

    /// Reconcile against `inputs` and start any requested route fetch.
    pub fn update(&mut self, inputs: &SyncInputs) -> Vec<MapCommand> {
        let commands = self.view.reconcile(inputs);
        self.dispatch(&commands);
        commands
    }

    /// Apply every route response that has arrived.
    pub fn poll(&mut self) -> Vec<MapCommand> {
        let mut commands = Vec::new();
        for response in self.fetcher.drain() {
            commands.extend(self.view.apply_route_response(response));
        }
        commands
    }

    /// Block up to `timeout` for one route response and apply it.
    pub fn wait_for_route(&mut self, timeout: Duration) -> Vec<MapCommand> {
        match self.fetcher.wait_next(timeout) {
            Some(response) => self.view.apply_route_response(response),
            None => Vec::new(),
        }
    }

    pub fn view(&self) -> &MapView<S> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MapView<S> {
        &mut self.view
    }

    pub fn inflight(&self) -> usize {
        self.fetcher.inflight()
    }

    fn dispatch(&mut self, commands: &[MapCommand]) {
        let Some(credential) = self.view.credential() else {
            return;
        };
        for command in commands {
            if let MapCommand::FetchRoute(request) = command {
                self.fetcher.request(credential.clone(), *request);
            }
        }
    }
}
