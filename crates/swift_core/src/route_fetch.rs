//! Off-thread directions requests.
//!
//! Each request runs on its own worker thread and reports back over a channel
//! that the UI thread drains once per frame. Responses carry the request they
//! answer so the map layer can drop anything that is no longer current.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::credentials::Credential;
use crate::geo::Coordinate;
use crate::services::{DirectionsService, MapServiceError, RouteFetch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteRequestId(pub u64);

/// One directions query, tagged with the input pair it was issued for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub id: RouteRequestId,
    pub from: Coordinate,
    pub to: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub request: RouteRequest,
    pub result: Result<RouteFetch, MapServiceError>,
}

pub struct RouteFetcher {
    service: Arc<dyn DirectionsService>,
    sender: Sender<RouteResponse>,
    receiver: Receiver<RouteResponse>,
    inflight: usize,
}

impl RouteFetcher {
    pub fn new(service: Arc<dyn DirectionsService>) -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        Self {
            service,
            sender,
            receiver,
            inflight: 0,
        }
    }

    /// Start `request` on a worker thread.
    pub fn request(&mut self, credential: Credential, request: RouteRequest) {
        debug!(id = request.id.0, "dispatching route request");
        self.inflight += 1;
        let sender = self.sender.clone();
        let service = Arc::clone(&self.service);
        std::thread::spawn(move || {
            let result = service.route(&credential, request.from, request.to);
            let _ = sender.send(RouteResponse { request, result });
        });
    }

    /// Every response that has arrived so far, without blocking.
    pub fn drain(&mut self) -> Vec<RouteResponse> {
        let mut responses = Vec::new();
        while let Ok(response) = self.receiver.try_recv() {
            responses.push(response);
        }
        self.inflight = self.inflight.saturating_sub(responses.len());
        responses
    }

    /// Block up to `timeout` for the next response.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<RouteResponse> {
        match self.receiver.recv_timeout(timeout) {
            Ok(response) => {
                self.inflight = self.inflight.saturating_sub(1);
                Some(response)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn inflight(&self) -> usize {
        self.inflight
    }
}
