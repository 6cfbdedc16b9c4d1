//! Debounced address lookup.
//!
//! Text edits restart a quiet window; a geocode request fires only once the
//! text has been stable for the whole window. Every edit bumps a generation
//! counter and each request carries the generation it was issued for, so a
//! result only applies if no edit happened since.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::credentials::Credential;
use crate::geo::Coordinate;
use crate::services::{validate_address, Geocoder, MapServiceError, Place};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest value until it has been stable for `window`.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace the pending value and restart the window.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// The pending value, once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, since) = self.pending.as_ref()?;
        if now.saturating_duration_since(*since) < self.window {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupStatus {
    Idle,
    /// Text changed; waiting for the debounce window.
    Waiting,
    Searching,
    Found(Place),
    NotFound,
    InvalidInput(String),
    Unavailable,
    Failed(String),
    /// The service refused the credential; the caller should clear it.
    Rejected,
}

impl LookupStatus {
    fn from_result(result: Result<Place, MapServiceError>) -> Self {
        match result {
            Ok(place) => LookupStatus::Found(place),
            Err(MapServiceError::NotFound) => LookupStatus::NotFound,
            Err(MapServiceError::InvalidInput(message)) => LookupStatus::InvalidInput(message),
            Err(MapServiceError::Unavailable) => LookupStatus::Unavailable,
            Err(MapServiceError::Transport(message)) => LookupStatus::Failed(message),
            Err(MapServiceError::Rejected) => LookupStatus::Rejected,
        }
    }
}

struct LookupResult {
    generation: u64,
    result: Result<Place, MapServiceError>,
}

/// One address field: text in, at most one best-match place out.
pub struct AddressLookup {
    geocoder: Arc<dyn Geocoder>,
    text: String,
    debouncer: Debouncer<String>,
    generation: u64,
    status: LookupStatus,
    sender: Sender<LookupResult>,
    receiver: Receiver<LookupResult>,
}

impl AddressLookup {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_window(geocoder, DEFAULT_DEBOUNCE)
    }

    pub fn with_window(geocoder: Arc<dyn Geocoder>, window: Duration) -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        Self {
            geocoder,
            text: String::new(),
            debouncer: Debouncer::new(window),
            generation: 0,
            status: LookupStatus::Idle,
            sender,
            receiver,
        }
    }

    /// Record a text edit. Any earlier pending or in-flight lookup is void.
    pub fn set_text(&mut self, text: &str, now: Instant) {
        if text == self.text {
            return;
        }
        self.text = text.to_string();
        self.generation += 1;
        self.debouncer.push(self.text.clone(), now);
        self.status = LookupStatus::Waiting;
    }

    /// Apply finished lookups and fire the debounced one if its window is
    /// over. Returns the new status when it changed.
    pub fn poll(&mut self, now: Instant, credential: Option<&Credential>) -> Option<LookupStatus> {
        let before = self.status.clone();

        while let Ok(result) = self.receiver.try_recv() {
            self.apply(result);
        }

        if let Some(text) = self.debouncer.poll(now) {
            self.dispatch(&text, credential);
        }

        (self.status != before).then(|| self.status.clone())
    }

    /// Fill the field from a known coordinate ("use current location"). The
    /// coordinate applies even when the reverse lookup finds no name.
    pub fn locate(&mut self, at: Coordinate, credential: Option<&Credential>) {
        self.debouncer.cancel();
        self.generation += 1;
        let fallback_name = format!("{:.5}, {:.5}", at.lat, at.lng);
        self.text = fallback_name.clone();

        let Some(credential) = credential.cloned() else {
            self.status = LookupStatus::Found(Place {
                coordinate: at,
                place_name: fallback_name,
            });
            return;
        };

        let generation = self.generation;
        self.status = LookupStatus::Searching;
        let sender = self.sender.clone();
        let geocoder = Arc::clone(&self.geocoder);
        std::thread::spawn(move || {
            let result = match geocoder.reverse(&credential, at) {
                Ok(place_name) => Ok(Place {
                    coordinate: at,
                    place_name,
                }),
                Err(MapServiceError::NotFound) => Ok(Place {
                    coordinate: at,
                    place_name: fallback_name,
                }),
                Err(error) => Err(error),
            };
            let _ = sender.send(LookupResult { generation, result });
        });
    }

    /// Block up to `timeout` for one finished lookup and apply it.
    pub fn wait_result(&mut self, timeout: Duration) -> Option<LookupStatus> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.apply(result);
                Some(self.status.clone())
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> &LookupStatus {
        &self.status
    }

    pub fn place(&self) -> Option<&Place> {
        match &self.status {
            LookupStatus::Found(place) => Some(place),
            _ => None,
        }
    }

    fn dispatch(&mut self, text: &str, credential: Option<&Credential>) {
        let address = match validate_address(text) {
            Ok(address) => address.to_string(),
            Err(error) => {
                self.status = LookupStatus::from_result(Err(error));
                return;
            }
        };
        let Some(credential) = credential.cloned() else {
            self.status = LookupStatus::Unavailable;
            return;
        };

        let generation = self.generation;
        debug!(generation, %address, "dispatching address lookup");
        self.status = LookupStatus::Searching;
        let sender = self.sender.clone();
        let geocoder = Arc::clone(&self.geocoder);
        std::thread::spawn(move || {
            let result = geocoder.forward(&credential, &address);
            let _ = sender.send(LookupResult { generation, result });
        });
    }

    fn apply(&mut self, result: LookupResult) {
        if result.generation != self.generation {
            debug!(
                generation = result.generation,
                current = self.generation,
                "dropping stale address lookup"
            );
            return;
        }
        if let Err(MapServiceError::Transport(message)) = &result.result {
            warn!(%message, "address lookup failed");
        }
        self.status = LookupStatus::from_result(result.result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debouncer_waits_for_quiet_window() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.push("a", t0);
        debouncer.push("ab", t0 + Duration::from_millis(300));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(600)), None);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(800)), Some("ab"));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(2_000)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_discards_pending_value() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.push(1, t0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(t0 + Duration::from_secs(1)), None);
    }
}
