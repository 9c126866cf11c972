//! Per-concern load state machine.
//!
//! Every view model tracks each remote concern (a list, a record) as a
//! [`Resource`]: `Idle -> Loading -> {Loaded, Error}`. A second load while
//! one is in flight is refused unless forced. A forced load supersedes the
//! earlier one, whose response is then discarded, so the final state always
//! comes from exactly one response. A failed refresh over loaded data keeps
//! the data and raises an error banner instead.

use std::future::Future;
use tracing::{debug, warn};

use super::handle::StateHandle;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Identifies one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    pub phase: Phase,
    pub data: Option<T>,
    /// Banner text from the last failed load; may coexist with `data`
    pub error: Option<String>,
    issued: u64,
    in_flight: Option<u64>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            error: None,
            issued: 0,
            in_flight: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load. Returns `None` when a load is already in flight and
    /// `force` is false.
    pub fn begin(&mut self, force: bool) -> Option<Ticket> {
        if self.phase == Phase::Loading && !force {
            return None;
        }
        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.phase = Phase::Loading;
        Some(Ticket(self.issued))
    }

    /// Apply the outcome of a load. Outcomes of superseded tickets are
    /// ignored; returns whether this one was applied.
    pub fn finish(&mut self, ticket: Ticket, result: Result<T, String>) -> bool {
        if self.in_flight != Some(ticket.0) {
            return false;
        }
        self.in_flight = None;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.phase = Phase::Loaded;
            }
            Err(message) => {
                self.error = Some(message);
                self.phase = if self.data.is_some() {
                    Phase::Loaded
                } else {
                    Phase::Error
                };
            }
        }
        true
    }

    /// Replace the data with a value obtained outside a load (e.g. the
    /// response of an update call).
    pub fn replace(&mut self, data: T) {
        self.data = Some(data);
        self.error = None;
        if self.phase != Phase::Loading {
            self.phase = Phase::Loaded;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Initial load failed: the screen shows a retry affordance instead of
    /// content.
    pub fn is_blocking_error(&self) -> bool {
        self.phase == Phase::Error && self.data.is_none()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

/// What happened to a requested load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Response applied to the state
    Loaded,
    /// Not issued: an identical load was already in flight
    Skipped,
    /// Issued, but a newer forced load replaced it
    Superseded,
    /// The screen was disposed
    Disposed,
}

/// Drive one [`Resource`] inside a view model's state through a load.
///
/// `fetch` is only awaited when the load is actually issued. A failed fetch
/// is recorded as the resource's banner and returned as `Err`, unless it was
/// superseded.
pub(crate) async fn run_load<S, T, F, Fut>(
    handle: &StateHandle<S>,
    field: F,
    force: bool,
    what: &'static str,
    fetch: Fut,
) -> AppResult<LoadOutcome>
where
    F: Fn(&mut S) -> &mut Resource<T>,
    Fut: Future<Output = AppResult<T>>,
{
    let ticket = match handle.update(|state| field(state).begin(force)) {
        None => return Ok(LoadOutcome::Disposed),
        Some(None) => {
            debug!("Load of {} already in flight, skipping", what);
            return Ok(LoadOutcome::Skipped);
        }
        Some(Some(ticket)) => ticket,
    };
    debug!("Loading {} (force={})", what, force);

    match fetch.await {
        Ok(data) => match handle.update(|state| field(state).finish(ticket, Ok(data))) {
            None => Ok(LoadOutcome::Disposed),
            Some(false) => {
                debug!("Discarding superseded {} response", what);
                Ok(LoadOutcome::Superseded)
            }
            Some(true) => {
                debug!("Loaded {}", what);
                Ok(LoadOutcome::Loaded)
            }
        },
        Err(err) => {
            let message = err.user_message();
            match handle.update(|state| field(state).finish(ticket, Err(message))) {
                None => Ok(LoadOutcome::Disposed),
                Some(false) => Ok(LoadOutcome::Superseded),
                Some(true) => {
                    warn!("Failed to load {}: {} ({})", what, err, err.error_code());
                    Err(err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, NetworkError};

    #[test]
    fn test_begin_refuses_overlap_without_force() {
        let mut r: Resource<u32> = Resource::new();
        assert!(r.begin(false).is_some());
        assert!(r.begin(false).is_none());
        assert!(r.begin(true).is_some());
    }

    #[test]
    fn test_superseded_ticket_ignored() {
        let mut r: Resource<&str> = Resource::new();
        let first = r.begin(false).unwrap();
        let second = r.begin(true).unwrap();

        assert!(r.finish(second, Ok("fresh")));
        assert!(!r.finish(first, Ok("stale")));
        assert_eq!(r.data, Some("fresh"));
        assert_eq!(r.phase, Phase::Loaded);
    }

    #[test]
    fn test_error_over_data_keeps_data() {
        let mut r: Resource<u32> = Resource::new();
        let t = r.begin(false).unwrap();
        r.finish(t, Ok(5));
        let t = r.begin(true).unwrap();
        r.finish(t, Err("offline".to_string()));

        assert_eq!(r.phase, Phase::Loaded);
        assert_eq!(r.data, Some(5));
        assert_eq!(r.error.as_deref(), Some("offline"));
        assert!(!r.is_blocking_error());
    }

    #[test]
    fn test_initial_error_blocks() {
        let mut r: Resource<u32> = Resource::new();
        let t = r.begin(false).unwrap();
        r.finish(t, Err("offline".to_string()));
        assert_eq!(r.phase, Phase::Error);
        assert!(r.is_blocking_error());

        let t = r.begin(false).unwrap();
        r.finish(t, Ok(1));
        assert!(r.error.is_none());
        assert_eq!(r.phase, Phase::Loaded);
    }

    #[tokio::test]
    async fn test_run_load_records_failure() {
        let handle = StateHandle::new(Resource::<u32>::new());
        let err = run_load(&handle, |s| s, false, "number", async {
            Err::<u32, AppError>(NetworkError::Timeout { operation: "x".to_string() }.into())
        })
        .await
        .unwrap_err();

        assert!(err.is_retryable());
        let state = handle.snapshot();
        assert_eq!(state.phase, Phase::Error);
        assert!(state.error.unwrap().contains("too long"));
    }

    #[tokio::test]
    async fn test_run_load_after_dispose() {
        let handle = StateHandle::new(Resource::<u32>::new());
        handle.dispose();
        let outcome = run_load(&handle, |s| s, false, "number", async { Ok(1) })
            .await
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Disposed);
        assert!(handle.snapshot().data.is_none());
    }
}
