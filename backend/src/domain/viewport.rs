//! Debounced viewport controller.
//!
//! Map movement produces a burst of viewport events. The controller coalesces
//! them with a single-slot delayed task, validates the span once the window
//! elapses, and issues a sequence-numbered fetch. Observers follow the state
//! through a [`tokio::sync::watch`] channel.
//!
//! State transitions:
//!
//! ```text
//! Idle ──event──▶ Debouncing ──elapsed──▶ Fetching ──ok──▶ Idle
//!                     │                      └──err──▶ Error
//!                     └──span too large──▶ Error
//! ```
//!
//! Every elapsed window takes a new sequence number, including windows that
//! end in a span rejection. A fetch result is applied only while its
//! sequence is still the latest issued, so late answers for an older
//! viewport never overwrite newer state. A new event cancels the pending
//! window only; an in-flight fetch always runs to completion.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::bounding_box::DEFAULT_MAX_SPAN_DEGREES;
use crate::domain::ports::SpotsQuery;
use crate::domain::{BoundingBox, Error, ErrorCode, Spot};

/// Quiet period after the last viewport event before fetching.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

/// Reject viewports whose latitude or longitude span exceeds
/// `max_span_degrees`.
///
/// A span equal to the limit is accepted.
///
/// # Errors
///
/// Returns [`ErrorCode::ViewportTooLarge`] with both spans in the details.
pub fn validate_viewport(bbox: &BoundingBox, max_span_degrees: f64) -> Result<(), Error> {
    if bbox.exceeds_span(max_span_degrees) {
        return Err(Error::from_code(ErrorCode::ViewportTooLarge).with_details(json!({
            "latSpan": bbox.lat_span(),
            "lngSpan": bbox.lng_span(),
            "maxSpan": max_span_degrees,
        })));
    }
    Ok(())
}

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportPhase {
    /// Nothing pending.
    Idle,
    /// Waiting for the viewport to settle.
    Debouncing,
    /// A fetch for the latest sequence is in flight.
    Fetching,
    /// The latest window ended in an error.
    Error,
}

/// Observable controller state.
#[derive(Debug, Clone)]
pub struct ViewportSnapshot {
    /// Current phase.
    pub phase: ViewportPhase,
    /// Spots from the most recent applied fetch.
    pub spots: Arc<Vec<Spot>>,
    /// Error from the most recent window, cleared by the next success.
    pub error: Option<Error>,
    /// Latest issued sequence number; zero before the first window elapses.
    pub sequence: u64,
    /// Most recently requested viewport.
    pub viewport: Option<BoundingBox>,
}

impl Default for ViewportSnapshot {
    fn default() -> Self {
        Self {
            phase: ViewportPhase::Idle,
            spots: Arc::new(Vec::new()),
            error: None,
            sequence: 0,
            viewport: None,
        }
    }
}

/// Tuning for [`ViewportController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSettings {
    /// Quiet period before fetching.
    pub debounce: Duration,
    /// Largest accepted span in degrees.
    pub max_span_degrees: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            max_span_degrees: DEFAULT_MAX_SPAN_DEGREES,
        }
    }
}

struct Shared {
    query: Arc<dyn SpotsQuery>,
    settings: ViewportSettings,
    state: watch::Sender<ViewportSnapshot>,
    latest_sequence: AtomicU64,
}

impl Shared {
    fn window_elapsed(self: &Arc<Self>, bbox: BoundingBox) {
        let sequence = self.latest_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(error) = validate_viewport(&bbox, self.settings.max_span_degrees) {
            debug!(sequence, %bbox, "viewport too large; skipping fetch");
            self.state.send_modify(|snapshot| {
                snapshot.phase = ViewportPhase::Error;
                snapshot.error = Some(error);
                snapshot.sequence = sequence;
            });
            return;
        }

        self.state.send_modify(|snapshot| {
            snapshot.phase = ViewportPhase::Fetching;
            snapshot.sequence = sequence;
        });

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let result = shared.query.find_spots(&bbox).await;
            shared.apply(sequence, result);
        });
    }

    fn apply(&self, sequence: u64, result: Result<Vec<Spot>, Error>) {
        let latest = self.latest_sequence.load(Ordering::SeqCst);
        if sequence != latest {
            debug!(sequence, latest, "discarding stale viewport response");
            return;
        }

        self.state.send_modify(|snapshot| {
            let settling = snapshot.phase == ViewportPhase::Debouncing;
            match result {
                Ok(spots) => {
                    snapshot.spots = Arc::new(spots);
                    snapshot.error = None;
                    if !settling {
                        snapshot.phase = ViewportPhase::Idle;
                    }
                }
                Err(error) => {
                    warn!(sequence, %error, "viewport fetch failed; keeping previous spots");
                    snapshot.error = Some(error);
                    if !settling {
                        snapshot.phase = ViewportPhase::Error;
                    }
                }
            }
        });
    }
}

/// Debounced, sequence-checked viewport state machine.
///
/// Must be used from within a Tokio runtime.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use dogspot::domain::ports::FixtureSpotsQuery;
/// use dogspot::domain::viewport::{ViewportController, ViewportPhase, ViewportSettings};
/// use dogspot::domain::BoundingBox;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let controller = ViewportController::new(
///     Arc::new(FixtureSpotsQuery::default()),
///     ViewportSettings::default(),
/// );
/// controller.viewport_changed(BoundingBox::new(35.0, 139.0, 35.1, 139.1));
/// assert_eq!(controller.snapshot().phase, ViewportPhase::Debouncing);
/// # });
/// ```
pub struct ViewportController {
    shared: Arc<Shared>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ViewportController {
    /// Create an idle controller backed by `query`.
    pub fn new(query: Arc<dyn SpotsQuery>, settings: ViewportSettings) -> Self {
        let (state, _) = watch::channel(ViewportSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                query,
                settings,
                state,
                latest_sequence: AtomicU64::new(0),
            }),
            pending: Mutex::new(None),
        }
    }

    /// Record a settled map movement and restart the debounce window.
    pub fn viewport_changed(&self, bbox: BoundingBox) {
        self.shared.state.send_modify(|snapshot| {
            snapshot.phase = ViewportPhase::Debouncing;
            snapshot.viewport = Some(bbox);
        });

        let shared = Arc::clone(&self.shared);
        let delay = shared.settings.debounce;
        let window = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.window_elapsed(bbox);
        });

        let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(window) {
            previous.abort();
        }
    }

    /// Receiver following every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewportSnapshot> {
        self.shared.state.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> ViewportSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Configured tuning.
    #[must_use]
    pub fn settings(&self) -> ViewportSettings {
        self.shared.settings
    }
}

impl Drop for ViewportController {
    fn drop(&mut self) {
        let slot = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(window) = slot.take() {
            window.abort();
        }
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
