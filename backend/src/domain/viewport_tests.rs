//! State machine coverage for the viewport controller, run on paused time.

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;

use async_trait::async_trait;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::Category;

type Reply = (Duration, Result<Vec<Spot>, Error>);

/// Query double answering from a script, after a per-call delay.
#[derive(Default)]
struct ScriptedQuery {
    replies: Mutex<VecDeque<Reply>>,
    requested: Mutex<Vec<BoundingBox>>,
    completed: AtomicUsize,
}

impl ScriptedQuery {
    fn with(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    fn requested(&self) -> Vec<BoundingBox> {
        self.requested.lock().expect("requested lock").clone()
    }

    fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpotsQuery for ScriptedQuery {
    async fn find_spots(&self, bbox: &BoundingBox) -> Result<Vec<Spot>, Error> {
        self.requested.lock().expect("requested lock").push(*bbox);
        let (delay, reply) = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or((Duration::ZERO, Ok(Vec::new())));
        tokio::time::sleep(delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        reply
    }
}

fn spot(id: &str) -> Spot {
    Spot {
        id: id.to_owned(),
        name: id.to_owned(),
        category: Category::DogPark,
        lat: 35.2,
        lng: 139.2,
        address: None,
        phone: None,
        website: None,
        opening_hours: None,
        tags: Default::default(),
    }
}

fn ids(snapshot: &ViewportSnapshot) -> Vec<String> {
    snapshot.spots.iter().map(|spot| spot.id.clone()).collect()
}

async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[fixture]
fn small() -> BoundingBox {
    BoundingBox::new(35.0, 139.0, 35.2, 139.2)
}

#[fixture]
fn large() -> BoundingBox {
    BoundingBox::new(35.0, 139.0, 35.6, 139.2)
}

fn controller(query: Arc<ScriptedQuery>) -> ViewportController {
    ViewportController::new(query, ViewportSettings::default())
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn burst_of_events_fetches_once_for_the_last_viewport(small: BoundingBox) {
    let query = ScriptedQuery::with(vec![(Duration::ZERO, Ok(vec![spot("node/1")]))]);
    let controller = controller(Arc::clone(&query));
    let last = BoundingBox::new(35.1, 139.1, 35.3, 139.3);

    controller.viewport_changed(small);
    advance(300).await;
    controller.viewport_changed(small);
    advance(300).await;
    controller.viewport_changed(last);
    advance(799).await;
    assert_eq!(controller.snapshot().phase, ViewportPhase::Debouncing);
    assert!(query.requested().is_empty());

    advance(10).await;
    let snapshot = controller.snapshot();
    assert_eq!(query.requested(), vec![last]);
    assert_eq!(snapshot.phase, ViewportPhase::Idle);
    assert_eq!(snapshot.sequence, 1);
    assert_eq!(ids(&snapshot), vec!["node/1"]);
    assert_eq!(snapshot.viewport, Some(last));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn oversized_viewport_is_rejected_without_fetching(large: BoundingBox) {
    let query = ScriptedQuery::with(Vec::new());
    let controller = controller(Arc::clone(&query));

    controller.viewport_changed(large);
    advance(900).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, ViewportPhase::Error);
    assert_eq!(
        snapshot.error.as_ref().map(Error::code),
        Some(ErrorCode::ViewportTooLarge)
    );
    assert_eq!(snapshot.sequence, 1);
    assert!(query.requested().is_empty());
}

#[tokio::test(start_paused = true)]
async fn span_equal_to_limit_is_fetched() {
    let query = ScriptedQuery::with(Vec::new());
    let controller = controller(Arc::clone(&query));
    let edge = BoundingBox::new(35.0, 139.0, 35.5, 139.5);

    controller.viewport_changed(edge);
    advance(900).await;

    assert_eq!(query.requested(), vec![edge]);
    assert_eq!(controller.snapshot().phase, ViewportPhase::Idle);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_previous_spots(small: BoundingBox) {
    let query = ScriptedQuery::with(vec![
        (Duration::ZERO, Ok(vec![spot("node/1"), spot("way/2")])),
        (
            Duration::ZERO,
            Err(Error::from_code(ErrorCode::ServiceUnavailable)),
        ),
    ]);
    let controller = controller(Arc::clone(&query));

    controller.viewport_changed(small);
    advance(900).await;
    controller.viewport_changed(small);
    advance(900).await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, ViewportPhase::Error);
    assert_eq!(
        snapshot.error.as_ref().map(Error::code),
        Some(ErrorCode::ServiceUnavailable)
    );
    assert_eq!(ids(&snapshot), vec!["node/1", "way/2"]);
    assert_eq!(snapshot.sequence, 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn stale_response_never_overwrites_newer_state(small: BoundingBox) {
    let query = ScriptedQuery::with(vec![
        (Duration::from_secs(5), Ok(vec![spot("node/old")])),
        (Duration::ZERO, Ok(vec![spot("node/new")])),
    ]);
    let controller = controller(Arc::clone(&query));

    controller.viewport_changed(small);
    advance(1_000).await;
    controller.viewport_changed(small);
    advance(1_000).await;
    assert_eq!(ids(&controller.snapshot()), vec!["node/new"]);

    advance(5_000).await;
    let snapshot = controller.snapshot();
    assert_eq!(query.completed(), 2);
    assert_eq!(ids(&snapshot), vec!["node/new"]);
    assert_eq!(snapshot.phase, ViewportPhase::Idle);
    assert_eq!(snapshot.sequence, 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn new_event_does_not_cancel_in_flight_fetch(small: BoundingBox) {
    let query = ScriptedQuery::with(vec![(
        Duration::from_millis(500),
        Ok(vec![spot("node/1")]),
    )]);
    let controller = controller(Arc::clone(&query));

    controller.viewport_changed(small);
    advance(900).await;
    assert_eq!(controller.snapshot().phase, ViewportPhase::Fetching);
    controller.viewport_changed(small);
    advance(500).await;

    let snapshot = controller.snapshot();
    assert_eq!(query.completed(), 1);
    assert_eq!(snapshot.phase, ViewportPhase::Debouncing);
    assert_eq!(ids(&snapshot), vec!["node/1"]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn rejection_invalidates_older_in_flight_fetch(small: BoundingBox, large: BoundingBox) {
    let query = ScriptedQuery::with(vec![(
        Duration::from_secs(3),
        Ok(vec![spot("node/late")]),
    )]);
    let controller = controller(Arc::clone(&query));

    controller.viewport_changed(small);
    advance(900).await;
    controller.viewport_changed(large);
    advance(5_000).await;

    let snapshot = controller.snapshot();
    assert_eq!(query.completed(), 1);
    assert_eq!(snapshot.phase, ViewportPhase::Error);
    assert!(snapshot.spots.is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn subscribers_observe_each_phase(small: BoundingBox) {
    let query = ScriptedQuery::with(vec![(Duration::from_millis(100), Ok(Vec::new()))]);
    let controller = controller(Arc::clone(&query));
    let mut updates = controller.subscribe();

    controller.viewport_changed(small);
    let debouncing = updates
        .wait_for(|snapshot| snapshot.phase == ViewportPhase::Debouncing)
        .await
        .expect("sender alive")
        .sequence;
    assert_eq!(debouncing, 0);
    updates
        .wait_for(|snapshot| snapshot.phase == ViewportPhase::Fetching)
        .await
        .expect("sender alive");
    let idle = updates
        .wait_for(|snapshot| snapshot.phase == ViewportPhase::Idle)
        .await
        .expect("sender alive")
        .sequence;
    assert_eq!(idle, 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn dropping_the_controller_cancels_pending_window(small: BoundingBox) {
    let query = ScriptedQuery::with(Vec::new());
    let controller = controller(Arc::clone(&query));

    controller.viewport_changed(small);
    drop(controller);
    advance(2_000).await;

    assert!(query.requested().is_empty());
}

#[rstest]
#[case::equal(BoundingBox::new(35.0, 139.0, 35.5, 139.5), true)]
#[case::tall(BoundingBox::new(35.0, 139.0, 35.51, 139.1), false)]
#[case::wide(BoundingBox::new(35.0, 139.0, 35.1, 139.6), false)]
fn validate_viewport_applies_strict_limit(#[case] bbox: BoundingBox, #[case] accepted: bool) {
    assert_eq!(
        validate_viewport(&bbox, DEFAULT_MAX_SPAN_DEGREES).is_ok(),
        accepted
    );
}
