//! Wire-level message definitions for the WebSocket adapter.
//!
//! Clients send viewport frames; the server answers with snapshots of the
//! per-connection viewport controller.

use serde::{Deserialize, Serialize};

use crate::domain::{BoundingBox, Error, Spot, ViewportPhase, ViewportSnapshot};

/// Inbound payload provided by the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The visible map rectangle changed.
    Viewport {
        /// Southern latitude edge.
        south: f64,
        /// Western longitude edge.
        west: f64,
        /// Northern latitude edge.
        north: f64,
        /// Eastern longitude edge.
        east: f64,
    },
}

/// Controller state as pushed to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFrame<'a> {
    /// Controller phase.
    pub phase: ViewportPhase,
    /// Sequence number of the lookup this snapshot reflects.
    pub sequence: u64,
    /// Number of spots in `spots`.
    pub count: usize,
    /// Spots from the latest successful lookup.
    pub spots: &'a [Spot],
    /// Failure of the latest lookup, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a Error>,
    /// Viewport the snapshot belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<BoundingBox>,
}

impl<'a> From<&'a ViewportSnapshot> for SnapshotFrame<'a> {
    fn from(snapshot: &'a ViewportSnapshot) -> Self {
        Self {
            phase: snapshot.phase,
            sequence: snapshot.sequence,
            count: snapshot.spots.len(),
            spots: snapshot.spots.as_slice(),
            error: snapshot.error.as_ref(),
            viewport: snapshot.viewport,
        }
    }
}

/// Outbound payloads.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
    /// Current controller state.
    Snapshot(SnapshotFrame<'a>),
    /// A client frame was understood but rejected before reaching the
    /// controller.
    Rejected(&'a Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    #[rstest]
    #[case::integers(r#"{"type":"viewport","south":35,"west":139,"north":35.5,"east":139.5}"#)]
    #[case::decimals(r#"{"type":"viewport","south":35.0,"west":139.0,"north":35.5,"east":139.5}"#)]
    fn parses_viewport_frames(#[case] raw: &str) {
        let message: ClientMessage = serde_json::from_str(raw).expect("viewport frame");
        assert_eq!(
            message,
            ClientMessage::Viewport {
                south: 35.0,
                west: 139.0,
                north: 35.5,
                east: 139.5
            }
        );
    }

    #[rstest]
    #[case::unknown_type(r#"{"type":"zoom","level":3}"#)]
    #[case::missing_edge(r#"{"type":"viewport","south":35.0,"west":139.0,"north":35.5}"#)]
    #[case::untagged(r#"{"south":35.0,"west":139.0,"north":35.5,"east":139.5}"#)]
    fn rejects_other_frames(#[case] raw: &str) {
        assert!(serde_json::from_str::<ClientMessage>(raw).is_err());
    }

    #[test]
    fn snapshot_frame_is_tagged_and_camel_cased() {
        let snapshot = ViewportSnapshot {
            phase: ViewportPhase::Idle,
            spots: Arc::new(vec![Spot {
                id: "node/1".to_owned(),
                name: "動物病院".to_owned(),
                category: Category::Veterinary,
                lat: 35.1,
                lng: 139.1,
                address: None,
                phone: None,
                website: None,
                opening_hours: Some("Mo-Fr 09:00-18:00".to_owned()),
                tags: Default::default(),
            }]),
            error: None,
            sequence: 3,
            viewport: Some(BoundingBox::new(35.0, 139.0, 35.5, 139.5)),
        };

        let value = serde_json::to_value(ServerMessage::Snapshot((&snapshot).into()))
            .expect("serialise");

        assert_eq!(value["type"], "snapshot");
        assert_eq!(value["phase"], "idle");
        assert_eq!(value["sequence"], 3);
        assert_eq!(value["count"], 1);
        assert_eq!(value["spots"][0]["openingHours"], "Mo-Fr 09:00-18:00");
        assert_eq!(
            value["viewport"],
            json!({ "south": 35.0, "west": 139.0, "north": 35.5, "east": 139.5 })
        );
        assert!(value.get("error").is_none());
    }

    #[test]
    fn rejected_frame_carries_error_payload() {
        let error = Error::invalid_request("bounding box must satisfy south < north");
        let value = serde_json::to_value(ServerMessage::Rejected(&error)).expect("serialise");
        assert_eq!(value["type"], "rejected");
        assert_eq!(value["code"], "invalid_request");
    }
}
