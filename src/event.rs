//! Session events and their storage representation.
//!
//! An [`Event`] is the typed form used by the session state machine. At the
//! log boundary every event becomes an [`EventRecord`]: the event kind as a
//! string plus a JSON body for that kind. Records are decoded one kind at a
//! time so that a log written by a newer build, carrying kinds this build
//! does not know, still replays.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::Board;
use crate::cell::Cell;
use crate::session::SessionError;
use crate::ship::{Ship, ShipId};

/// Opaque identifier of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Draw a random (version 4) identifier from `rng`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        SessionId(uuid::Builder::from_random_bytes(rng.random()).into_uuid())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(SessionId)
    }
}

/// One of the two parties in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Computer => write!(f, "computer"),
        }
    }
}

/// Both fleets as generated when the session was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCreated {
    pub player: Vec<Ship>,
    pub computer: Vec<Ship>,
}

/// A shot fired by `shooter` at the other side's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    pub cell: Cell,
    pub shooter: Side,
}

/// Every segment of ship `ship_id` on `owner`'s board has been hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipDestroyed {
    pub ship_id: ShipId,
    pub owner: Side,
}

/// Typed event body, one variant per event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    SessionCreated(SessionCreated),
    Shot(Shot),
    ShipDestroyed(ShipDestroyed),
}

impl EventPayload {
    pub const SESSION_CREATED: &'static str = "session_created";
    pub const SHOT: &'static str = "shot";
    pub const SHIP_DESTROYED: &'static str = "ship_destroyed";

    /// Kind tag stored alongside the body.
    pub fn kind(&self) -> &'static str {
        match self {
            EventPayload::SessionCreated(_) => Self::SESSION_CREATED,
            EventPayload::Shot(_) => Self::SHOT,
            EventPayload::ShipDestroyed(_) => Self::SHIP_DESTROYED,
        }
    }
}

/// An immutable fact about a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub aggregate_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(aggregate_id: SessionId, payload: EventPayload) -> Self {
        Self {
            aggregate_id,
            created_at: Utc::now(),
            payload,
        }
    }

    pub fn session_created(aggregate_id: SessionId, player: &Board, computer: &Board) -> Self {
        Self::new(
            aggregate_id,
            EventPayload::SessionCreated(SessionCreated {
                player: player.ships().to_vec(),
                computer: computer.ships().to_vec(),
            }),
        )
    }

    pub fn shot(aggregate_id: SessionId, cell: Cell, shooter: Side) -> Self {
        Self::new(
            aggregate_id,
            EventPayload::Shot(Shot {
                cell: Cell::new(cell.x, cell.y),
                shooter,
            }),
        )
    }

    pub fn ship_destroyed(aggregate_id: SessionId, ship_id: ShipId, owner: Side) -> Self {
        Self::new(
            aggregate_id,
            EventPayload::ShipDestroyed(ShipDestroyed { ship_id, owner }),
        )
    }

    /// Convert to the storage representation.
    pub fn encode(&self) -> Result<EventRecord, SessionError> {
        let data = match &self.payload {
            EventPayload::SessionCreated(body) => serde_json::to_vec(body),
            EventPayload::Shot(body) => serde_json::to_vec(body),
            EventPayload::ShipDestroyed(body) => serde_json::to_vec(body),
        }
        .map_err(|e| SessionError::Serialization(e.to_string()))?;
        Ok(EventRecord {
            aggregate_id: self.aggregate_id,
            event_type: self.payload.kind().to_string(),
            data,
            created_at: self.created_at,
        })
    }

    /// Decode a stored record. Returns `Ok(None)` for kinds this build does
    /// not know; a known kind with an undecodable body is an error.
    pub fn decode(record: &EventRecord) -> Result<Option<Event>, SessionError> {
        let payload = match record.event_type.as_str() {
            EventPayload::SESSION_CREATED => {
                EventPayload::SessionCreated(decode_body(record)?)
            }
            EventPayload::SHOT => EventPayload::Shot(decode_body(record)?),
            EventPayload::SHIP_DESTROYED => EventPayload::ShipDestroyed(decode_body(record)?),
            _ => return Ok(None),
        };
        Ok(Some(Event {
            aggregate_id: record.aggregate_id,
            created_at: record.created_at,
            payload,
        }))
    }
}

fn decode_body<T: for<'de> Deserialize<'de>>(record: &EventRecord) -> Result<T, SessionError> {
    serde_json::from_slice(&record.data).map_err(|e| SessionError::Corrupt {
        reason: format!("undecodable {} event: {}", record.event_type, e),
    })
}

/// Event as written to and read back from an event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub aggregate_id: SessionId,
    pub event_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn session_id_display_roundtrips() {
        let id = SessionId::random(&mut SmallRng::seed_from_u64(1));
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
        assert_eq!(id.0.get_version_num(), 4);
    }

    #[test]
    fn unknown_kind_decodes_to_nothing() {
        let record = EventRecord {
            aggregate_id: SessionId::random(&mut SmallRng::seed_from_u64(2)),
            event_type: "chat_message".to_string(),
            data: b"{}".to_vec(),
            created_at: Utc::now(),
        };
        assert_eq!(Event::decode(&record).unwrap(), None);
    }

    #[test]
    fn known_kind_with_bad_body_is_corrupt() {
        let record = EventRecord {
            aggregate_id: SessionId::random(&mut SmallRng::seed_from_u64(3)),
            event_type: EventPayload::SHOT.to_string(),
            data: b"{\"cell\":1}".to_vec(),
            created_at: Utc::now(),
        };
        assert!(matches!(
            Event::decode(&record),
            Err(SessionError::Corrupt { .. })
        ));
    }
}
