//! Player Identity and Records
//!
//! Two id spaces: [`PlayerId`] references a replicated player record,
//! [`ClientId`] names the owning connection. Records themselves live in an
//! external replicated store; this module only defines the lookup seam and
//! the session's ordered roster of record references.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::core::color::PlayerColor;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player record identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create a fresh random id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().into_bytes())
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s)
            .ok()
            .map(|u| Self(*u.as_bytes()))
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

// =============================================================================
// CLIENT ID
// =============================================================================

/// Connection identity assigned by the network runtime.
///
/// Distinct from [`PlayerId`]: the client id names who owns a record, and
/// it seeds that player's display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub struct ClientId(pub u64);

impl ClientId {
    /// Create from a raw runtime id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw runtime id.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Display color derived from this identity.
    #[inline]
    pub fn color(&self) -> PlayerColor {
        PlayerColor::from_seed(self.0)
    }
}

// =============================================================================
// PLAYER RECORD
// =============================================================================

/// Snapshot of one replicated player record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Record identifier
    pub id: PlayerId,

    /// Owning connection
    pub owner: ClientId,

    /// Display name shown in HUD text
    pub nickname: String,

    /// Remaining lives (0 = eliminated)
    pub lives: u32,

    /// Accumulated score
    pub score: u32,
}

impl PlayerRecord {
    /// Create a record with the given lives and zero score.
    pub fn new(id: PlayerId, owner: ClientId, nickname: impl Into<String>, lives: u32) -> Self {
        Self {
            id,
            owner,
            nickname: nickname.into(),
            lives,
            score: 0,
        }
    }

    /// Is this ship still in the fight?
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }
}

// =============================================================================
// PLAYER DIRECTORY
// =============================================================================

/// Lookup seam for replicated player records.
///
/// `None` means the record is not currently resolvable, which normally
/// means its owner disconnected. That is a transient condition, never an
/// error.
pub trait PlayerDirectory {
    /// Resolve a record reference to an owned snapshot.
    fn record(&self, id: &PlayerId) -> Option<PlayerRecord>;
}

/// In-memory [`PlayerDirectory`] backed by a BTreeMap.
///
/// Stands in for the replicated player-data store in the demo binary and
/// in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory {
    records: BTreeMap<PlayerId, PlayerRecord>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, record: PlayerRecord) {
        self.records.insert(record.id, record);
    }

    /// Remove a record, simulating its owner disconnecting.
    pub fn remove(&mut self, id: &PlayerId) -> Option<PlayerRecord> {
        self.records.remove(id)
    }

    /// Overwrite a record's lives. Returns false if the record is unknown.
    pub fn set_lives(&mut self, id: &PlayerId, lives: u32) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                record.lives = lives;
                true
            }
            None => false,
        }
    }

    /// Add score to a record. Returns false if the record is unknown.
    pub fn add_score(&mut self, id: &PlayerId, points: u32) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                record.score = record.score.saturating_add(points);
                true
            }
            None => false,
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Is the directory empty?
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PlayerDirectory for MemoryDirectory {
    fn record(&self, id: &PlayerId) -> Option<PlayerRecord> {
        self.records.get(id).cloned()
    }
}

// =============================================================================
// ROSTER
// =============================================================================

/// Ordered list of every record reference created during this session.
///
/// Append-only from the outside (one `track` per record creation, the
/// caller does not dedup). Win evaluation prunes unresolvable references
/// in place, preserving the order of survivors.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    entries: Vec<PlayerId>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a newly created record reference.
    pub fn track(&mut self, id: PlayerId) {
        self.entries.push(id);
    }

    /// Number of tracked references.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the roster empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First tracked reference, if any.
    #[inline]
    pub fn first(&self) -> Option<&PlayerId> {
        self.entries.first()
    }

    /// Iterate references in tracking order.
    pub fn iter(&self) -> std::slice::Iter<'_, PlayerId> {
        self.entries.iter()
    }

    /// Drop references the predicate rejects, keeping survivor order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&PlayerId) -> bool,
    {
        self.entries.retain(keep);
    }
}
