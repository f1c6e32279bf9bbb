//! Broad-phase storage interface.
//!
//! The collision system decides *when* entries are inserted, moved or removed;
//! an index only stores one bounding box per body and answers overlap queries.

use crate::collision::AABB;
use crate::objects::BodyHandle;

/// Bounding-box index over body handles.
///
/// Implementations hold at most one entry per handle: inserting a handle that
/// is already present replaces its previous entry.
pub trait SpatialIndex {
    /// Stores `bounds` for `handle`, replacing any previous entry.
    fn insert(&mut self, handle: BodyHandle, bounds: AABB);

    /// Deletes the entry for `handle` and returns its bounds, if it had one.
    fn remove(&mut self, handle: BodyHandle) -> Option<AABB>;

    /// Every handle whose stored bounds overlap `bounds`. Order is unspecified.
    fn search(&self, bounds: &AABB) -> Vec<BodyHandle>;

    /// Every stored handle.
    fn all(&self) -> Vec<BodyHandle>;

    /// Stored bounds for `handle`.
    fn get(&self, handle: BodyHandle) -> Option<AABB>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
