use slotmap::SlotMap;

use crate::collision::{narrow_phase, Response, SpatialGrid, SpatialIndex};
use crate::common::SystemConfig;
use crate::error::Result;
use crate::math::vec2::Vec2;
use crate::objects::{Body, BodyHandle, IndexState};

/// Owns every body and keeps the broad-phase index in sync with them.
///
/// Bodies are mutated by the caller (through [`body_mut`](Self::body_mut) or
/// the `set_*` helpers) and re-synchronized with [`insert`](Self::insert) or
/// [`update`](Self::update). Queries never fail: stale handles and misses
/// yield `false`, `None` or an empty list.
pub struct CollisionSystem<I = SpatialGrid> {
    bodies: SlotMap<BodyHandle, Body>,
    index: I,
    config: SystemConfig,
}

impl CollisionSystem<SpatialGrid> {
    /// Creates an empty system with the default configuration.
    pub fn new() -> Self {
        let config = SystemConfig::default();
        Self { bodies: SlotMap::with_key(), index: SpatialGrid::new(config.cell_size), config }
    }

    /// Creates an empty system backed by a grid sized from `config`.
    pub fn with_config(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { bodies: SlotMap::with_key(), index: SpatialGrid::new(config.cell_size), config })
    }
}

impl Default for CollisionSystem<SpatialGrid> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: SpatialIndex> CollisionSystem<I> {
    /// Creates an empty system on top of a caller-provided index.
    pub fn with_index(index: I, config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { bodies: SlotMap::with_key(), index, config })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    // --- Body store ---

    /// Takes ownership of `body`, indexes it and returns its handle.
    pub fn add_body(&mut self, mut body: Body) -> BodyHandle {
        body.index_state = IndexState::Unindexed;
        let handle = self.bodies.insert(body);
        self.insert(handle);
        log::debug!("added body {:?}", handle);
        handle
    }

    /// Un-indexes and discards a body, handing it back to the caller.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        self.remove(handle);
        let body = self.bodies.remove(handle)?;
        log::debug!("removed body {:?}", handle);
        Some(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// Mutable access to a body. Geometry changes take effect in the broad
    /// phase after the next [`insert`](Self::insert) or [`update`](Self::update).
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Moves a body and re-synchronizes its index entry if it has one.
    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.position = position;
            if body.is_indexed() {
                self.insert(handle);
            }
        }
    }

    /// Rotates a body and re-synchronizes its index entry if it has one.
    pub fn set_rotation(&mut self, handle: BodyHandle, rotation: f64) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.rotation = rotation;
            if body.is_indexed() {
                self.insert(handle);
            }
        }
    }

    // --- AABB maintenance ---

    /// Brings the body's index entry up to date with its current geometry.
    ///
    /// Does nothing while the stored (padded) bounds still contain the body.
    /// Otherwise the old entry is dropped and a new one stored, padded by the
    /// body's own padding or the system default. A negative or NaN padding
    /// set directly on the body counts as zero.
    pub fn insert(&mut self, handle: BodyHandle) {
        let default_padding = self.config.default_padding;
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };

        let bounds = body.calculate_aabb();
        if body.is_indexed() {
            if body.bounds.contains(&bounds) {
                return;
            }
            self.index.remove(handle);
        }

        body.bounds = bounds.padded(body.padding.unwrap_or(default_padding).max(0.0));
        body.index_state = IndexState::Indexed(handle);
        self.index.insert(handle, body.bounds);
        log::trace!("indexed {:?} at {:?}", handle, body.bounds);
    }

    /// Drops the body's index entry. A no-op for bodies that are not indexed.
    pub fn remove(&mut self, handle: BodyHandle) {
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };
        if let IndexState::Indexed(key) = body.index_state {
            self.index.remove(key);
            body.index_state = IndexState::Unindexed;
            log::trace!("unindexed {:?}", handle);
        }
    }

    /// Re-inserts every indexed, non-static body.
    pub fn update(&mut self) {
        let dynamic: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_indexed() && !body.is_static)
            .map(|(handle, _)| handle)
            .collect();

        for handle in dynamic {
            self.insert(handle);
        }
    }

    // --- Queries ---

    /// Indexed bodies whose stored bounds overlap this body's, excluding itself.
    pub fn get_potentials(&self, handle: BodyHandle) -> Vec<BodyHandle> {
        let Some(body) = self.bodies.get(handle) else {
            return Vec::new();
        };
        let mut potentials = self.index.search(&body.bounds);
        potentials.retain(|candidate| *candidate != handle);
        potentials
    }

    /// Exact test between two bodies, regardless of their index entries.
    pub fn check_collision(&self, body: BodyHandle, candidate: BodyHandle) -> Option<Response> {
        let a = self.bodies.get(body)?;
        let b = self.bodies.get(candidate)?;
        narrow_phase::check_collision(a, b).map(|penetration| Response::new(body, candidate, penetration))
    }

    /// Calls `callback` once per body colliding with `handle`.
    ///
    /// Static bodies never probe. Returns whether anything collided.
    pub fn check_one<F>(&self, handle: BodyHandle, mut callback: F) -> bool
    where
        F: FnMut(&Response),
    {
        match self.bodies.get(handle) {
            Some(body) if !body.is_static => {}
            _ => return false,
        }

        let mut collided = false;
        for candidate in self.get_potentials(handle) {
            if let Some(response) = self.check_collision(handle, candidate) {
                collided = true;
                callback(&response);
            }
        }
        collided
    }

    /// Runs [`check_one`](Self::check_one) for every indexed body.
    pub fn check_all<F>(&self, mut callback: F) -> bool
    where
        F: FnMut(&Response),
    {
        let mut collided = false;
        for handle in self.index.all() {
            collided |= self.check_one(handle, &mut callback);
        }
        collided
    }

    // --- Separation ---

    /// Pushes every indexed, non-static, non-trigger body out of whatever it
    /// overlaps. Only the probing body moves; one pass per call.
    pub fn separate(&mut self) {
        let mut moved = 0;
        for handle in self.index.all() {
            if self.separate_body(handle) {
                moved += 1;
            }
        }
        log::debug!("separate moved {} bodies", moved);
    }

    /// Separation for a single probing body. Each correction is applied and
    /// re-indexed before the next candidate is tested. Returns whether the
    /// body moved.
    pub fn separate_body(&mut self, handle: BodyHandle) -> bool {
        match self.bodies.get(handle) {
            Some(body) if body.is_indexed() && !body.is_static && !body.is_trigger => {}
            _ => return false,
        }

        let mut moved = false;
        for candidate in self.get_potentials(handle) {
            let Some(response) = self.check_collision(handle, candidate) else {
                continue;
            };
            if let Some(body) = self.bodies.get_mut(handle) {
                body.position -= response.overlap_v;
                log::trace!("separated {:?} from {:?} by {:?}", handle, candidate, response.overlap_v);
            }
            self.insert(handle);
            moved = true;
        }
        moved
    }
}
