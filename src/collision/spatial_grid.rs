// Sparse uniform grid used as the default broad-phase index.

use std::collections::{HashMap, HashSet};

use slotmap::SecondaryMap;

use crate::collision::spatial_index::SpatialIndex;
use crate::collision::AABB;
use crate::math::vec2::Vec2;
use crate::objects::BodyHandle;

/// Entries spanning more cells than this are kept in a separate list that
/// every query scans, instead of being written into each cell.
const MAX_CELLS_PER_ENTRY: f64 = 1024.0;

type CellCoord = (i64, i64);

/// Inclusive range of cells `(min_col, min_row, max_col, max_row)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CellRange {
    min_col: i64,
    min_row: i64,
    max_col: i64,
    max_row: i64,
}

impl CellRange {
    fn cell_count(&self) -> f64 {
        (self.max_col - self.min_col + 1) as f64 * (self.max_row - self.min_row + 1) as f64
    }

    fn cells(self) -> impl Iterator<Item = CellCoord> {
        (self.min_row..=self.max_row)
            .flat_map(move |row| (self.min_col..=self.max_col).map(move |col| (col, row)))
    }
}

/// An unbounded uniform grid. Only occupied cells are allocated.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    inv_cell_size: f64, // 1.0 / cell_size, cached
    cells: HashMap<CellCoord, Vec<BodyHandle>>,
    entries: SecondaryMap<BodyHandle, AABB>,
    oversized: Vec<BodyHandle>,
}

impl SpatialGrid {
    /// Creates an empty grid with square cells of `cell_size` world units.
    ///
    /// `cell_size` is validated by `SystemConfig::validate` on the
    /// `CollisionSystem::with_config` path.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not positive and finite.
    pub fn new(cell_size: f64) -> Self {
        assert!(cell_size > 0.0 && cell_size.is_finite(), "Cell size must be positive");
        log::debug!("creating spatial grid with cell_size={}", cell_size);

        SpatialGrid {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            entries: SecondaryMap::new(),
            oversized: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of allocated (non-empty) cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn cell_coords(&self, point: Vec2) -> CellCoord {
        let col = (point.x * self.inv_cell_size).floor() as i64;
        let row = (point.y * self.inv_cell_size).floor() as i64;
        (col, row)
    }

    fn cell_range(&self, aabb: &AABB) -> CellRange {
        let (min_col, min_row) = self.cell_coords(aabb.min);
        let (max_col, max_row) = self.cell_coords(aabb.max);
        CellRange { min_col, min_row, max_col, max_row }
    }

    fn scan_entries(&self, bounds: &AABB) -> Vec<BodyHandle> {
        self.entries
            .iter()
            .filter(|(_, stored)| stored.overlaps(bounds))
            .map(|(handle, _)| handle)
            .collect()
    }
}

impl SpatialIndex for SpatialGrid {
    fn insert(&mut self, handle: BodyHandle, bounds: AABB) {
        if self.entries.contains_key(handle) {
            self.remove(handle);
        }

        let range = self.cell_range(&bounds);
        if range.cell_count() > MAX_CELLS_PER_ENTRY {
            self.oversized.push(handle);
        } else {
            for cell in range.cells() {
                self.cells.entry(cell).or_default().push(handle);
            }
        }
        self.entries.insert(handle, bounds);
    }

    fn remove(&mut self, handle: BodyHandle) -> Option<AABB> {
        let bounds = self.entries.remove(handle)?;

        let range = self.cell_range(&bounds);
        if range.cell_count() > MAX_CELLS_PER_ENTRY {
            self.oversized.retain(|h| *h != handle);
        } else {
            for cell in range.cells() {
                if let Some(handles) = self.cells.get_mut(&cell) {
                    handles.retain(|h| *h != handle);
                    if handles.is_empty() {
                        self.cells.remove(&cell);
                    }
                }
            }
        }
        Some(bounds)
    }

    fn search(&self, bounds: &AABB) -> Vec<BodyHandle> {
        let range = self.cell_range(bounds);
        // Walking more cells than there are entries costs more than a scan.
        if range.cell_count() > self.entries.len() as f64 {
            return self.scan_entries(bounds);
        }

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        let cell_handles = range
            .cells()
            .filter_map(|cell| self.cells.get(&cell))
            .flatten();

        for &handle in cell_handles.chain(self.oversized.iter()) {
            if !seen.insert(handle) {
                continue;
            }
            if self.entries.get(handle).is_some_and(|stored| stored.overlaps(bounds)) {
                found.push(handle);
            }
        }
        found
    }

    fn all(&self) -> Vec<BodyHandle> {
        self.entries.keys().collect()
    }

    fn get(&self, handle: BodyHandle) -> Option<AABB> {
        self.entries.get(handle).copied()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn handles(n: usize) -> Vec<BodyHandle> {
        let mut map: SlotMap<BodyHandle, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn sorted(mut v: Vec<BodyHandle>) -> Vec<BodyHandle> {
        v.sort();
        v
    }

    #[test]
    fn test_grid_new() {
        let grid = SpatialGrid::new(2.0);
        assert_eq!(grid.cell_size(), 2.0);
        assert_eq!(grid.inv_cell_size, 0.5);
        assert!(grid.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_grid_new_rejects_zero_cell_size() {
        SpatialGrid::new(0.0);
    }

    #[test]
    #[should_panic]
    fn test_grid_new_rejects_nan_cell_size() {
        SpatialGrid::new(f64::NAN);
    }

    #[test]
    fn test_cell_coords() {
        let grid = SpatialGrid::new(5.0);
        let points = vec![
            (Vec2::new(0.0, 0.0), (0, 0)),
            (Vec2::new(4.9, 4.9), (0, 0)),
            (Vec2::new(5.0, 5.0), (1, 1)),
            (Vec2::new(-0.1, 0.0), (-1, 0)),
            (Vec2::new(-5.0, -5.1), (-1, -2)),
        ];
        for (point, expected) in points {
            assert_eq!(grid.cell_coords(point), expected, "Point {:?}", point);
        }
    }

    #[test]
    fn test_insert_and_remove() {
        let mut grid = SpatialGrid::new(5.0);
        let h = handles(2);

        // spans cells (0,0), (1,0), (0,1), (1,1)
        let aabb0 = AABB::new(Vec2::new(4.0, 4.0), Vec2::new(6.0, 6.0));
        let aabb1 = AABB::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0));
        grid.insert(h[0], aabb0);
        grid.insert(h[1], aabb1);

        assert_eq!(grid.len(), 2);
        assert_eq!(grid.occupied_cells(), 4);
        assert_eq!(grid.cells[&(0, 0)], vec![h[0], h[1]]);
        assert_eq!(grid.get(h[0]), Some(aabb0));

        assert_eq!(grid.remove(h[0]), Some(aabb0));
        assert_eq!(grid.occupied_cells(), 1);
        assert_eq!(grid.remove(h[0]), None);
        assert_eq!(sorted(grid.all()), vec![h[1]]);
    }

    #[test]
    fn test_reinsert_replaces_entry() {
        let mut grid = SpatialGrid::new(1.0);
        let h = handles(1)[0];
        grid.insert(h, AABB::new(Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.5)));
        grid.insert(h, AABB::new(Vec2::new(10.0, 10.0), Vec2::new(10.5, 10.5)));

        assert_eq!(grid.len(), 1);
        assert_eq!(grid.occupied_cells(), 1);
        assert!(grid.search(&AABB::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0))).is_empty());
    }

    #[test]
    fn test_search_filters_by_exact_bounds() {
        let mut grid = SpatialGrid::new(10.0);
        let h = handles(3);
        grid.insert(h[0], AABB::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)));
        grid.insert(h[1], AABB::new(Vec2::new(3.0, 3.0), Vec2::new(4.0, 4.0)));
        grid.insert(h[2], AABB::new(Vec2::new(15.0, 1.0), Vec2::new(16.0, 2.0)));

        // same cell as h[0] and h[1] but only touching h[0]
        let query = AABB::new(Vec2::new(0.0, 0.0), Vec2::new(1.5, 1.5));
        assert_eq!(grid.search(&query), vec![h[0]]);

        // wide query spanning both columns
        let wide = AABB::new(Vec2::new(0.0, 0.0), Vec2::new(20.0, 5.0));
        assert_eq!(sorted(grid.search(&wide)), sorted(h.clone()));
    }

    #[test]
    fn test_oversized_entries_are_found() {
        let mut grid = SpatialGrid::new(1.0);
        let h = handles(2);
        let huge = AABB::new(Vec2::new(-1000.0, -1000.0), Vec2::new(1000.0, 1000.0));
        grid.insert(h[0], huge);
        grid.insert(h[1], AABB::new(Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.5)));
        assert_eq!(grid.occupied_cells(), 1);

        let query = AABB::new(Vec2::new(0.1, 0.1), Vec2::new(0.2, 0.2));
        assert_eq!(sorted(grid.search(&query)), sorted(h.clone()));

        grid.remove(h[0]);
        assert_eq!(grid.search(&query), vec![h[1]]);
        assert!(grid.oversized.is_empty());
    }
}
