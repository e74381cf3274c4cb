/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for neighbor lookups. Space is
 * split into cubic cells no smaller than the view radius, so every visible
 * neighbor lives in the boid's own cell or one of the 26 around it. Cells are
 * hashed, which keeps the grid unbounded in all three axes.
 *
 * The grid only narrows the candidate set. Candidates come back sorted by
 * index so the steering pass folds them in the same order as a brute-force
 * scan and produces identical forces.
 *
 * Cell coordinates are i32. Positions whose cell would fall outside
 * CELL_COORD_LIMIT are not representable, and callers must scan instead.
 */

use glam::{IVec3, Vec3};
use std::collections::HashMap;

// Largest cell coordinate magnitude the grid accepts
pub const CELL_COORD_LIMIT: f32 = 1.0e9;

pub struct SpatialGrid {
    pub cell_size: f32,
    cells: HashMap<IVec3, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    // Convert world coordinates to a grid cell coordinate
    #[inline]
    pub fn pos_to_cell(&self, pos: Vec3) -> IVec3 {
        (pos / self.cell_size).floor().as_ivec3()
    }

    // True when the position maps to a cell without leaving the i32 range
    #[inline]
    pub fn covers(cell_size: f32, position: Vec3) -> bool {
        let cell = position / cell_size;
        cell.is_finite() && cell.abs().max_element() < CELL_COORD_LIMIT
    }

    // Clear the grid, keeping allocations of cells that were occupied.
    // Cells left empty since the previous clear are dropped.
    pub fn clear(&mut self) {
        self.cells.retain(|_, cell| {
            let occupied = !cell.is_empty();
            cell.clear();
            occupied
        });
    }

    // Resize cells and drop all content
    pub fn reset(&mut self, cell_size: f32) {
        self.cell_size = cell_size;
        self.cells.clear();
    }

    // Insert a boid index into the grid
    #[inline]
    pub fn insert(&mut self, index: usize, position: Vec3) {
        let cell = self.pos_to_cell(position);
        self.cells.entry(cell).or_default().push(index);
    }

    // Get indices within the cell containing the position and its neighbors
    pub fn get_nearby_indices(&self, position: Vec3) -> Vec<usize> {
        let center = self.pos_to_cell(position);
        let mut result = Vec::new();

        for z in -1..=1 {
            for y in -1..=1 {
                for x in -1..=1 {
                    let neighbor = center.wrapping_add(IVec3::new(x, y, z));
                    if let Some(cell) = self.cells.get(&neighbor) {
                        result.extend_from_slice(cell);
                    }
                }
            }
        }

        result.sort_unstable();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_points_in_adjacent_cells_only() {
        let mut grid = SpatialGrid::new(1.0);
        grid.insert(0, Vec3::new(0.5, 0.5, 0.5));
        grid.insert(1, Vec3::new(1.5, 0.5, 0.5));
        grid.insert(2, Vec3::new(3.5, 0.5, 0.5));
        grid.insert(3, Vec3::new(-0.5, -0.5, -0.5));

        assert_eq!(grid.get_nearby_indices(Vec3::new(0.5, 0.5, 0.5)), vec![0, 1, 3]);
        assert_eq!(grid.get_nearby_indices(Vec3::new(3.2, 0.0, 0.0)), vec![2]);
    }

    #[test]
    fn clear_empties_cells() {
        let mut grid = SpatialGrid::new(2.0);
        grid.insert(7, Vec3::ZERO);
        grid.clear();
        assert!(grid.get_nearby_indices(Vec3::ZERO).is_empty());

        grid.insert(3, Vec3::ZERO);
        assert_eq!(grid.get_nearby_indices(Vec3::ZERO), vec![3]);
    }

    #[test]
    fn lookups_at_the_edge_of_cell_space_do_not_overflow() {
        let mut grid = SpatialGrid::new(1.0e-12);
        grid.insert(0, Vec3::new(1.0, 0.0, 0.0));
        grid.insert(1, Vec3::new(-1.0, 0.0, 0.0));

        // Both saturate to the extreme cells; neighbors wrap around harmlessly
        let nearby = grid.get_nearby_indices(Vec3::new(1.0, 0.0, 0.0));
        assert!(nearby.contains(&0));
    }

    #[test]
    fn covers_rejects_unrepresentable_cells() {
        assert!(SpatialGrid::covers(0.5, Vec3::new(100.0, -3.0, 7.0)));
        assert!(!SpatialGrid::covers(1.0e-12, Vec3::X));
        assert!(!SpatialGrid::covers(0.5, Vec3::new(0.0, 1.0e12, 0.0)));
        assert!(!SpatialGrid::covers(0.5, Vec3::new(f32::NAN, 0.0, 0.0)));
    }

    #[test]
    fn results_are_sorted() {
        let mut grid = SpatialGrid::new(1.0);
        grid.insert(5, Vec3::new(0.9, 0.0, 0.0));
        grid.insert(2, Vec3::new(-0.9, 0.0, 0.0));
        grid.insert(4, Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(grid.get_nearby_indices(Vec3::ZERO), vec![2, 4, 5]);
    }
}
