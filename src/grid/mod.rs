//! Grid & Spot model.
//!
//! A fixed floors x rows x columns arena of [`Spot`]s. The grid is immutable
//! after construction; only spot occupancy changes, under each spot's own lock.

mod class;
mod layout;
mod spot;

pub use class::{UnknownClass, VehicleClass};
pub use layout::{CellSpec, LayoutTemplate};
pub use spot::{Occupancy, Spot, SpotCoord, SpotKeyError};

use thiserror::Error;
use tracing::debug;

/// Errors raised while building a grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Grid must have at least one floor")]
    NoFloors,

    #[error("Grid dimensions overflow: {floors}x{rows}x{columns}")]
    TooLarge { floors: usize, rows: usize, columns: usize },
}

/// Fixed three-dimensional arrangement of spots.
#[derive(Debug)]
pub struct Grid {
    floors: usize,
    rows: usize,
    columns: usize,
    spots: Vec<Spot>,
}

impl Grid {
    /// Build a grid, applying `template` identically to every floor.
    ///
    /// Cells missing from the template, malformed codes and unknown classes
    /// all produce inactive spots.
    pub fn new(
        floors: usize,
        rows: usize,
        columns: usize,
        template: &LayoutTemplate,
    ) -> Result<Self, LayoutError> {
        if floors == 0 {
            return Err(LayoutError::NoFloors);
        }
        let total = floors
            .checked_mul(rows)
            .and_then(|n| n.checked_mul(columns))
            .filter(|&n| i64::try_from(n).is_ok())
            .ok_or(LayoutError::TooLarge { floors, rows, columns })?;
        if total == 0 {
            debug!(floors, rows, columns, "grid constructed without spots");
            return Ok(Self { floors, rows, columns, spots: Vec::new() });
        }

        let mut spots = Vec::with_capacity(total);
        for f in 0..floors {
            for r in 0..rows {
                for c in 0..columns {
                    let cell = template.spec_at(r, c);
                    let coord = SpotCoord::new(f as i64, r as i64, c as i64);
                    spots.push(Spot::new(coord, cell.class, cell.active));
                }
            }
        }

        debug!(floors, rows, columns, spots = spots.len(), "grid constructed");
        Ok(Self { floors, rows, columns, spots })
    }

    pub fn floors(&self) -> usize {
        self.floors
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of spots, active or not.
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Bounds-checked lookup. Negative or out-of-range coordinates yield None.
    pub fn spot(&self, coord: SpotCoord) -> Option<&Spot> {
        let f = usize::try_from(coord.floor).ok().filter(|&f| f < self.floors)?;
        let r = usize::try_from(coord.row).ok().filter(|&r| r < self.rows)?;
        let c = usize::try_from(coord.col).ok().filter(|&c| c < self.columns)?;
        self.spots.get((f * self.rows + r) * self.columns + c)
    }

    /// Lookup by external key.
    pub fn spot_by_key(&self, key: &str) -> Option<&Spot> {
        self.spot(key.parse().ok()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spot> {
        self.spots.iter()
    }

    /// Active spots of one class.
    pub fn active_spots(&self, class: VehicleClass) -> impl Iterator<Item = &Spot> {
        self.spots
            .iter()
            .filter(move |s| s.is_active() && s.class() == Some(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_template() -> LayoutTemplate {
        LayoutTemplate::new([["B-1", "M-1", "A-1"], ["B-0", "M-1", "A-0"]])
    }

    #[test]
    fn test_basic_layout_classes_and_flags() {
        let grid = Grid::new(1, 2, 3, &basic_template()).unwrap();
        assert_eq!((grid.floors(), grid.rows(), grid.columns()), (1, 2, 3));

        let expected = [
            ((0, 0, 0), VehicleClass::Bicycle, true),
            ((0, 0, 1), VehicleClass::Motorcycle, true),
            ((0, 0, 2), VehicleClass::Automobile, true),
            ((0, 1, 0), VehicleClass::Bicycle, false),
            ((0, 1, 1), VehicleClass::Motorcycle, true),
            ((0, 1, 2), VehicleClass::Automobile, false),
        ];
        for ((f, r, c), class, active) in expected {
            let spot = grid.spot(SpotCoord::new(f, r, c)).unwrap();
            assert_eq!(spot.class(), Some(class), "{f}-{r}-{c}");
            assert_eq!(spot.is_active(), active, "{f}-{r}-{c}");
        }
    }

    #[test]
    fn test_every_floor_gets_the_template() {
        let template = LayoutTemplate::new([["B-1", "M-1"], ["A-1", "B-0"]]);
        let grid = Grid::new(2, 2, 2, &template).unwrap();
        assert_eq!(grid.len(), 8);
        for f in 0..2 {
            for r in 0..2 {
                for c in 0..2 {
                    let spot = grid.spot(SpotCoord::new(f, r, c)).unwrap();
                    assert_eq!(spot.coord(), SpotCoord::new(f, r, c));
                }
            }
        }
        assert_eq!(grid.active_spots(VehicleClass::Bicycle).count(), 2);
    }

    #[test]
    fn test_lookup_is_bounds_checked() {
        let grid = Grid::new(1, 2, 3, &basic_template()).unwrap();
        assert!(grid.spot(SpotCoord::new(0, 2, 0)).is_none());
        assert!(grid.spot(SpotCoord::new(1, 0, 0)).is_none());
        assert!(grid.spot(SpotCoord::new(-1, 0, 0)).is_none());
        assert!(grid.spot_by_key("0-1-2").is_some());
        assert!(grid.spot_by_key("0-1-3").is_none());
        assert!(grid.spot_by_key("garbage").is_none());
    }

    #[test]
    fn test_empty_layout() {
        let grid = Grid::new(1, 0, 0, &LayoutTemplate::default()).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.floors(), 1);
    }

    #[test]
    fn test_huge_floor_count_without_cells_is_immediate() {
        let grid = Grid::new(usize::MAX, 0, 3, &basic_template()).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.floors(), usize::MAX);
        assert!(grid.spot(SpotCoord::new(0, 0, 0)).is_none());
    }

    #[test]
    fn test_zero_floors_rejected() {
        assert_eq!(
            Grid::new(0, 1, 1, &basic_template()).unwrap_err(),
            LayoutError::NoFloors
        );
    }
}
