//! Regular grids underlying the interpolators.

/// Floating-point precision used for grid coordinates and sample values.
#[allow(non_camel_case_types)]
pub type fgr = f64;

/// A regular 1D grid of equally sized interpolation cells.
#[derive(Clone, Debug, PartialEq)]
pub struct RegularGrid1 {
    start: fgr,
    cell_extent: fgr,
    n_cells: usize,
}

impl RegularGrid1 {
    /// Creates a new regular grid from the coordinate of the lower domain
    /// boundary, the extent of a grid cell and the number of cells.
    pub fn new(start: fgr, cell_extent: fgr, n_cells: usize) -> Self {
        assert!(
            n_cells > 0,
            "Cannot create grid with zero interpolation cells."
        );
        assert!(
            cell_extent > 0.0,
            "Cannot create grid with non-positive cell extent."
        );
        Self {
            start,
            cell_extent,
            n_cells,
        }
    }

    /// Creates a new regular grid spanning the given monotonically increasing
    /// coordinates, which are assumed to be uniformly spaced.
    pub fn from_coords(coords: &[fgr]) -> Self {
        assert!(
            coords.len() >= 2,
            "Cannot create grid from fewer than two coordinates."
        );
        Self::new(coords[0], coords[1] - coords[0], coords.len() - 1)
    }

    /// Returns the coordinate of the lower domain boundary.
    pub fn start(&self) -> fgr {
        self.start
    }

    /// Returns the extent of a grid cell.
    pub fn cell_extent(&self) -> fgr {
        self.cell_extent
    }

    /// Returns the number of grid cells.
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// Returns the coordinate of the upper domain boundary.
    pub fn end(&self) -> fgr {
        self.start + self.cell_extent * (self.n_cells as fgr)
    }

    /// Finds the index of the grid cell containing the given coordinate,
    /// clamped to the valid range.
    ///
    /// Coordinates below the domain map to cell 0 and coordinates above the
    /// domain map to the last cell, so out-of-domain queries extrapolate
    /// with the boundary cell's polynomial.
    pub fn find_closest_grid_cell(&self, coord: fgr) -> usize {
        let idx = ((coord - self.start) / self.cell_extent).floor() as isize;
        idx.clamp(0, (self.n_cells - 1) as isize) as usize
    }

    /// Finds the clamped grid cell index for every coordinate in the given
    /// slice, preserving the input ordering.
    pub fn find_closest_grid_cells(&self, coords: &[fgr]) -> Vec<usize> {
        coords
            .iter()
            .map(|&coord| self.find_closest_grid_cell(coord))
            .collect()
    }

    /// Computes the local coordinate of the given coordinate within the grid
    /// cell with the given index, rescaled by the cell extent.
    ///
    /// The result lies in `[0, 1)` for coordinates inside the cell and
    /// outside that range when extrapolating from a boundary cell.
    pub fn cell_local_coord(&self, cell_idx: usize, coord: fgr) -> fgr {
        (coord - self.start - (cell_idx as fgr) * self.cell_extent) / self.cell_extent
    }
}

/// A regular 2D grid composed of a regular grid along each axis.
#[derive(Clone, Debug, PartialEq)]
pub struct RegularGrid2 {
    x: RegularGrid1,
    y: RegularGrid1,
}

impl RegularGrid2 {
    /// Creates a new regular 2D grid from the given axis grids.
    pub fn new(x: RegularGrid1, y: RegularGrid1) -> Self {
        Self { x, y }
    }

    /// Returns a reference to the grid along the x-axis.
    pub fn x(&self) -> &RegularGrid1 {
        &self.x
    }

    /// Returns a reference to the grid along the y-axis.
    pub fn y(&self) -> &RegularGrid1 {
        &self.y
    }
}
