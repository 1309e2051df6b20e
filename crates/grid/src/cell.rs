//! Grid-cell addressing: the `(row, col)` arena.

use crate::error::GridError;

/// Address of one grid cell: latitude row and longitude column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex {
    /// Latitude row.
    pub row: usize,
    /// Longitude column.
    pub col: usize,
}

impl CellIndex {
    /// Creates a cell index.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The shape of a latitude/longitude plane, and the cells in it.
///
/// Cells are visited row by row (latitude slowest), matching the row-level
/// progress events of the correction loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    n_rows: usize,
    n_cols: usize,
}

impl CellGrid {
    /// Creates a grid with `n_rows` latitudes and `n_cols` longitudes.
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self { n_rows, n_cols }
    }

    /// Number of latitude rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of longitude columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.n_rows * self.n_cols
    }

    /// Returns `true` if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `cell` if it lies inside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] otherwise.
    pub fn check(&self, cell: CellIndex) -> Result<CellIndex, GridError> {
        if cell.row < self.n_rows && cell.col < self.n_cols {
            Ok(cell)
        } else {
            Err(GridError::CellOutOfBounds {
                row: cell.row,
                col: cell.col,
                n_rows: self.n_rows,
                n_cols: self.n_cols,
            })
        }
    }

    /// Cells of one latitude row, west to east.
    pub fn row(&self, row: usize) -> impl Iterator<Item = CellIndex> + use<> {
        (0..self.n_cols).map(move |col| CellIndex::new(row, col))
    }

    /// Every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + use<> {
        let n_cols = self.n_cols;
        (0..self.n_rows).flat_map(move |row| (0..n_cols).map(move |col| CellIndex::new(row, col)))
    }

    /// Row-major position of `cell`.
    fn flat(&self, cell: CellIndex) -> usize {
        cell.row * self.n_cols + cell.col
    }
}

/// One value per grid cell, addressed by [`CellIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellMap<T> {
    grid: CellGrid,
    data: Vec<T>,
}

impl<T: Clone> CellMap<T> {
    /// A map with every cell set to `fill`.
    pub fn filled(grid: CellGrid, fill: T) -> Self {
        Self {
            grid,
            data: vec![fill; grid.len()],
        }
    }
}

impl<T> CellMap<T> {
    /// The grid this map covers.
    pub fn grid(&self) -> CellGrid {
        self.grid
    }

    /// Value at `cell`, or `None` outside the grid.
    pub fn get(&self, cell: CellIndex) -> Option<&T> {
        self.grid.check(cell).ok().map(|c| &self.data[self.grid.flat(c)])
    }

    /// Replaces the value at `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] if `cell` is outside the grid.
    pub fn set(&mut self, cell: CellIndex, value: T) -> Result<(), GridError> {
        let cell = self.grid.check(cell)?;
        let idx = self.grid.flat(cell);
        self.data[idx] = value;
        Ok(())
    }

    /// `(cell, value)` pairs, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &T)> {
        self.grid.iter().zip(self.data.iter())
    }

    /// Values, row by row.
    pub fn values(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iter_is_row_major() {
        let grid = CellGrid::new(2, 3);
        let cells: Vec<(usize, usize)> = grid.iter().map(|c| (c.row, c.col)).collect();
        assert_eq!(cells, [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn row_iterates_columns() {
        let grid = CellGrid::new(4, 2);
        let row: Vec<CellIndex> = grid.row(3).collect();
        assert_eq!(row, [CellIndex::new(3, 0), CellIndex::new(3, 1)]);
    }

    #[test]
    fn check_bounds() {
        let grid = CellGrid::new(2, 2);
        assert!(grid.check(CellIndex::new(1, 1)).is_ok());
        assert!(matches!(
            grid.check(CellIndex::new(2, 0)),
            Err(GridError::CellOutOfBounds { row: 2, .. })
        ));
    }

    #[test]
    fn cell_map_set_get() {
        let mut map = CellMap::filled(CellGrid::new(2, 2), 0u32);
        map.set(CellIndex::new(1, 0), 7).unwrap();
        assert_eq!(map.get(CellIndex::new(1, 0)), Some(&7));
        assert_eq!(map.get(CellIndex::new(0, 1)), Some(&0));
        assert_eq!(map.get(CellIndex::new(5, 5)), None);
        assert!(map.set(CellIndex::new(0, 2), 1).is_err());
        assert_eq!(map.values(), &[0, 0, 7, 0]);
    }

    #[test]
    fn empty_grid() {
        let grid = CellGrid::new(0, 5);
        assert!(grid.is_empty());
        assert_eq!(grid.iter().count(), 0);
    }
}
