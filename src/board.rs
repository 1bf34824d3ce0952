// Padded Othello board
//
// The playable N x N area sits inside a one-cell ring of `Cell::Border`, so a
// ray walking away from any playable cell always stops on a non-stone cell
// before leaving the grid. Cells are stored row-major in a flat Vec with
// stride N + 2.

use crate::error::{EngineError, Result};
use crate::types::{Cell, Color, Coord};

/// Smallest board the engine accepts
pub const MIN_BOARD_SIZE: usize = 2;

/// Owned board snapshot
///
/// Cloning yields an independent copy; search nodes never share a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board of the given playable size
    pub fn empty(size: usize) -> Result<Self> {
        if size < MIN_BOARD_SIZE {
            return Err(EngineError::InvalidSize {
                size,
                min: MIN_BOARD_SIZE,
            });
        }

        let stride = size + 2;
        let mut cells = vec![Cell::Border; stride * stride];
        for row in 1..=size {
            for col in 1..=size {
                cells[row * stride + col] = Cell::Empty;
            }
        }

        Ok(Board { size, cells })
    }

    /// Creates the standard opening position: two white stones on the main
    /// diagonal of the centre square and two black stones on the other one
    ///
    /// Only even sizes from 4 up have a centre square.
    pub fn initial(size: usize) -> Result<Self> {
        if size < 4 || size % 2 != 0 {
            return Err(EngineError::InvalidOpeningSize { size });
        }
        let mut board = Self::empty(size)?;
        let m = size / 2;
        board.set(Coord::new(m - 1, m - 1), Color::White)?;
        board.set(Coord::new(m - 1, m), Color::Black)?;
        board.set(Coord::new(m, m - 1), Color::Black)?;
        board.set(Coord::new(m, m), Color::White)?;
        Ok(board)
    }

    /// Builds a board from caller rows using the -1 / 0 / 1 cell encoding
    ///
    /// # Arguments
    /// * `size` - Playable board dimension N
    /// * `rows` - N rows of N cell codes each
    pub fn from_rows(size: usize, rows: &[Vec<i8>]) -> Result<Self> {
        let mut board = Self::empty(size)?;

        if rows.len() != size {
            return Err(EngineError::RowCountMismatch {
                expected: size,
                actual: rows.len(),
            });
        }

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != size {
                return Err(EngineError::RowLengthMismatch {
                    row,
                    expected: size,
                    actual: cells.len(),
                });
            }

            for (col, &value) in cells.iter().enumerate() {
                let cell =
                    Cell::from_code(value).ok_or(EngineError::InvalidCell { row, col, value })?;
                let idx = board.index_of(Coord::new(row, col));
                board.cells[idx] = cell;
            }
        }

        Ok(board)
    }

    /// Exports the playable area in the caller's cell encoding
    pub fn to_rows(&self) -> Vec<Vec<i8>> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| self.cells[self.index_of(Coord::new(row, col))].code())
                    .collect()
            })
            .collect()
    }

    /// Playable dimension N
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the cell at a playable coordinate, `None` outside the board
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        if self.contains(coord) {
            Some(self.cells[self.index_of(coord)])
        } else {
            None
        }
    }

    /// Places a stone without flipping anything (position setup)
    pub fn set(&mut self, coord: Coord, color: Color) -> Result<()> {
        self.ensure_contains(coord)?;
        let idx = self.index_of(coord);
        self.cells[idx] = Cell::Stone(color);
        Ok(())
    }

    /// Empties a playable cell (position setup)
    pub fn clear(&mut self, coord: Coord) -> Result<()> {
        self.ensure_contains(coord)?;
        let idx = self.index_of(coord);
        self.cells[idx] = Cell::Empty;
        Ok(())
    }

    /// Number of stones of `color` on the playable area
    pub fn count(&self, color: Color) -> usize {
        self.cells
            .iter()
            .filter(|&&cell| cell == Cell::Stone(color))
            .count()
    }

    /// Number of empty playable cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == Cell::Empty).count()
    }

    /// Total stones of both colors
    pub fn stone_count(&self) -> usize {
        self.count(Color::Black) + self.count(Color::White)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    fn ensure_contains(&self, coord: Coord) -> Result<()> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                coord,
                size: self.size,
            })
        }
    }

    fn stride(&self) -> usize {
        self.size + 2
    }

    /// Flat-index offsets of the 8 compass directions
    pub(crate) fn directions(&self) -> [isize; 8] {
        let s = self.stride() as isize;
        [-s - 1, -s, -s + 1, -1, 1, s - 1, s, s + 1]
    }

    pub(crate) fn index_of(&self, coord: Coord) -> usize {
        (coord.row + 1) * self.stride() + coord.col + 1
    }

    pub(crate) fn coord_of(&self, idx: usize) -> Coord {
        let stride = self.stride();
        Coord::new(idx / stride - 1, idx % stride - 1)
    }

    /// Flat indices of the playable cells in row-major order
    pub(crate) fn playable_indices(&self) -> impl Iterator<Item = usize> + '_ {
        let stride = self.stride();
        (1..=self.size).flat_map(move |row| (1..=self.size).map(move |col| row * stride + col))
    }

    #[inline]
    pub(crate) fn cell(&self, idx: usize) -> Cell {
        self.cells[idx]
    }

    /// Writes a stone into a playable cell; the border ring is never written
    #[inline]
    pub(crate) fn put(&mut self, idx: usize, color: Color) {
        debug_assert!(self.cells[idx] != Cell::Border, "write to border cell {}", idx);
        self.cells[idx] = Cell::Stone(color);
    }

    /// Moves one step from `idx` along a direction offset
    ///
    /// Callers only step away from playable or run cells, so the border ring
    /// keeps the result in range.
    #[inline]
    pub(crate) fn step(idx: usize, offset: isize) -> usize {
        (idx as isize + offset) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_border_ring() {
        let board = Board::empty(4).unwrap();
        assert_eq!(board.empty_count(), 16);
        assert_eq!(board.cell(0), Cell::Border);
        assert_eq!(board.cell(5), Cell::Border);
        assert_eq!(board.cell(35), Cell::Border);
        assert_eq!(board.cell(board.index_of(Coord::new(0, 0))), Cell::Empty);
    }

    #[test]
    fn test_too_small_board_is_rejected() {
        assert_eq!(
            Board::empty(1),
            Err(EngineError::InvalidSize { size: 1, min: 2 })
        );
    }

    #[test]
    fn test_initial_position_centre_stones() {
        let board = Board::initial(8).unwrap();
        assert_eq!(board.get(Coord::new(3, 3)), Some(Cell::Stone(Color::White)));
        assert_eq!(board.get(Coord::new(3, 4)), Some(Cell::Stone(Color::Black)));
        assert_eq!(board.get(Coord::new(4, 3)), Some(Cell::Stone(Color::Black)));
        assert_eq!(board.get(Coord::new(4, 4)), Some(Cell::Stone(Color::White)));
        assert_eq!(board.stone_count(), 4);
    }

    #[test]
    fn test_opening_position_needs_even_size_of_four_or_more() {
        for size in [2, 3, 5, 7] {
            assert_eq!(
                Board::initial(size),
                Err(EngineError::InvalidOpeningSize { size })
            );
        }
        assert_eq!(Board::initial(4).unwrap().stone_count(), 4);
        assert_eq!(Board::initial(10).unwrap().stone_count(), 4);
    }

    #[test]
    fn test_from_rows_matches_to_rows() {
        let rows = vec![
            vec![0, 1, -1],
            vec![0, 0, 0],
            vec![-1, -1, 1],
        ];
        let board = Board::from_rows(3, &rows).unwrap();
        assert_eq!(board.to_rows(), rows);
        assert_eq!(board.count(Color::Black), 3);
        assert_eq!(board.count(Color::White), 2);
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes_and_values() {
        assert_eq!(
            Board::from_rows(2, &[vec![0, 0]]),
            Err(EngineError::RowCountMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            Board::from_rows(2, &[vec![0, 0], vec![0]]),
            Err(EngineError::RowLengthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            Board::from_rows(2, &[vec![0, 3], vec![0, 0]]),
            Err(EngineError::InvalidCell {
                row: 0,
                col: 1,
                value: 3
            })
        );
    }

    #[test]
    fn test_index_and_coord_are_inverse() {
        let board = Board::empty(8).unwrap();
        for idx in board.playable_indices() {
            assert_eq!(board.index_of(board.coord_of(idx)), idx);
        }
        assert_eq!(board.playable_indices().count(), 64);
    }

    #[test]
    fn test_set_outside_board_fails() {
        let mut board = Board::empty(4).unwrap();
        assert!(board.set(Coord::new(4, 0), Color::Black).is_err());
        assert_eq!(board.get(Coord::new(0, 4)), None);
    }

    #[test]
    fn test_clones_are_independent() {
        let original = Board::initial(4).unwrap();
        let mut copy = original.clone();
        copy.clear(Coord::new(1, 1)).unwrap();
        assert_eq!(original.stone_count(), 4);
        assert_eq!(copy.stone_count(), 3);
    }
}
