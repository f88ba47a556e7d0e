use super::{Cell, ColonyRules, StructureKind};
use rand::Rng;
use rayon::prelude::*;

/// Grid manages the square colony plane.
/// Evolution is functional: it reads `self` as a snapshot and returns a new grid.
#[derive(Clone, PartialEq, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

/// Per-generation inputs shared by every cell update
#[derive(Clone, Copy, Debug)]
pub struct EvolveParams<'a> {
    pub rules: &'a ColonyRules,
    pub survival_threshold: u8,
    pub hazard_damage: f32,
}

impl Grid {
    /// Create a new `size` x `size` grid with every cell empty
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::EMPTY; size * size],
        }
    }

    /// Build a grid from rows; `None` unless the rows form a square
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.into_iter().flatten().map(Cell::normalized).collect(),
        })
    }

    /// Rows in order, for serialization and display
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size.max(1))
    }

    /// Number of rows (and columns)
    pub const fn size(&self) -> usize {
        self.size
    }

    const fn get_index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub const fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    /// Get cell at position (with bounds checking)
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.in_bounds(row, col)
            .then(|| &self.cells[self.get_index(row, col)])
    }

    /// Set cell at position; out-of-range writes are ignored
    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if self.in_bounds(row, col) {
            let idx = self.get_index(row, col);
            self.cells[idx] = cell;
        }
    }

    /// Count occupied Moore neighbors. The plane is bounded, so edge and
    /// corner cells simply have fewer candidates.
    pub fn count_occupied_neighbors(&self, row: usize, col: usize) -> u8 {
        let row_range = row.saturating_sub(1)..=(row + 1).min(self.size.saturating_sub(1));
        row_range
            .flat_map(|r| {
                let col_range = col.saturating_sub(1)..=(col + 1).min(self.size.saturating_sub(1));
                col_range.map(move |c| (r, c))
            })
            .filter(|&(r, c)| (r, c) != (row, col))
            .filter(|&(r, c)| self.get(r, c).is_some_and(Cell::is_occupied))
            .count() as u8
    }

    fn evolve_cell(&self, row: usize, col: usize, params: &EvolveParams<'_>) -> Cell {
        let current = self.cells[self.get_index(row, col)];
        let neighbors = self.count_occupied_neighbors(row, col);
        params.rules.evolve(current, neighbors, params.survival_threshold, params.hazard_damage)
    }

    /// Pure functional evolution - returns new grid (serial)
    pub fn evolve(&self, params: &EvolveParams<'_>) -> Self {
        let cells = (0..self.size)
            .flat_map(|row| (0..self.size).map(move |col| (row, col)))
            .map(|(row, col)| self.evolve_cell(row, col, params))
            .collect();

        Self { size: self.size, cells }
    }

    /// Parallel evolution using rayon, one task per row.
    /// Produces exactly the same grid as [`Grid::evolve`].
    pub fn evolve_parallel(&self, params: &EvolveParams<'_>) -> Self {
        let cells: Vec<Cell> = (0..self.size)
            .into_par_iter()
            .flat_map_iter(|row| (0..self.size).map(move |col| (row, col)))
            .map(|(row, col)| self.evolve_cell(row, col, params))
            .collect();

        Self { size: self.size, cells }
    }

    /// Copy into a larger grid: cells keep their (row, col), the new
    /// margin is empty. Never shrinks.
    pub fn expanded(&self, new_size: usize) -> Self {
        if new_size <= self.size {
            return self.clone();
        }
        let mut grid = Self::new(new_size);
        for (row, col, cell) in self.iter_cells() {
            grid.set(row, col, *cell);
        }
        grid
    }

    /// Scatter habitats with the given chance per cell (everything else empty)
    pub fn randomize<R: Rng + ?Sized>(mut self, rng: &mut R, density: f64) -> Self {
        self.cells.iter_mut().for_each(|cell| {
            *cell = if rng.random::<f64>() < density {
                Cell::built(StructureKind::Habitat)
            } else {
                Cell::EMPTY
            };
        });
        self
    }

    /// Apply `f` to every cell in place
    pub(crate) fn map_cells(&mut self, f: impl Fn(&Cell) -> Cell) {
        self.cells.iter_mut().for_each(|cell| *cell = f(cell));
    }

    /// Iterate over all cells with their positions, row-major
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (idx / self.size, idx % self.size, cell))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_occupied()).count()
    }
}
