use hjb_core::Vector;

use super::Grid;

/// A grid node: its flat index, integer coordinates, and physical position.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint {
    pub index: usize,
    pub coords: Vec<usize>,
    pub position: Vector,
}

/// Row-major iterator over the nodes of a [`Grid`].
#[derive(Debug, Clone)]
pub struct Points<'a> {
    grid: &'a Grid,
    next: usize,
}

impl<'a> Points<'a> {
    pub(super) fn new(grid: &'a Grid) -> Self {
        Self { grid, next: 0 }
    }
}

impl Iterator for Points<'_> {
    type Item = GridPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.grid.size() {
            return None;
        }

        let index = self.next;
        self.next += 1;

        let coords = self.grid.coords_of(index);
        let position = self.grid.position(&coords);
        Some(GridPoint {
            index,
            coords,
            position,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.size() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Points<'_> {}
