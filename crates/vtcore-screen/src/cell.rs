//! A single grid cell.

use vtcore_symbols::Symbol;

use crate::attr::Attributes;

/// One character position on the grid.
///
/// `age` is a snapshot of the screen's mutation counter at the time this
/// cell was last written; a renderer that tracks the counter it last drew
/// can skip cells whose `age` it has already seen, the "SoA cell storage /
/// age-based redraw" optimization this crate's data model is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: Symbol,
    pub attr: Attributes,
    pub age: u64,
}

impl Cell {
    #[must_use]
    pub fn blank(attr: Attributes, age: u64) -> Self {
        Self {
            symbol: Symbol::DEFAULT,
            attr,
            age,
        }
    }
}
