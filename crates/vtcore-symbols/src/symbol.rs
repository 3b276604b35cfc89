//! Grapheme interning table.
//!
//! A [`Symbol`] is the 32-bit handle stored in every [`Cell`](https://docs.rs/vtcore-screen)
//! of the grid. A symbol with no combining marks carries its code point
//! inline and needs no table lookup; appending a combining mark upgrades it
//! to an index into the table's arena of interned code-point sequences.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::ucs4::{self, Ucs4};
use crate::width;

/// First symbol id reserved for table-interned (multi-codepoint) entries.
/// Anything below this is a bare code point with no table entry.
const TABLE_BASE: u32 = 0x8000_0000;

pub type CodepointSeq = SmallVec<[Ucs4; 4]>;

/// Handle identifying one grapheme cluster (a base code point plus zero or
/// more combining marks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// The symbol stored in a freshly erased cell: a single space.
    pub const DEFAULT: Symbol = Symbol(0x20);

    /// Marks the right-hand half of a wide (double-width) cell. Not a real
    /// code point — it lives just past the last valid Unicode scalar value
    /// (`0x10FFFF`) so it can never collide with one — so renderers can
    /// distinguish it from an ordinary erased space and skip drawing it.
    pub const WIDE_PLACEHOLDER: Symbol = Symbol(0x0011_0000);

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// True for the right-hand half of a wide cell; see
    /// [`Symbol::WIDE_PLACEHOLDER`].
    #[must_use]
    pub const fn is_wide_placeholder(self) -> bool {
        self.0 == Self::WIDE_PLACEHOLDER.0
    }

    #[must_use]
    const fn is_interned(self) -> bool {
        self.0 >= TABLE_BASE
    }
}

/// Table of interned multi-codepoint symbols.
///
/// Single code points never touch this table: [`SymbolTable::make`] returns
/// a `Symbol` that carries the code point directly. Only
/// [`SymbolTable::append`] allocates, and it deduplicates so appending the
/// same combining sequence twice returns the same `Symbol`.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: Vec<CodepointSeq>,
    index: HashMap<CodepointSeq, Symbol>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a symbol for a single code point. Never allocates.
    #[must_use]
    pub fn make(&self, ucs4: Ucs4) -> Symbol {
        debug_assert!(ucs4 <= ucs4::MAX, "ucs4 out of range");
        Symbol(ucs4)
    }

    /// Append a combining mark to `sym`, returning the (possibly new)
    /// symbol for the resulting sequence.
    pub fn append(&mut self, sym: Symbol, ucs4: Ucs4) -> Symbol {
        let mut seq: CodepointSeq = if sym.is_interned() {
            self.entries[(sym.0 - TABLE_BASE) as usize].clone()
        } else {
            SmallVec::from_slice(&[sym.0])
        };
        seq.push(ucs4);

        if let Some(&existing) = self.index.get(&seq) {
            return existing;
        }

        let id = Symbol(TABLE_BASE + u32::try_from(self.entries.len()).unwrap_or(u32::MAX));
        self.entries.push(seq.clone());
        self.index.insert(seq, id);
        id
    }

    /// Return the code point sequence a symbol expands to: one base code
    /// point, followed by any combining marks appended to it.
    #[must_use]
    pub fn get(&self, sym: Symbol) -> CodepointSeq {
        if sym.is_interned() {
            self.entries[(sym.0 - TABLE_BASE) as usize].clone()
        } else {
            SmallVec::from_slice(&[sym.0])
        }
    }

    /// Display width of a symbol: the width of its base code point.
    /// Combining marks never add width.
    #[must_use]
    pub fn width(&self, sym: Symbol) -> u8 {
        let base = if sym.is_interned() {
            self.entries[(sym.0 - TABLE_BASE) as usize]
                .first()
                .copied()
                .unwrap_or(0)
        } else {
            sym.0
        };
        width::width(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_is_allocation_free_and_roundtrips() {
        let table = SymbolTable::new();
        let sym = table.make(u32::from('A'));
        assert_eq!(table.get(sym).as_slice(), &[u32::from('A')]);
        assert_eq!(table.width(sym), 1);
    }

    #[test]
    fn append_combining_mark_builds_a_sequence() {
        let mut table = SymbolTable::new();
        let e = table.make(u32::from('e'));
        let e_acute = table.append(e, 0x0301); // combining acute accent
        assert_eq!(table.get(e_acute).as_slice(), &[u32::from('e'), 0x0301]);
        // the combining mark does not add width
        assert_eq!(table.width(e_acute), 1);
    }

    #[test]
    fn append_deduplicates_identical_sequences() {
        let mut table = SymbolTable::new();
        let e1 = table.make(u32::from('e'));
        let e2 = table.make(u32::from('e'));
        let combined1 = table.append(e1, 0x0301);
        let combined2 = table.append(e2, 0x0301);
        assert_eq!(combined1, combined2);
    }

    #[test]
    fn default_symbol_is_a_space() {
        let table = SymbolTable::new();
        assert_eq!(table.get(Symbol::DEFAULT).as_slice(), &[0x20]);
    }

    #[test]
    fn wide_base_symbol_reports_width_two() {
        let table = SymbolTable::new();
        let sym = table.make(0x4e2d); // 中
        assert_eq!(table.width(sym), 2);
    }
}
