//! The grid itself: cursor, margins, scrollback, alternate screen and
//! selection, all driven through plain method calls.

use std::collections::VecDeque;

use vtcore_symbols::{Symbol, SymbolTable, Ucs4};

use crate::attr::Attributes;
use crate::draw::ScreenDrawHandler;
use crate::error::{MarginsError, ResizeError};
use crate::line::Line;
use crate::opts::ScreenOpts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SavedCursor {
    x: usize,
    y: usize,
    attr: Attributes,
    wrap_pending: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Selection {
    start: Option<(usize, usize)>,
    target: Option<(usize, usize)>,
}

/// The 2D character grid: main and alternate screens, scrollback, cursor
/// and selection state.
///
/// A `Screen` does not parse escape sequences; `vtcore-vte` drives it.
pub struct Screen {
    width: usize,
    height: usize,
    main: Vec<Line>,
    alt: Vec<Line>,
    scrollback: VecDeque<Line>,
    max_sb: usize,
    sb_view_offset: usize,
    cursor_x: usize,
    cursor_y: usize,
    wrap_pending: bool,
    margin_top: usize,
    margin_bottom: usize,
    default_attr: Attributes,
    tabstops: Vec<bool>,
    opts: ScreenOpts,
    saved_cursor: Option<SavedCursor>,
    main_cursor_save: (usize, usize),
    sel: Selection,
    age: u64,
    symbols: SymbolTable,
}

fn default_tabstops(width: usize) -> Vec<bool> {
    (0..width).map(|col| col > 0 && col % 8 == 0).collect()
}

impl Screen {
    /// Create a new screen. Panics if `width` or `height` is zero, the way
    /// `libtsm`'s equivalent constructor simply refuses the call.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "screen dimensions must be non-zero");
        let default_attr = Attributes::default();
        Self {
            width,
            height,
            main: (0..height).map(|_| Line::blank(width, default_attr, 0)).collect(),
            alt: (0..height).map(|_| Line::blank(width, default_attr, 0)).collect(),
            scrollback: VecDeque::new(),
            max_sb: 0,
            sb_view_offset: 0,
            cursor_x: 0,
            cursor_y: 0,
            wrap_pending: false,
            margin_top: 0,
            margin_bottom: height - 1,
            default_attr,
            tabstops: default_tabstops(width),
            opts: ScreenOpts::default(),
            saved_cursor: None,
            main_cursor_save: (0, 0),
            sel: Selection::default(),
            age: 0,
            symbols: SymbolTable::new(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn cursor_x(&self) -> usize {
        self.cursor_x
    }

    #[must_use]
    pub fn cursor_y(&self) -> usize {
        self.cursor_y
    }

    #[must_use]
    pub fn opts(&self) -> ScreenOpts {
        self.opts
    }

    fn is_alt(&self) -> bool {
        self.opts.contains(ScreenOpts::ALTERNATE)
    }

    fn active(&self) -> &Vec<Line> {
        if self.is_alt() { &self.alt } else { &self.main }
    }

    fn active_mut(&mut self) -> &mut Vec<Line> {
        if self.is_alt() { &mut self.alt } else { &mut self.main }
    }

    fn bump_age(&mut self) -> u64 {
        self.age += 1;
        self.age
    }

    /// Resolve row `row` of the currently visible view (0-indexed from the
    /// top of the view, which may include scrolled-back history) to its
    /// backing `Line`, the same resolution [`Screen::draw`] and
    /// [`Screen::selection_copy`] both use.
    fn view_line(&self, row: usize) -> Option<&Line> {
        let sb_rows_shown = self.sb_view_offset.min(self.height);
        if row < sb_rows_shown {
            let sb_len = self.scrollback.len();
            self.scrollback.get(sb_len - self.sb_view_offset + row)
        } else {
            self.active().get(row - sb_rows_shown)
        }
    }

    // ---- options ----

    pub fn set_flags(&mut self, flags: ScreenOpts) {
        let entering_alt = flags.contains(ScreenOpts::ALTERNATE) && !self.is_alt();
        self.opts.insert(flags);
        if entering_alt {
            self.enter_alternate();
        }
    }

    pub fn reset_flags(&mut self, flags: ScreenOpts) {
        let leaving_alt = flags.contains(ScreenOpts::ALTERNATE) && self.is_alt();
        self.opts.remove(flags);
        if leaving_alt {
            self.leave_alternate();
        }
    }

    #[must_use]
    pub fn get_flags(&self) -> ScreenOpts {
        self.opts
    }

    fn enter_alternate(&mut self) {
        self.main_cursor_save = (self.cursor_x, self.cursor_y);
        let attr = self.default_attr;
        let age = self.bump_age();
        for line in &mut self.alt {
            line.clear(attr, age);
        }
        // the alternate screen is always entered blank, so the cursor
        // homes on every entry, not just the first.
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.wrap_pending = false;
    }

    fn leave_alternate(&mut self) {
        let resume = self.main_cursor_save;
        self.cursor_x = resume.0.min(self.width - 1);
        self.cursor_y = resume.1.min(self.height - 1);
        self.wrap_pending = false;
    }

    // ---- sizing ----

    /// Resize the screen. On a height shrink, rows pushed off the top of
    /// the main screen are preserved in scrollback rather than discarded
    /// (the alternate screen has no scrollback and simply loses them),
    /// matching libtsm's behavior. On a height grow, rows are pulled back
    /// out of scrollback to fill the newly visible space where available.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::ZeroSize`] if either dimension is zero.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), ResizeError> {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "rejecting resize to a zero dimension");
            return Err(ResizeError::ZeroSize);
        }
        tracing::trace!(old_width = self.width, old_height = self.height, width, height, "resizing screen");

        let attr = self.default_attr;
        let age = self.bump_age();

        for line in self.main.iter_mut().chain(self.alt.iter_mut()).chain(self.scrollback.iter_mut()) {
            line.resize(width, attr, age);
        }

        Self::resize_rows_with_scrollback(&mut self.main, &mut self.scrollback, self.max_sb, width, height, attr, age);
        Self::resize_rows_discarding(&mut self.alt, width, height, attr, age);

        self.width = width;
        self.height = height;
        self.margin_top = 0;
        self.margin_bottom = height - 1;
        self.tabstops = default_tabstops(width);
        self.cursor_x = self.cursor_x.min(width - 1);
        self.cursor_y = self.cursor_y.min(height - 1);
        self.wrap_pending = false;
        self.sb_view_offset = self.sb_view_offset.min(self.scrollback.len());

        Ok(())
    }

    fn resize_rows_with_scrollback(
        rows: &mut Vec<Line>,
        scrollback: &mut VecDeque<Line>,
        max_sb: usize,
        width: usize,
        height: usize,
        attr: Attributes,
        age: u64,
    ) {
        match height.cmp(&rows.len()) {
            std::cmp::Ordering::Less => {
                let overflow = rows.len() - height;
                for line in rows.drain(0..overflow) {
                    scrollback.push_back(line);
                }
                if max_sb > 0 {
                    while scrollback.len() > max_sb {
                        scrollback.pop_front();
                    }
                }
            }
            std::cmp::Ordering::Greater => {
                let mut needed = height - rows.len();
                let mut pulled = Vec::new();
                while needed > 0 {
                    match scrollback.pop_back() {
                        Some(line) => {
                            pulled.push(line);
                            needed -= 1;
                        }
                        None => break,
                    }
                }
                pulled.reverse();
                for line in pulled {
                    rows.insert(0, line);
                }
                while rows.len() < height {
                    rows.push(Line::blank(width, attr, age));
                }
            }
            std::cmp::Ordering::Equal => {}
        }
    }

    fn resize_rows_discarding(
        rows: &mut Vec<Line>,
        width: usize,
        height: usize,
        attr: Attributes,
        age: u64,
    ) {
        if height < rows.len() {
            let overflow = rows.len() - height;
            rows.drain(0..overflow);
        } else {
            while rows.len() < height {
                rows.push(Line::blank(width, attr, age));
            }
        }
    }

    /// Set the scrolling region, 0-indexed and inclusive on both ends.
    ///
    /// # Errors
    ///
    /// Returns [`MarginsError::InvalidRange`] if `top >= bottom` or either
    /// bound is outside the screen.
    pub fn set_margins(&mut self, top: usize, bottom: usize) -> Result<(), MarginsError> {
        if top >= bottom || bottom >= self.height {
            tracing::debug!(top, bottom, height = self.height, "rejecting invalid scrolling region");
            return Err(MarginsError::InvalidRange { top, bottom });
        }
        self.margin_top = top;
        self.margin_bottom = bottom;
        Ok(())
    }

    #[must_use]
    pub fn margins(&self) -> (usize, usize) {
        (self.margin_top, self.margin_bottom)
    }

    pub fn set_def_attr(&mut self, attr: Attributes) {
        self.default_attr = attr;
    }

    #[must_use]
    pub fn def_attr(&self) -> Attributes {
        self.default_attr
    }

    /// Soft reset: clears the grid and cursor/margin/tabstop state but
    /// leaves scrollback intact. See [`Screen::clear_sb`] for the
    /// additional step a hard reset performs.
    pub fn reset(&mut self) {
        let attr = Attributes::default();
        let age = self.bump_age();
        for line in self.main.iter_mut().chain(self.alt.iter_mut()) {
            line.clear(attr, age);
        }
        self.default_attr = attr;
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.wrap_pending = false;
        self.margin_top = 0;
        self.margin_bottom = self.height - 1;
        self.tabstops = default_tabstops(self.width);
        self.opts = ScreenOpts::default();
        self.saved_cursor = None;
        self.main_cursor_save = (0, 0);
        self.sel = Selection::default();
    }

    // ---- tab stops ----

    pub fn set_tabstop(&mut self) {
        if let Some(slot) = self.tabstops.get_mut(self.cursor_x) {
            *slot = true;
        }
    }

    pub fn reset_tabstop(&mut self) {
        if let Some(slot) = self.tabstops.get_mut(self.cursor_x) {
            *slot = false;
        }
    }

    pub fn reset_all_tabstops(&mut self) {
        for slot in &mut self.tabstops {
            *slot = false;
        }
    }

    pub fn tab_right(&mut self, num: usize) {
        for _ in 0..num.max(1) {
            match self.tabstops[self.cursor_x + 1..].iter().position(|&set| set) {
                Some(offset) => self.cursor_x += offset + 1,
                None => {
                    self.cursor_x = self.width - 1;
                    break;
                }
            }
        }
        self.wrap_pending = false;
    }

    pub fn tab_left(&mut self, num: usize) {
        for _ in 0..num.max(1) {
            match self.tabstops[..self.cursor_x].iter().rposition(|&set| set) {
                Some(pos) => self.cursor_x = pos,
                None => {
                    self.cursor_x = 0;
                    break;
                }
            }
        }
        self.wrap_pending = false;
    }

    // ---- cursor motion ----

    pub fn move_to(&mut self, x: usize, y: usize) {
        let (top, bottom) = if self.opts.contains(ScreenOpts::REL_ORIGIN) {
            (self.margin_top, self.margin_bottom)
        } else {
            (0, self.height - 1)
        };
        self.cursor_x = x.min(self.width - 1);
        self.cursor_y = (top + y).clamp(top, bottom);
        self.wrap_pending = false;
    }

    pub fn move_up(&mut self, num: usize, scroll: bool) {
        let num = num.max(1);
        if self.cursor_y >= self.margin_top + num {
            self.cursor_y -= num;
        } else {
            let overflow = num - (self.cursor_y - self.margin_top);
            self.cursor_y = self.margin_top;
            if scroll {
                self.scroll_down(overflow);
            }
        }
        self.wrap_pending = false;
    }

    pub fn move_down(&mut self, num: usize, scroll: bool) {
        let num = num.max(1);
        if self.cursor_y + num <= self.margin_bottom {
            self.cursor_y += num;
        } else {
            let overflow = num - (self.margin_bottom - self.cursor_y);
            self.cursor_y = self.margin_bottom;
            if scroll {
                self.scroll_up(overflow);
            }
        }
        self.wrap_pending = false;
    }

    pub fn move_left(&mut self, num: usize) {
        self.cursor_x = self.cursor_x.saturating_sub(num.max(1));
        self.wrap_pending = false;
    }

    pub fn move_right(&mut self, num: usize) {
        self.cursor_x = (self.cursor_x + num.max(1)).min(self.width - 1);
        self.wrap_pending = false;
    }

    pub fn move_line_home(&mut self) {
        self.cursor_x = 0;
        self.wrap_pending = false;
    }

    pub fn move_line_end(&mut self) {
        self.cursor_x = self.width - 1;
        self.wrap_pending = false;
    }

    pub fn newline(&mut self) {
        self.cursor_x = 0;
        self.move_down(1, true);
    }

    // ---- scrolling ----

    /// Scroll the margin region up by `num` rows; rows leaving the top of
    /// the region are appended to scrollback, but only when the region's
    /// top coincides with row 0 of the screen (a `DECSTBM`-restricted
    /// region scroll never touches scrollback, matching real terminals).
    pub fn scroll_up(&mut self, num: usize) {
        let num = num.max(1).min(self.margin_bottom - self.margin_top + 1);
        let attr = self.default_attr;
        let age = self.bump_age();
        let push_to_sb = self.margin_top == 0 && !self.is_alt();
        let (top, bottom, width) = (self.margin_top, self.margin_bottom, self.width);
        let max_sb = self.max_sb;

        let rows = self.active_mut();
        for _ in 0..num {
            let removed = rows.remove(top);
            if push_to_sb {
                self.scrollback.push_back(removed);
            }
            let rows = self.active_mut();
            rows.insert(bottom, Line::blank(width, attr, age));
        }
        if push_to_sb && max_sb > 0 {
            while self.scrollback.len() > max_sb {
                self.scrollback.pop_front();
            }
        }
    }

    /// Scroll the margin region down by `num` rows, discarding overflow at
    /// the bottom and inserting blank rows at the top of the region.
    pub fn scroll_down(&mut self, num: usize) {
        let num = num.max(1).min(self.margin_bottom - self.margin_top + 1);
        let attr = self.default_attr;
        let age = self.bump_age();
        let (top, bottom, width) = (self.margin_top, self.margin_bottom, self.width);
        let rows = self.active_mut();
        for _ in 0..num {
            rows.remove(bottom);
            rows.insert(top, Line::blank(width, attr, age));
        }
    }

    // ---- writing ----

    /// Write one decoded code point at the cursor, advancing it.
    ///
    /// A zero-width code point (e.g. a combining mark arriving without a
    /// preceding call to [`Screen::combine`] being possible, such as at the
    /// very start of a line) is placed as its own cell rather than
    /// silently dropped.
    pub fn write(&mut self, ucs4: Ucs4, attr: Attributes) {
        if self.wrap_pending {
            self.wrap_pending = false;
            self.newline();
        }

        let width = vtcore_symbols::width::width(ucs4).max(1);
        let symbol = self.symbols.make(ucs4);
        let age = self.bump_age();

        if self.opts.contains(ScreenOpts::INSERT_MODE) {
            self.shift_right_from_cursor(width);
        }

        let (x, y) = (self.cursor_x, self.cursor_y);
        let line_width = self.width;
        if let Some(cell) = self.active_mut()[y].get_mut(x) {
            cell.symbol = symbol;
            cell.attr = attr;
            cell.age = age;
        }
        if width == 2 && x + 1 < line_width {
            if let Some(cell) = self.active_mut()[y].get_mut(x + 1) {
                cell.symbol = Symbol::WIDE_PLACEHOLDER;
                cell.attr = attr;
                cell.age = age;
            }
        }

        if self.cursor_x + width >= self.width {
            if self.opts.contains(ScreenOpts::AUTO_WRAP) {
                self.cursor_x = self.width - 1;
                self.wrap_pending = true;
            } else {
                self.cursor_x = self.width - 1;
            }
        } else {
            self.cursor_x += width;
        }
    }

    /// Append a combining mark to the most recently written cell.
    pub fn combine(&mut self, ucs4: Ucs4) {
        let (x, y) = (self.cursor_x.saturating_sub(1), self.cursor_y);
        let Some(cell) = self.active_mut()[y].get_mut(x) else {
            return;
        };
        let sym = cell.symbol;
        let combined = self.symbols.append(sym, ucs4);
        self.active_mut()[y].get_mut(x).unwrap().symbol = combined;
    }

    fn shift_right_from_cursor(&mut self, by: usize) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        let attr = self.default_attr;
        let age = self.age;
        let line = &mut self.active_mut()[y];
        let width = line.width();
        let cells = line.cells_mut();
        let mut i = width;
        while i > x + by {
            cells[i - 1] = cells[i - 1 - by];
            i -= 1;
        }
        for cell in &mut cells[x..(x + by).min(width)] {
            cell.symbol = Symbol::DEFAULT;
            cell.attr = attr;
            cell.age = age;
        }
    }

    // ---- insert/delete ----

    pub fn insert_lines(&mut self, num: usize) {
        if self.cursor_y < self.margin_top || self.cursor_y > self.margin_bottom {
            return;
        }
        let num = num.max(1).min(self.margin_bottom - self.cursor_y + 1);
        let attr = self.default_attr;
        let age = self.bump_age();
        let (y, bottom, width) = (self.cursor_y, self.margin_bottom, self.width);
        let rows = self.active_mut();
        for _ in 0..num {
            rows.remove(bottom);
            rows.insert(y, Line::blank(width, attr, age));
        }
    }

    pub fn delete_lines(&mut self, num: usize) {
        if self.cursor_y < self.margin_top || self.cursor_y > self.margin_bottom {
            return;
        }
        let num = num.max(1).min(self.margin_bottom - self.cursor_y + 1);
        let attr = self.default_attr;
        let age = self.bump_age();
        let (y, bottom, width) = (self.cursor_y, self.margin_bottom, self.width);
        let rows = self.active_mut();
        for _ in 0..num {
            rows.remove(y);
            rows.insert(bottom, Line::blank(width, attr, age));
        }
    }

    pub fn insert_chars(&mut self, num: usize) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        let attr = self.default_attr;
        let age = self.bump_age();
        let line = &mut self.active_mut()[y];
        let width = line.width();
        let num = num.max(1).min(width.saturating_sub(x));
        let cells = line.cells_mut();
        let mut i = width;
        while i > x + num {
            cells[i - 1] = cells[i - 1 - num];
            i -= 1;
        }
        for cell in &mut cells[x..x + num] {
            cell.symbol = Symbol::DEFAULT;
            cell.attr = attr;
            cell.age = age;
        }
    }

    pub fn delete_chars(&mut self, num: usize) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        let attr = self.default_attr;
        let age = self.bump_age();
        let line = &mut self.active_mut()[y];
        let width = line.width();
        let num = num.max(1).min(width.saturating_sub(x));
        let cells = line.cells_mut();
        for i in x..width - num {
            cells[i] = cells[i + num];
        }
        for cell in &mut cells[width - num..] {
            cell.symbol = Symbol::DEFAULT;
            cell.attr = attr;
            cell.age = age;
        }
    }

    // ---- erasing ----

    fn erase_range(&mut self, y: usize, from: usize, to_exclusive: usize, protect: bool) {
        let attr = self.default_attr;
        let age = self.bump_age();
        let line = &mut self.active_mut()[y];
        for cell in &mut line.cells_mut()[from..to_exclusive] {
            if protect && cell.attr.protect {
                continue;
            }
            cell.symbol = Symbol::DEFAULT;
            cell.attr = attr;
            cell.age = age;
        }
    }

    pub fn erase_cursor(&mut self) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        self.erase_range(y, x, x + 1, false);
    }

    pub fn erase_chars(&mut self, num: usize) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        let width = self.width;
        self.erase_range(y, x, (x + num.max(1)).min(width), false);
    }

    pub fn erase_cursor_to_end(&mut self, protect: bool) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        let width = self.width;
        self.erase_range(y, x, width, protect);
    }

    pub fn erase_home_to_cursor(&mut self, protect: bool) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        self.erase_range(y, 0, x + 1, protect);
    }

    pub fn erase_current_line(&mut self, protect: bool) {
        let y = self.cursor_y;
        let width = self.width;
        self.erase_range(y, 0, width, protect);
    }

    pub fn erase_screen_to_cursor(&mut self, protect: bool) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        let width = self.width;
        for row in 0..y {
            self.erase_range(row, 0, width, protect);
        }
        self.erase_range(y, 0, x + 1, protect);
    }

    pub fn erase_cursor_to_screen(&mut self, protect: bool) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        let (width, height) = (self.width, self.height);
        self.erase_range(y, x, width, protect);
        for row in y + 1..height {
            self.erase_range(row, 0, width, protect);
        }
    }

    pub fn erase_screen(&mut self, protect: bool) {
        let (width, height) = (self.width, self.height);
        for row in 0..height {
            self.erase_range(row, 0, width, protect);
        }
    }

    // ---- scrollback ----

    pub fn set_max_sb(&mut self, limit: usize) {
        self.max_sb = limit;
        if limit > 0 {
            while self.scrollback.len() > limit {
                self.scrollback.pop_front();
            }
        }
    }

    pub fn clear_sb(&mut self) {
        self.scrollback.clear();
        self.sb_view_offset = 0;
    }

    #[must_use]
    pub fn scrollback_is_empty(&self) -> bool {
        self.scrollback.is_empty()
    }

    pub fn sb_up(&mut self, num: usize) {
        self.sb_view_offset = (self.sb_view_offset + num).min(self.scrollback.len());
    }

    pub fn sb_down(&mut self, num: usize) {
        self.sb_view_offset = self.sb_view_offset.saturating_sub(num);
    }

    pub fn sb_page_up(&mut self, num: usize) {
        self.sb_up(num.max(1) * self.height);
    }

    pub fn sb_page_down(&mut self, num: usize) {
        self.sb_down(num.max(1) * self.height);
    }

    pub fn sb_reset(&mut self) {
        self.sb_view_offset = 0;
    }

    // ---- selection ----

    pub fn selection_reset(&mut self) {
        self.sel = Selection::default();
    }

    pub fn selection_start(&mut self, posx: usize, posy: usize) {
        self.sel.start = Some((posx, posy));
        self.sel.target = Some((posx, posy));
    }

    pub fn selection_target(&mut self, posx: usize, posy: usize) {
        self.sel.target = Some((posx, posy));
    }

    /// Copy the text between the selection's start and target, inclusive,
    /// in reading order. Rows are resolved through the same view as
    /// [`Screen::draw`], so a selection that spans scrolled-back history
    /// reads from scrollback rather than just the active screen. Trailing
    /// spaces on each line are trimmed and every line, including the last,
    /// gets a trailing newline.
    #[must_use]
    pub fn selection_copy(&self) -> Option<String> {
        let (start, target) = (self.sel.start?, self.sel.target?);
        let (mut a, mut b) = (start, target);
        if (a.1, a.0) > (b.1, b.0) {
            std::mem::swap(&mut a, &mut b);
        }

        let mut out = String::new();
        for y in a.1..=b.1 {
            let Some(line) = self.view_line(y) else { continue };
            let row_start = if y == a.1 { a.0 } else { 0 };
            let row_end = if y == b.1 { b.0 } else { line.width().saturating_sub(1) };

            let mut row_text = String::new();
            for x in row_start..=row_end.min(line.width().saturating_sub(1)) {
                let Some(cell) = line.get(x) else { continue };
                if cell.symbol.is_wide_placeholder() {
                    continue;
                }
                for cp in self.symbols.get(cell.symbol) {
                    if let Some(ch) = char::from_u32(cp) {
                        row_text.push(ch);
                    }
                }
            }
            out.push_str(row_text.trim_end_matches(' '));
            out.push('\n');
        }
        Some(out)
    }

    // ---- drawing ----

    /// Iterate the currently visible view (which may be scrolled back into
    /// history) calling `handler` for every cell in row-major order.
    ///
    /// The right-hand placeholder of a wide cell is never dispatched.
    /// [`crate::ScreenOpts::INVERSE`] flips every cell's colors before
    /// dispatch; unless [`crate::ScreenOpts::HIDE_CURSOR`] is set, the cell
    /// under the cursor is flipped a second time on top of that, so it
    /// reads as highlighted regardless of the screen-wide inverse state.
    pub fn draw(&self, handler: &mut impl ScreenDrawHandler) {
        handler.prepare();

        let sb_rows_shown = self.sb_view_offset.min(self.height);
        let screen_inverse = self.opts.contains(ScreenOpts::INVERSE);
        let cursor_visible = !self.opts.contains(ScreenOpts::HIDE_CURSOR);
        let cursor_row = sb_rows_shown + self.cursor_y;

        for row in 0..self.height {
            let Some(line) = self.view_line(row) else { continue };
            for (col, cell) in line.cells().iter().enumerate() {
                if cell.symbol.is_wide_placeholder() {
                    continue;
                }
                let codepoints = self.symbols.get(cell.symbol);
                let width = self.symbols.width(cell.symbol);
                let mut attr = cell.attr;
                if screen_inverse {
                    attr.inverse = !attr.inverse;
                }
                if cursor_visible && row == cursor_row && col == self.cursor_x {
                    attr.inverse = !attr.inverse;
                }
                handler.draw_cell(cell.symbol, &codepoints, width, col, row, &attr);
            }
        }

        handler.render();
    }

    // ---- save/restore cursor (DECSC/DECRC) ----

    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(SavedCursor {
            x: self.cursor_x,
            y: self.cursor_y,
            attr: self.default_attr,
            wrap_pending: self.wrap_pending,
        });
    }

    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved_cursor {
            self.cursor_x = saved.x.min(self.width - 1);
            self.cursor_y = saved.y.min(self.height - 1);
            self.default_attr = saved.attr;
            self.wrap_pending = saved.wrap_pending;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_str(screen: &mut Screen, s: &str) {
        for ch in s.chars() {
            screen.write(u32::from(ch), Attributes::default());
        }
    }

    #[test]
    fn write_advances_cursor() {
        let mut screen = Screen::new(10, 5);
        write_str(&mut screen, "ab");
        assert_eq!(screen.cursor_x(), 2);
        assert_eq!(screen.cursor_y(), 0);
    }

    #[test]
    fn auto_wrap_defers_to_next_write() {
        let mut screen = Screen::new(3, 3);
        write_str(&mut screen, "abc");
        assert_eq!(screen.cursor_x(), 2);
        assert_eq!(screen.cursor_y(), 0);
        write_str(&mut screen, "d");
        assert_eq!(screen.cursor_y(), 1);
        assert_eq!(screen.cursor_x(), 1);
    }

    #[test]
    fn newline_scrolls_main_screen_into_scrollback() {
        let mut screen = Screen::new(4, 2);
        write_str(&mut screen, "one");
        screen.newline();
        write_str(&mut screen, "two");
        screen.newline();
        write_str(&mut screen, "three");
        // three newlines from a 2-row screen pushes the first row into
        // scrollback.
        assert!(screen.scrollback.len() >= 1);
    }

    #[test]
    fn resize_shrink_height_preserves_overflow_in_scrollback() {
        let mut screen = Screen::new(4, 4);
        for i in 0..4 {
            write_str(&mut screen, &format!("{i}"));
            screen.newline();
        }
        screen.resize(4, 2).unwrap();
        assert_eq!(screen.height(), 2);
        assert!(!screen.scrollback.is_empty());
    }

    #[test]
    fn resize_rejects_zero_dimensions() {
        let mut screen = Screen::new(4, 4);
        assert!(screen.resize(0, 4).is_err());
    }

    #[test]
    fn insert_mode_shifts_existing_cells_right() {
        let mut screen = Screen::new(5, 1);
        write_str(&mut screen, "abc");
        screen.move_to(0, 0);
        screen.set_flags(ScreenOpts::INSERT_MODE);
        write_str(&mut screen, "X");
        let mut collected = Vec::new();
        struct Collect<'a>(&'a mut Vec<char>);
        impl ScreenDrawHandler for Collect<'_> {
            fn draw_cell(&mut self, _id: vtcore_symbols::Symbol, cps: &[u32], _w: u8, _c: usize, _r: usize, _a: &Attributes) {
                self.0.push(cps.first().copied().and_then(char::from_u32).unwrap_or(' '));
            }
        }
        let mut out = Vec::new();
        screen.draw(&mut Collect(&mut out));
        collected.extend(out);
        assert_eq!(collected, vec!['X', 'a', 'b', 'c', ' ']);
    }

    #[test]
    fn erase_current_line_respects_protect_flag() {
        let mut screen = Screen::new(4, 1);
        let mut protected_attr = Attributes::default();
        protected_attr.protect = true;
        screen.write(u32::from('a'), protected_attr);
        screen.write(u32::from('b'), Attributes::default());
        screen.move_to(0, 0);
        screen.erase_current_line(true);

        struct Collect<'a>(&'a mut Vec<char>);
        impl ScreenDrawHandler for Collect<'_> {
            fn draw_cell(&mut self, _id: vtcore_symbols::Symbol, cps: &[u32], _w: u8, _c: usize, _r: usize, _a: &Attributes) {
                self.0.push(cps.first().copied().and_then(char::from_u32).unwrap_or(' '));
            }
        }
        let mut out = Vec::new();
        screen.draw(&mut Collect(&mut out));
        assert_eq!(out[0], 'a');
        assert_eq!(out[1], ' ');
    }

    #[test]
    fn draw_skips_wide_right_placeholder_cells() {
        let mut screen = Screen::new(4, 1);
        screen.write(0x4e2d, Attributes::default()); // 中, width 2

        struct Collect<'a>(&'a mut Vec<(vtcore_symbols::Symbol, usize)>);
        impl ScreenDrawHandler for Collect<'_> {
            fn draw_cell(
                &mut self,
                id: vtcore_symbols::Symbol,
                _cps: &[u32],
                _w: u8,
                col: usize,
                _r: usize,
                _a: &Attributes,
            ) {
                self.0.push((id, col));
            }
        }
        let mut out = Vec::new();
        screen.draw(&mut Collect(&mut out));
        let cols: Vec<usize> = out.iter().map(|(_, c)| *c).collect();
        assert_eq!(cols, vec![0, 2, 3]);
    }

    #[test]
    fn draw_flips_inverse_attr_screen_wide_when_inverse_option_set() {
        let mut screen = Screen::new(2, 1);
        screen.set_flags(ScreenOpts::HIDE_CURSOR);
        write_str(&mut screen, "a");
        screen.set_flags(ScreenOpts::INVERSE);

        struct Collect<'a>(&'a mut Vec<bool>);
        impl ScreenDrawHandler for Collect<'_> {
            fn draw_cell(
                &mut self,
                _id: vtcore_symbols::Symbol,
                _cps: &[u32],
                _w: u8,
                _c: usize,
                _r: usize,
                attr: &Attributes,
            ) {
                self.0.push(attr.inverse);
            }
        }
        let mut out = Vec::new();
        screen.draw(&mut Collect(&mut out));
        assert!(out.iter().all(|&inv| inv));
    }

    #[test]
    fn draw_highlights_cursor_cell_unless_hidden() {
        let mut screen = Screen::new(3, 1);
        write_str(&mut screen, "ab");
        screen.move_to(0, 0);

        struct Collect<'a>(&'a mut Vec<bool>);
        impl ScreenDrawHandler for Collect<'_> {
            fn draw_cell(
                &mut self,
                _id: vtcore_symbols::Symbol,
                _cps: &[u32],
                _w: u8,
                col: usize,
                _r: usize,
                attr: &Attributes,
            ) {
                if col == 0 {
                    self.0.push(attr.inverse);
                }
            }
        }
        let mut out = Vec::new();
        screen.draw(&mut Collect(&mut out));
        assert_eq!(out, vec![true]);

        screen.set_flags(ScreenOpts::HIDE_CURSOR);
        let mut out = Vec::new();
        screen.draw(&mut Collect(&mut out));
        assert_eq!(out, vec![false]);
    }

    #[test]
    fn selection_copy_returns_text_between_start_and_target() {
        let mut screen = Screen::new(10, 2);
        write_str(&mut screen, "hello");
        screen.selection_start(0, 0);
        screen.selection_target(4, 0);
        assert_eq!(screen.selection_copy().as_deref(), Some("hello\n"));
    }

    #[test]
    fn selection_copy_trims_trailing_spaces_on_each_line() {
        let mut screen = Screen::new(10, 1);
        write_str(&mut screen, "hi");
        screen.selection_start(0, 0);
        screen.selection_target(9, 0);
        assert_eq!(screen.selection_copy().as_deref(), Some("hi\n"));
    }

    #[test]
    fn selection_copy_reads_scrolled_back_lines_when_selection_spans_the_view() {
        let mut screen = Screen::new(4, 2);
        screen.set_max_sb(10);
        write_str(&mut screen, "one");
        screen.newline();
        write_str(&mut screen, "two");
        screen.newline();
        write_str(&mut screen, "thr");
        // "one" has scrolled into scrollback; scroll the view up by one row
        // so it's showing ["one", "two"] again.
        screen.sb_up(1);
        screen.selection_start(0, 0);
        screen.selection_target(2, 1);
        assert_eq!(screen.selection_copy().as_deref(), Some("one\ntwo\n"));
    }

    #[test]
    fn alternate_screen_swap_restores_main_cursor() {
        let mut screen = Screen::new(4, 4);
        write_str(&mut screen, "ab");
        screen.set_flags(ScreenOpts::ALTERNATE);
        assert_eq!(screen.cursor_x(), 0);
        write_str(&mut screen, "zzz");
        screen.reset_flags(ScreenOpts::ALTERNATE);
        assert_eq!(screen.cursor_x(), 2);
    }

    #[test]
    fn re_entering_alternate_screen_homes_cursor_instead_of_resuming_stale_position() {
        let mut screen = Screen::new(10, 10);
        screen.move_to(5, 3);
        screen.set_flags(ScreenOpts::ALTERNATE);
        assert_eq!((screen.cursor_x(), screen.cursor_y()), (0, 0));
        screen.reset_flags(ScreenOpts::ALTERNATE);
        assert_eq!((screen.cursor_x(), screen.cursor_y()), (5, 3));
        screen.set_flags(ScreenOpts::ALTERNATE);
        assert_eq!((screen.cursor_x(), screen.cursor_y()), (0, 0));
    }

    #[test]
    fn combine_appends_mark_to_previous_cell() {
        let mut screen = Screen::new(4, 1);
        screen.write(u32::from('e'), Attributes::default());
        screen.combine(0x0301); // combining acute accent
        screen.selection_start(0, 0);
        screen.selection_target(0, 0);
        assert_eq!(screen.selection_copy().as_deref(), Some("e\u{301}\n"));
    }
}
