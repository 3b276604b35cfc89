//! The VTE parser state machine: turns a host-output byte stream into
//! calls against a [`vtcore_screen::Screen`], and accumulates any reply
//! bytes (device reports, answerback) the host must write back.
//!
//! Grounded on the teacher's `vtio::parser::output::TerminalOutputParser`:
//! a `ParserState` wrapping the lower-level `vt-push-parser` tokenizer,
//! fed through `feed_with`. Where the teacher dispatches typed `AnsiEvent`s
//! through a derive-macro-driven trie registry, this crate dispatches CSI/
//! ESC/OSC/DCS directly into `Screen` method calls via a plain `match` on
//! final byte, private marker and intermediates (see DESIGN.md).

use vt_push_parser::event::{CSI, DCSOwned, Esc};
use vt_push_parser::{VT_PARSER_INTEREST_ALL, VTPushParser};

use vtcore_charset::{Charset, CharsetState, Register};
use vtcore_encode::{write_csi, write_osc};
use vtcore_screen::{Attributes, Screen, ScreenOpts};
use vtcore_symbols::Utf8Machine;

use crate::modes::VteModes;
use crate::palette::Palette;
use crate::params::Params;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum CaptureMode {
    #[default]
    None,
    Osc,
    Dcs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VteSavedState {
    x: usize,
    y: usize,
    attr: Attributes,
    origin_mode: bool,
    auto_wrap: bool,
    charset: CharsetState,
}

/// Drives a [`Screen`] from a byte stream of host output.
///
/// Owns the screen outright rather than holding a refcounted pointer to an
/// externally shared one the way `tsm_vte` does — see DESIGN.md for why.
pub struct Vte {
    screen: Screen,
    tokenizer: VTPushParser<VT_PARSER_INTEREST_ALL>,

    charset_main: CharsetState,
    charset_alt: CharsetState,
    current_attr: Attributes,
    modes: VteModes,
    palette: Palette,
    saved: Option<VteSavedState>,

    utf8: Utf8Machine,
    capture_mode: CaptureMode,
    capture_buffer: Vec<u8>,
    dcs_header: Option<DCSOwned>,
}

impl Vte {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            screen: Screen::new(width, height),
            tokenizer: VTPushParser::new_with_interest::<VT_PARSER_INTEREST_ALL>(),
            charset_main: CharsetState::new(),
            charset_alt: CharsetState::new(),
            current_attr: Attributes::default(),
            modes: VteModes::default(),
            palette: Palette::default(),
            saved: None,
            utf8: Utf8Machine::new(),
            capture_mode: CaptureMode::None,
            capture_buffer: Vec::new(),
            dcs_header: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    #[must_use]
    pub fn modes(&self) -> VteModes {
        self.modes
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    fn charset(&mut self) -> &mut CharsetState {
        if self.screen.opts().contains(ScreenOpts::ALTERNATE) {
            &mut self.charset_alt
        } else {
            &mut self.charset_main
        }
    }

    /// Feed a chunk of host output. Any reply bytes the host must write
    /// back (device reports, answerback) are appended to `reply`.
    pub fn feed(&mut self, input: &[u8], reply: &mut Vec<u8>) {
        let mut events = Vec::new();
        self.tokenizer.feed_with(input, |event| events.push(event));
        for event in events {
            self.process_event(&event, reply);
        }
    }

    fn process_event(&mut self, event: &vt_push_parser::event::VTEvent, reply: &mut Vec<u8>) {
        use vt_push_parser::event::VTEvent;

        match event {
            VTEvent::Raw(bytes) => self.feed_utf8(bytes),
            VTEvent::C0(byte) => self.dispatch_c0(*byte),
            VTEvent::Csi(csi) => self.dispatch_csi(csi, reply),
            VTEvent::Esc(esc) => self.dispatch_esc(*esc),
            VTEvent::EscInvalid(esc) => {
                tracing::debug!(?esc, "unrecognized ESC sequence");
            }
            // SS2 is primarily meaningful on the input (keyboard) side;
            // on output it designates a single GL character from G2, which
            // real hosts essentially never send, so it is only logged.
            VTEvent::Ss2(_) => tracing::debug!("ignoring SS2 in host output"),
            VTEvent::Ss3(ss3) => self.write_shifted(Register::G3, ss3.char),
            VTEvent::OscStart => {
                self.capture_buffer.clear();
                self.capture_mode = CaptureMode::Osc;
            }
            VTEvent::OscCancel => {
                self.capture_buffer.clear();
                self.capture_mode = CaptureMode::None;
            }
            VTEvent::OscData(data) => {
                if self.capture_mode == CaptureMode::Osc {
                    self.capture_buffer.extend_from_slice(data);
                }
            }
            VTEvent::OscEnd { data, .. } => {
                self.capture_buffer.extend_from_slice(data);
                self.capture_mode = CaptureMode::None;
                let osc = std::mem::take(&mut self.capture_buffer);
                self.dispatch_osc(&osc, reply);
            }
            VTEvent::DcsStart(dcs) => {
                self.dcs_header = Some(DCSOwned {
                    private: dcs.private,
                    params: dcs.params.to_owned(),
                    intermediates: dcs.intermediates,
                    final_byte: dcs.final_byte,
                });
                self.capture_buffer.clear();
                self.capture_mode = CaptureMode::Dcs;
            }
            VTEvent::DcsCancel => {
                self.dcs_header = None;
                self.capture_buffer.clear();
                self.capture_mode = CaptureMode::None;
            }
            VTEvent::DcsData(data) => {
                if self.capture_mode == CaptureMode::Dcs {
                    self.capture_buffer.extend_from_slice(data);
                }
            }
            VTEvent::DcsEnd(data) => {
                self.capture_buffer.extend_from_slice(data);
                let dcs_data = std::mem::take(&mut self.capture_buffer);
                if self.dcs_header.take().is_some() {
                    tracing::debug!(len = dcs_data.len(), "ignoring unrecognized DCS sequence");
                }
                self.capture_mode = CaptureMode::None;
            }
        }
    }

    // ---- text ----

    fn feed_utf8(&mut self, bytes: &[u8]) {
        // `vt-push-parser` hands us raw bytes between control sequences as
        // they arrive, which may split a multi-byte UTF-8 sequence across
        // two `feed` calls; `self.utf8` carries partial-sequence state
        // across those calls the way `vt-push-parser` itself carries
        // partial-escape-sequence state.
        use vtcore_symbols::Utf8State;

        for &byte in bytes {
            match self.utf8.feed(byte) {
                Utf8State::Accept => {
                    let ucs4 = self.utf8.get();
                    self.write_codepoint(ucs4);
                }
                Utf8State::Reject => {
                    self.write_codepoint(vtcore_symbols::ucs4::REPLACEMENT);
                }
                Utf8State::Start | Utf8State::Expect1 | Utf8State::Expect2 | Utf8State::Expect3 => {}
            }
        }
    }

    fn write_codepoint(&mut self, ucs4: vtcore_symbols::Ucs4) {
        // GL translation only applies to the 0x20..=0x7f range; anything
        // decoded from a multi-byte UTF-8 sequence passes through
        // untranslated.
        let translated = if (0x20..=0x7f).contains(&ucs4) {
            self.charset().translate(u8::try_from(ucs4).unwrap())
        } else {
            ucs4
        };
        let width = vtcore_symbols::width::width(translated);
        let attr = self.current_attr;
        if width == 0 {
            self.screen.combine(translated);
        } else {
            self.screen.write(translated, attr);
        }
    }

    fn write_shifted(&mut self, register: Register, byte: u8) {
        let charset = self.charset();
        charset.single_shift(register);
        let cp = charset.translate(byte);
        let attr = self.current_attr;
        self.screen.write(cp, attr);
    }

    // ---- C0 ----

    fn dispatch_c0(&mut self, byte: u8) {
        match byte {
            0x07 => {} // BEL: no-op without an audible/visual bell hook
            0x08 => self.screen.move_left(1),      // BS
            0x09 => self.screen.tab_right(1),      // HT
            0x0a | 0x0b | 0x0c => self.screen.newline(), // LF/VT/FF
            0x0d => self.screen.move_line_home(),  // CR
            0x0e => self.charset().lock_shift(Register::G1), // SO
            0x0f => self.charset().lock_shift(Register::G0), // SI
            0x18 | 0x1a => {
                // CAN/SUB: abort any in-progress sequence and resync.
                self.capture_buffer.clear();
                self.capture_mode = CaptureMode::None;
                self.dcs_header = None;
            }
            _ => {}
        }
    }

    // ---- ESC ----

    fn dispatch_esc(&mut self, esc: Esc) {
        let intermediates = esc.intermediates.as_ref();
        match (esc.private, intermediates, esc.final_byte) {
            (None, [], b'D') => self.screen.move_down(1, true),  // IND
            (None, [], b'M') => self.screen.move_up(1, true),    // RI
            (None, [], b'E') => self.screen.newline(),           // NEL
            (None, [], b'H') => self.screen.set_tabstop(),       // HTS
            (None, [], b'7') => self.decsc(),
            (None, [], b'8') => self.decrc(),
            (None, [], b'c') => self.hard_reset(),                // RIS
            (None, [], b'=') => self.modes.app_keypad = true,     // DECPAM
            (None, [], b'>') => self.modes.app_keypad = false,    // DECPNM
            (None, [b'#'], b'8') => self.decaln(),
            (None, [b'('], final_byte) => self.designate(Register::G0, final_byte),
            (None, [b')'], final_byte) => self.designate(Register::G1, final_byte),
            (None, [b'*'], final_byte) => self.designate(Register::G2, final_byte),
            (None, [b'+'], final_byte) => self.designate(Register::G3, final_byte),
            _ => {
                tracing::debug!(
                    private = ?esc.private,
                    intermediates = ?intermediates,
                    final_byte = esc.final_byte,
                    "unhandled ESC sequence"
                );
            }
        }
    }

    fn designate(&mut self, register: Register, final_byte: u8) {
        let charset = match final_byte {
            b'A' => Charset::Uk,
            b'B' => Charset::Ascii,
            b'0' => Charset::DecSpecialGraphics,
            b'<' => Charset::DecSupplemental,
            b'%' => Charset::UnicodeLower,
            b'6' => Charset::UnicodeUpper,
            _ => {
                tracing::debug!(final_byte, "unrecognized charset designation");
                return;
            }
        };
        self.charset().designate(register, charset);
    }

    fn decsc(&mut self) {
        self.saved = Some(VteSavedState {
            x: self.screen.cursor_x(),
            y: self.screen.cursor_y(),
            attr: self.current_attr,
            origin_mode: self.screen.opts().contains(ScreenOpts::REL_ORIGIN),
            auto_wrap: self.screen.opts().contains(ScreenOpts::AUTO_WRAP),
            charset: *self.charset(),
        });
    }

    fn decrc(&mut self) {
        let Some(saved) = self.saved else { return };
        self.screen.move_to(saved.x, saved.y);
        self.current_attr = saved.attr;
        set_opt(&mut self.screen, ScreenOpts::REL_ORIGIN, saved.origin_mode);
        set_opt(&mut self.screen, ScreenOpts::AUTO_WRAP, saved.auto_wrap);
        *self.charset() = saved.charset;
    }

    fn decaln(&mut self) {
        let (width, height) = (self.screen.width(), self.screen.height());
        for y in 0..height {
            self.screen.move_to(0, y);
            for _ in 0..width {
                self.screen.write(u32::from(b'E'), self.current_attr);
            }
        }
        self.screen.move_to(0, 0);
    }

    // ---- reset ----

    /// Soft reset: modes, margins, charsets and the pending attribute
    /// state return to their defaults; scrollback is untouched.
    pub fn reset(&mut self) {
        self.screen.reset();
        self.charset_main = CharsetState::new();
        self.charset_alt = CharsetState::new();
        self.current_attr = Attributes::default();
        self.modes = VteModes::default();
        self.saved = None;
        self.utf8.reset();
        self.capture_buffer.clear();
        self.capture_mode = CaptureMode::None;
        self.dcs_header = None;
    }

    /// Hard reset (RIS): as [`Vte::reset`], plus the scrollback is cleared.
    pub fn hard_reset(&mut self) {
        self.reset();
        self.screen.clear_sb();
    }

    // ---- CSI ----

    fn dispatch_csi(&mut self, csi: &CSI, reply: &mut Vec<u8>) {
        let params = Params::parse(csi.params.iter().map(std::ops::Deref::deref));
        let intermediates = csi.intermediates.as_ref();

        match (csi.private, intermediates, csi.final_byte) {
            (None, [], b'A') => self.screen.move_up(usize::from(params.get_nonzero(0, 1)), false),
            (None, [], b'B') => self.screen.move_down(usize::from(params.get_nonzero(0, 1)), false),
            (None, [], b'C') => self.screen.move_right(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'D') => self.screen.move_left(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'H' | b'f') => {
                let row = usize::from(params.get_nonzero(0, 1)).saturating_sub(1);
                let col = usize::from(params.get_nonzero(1, 1)).saturating_sub(1);
                self.screen.move_to(col, row);
            }
            (None, [], b'J') => self.erase_display(params.get(0, 0), false),
            (priv_marker, [], b'J') if priv_marker == Some(b'?') => {
                self.erase_display(params.get(0, 0), true);
            }
            (None, [], b'K') => self.erase_line(params.get(0, 0), false),
            (priv_marker, [], b'K') if priv_marker == Some(b'?') => {
                self.erase_line(params.get(0, 0), true);
            }
            (None, [], b'@') => self.screen.insert_chars(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'L') => self.screen.insert_lines(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'M') => self.screen.delete_lines(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'P') => self.screen.delete_chars(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'X') => self.screen.erase_chars(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'S') => self.screen.scroll_up(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'T') => self.screen.scroll_down(usize::from(params.get_nonzero(0, 1))),
            (None, [], b'g') => match params.get(0, 0) {
                3 => self.screen.reset_all_tabstops(),
                _ => self.screen.reset_tabstop(),
            },
            (None, [], b'r') => {
                let height = self.screen.height();
                let top = usize::from(params.get_nonzero(0, 1)).saturating_sub(1);
                let bottom = usize::from(params.get_nonzero(1, u16::try_from(height).unwrap_or(u16::MAX))).saturating_sub(1);
                let _ = self.screen.set_margins(top, bottom);
            }
            (None, [], b'm') => self.sgr(&params),
            (None, [b'"'], b'q') => {
                self.current_attr.protect = matches!(params.get(0, 0), 1);
            }
            (None, [], b'c') => {
                let _ = write_csi!(reply; "?6c");
            }
            (None, [], b'n') => self.dsr(params.get(0, 0), reply),
            (priv_marker, [], b'h') => self.set_mode(priv_marker, &params, true),
            (priv_marker, [], b'l') => self.set_mode(priv_marker, &params, false),
            _ => {
                tracing::debug!(
                    private = ?csi.private,
                    intermediates = ?intermediates,
                    final_byte = csi.final_byte,
                    "unhandled CSI sequence"
                );
            }
        }
    }

    /// ED (`CSI Ps J`). `protect` selects DECSED's "respect DECSCA" variant.
    fn erase_display(&mut self, mode: u16, protect: bool) {
        match mode {
            0 => self.screen.erase_cursor_to_screen(protect),
            1 => self.screen.erase_screen_to_cursor(protect),
            2 | 3 => self.screen.erase_screen(protect),
            other => tracing::debug!(other, "unhandled ED mode"),
        }
    }

    /// EL (`CSI Ps K`). `protect` selects DECSEL's "respect DECSCA" variant.
    fn erase_line(&mut self, mode: u16, protect: bool) {
        match mode {
            0 => self.screen.erase_cursor_to_end(protect),
            1 => self.screen.erase_home_to_cursor(protect),
            2 => self.screen.erase_current_line(protect),
            other => tracing::debug!(other, "unhandled EL mode"),
        }
    }

    fn dsr(&mut self, kind: u16, reply: &mut Vec<u8>) {
        match kind {
            5 => {
                let _ = write_csi!(reply; "0n");
            }
            6 => {
                let row = self.screen.cursor_y() + 1;
                let col = self.screen.cursor_x() + 1;
                let _ = write_csi!(reply; row, ";", col, "R");
            }
            _ => tracing::debug!(kind, "unhandled DSR request"),
        }
    }

    fn set_mode(&mut self, private: Option<u8>, params: &Params, enable: bool) {
        if private == Some(b'?') {
            for mode in params.iter() {
                self.set_dec_private_mode(mode, enable);
            }
        } else {
            for mode in params.iter() {
                self.set_ansi_mode(mode, enable);
            }
        }
    }

    fn set_dec_private_mode(&mut self, mode: u16, enable: bool) {
        match mode {
            1 => self.modes.app_cursor_keys = enable,
            5 => set_opt(&mut self.screen, ScreenOpts::INVERSE, enable),
            6 => set_opt(&mut self.screen, ScreenOpts::REL_ORIGIN, enable),
            7 => set_opt(&mut self.screen, ScreenOpts::AUTO_WRAP, enable),
            25 => set_opt(&mut self.screen, ScreenOpts::HIDE_CURSOR, !enable),
            47 | 1047 | 1049 => set_opt(&mut self.screen, ScreenOpts::ALTERNATE, enable),
            2004 => self.modes.bracketed_paste = enable,
            _ => tracing::debug!(mode, enable, "unhandled DEC private mode"),
        }
    }

    fn set_ansi_mode(&mut self, mode: u16, enable: bool) {
        match mode {
            4 => set_opt(&mut self.screen, ScreenOpts::INSERT_MODE, enable),
            _ => tracing::debug!(mode, enable, "unhandled ANSI mode"),
        }
    }

    fn sgr(&mut self, params: &Params) {
        if params.count() == 0 {
            self.current_attr = Attributes::default();
            return;
        }

        let mut i = 0;
        let codes: Vec<u16> = params.iter().collect();
        while i < codes.len() {
            match codes[i] {
                0 => self.current_attr = Attributes::default(),
                1 => self.current_attr.bold = true,
                4 => self.current_attr.underline = true,
                5 => self.current_attr.blink = true,
                7 => self.current_attr.inverse = true,
                22 => self.current_attr.bold = false,
                24 => self.current_attr.underline = false,
                25 => self.current_attr.blink = false,
                27 => self.current_attr.inverse = false,
                30..=37 => self.set_fg_indexed(u8::try_from(codes[i] - 30).unwrap()),
                38 => i += self.set_extended_color(&codes[i + 1..], true),
                39 => {
                    self.current_attr.fccode = -1;
                    self.current_attr.fr = Attributes::default().fr;
                    self.current_attr.fg = Attributes::default().fg;
                    self.current_attr.fb = Attributes::default().fb;
                }
                40..=47 => self.set_bg_indexed(u8::try_from(codes[i] - 40).unwrap()),
                48 => i += self.set_extended_color(&codes[i + 1..], false),
                49 => {
                    self.current_attr.bccode = -1;
                    self.current_attr.br = Attributes::default().br;
                    self.current_attr.bg = Attributes::default().bg;
                    self.current_attr.bb = Attributes::default().bb;
                }
                90..=97 => self.set_fg_indexed(u8::try_from(codes[i] - 90 + 8).unwrap()),
                100..=107 => self.set_bg_indexed(u8::try_from(codes[i] - 100 + 8).unwrap()),
                other => tracing::debug!(other, "unhandled SGR code"),
            }
            i += 1;
        }
    }

    fn set_fg_indexed(&mut self, index: u8) {
        self.current_attr.fccode = i8::try_from(index).unwrap_or(i8::MAX);
        let (r, g, b) = self.palette.resolve(index);
        (self.current_attr.fr, self.current_attr.fg, self.current_attr.fb) = (r, g, b);
    }

    fn set_bg_indexed(&mut self, index: u8) {
        self.current_attr.bccode = i8::try_from(index).unwrap_or(i8::MAX);
        let (r, g, b) = self.palette.resolve(index);
        (self.current_attr.br, self.current_attr.bg, self.current_attr.bb) = (r, g, b);
    }

    /// Consume an extended-color tail (`5;n` or `2;r;g;b`) following an
    /// SGR 38/48 code, returning how many extra codes were consumed.
    ///
    /// A `5;n` index in 0-15 is stored in `fccode`/`bccode` like a basic
    /// SGR color, matching `tsm_screen_attr`'s indexed-color range; 16-255
    /// (and `2;r;g;b` true color) have no representation in that 4-bit
    /// field, so they resolve straight to RGB with the code left negative.
    fn set_extended_color(&mut self, rest: &[u16], foreground: bool) -> usize {
        match rest.first() {
            Some(&5) => {
                let Some(&index) = rest.get(1) else { return rest.len() };
                let index = u8::try_from(index).unwrap_or(u8::MAX);
                let (r, g, b) = self.palette.resolve_extended(index);
                if foreground {
                    self.current_attr.fccode = if index < 16 { i8::try_from(index).unwrap_or(-1) } else { -1 };
                    (self.current_attr.fr, self.current_attr.fg, self.current_attr.fb) = (r, g, b);
                } else {
                    self.current_attr.bccode = if index < 16 { i8::try_from(index).unwrap_or(-1) } else { -1 };
                    (self.current_attr.br, self.current_attr.bg, self.current_attr.bb) = (r, g, b);
                }
                2
            }
            Some(&2) => {
                let (Some(&r), Some(&g), Some(&b)) = (rest.get(1), rest.get(2), rest.get(3)) else {
                    return rest.len();
                };
                let (r, g, b) = (r as u8, g as u8, b as u8);
                if foreground {
                    self.current_attr.fccode = -1;
                    (self.current_attr.fr, self.current_attr.fg, self.current_attr.fb) = (r, g, b);
                } else {
                    self.current_attr.bccode = -1;
                    (self.current_attr.br, self.current_attr.bg, self.current_attr.bb) = (r, g, b);
                }
                4
            }
            _ => 0,
        }
    }

    // ---- OSC ----

    fn dispatch_osc(&mut self, data: &[u8], reply: &mut Vec<u8>) {
        let Some(semi) = data.iter().position(|&b| b == b';') else {
            tracing::debug!("OSC sequence missing ';' separator");
            return;
        };
        let Ok(code) = std::str::from_utf8(&data[..semi]).unwrap_or_default().parse::<u32>() else {
            tracing::debug!("OSC sequence has non-numeric code");
            return;
        };
        let payload = &data[semi + 1..];

        match code {
            0 | 1 | 2 => {
                // Window/icon title: this headless core has no window to
                // retitle and no notification sink wired up, so the
                // request is acknowledged by being parsed and dropped.
            }
            4 => {
                // The built-in palettes are a closed, fixed set (see
                // `Palette`); reprogramming one entry has no representation
                // here, unlike a host that models a full 256-entry table.
                tracing::debug!("OSC 4 palette reprogramming is not supported");
            }
            10 => self.osc_color(payload, true, reply),
            11 => self.osc_color(payload, false, reply),
            104 => self.palette = Palette::default(),
            _ => tracing::debug!(code, "unhandled OSC sequence"),
        }
    }

    /// OSC 10/11: query or set the default foreground/background color.
    fn osc_color(&mut self, payload: &[u8], foreground: bool, reply: &mut Vec<u8>) {
        if payload == b"?" {
            let attr = self.current_attr;
            let (r, g, b) = if foreground {
                (attr.fr, attr.fg, attr.fb)
            } else {
                (attr.br, attr.bg, attr.bb)
            };
            let code = if foreground { "10;" } else { "11;" };
            let spec = format!("rgb:{r:02x}/{g:02x}/{b:02x}");
            let _ = write_osc!(reply; code, spec.as_str());
            return;
        }

        let text = String::from_utf8_lossy(payload);
        let Some((r, g, b)) = parse_color_spec(&text) else {
            return;
        };
        if foreground {
            (self.current_attr.fr, self.current_attr.fg, self.current_attr.fb) = (r, g, b);
        } else {
            (self.current_attr.br, self.current_attr.bg, self.current_attr.bb) = (r, g, b);
        }
    }
}

fn set_opt(screen: &mut Screen, flag: ScreenOpts, enable: bool) {
    if enable {
        screen.set_flags(flag);
    } else {
        screen.reset_flags(flag);
    }
}

/// Parse an X11-style `rgb:RR/GG/BB` or `#RRGGBB` color spec, as used by
/// OSC 4/10/11.
fn parse_color_spec(spec: &str) -> Option<(u8, u8, u8)> {
    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some((r, g, b));
        }
    }
    if let Some(rest) = spec.strip_prefix("rgb:") {
        let mut channels = rest.split('/');
        let r = channels.next()?;
        let g = channels.next()?;
        let b = channels.next()?;
        let scale = |s: &str| -> Option<u8> {
            let v = u32::from_str_radix(s, 16).ok()?;
            let max = (1u32 << (4 * s.len())) - 1;
            Some(u8::try_from(v * 255 / max.max(1)).unwrap_or(u8::MAX))
        };
        return Some((scale(r)?, scale(g)?, scale(b)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn feed(vte: &mut Vte, bytes: &[u8]) -> Vec<u8> {
        let mut reply = Vec::new();
        vte.feed(bytes, &mut reply);
        reply
    }

    #[test]
    fn plain_print_and_wrap() {
        let mut vte = Vte::new(4, 2);
        feed(&mut vte, b"abcdef");
        assert_eq!(vte.screen().cursor_x(), 2);
        assert_eq!(vte.screen().cursor_y(), 1);
    }

    #[test]
    fn csi_cursor_address_is_one_based() {
        let mut vte = Vte::new(80, 24);
        feed(&mut vte, b"\x1b[2;3HX");
        assert_eq!(vte.screen().cursor_x(), 3);
        assert_eq!(vte.screen().cursor_y(), 1);
    }

    #[test]
    fn sgr_256_color_above_16_resolves_rgb_with_negative_code() {
        let mut vte = Vte::new(10, 1);
        feed(&mut vte, b"\x1b[38;5;200m");
        assert_eq!(vte.current_attr.fccode, -1);
        assert_ne!((vte.current_attr.fr, vte.current_attr.fg, vte.current_attr.fb), (0, 0, 0));
    }

    #[test]
    fn sgr_256_color_below_16_keeps_indexed_code() {
        let mut vte = Vte::new(10, 1);
        feed(&mut vte, b"\x1b[38;5;3m");
        assert_eq!(vte.current_attr.fccode, 3);
    }

    #[test]
    fn sgr_sets_bold_and_indexed_fg() {
        let mut vte = Vte::new(10, 1);
        feed(&mut vte, b"\x1b[31;1mA\x1b[0mB");
        assert_eq!(vte.current_attr.bold, false); // reset by the second SGR before 'B'
        assert_eq!(vte.saved, None);
    }

    #[test]
    fn selective_erase_preserves_protected_cell() {
        let mut vte = Vte::new(4, 1);
        feed(&mut vte, b"\x1b[1\"qA"); // DECSCA set protect, then write 'A'
        feed(&mut vte, b"\x1b[0\"q"); // DECSCA clear protect
        feed(&mut vte, b"B"); // unprotected cell at column 1
        feed(&mut vte, b"\x1b[1D"); // cursor back onto column 1
        feed(&mut vte, b"\x1b[?1K"); // selective erase home-to-cursor (cols 0..=1)

        let mut collected = Vec::new();
        struct Collect<'a>(&'a mut Vec<char>);
        impl vtcore_screen::ScreenDrawHandler for Collect<'_> {
            fn draw_cell(
                &mut self,
                _id: vtcore_symbols::Symbol,
                cps: &[u32],
                _w: u8,
                _c: usize,
                _r: usize,
                _a: &vtcore_screen::Attributes,
            ) {
                self.0.push(cps.first().copied().and_then(char::from_u32).unwrap_or(' '));
            }
        }
        vte.screen().draw(&mut Collect(&mut collected));
        // column 0 ('A') was protected and survives; column 1 ('B') does not.
        assert_eq!(collected[0], 'A');
        assert_eq!(collected[1], ' ');
    }

    #[test]
    fn device_status_report_emits_cursor_position() {
        let mut vte = Vte::new(80, 24);
        feed(&mut vte, b"\x1b[5;10H");
        let reply = feed(&mut vte, b"\x1b[6n");
        assert_eq!(reply, b"\x1b[5;10R");
    }

    #[test]
    fn hard_reset_clears_scrollback() {
        let mut vte = Vte::new(4, 2);
        for _ in 0..10 {
            feed(&mut vte, b"x\n");
        }
        assert!(!vte.screen().scrollback_is_empty());
        vte.hard_reset();
        assert!(vte.screen().scrollback_is_empty());
    }

    #[test]
    fn decsc_decrc_round_trips_cursor_and_attr() {
        let mut vte = Vte::new(10, 10);
        feed(&mut vte, b"\x1b[3;4H\x1b[1m"); // move, bold on
        feed(&mut vte, b"\x1b7"); // DECSC
        feed(&mut vte, b"\x1b[1;1H\x1b[0m"); // move home, reset attrs
        feed(&mut vte, b"\x1b8"); // DECRC
        assert_eq!(vte.screen().cursor_x(), 3);
        assert_eq!(vte.screen().cursor_y(), 2);
        assert!(vte.current_attr.bold);
    }

    #[test]
    fn application_cursor_keys_mode_is_observable() {
        let mut vte = Vte::new(10, 10);
        feed(&mut vte, b"\x1b[?1h");
        assert!(vte.modes().app_cursor_keys);
        feed(&mut vte, b"\x1b[?1l");
        assert!(!vte.modes().app_cursor_keys);
    }

    #[test]
    fn combining_mark_attaches_to_previous_cell() {
        let mut vte = Vte::new(10, 1);
        feed(&mut vte, "e\u{301}".as_bytes());
        assert_eq!(vte.screen().cursor_x(), 1);
    }
}
