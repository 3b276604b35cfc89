use bitflags::bitflags;

bitflags! {
    /// Screen option bits, with values fixed to match libtsm's
    /// `TSM_SCREEN_*` constants so a host porting terminfo-derived option
    /// masks from the C library needs no translation table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScreenOpts: u32 {
        const INSERT_MODE = 0x01;
        const AUTO_WRAP   = 0x02;
        const REL_ORIGIN  = 0x04;
        const INVERSE     = 0x08;
        const HIDE_CURSOR = 0x10;
        const FIXED_POS   = 0x20;
        const ALTERNATE   = 0x40;
    }
}

impl Default for ScreenOpts {
    fn default() -> Self {
        ScreenOpts::AUTO_WRAP
    }
}
