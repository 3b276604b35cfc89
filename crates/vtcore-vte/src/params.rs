//! Fixed-capacity CSI parameter storage.
//!
//! `vt-push-parser` hands us each CSI parameter as a raw digit byte slice
//! rather than a parsed integer; spec.md caps the stored parameter count
//! at 16 with additional parameters discarded, so this is a fixed array
//! rather than a `Vec`.

pub const MAX_PARAMS: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct Params {
    values: [u16; MAX_PARAMS],
    count: usize,
}

impl Params {
    /// Parse raw per-field digit byte slices (as handed out by
    /// `vt_push_parser::event::CSI::params`) into up to
    /// [`MAX_PARAMS`] decimal values. A field that fails to parse (empty,
    /// or containing a non-digit) is stored as `0`, matching the "missing
    /// parameter defaults to 0" rule.
    pub fn parse<'a>(raw: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut values = [0u16; MAX_PARAMS];
        let mut count = 0;
        for field in raw {
            if count >= MAX_PARAMS {
                break;
            }
            values[count] = std::str::from_utf8(field)
                .ok()
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(0);
            count += 1;
        }
        Self { values, count }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Value at `idx`, or `default` if there is no such field at all.
    #[must_use]
    pub fn get(&self, idx: usize, default: u16) -> u16 {
        if idx < self.count { self.values[idx] } else { default }
    }

    /// Value at `idx`, treating a present-but-zero field the same as a
    /// missing one — the common CSI convention where `Ps=0` means "use
    /// the operation's own default count" (e.g. `CUU` with no params or
    /// `Ps=0` both move the cursor up exactly one row).
    #[must_use]
    pub fn get_nonzero(&self, idx: usize, default: u16) -> u16 {
        match self.get(idx, 0) {
            0 => default,
            v => v,
        }
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.values[..self.count].iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_default_to_zero() {
        let params = Params::parse(std::iter::empty());
        assert_eq!(params.get(0, 99), 99);
        assert_eq!(params.count(), 0);
    }

    #[test]
    fn parses_decimal_fields() {
        let params = Params::parse([b"12".as_slice(), b"34".as_slice()]);
        assert_eq!(params.get(0, 0), 12);
        assert_eq!(params.get(1, 0), 34);
    }

    #[test]
    fn zero_param_falls_back_to_default_via_get_nonzero() {
        let params = Params::parse([b"0".as_slice()]);
        assert_eq!(params.get(0, 99), 0);
        assert_eq!(params.get_nonzero(0, 99), 99);
    }

    #[test]
    fn caps_at_max_params() {
        let fields = std::iter::repeat(b"1".as_slice()).take(MAX_PARAMS + 5);
        let params = Params::parse(fields);
        assert_eq!(params.count(), MAX_PARAMS);
    }
}
