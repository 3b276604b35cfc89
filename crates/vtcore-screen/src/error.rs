use std::fmt;

/// Error returned by [`crate::Screen::resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeError {
    /// Width or height of zero was requested.
    ZeroSize,
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeError::ZeroSize => write!(f, "screen width and height must be non-zero"),
        }
    }
}

impl std::error::Error for ResizeError {}

/// Error returned by [`crate::Screen::set_margins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginsError {
    /// `top >= bottom`, or either bound is out of range for the screen.
    InvalidRange { top: usize, bottom: usize },
}

impl fmt::Display for MarginsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginsError::InvalidRange { top, bottom } => {
                write!(f, "invalid scrolling region: top={top}, bottom={bottom}")
            }
        }
    }
}

impl std::error::Error for MarginsError {}
