//! Encoding utilities for ANSI control sequences.
//!
//! This module provides traits and utilities for encoding typed Rust values
//! into ANSI byte sequences, used by [`crate::write_csi`] and
//! [`crate::write_osc`].
//!
//! For types that always encode to a constant string, implement
//! [`StaticAnsiEncode`], which provides automatic implementations of the
//! other encoding traits.

use core::fmt;
use std::io::{self, Write};

/// Write an integer to a buffer without allocation.
///
/// Uses the `itoa` crate for efficient integer-to-string conversion.
///
/// # Errors
///
/// Return an error if the buffer is too small to hold the integer.
#[inline]
pub fn write_int<W: io::Write + ?Sized>(
    sink: &mut W,
    value: impl itoa::Integer,
) -> Result<usize, EncodeError> {
    let mut buffer = itoa::Buffer::new();
    let s = buffer.format(value);
    write_str_into(sink, s)
}

pub struct CountingWriter<W> {
    inner: W,
    written: usize,
    overflow: usize,
}

impl<W: io::Write> CountingWriter<W> {
    #[inline]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            written: 0,
            overflow: 0,
        }
    }
    #[inline]
    pub fn written(&self) -> usize {
        self.written
    }
    #[inline]
    pub fn overflow(&self) -> usize {
        self.overflow
    }
    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> io::Write for CountingWriter<W> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let requested = buf.len();
        let n = self.inner.write(buf)?;
        self.written += n;
        if n < requested {
            self.overflow += requested - n;
        }
        Ok(n)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Copy a byte slice into the provided sink, returning the number of bytes
/// written.
///
/// # Errors
///
/// Return an error if the buffer is too small to hold the data.
#[inline]
pub fn write_bytes_into<W: io::Write + ?Sized>(
    sink: &mut W,
    s: &[u8],
) -> Result<usize, EncodeError> {
    let mut w = CountingWriter::new(sink);
    match w.write(s) {
        Err(ref e) if e.kind() == io::ErrorKind::WriteZero => {
            Err(EncodeError::BufferOverflow(w.overflow()))
        }
        Err(e) => Err(EncodeError::IOError(e)),
        Ok(_n) if w.overflow() > 0 => Err(EncodeError::BufferOverflow(w.overflow())),
        Ok(n) => Ok(n),
    }
}

/// Copy a UTF-8 string into the provided buffer, returning the number of
/// bytes written.
///
/// # Errors
///
/// Return an error if the buffer is too small to hold the string.
#[inline]
pub fn write_str_into<W: io::Write + ?Sized>(
    sink: &mut W,
    s: &str,
) -> Result<usize, EncodeError> {
    write_bytes_into(sink, s.as_bytes())
}

/// Trait for types that can be efficiently written to a buffer.
///
/// Implemented for string slices and integer types, allowing the `write_*`
/// macros to accept a sequence of literals and integers without heap
/// allocation or the overhead of `write_fmt`.
pub trait AnsiEncode {
    /// Write this value to the buffer.
    ///
    /// # Errors
    ///
    /// Return an error if the buffer is too small to hold the value.
    fn encode_ansi_into<W: io::Write + ?Sized>(
        &self,
        sink: &mut W,
    ) -> Result<usize, EncodeError>;

    /// Encode this value as an ANSI control sequence directly into a byte
    /// slice.
    ///
    /// # Errors
    ///
    /// Return an error if the buffer is too small to hold the encoded value.
    #[inline]
    fn encode_ansi_into_slice(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        self.encode_ansi_into(&mut &mut buf[..])
    }

    /// Encode this value as an ANSI control sequence and return the
    /// resulting bytes.
    ///
    /// # Errors
    ///
    /// Return an error if the buffer is too small to hold the encoded value.
    #[inline]
    fn encode_ansi(&self) -> Result<Vec<u8>, EncodeError> {
        let mut v: Vec<u8> = Vec::with_capacity(5);
        self.encode_ansi_into(&mut v)?;
        Ok(v)
    }
}

impl AnsiEncode for &str {
    #[inline]
    fn encode_ansi_into<W: io::Write + ?Sized>(
        &self,
        sink: &mut W,
    ) -> Result<usize, EncodeError> {
        write_str_into(sink, self)
    }
}

impl AnsiEncode for String {
    #[inline]
    fn encode_ansi_into<W: io::Write + ?Sized>(
        &self,
        sink: &mut W,
    ) -> Result<usize, EncodeError> {
        write_str_into(sink, self)
    }
}

macro_rules! write_int_seq {
    ($type:ty) => {
        impl AnsiEncode for $type {
            #[inline]
            fn encode_ansi_into<W: io::Write + ?Sized>(
                &self,
                sink: &mut W,
            ) -> Result<usize, EncodeError> {
                write_int(sink, *self)
            }
        }

        impl AnsiEncode for &$type {
            #[inline]
            fn encode_ansi_into<W: io::Write + ?Sized>(
                &self,
                sink: &mut W,
            ) -> Result<usize, EncodeError> {
                write_int(sink, **self)
            }
        }
    };
}

write_int_seq!(u8);
write_int_seq!(u16);
write_int_seq!(u32);
write_int_seq!(u64);
write_int_seq!(usize);
write_int_seq!(i8);
write_int_seq!(i16);
write_int_seq!(i32);
write_int_seq!(i64);
write_int_seq!(isize);

impl AnsiEncode for char {
    #[inline]
    fn encode_ansi_into<W: io::Write + ?Sized>(
        &self,
        sink: &mut W,
    ) -> Result<usize, EncodeError> {
        let mut buf = [0u8; 4];
        let s = self.encode_utf8(&mut buf);
        write_str_into(sink, s)
    }
}

impl AnsiEncode for bool {
    #[inline]
    fn encode_ansi_into<W: io::Write + ?Sized>(
        &self,
        sink: &mut W,
    ) -> Result<usize, EncodeError> {
        write_str_into(sink, if *self { "1" } else { "0" })
    }
}

#[derive(Debug)]
pub enum EncodeError {
    BufferOverflow(usize),
    IOError(std::io::Error),
}

impl From<EncodeError> for io::Error {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::BufferOverflow(n) => io::Error::new(
                io::ErrorKind::WriteZero,
                format!("buffer overflow: {n} bytes could not be written"),
            ),
            EncodeError::IOError(e) => e,
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::IOError(e) => Some(e),
            EncodeError::BufferOverflow(_) => None,
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::BufferOverflow(n) => {
                write!(f, "buffer overflow: {n} bytes could not be written")
            }
            EncodeError::IOError(e) => write!(f, "I/O error: {e}"),
        }
    }
}

pub trait EncodedLen {
    /// Return the upper bound of the buffer size needed for `encode`.
    fn encoded_buf_len(&self) -> usize;
}

/// Trait for types with a compile-time known encoded length.
pub trait StaticEncodedLen {
    /// The maximum number of bytes needed to encode this type.
    const ENCODED_LEN: usize;
}

impl<T: StaticEncodedLen> EncodedLen for T {
    #[inline]
    fn encoded_buf_len(&self) -> usize {
        Self::ENCODED_LEN
    }
}

/// Trait for types that encode to a static byte sequence, such as terminal
/// control sequences without parameters.
pub trait StaticAnsiEncode {
    /// The static string this type encodes to.
    const STR: &'static str;
}

impl<T: StaticAnsiEncode> StaticEncodedLen for T {
    const ENCODED_LEN: usize = Self::STR.len();
}

impl<T: StaticAnsiEncode> AnsiEncode for T {
    #[inline]
    fn encode_ansi_into<W: io::Write + ?Sized>(
        &self,
        sink: &mut W,
    ) -> Result<usize, EncodeError> {
        write_str_into(sink, Self::STR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_int_round_trips_decimal() {
        let mut buf = Vec::new();
        write_int(&mut buf, 1234_u32).unwrap();
        assert_eq!(buf, b"1234");
    }

    #[test]
    fn csi_macro_assembles_cursor_position() {
        let mut buf = Vec::new();
        let row = 5u16;
        let col = 10u16;
        crate::write_csi!(&mut buf; row, ";", col, "H").unwrap();
        assert_eq!(buf, b"\x1b[5;10H");
    }

    #[test]
    fn osc_macro_wraps_title_with_terminator() {
        let mut buf = Vec::new();
        crate::write_osc!(&mut buf; "0;", "hello").unwrap();
        assert_eq!(buf, b"\x1b]0;hello\x1b\\");
    }

    #[test]
    fn buffer_overflow_is_reported() {
        let mut buf = [0u8; 2];
        let err = write_str_into(&mut &mut buf[..], "abcd").unwrap_err();
        assert!(matches!(err, EncodeError::BufferOverflow(2)));
    }
}
