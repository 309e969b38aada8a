//! Bounded text output
//!
//! Firmware display and protocol layers hand over fixed byte buffers. The
//! helpers here format into such a buffer, truncating silently and always
//! leaving a NUL terminator inside it.

use core::fmt::{self, Write};

/// `core::fmt::Write` sink over a byte buffer that keeps one byte spare for the terminator
struct BoundedWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.buf.len().saturating_sub(1).saturating_sub(self.len);
        let take = s.len().min(room);
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

/// Formats `args` into `buf`, truncated to `buf.len() - 1` bytes and NUL terminated
///
/// Returns the number of bytes written before the terminator. An empty buffer
/// is left untouched and yields 0.
pub fn write_terminated(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    if buf.is_empty() {
        return 0;
    }
    let mut writer = BoundedWriter { buf, len: 0 };
    // BoundedWriter never fails, it only truncates
    let _ = writer.write_fmt(args);
    let len = writer.len;
    writer.buf[len] = 0;
    len
}
