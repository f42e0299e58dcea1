// strings.rs — narrow (one byte per character) strings and info strings
//
// The host speaks plain `char *`. Every byte maps to the character with the
// same code point; there is no multi-byte decoding in either direction.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::limits::StringLimits;

// ============================================================
// Fixed buffers
// ============================================================

/// Decode a fixed-width narrow buffer, stopping at the first NUL.
pub fn narrow_to_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Encode `value` into `dst`, one byte per character, truncating at the
/// destination's capacity. Bytes past the written prefix are left untouched.
/// Returns the number of bytes written.
pub fn write_narrow(dst: &mut [u8], value: &str) -> usize {
    let mut written = 0;
    for (slot, ch) in dst.iter_mut().zip(value.chars()) {
        *slot = ch as u32 as u8;
        written += 1;
    }
    written
}

/// Fixed-capacity narrow string stored inline.
///
/// A value of exactly `N` characters fills the buffer with no terminator and
/// reads back whole.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NarrowBuf<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> NarrowBuf<N> {
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    pub fn from_str_truncated(value: &str) -> Self {
        let mut buf = Self::new();
        buf.set(value);
        buf
    }

    /// Store `value`, truncating to capacity and zero-filling the remainder.
    pub fn set(&mut self, value: &str) {
        let n = write_narrow(&mut self.bytes, value);
        self.bytes[n..].fill(0);
    }

    pub fn get(&self) -> String {
        narrow_to_string(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.iter().position(|&b| b == 0).unwrap_or(N)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Default for NarrowBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> std::fmt::Debug for NarrowBuf<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.get())
    }
}

// ============================================================
// C strings
// ============================================================

/// Read a host `const char *`. A null pointer reads as the empty string.
///
/// # Safety
/// A non-null `ptr` must point at a NUL terminated string that stays valid
/// for the duration of the call.
pub unsafe fn c_str_to_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    narrow_to_string(CStr::from_ptr(ptr).to_bytes())
}

/// Build a NUL terminated narrow copy of `value` for passing to the host.
/// An interior NUL ends the string there.
pub fn to_narrow_cstring(value: &str) -> CString {
    let bytes: Vec<u8> = value
        .chars()
        .map(|ch| ch as u32 as u8)
        .take_while(|&b| b != 0)
        .collect();
    CString::new(bytes).unwrap_or_default()
}

// ============================================================
// Info strings ("\key\value\key\value")
// ============================================================

/// Look up `key` in an info string. Missing keys give an empty string.
pub fn info_value_for_key(info: &str, key: &str) -> String {
    let body = info.strip_prefix('\\').unwrap_or(info);
    let mut parts = body.split('\\');
    while let Some(k) = parts.next() {
        let value = parts.next().unwrap_or("");
        if k == key {
            return value.to_string();
        }
    }
    String::new()
}

/// An info string may not carry quotes or command separators, and must fit
/// the host's info buffer.
pub fn info_validate(info: &str) -> bool {
    !info.contains('"')
        && !info.contains(';')
        && info.chars().count() < StringLimits::INFO_STRING
}
