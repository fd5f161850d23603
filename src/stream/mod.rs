//! Forward-only reader for the legacy settings wire layout.
//!
//! # Layout
//! The historical writer used a Qt 5.1 data stream, so every value is
//! big-endian and every variable-length value carries its own prefix:
//!
//! | Value | Encoding |
//! |-------|----------|
//! | integers | fixed width, big-endian |
//! | string | `u32` byte length (`0xFFFF_FFFF` = null), UTF-16BE code units |
//! | byte array | `u32` length (`0xFFFF_FFFF` = null), raw bytes |
//! | vector | `u32` count, then items |
//! | map | `u32` count, then key/value pairs |
//!
//! # Failure model
//! Every read returns `Result`.  A failed read leaves the position where it
//! was and the caller is expected to propagate the error with `?`; nothing
//! decoded from a stream after its first failure is ever applied.  Reads are
//! never retried or rewound.

use byteorder::{BigEndian, ReadBytesExt};
use std::collections::BTreeMap;
use std::io::{self, Read};
use thiserror::Error;

/// Length prefix marking a null string or byte array.
pub const NULL_LENGTH: u32 = 0xFFFF_FFFF;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Truncated stream at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated { offset: u64, needed: u64, available: u64 },
    #[error("Corrupt string at offset {offset}: odd byte length {len}")]
    OddStringLength { offset: u64, len: u32 },
}

/// Sequential reader over an already-buffered settings stream.
pub struct Cursor<'a> {
    inner: io::Cursor<&'a [u8]>,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { inner: io::Cursor::new(data) }
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        (self.inner.get_ref().len() as u64).saturating_sub(self.inner.position())
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    fn truncated(&self, needed: u64) -> StreamError {
        StreamError::Truncated {
            offset:    self.position(),
            needed,
            available: self.remaining(),
        }
    }

    /// Fail without consuming anything when fewer than `needed` bytes remain.
    fn ensure(&self, needed: u64) -> Result<(), StreamError> {
        if self.remaining() < needed {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    // ── Fixed-width integers ─────────────────────────────────────────────────

    pub fn read_u16(&mut self) -> Result<u16, StreamError> {
        self.ensure(2)?;
        self.inner.read_u16::<BigEndian>().map_err(|_| self.truncated(2))
    }

    pub fn read_i32(&mut self) -> Result<i32, StreamError> {
        self.ensure(4)?;
        self.inner.read_i32::<BigEndian>().map_err(|_| self.truncated(4))
    }

    pub fn read_u32(&mut self) -> Result<u32, StreamError> {
        self.ensure(4)?;
        self.inner.read_u32::<BigEndian>().map_err(|_| self.truncated(4))
    }

    pub fn read_i64(&mut self) -> Result<i64, StreamError> {
        self.ensure(8)?;
        self.inner.read_i64::<BigEndian>().map_err(|_| self.truncated(8))
    }

    pub fn read_u64(&mut self) -> Result<u64, StreamError> {
        self.ensure(8)?;
        self.inner.read_u64::<BigEndian>().map_err(|_| self.truncated(8))
    }

    // ── Length-prefixed values ───────────────────────────────────────────────

    /// Read exactly `len` bytes with no prefix.
    pub fn read_raw(&mut self, len: usize) -> Result<Vec<u8>, StreamError> {
        self.ensure(len as u64)?;
        let mut out = vec![0u8; len];
        self.inner.read_exact(&mut out).map_err(|_| self.truncated(len as u64))?;
        Ok(out)
    }

    /// Read a length-prefixed byte array.  A null array decodes as empty.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, StreamError> {
        let start = self.position();
        let len = self.read_u32()?;
        if len == NULL_LENGTH {
            return Ok(Vec::new());
        }
        self.read_raw(len as usize).inspect_err(|_| self.inner.set_position(start))
    }

    /// Read a length-prefixed UTF-16BE string.  A null string decodes as empty.
    ///
    /// Unpaired surrogates are replaced rather than rejected; only the framing
    /// (length and parity) is validated.
    pub fn read_string(&mut self) -> Result<String, StreamError> {
        let start = self.position();
        let len = self.read_u32()?;
        if len == NULL_LENGTH {
            return Ok(String::new());
        }
        if len & 1 != 0 {
            self.inner.set_position(start);
            return Err(StreamError::OddStringLength { offset: start, len });
        }
        let raw = self
            .read_raw(len as usize)
            .inspect_err(|_| self.inner.set_position(start))?;
        let units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Ok(String::from_utf16_lossy(&units))
    }

    // ── Containers ───────────────────────────────────────────────────────────

    /// Read a counted vector, decoding each item with `item`.
    ///
    /// The first failing item aborts the whole vector.
    pub fn read_vec<T, F>(&mut self, mut item: F) -> Result<Vec<T>, StreamError>
    where
        F: FnMut(&mut Self) -> Result<T, StreamError>,
    {
        let count = self.read_u32()? as usize;
        // Every item occupies at least one byte, so a corrupt count cannot
        // force a huge allocation.
        let mut out = Vec::with_capacity(count.min(self.remaining() as usize));
        for _ in 0..count {
            out.push(item(self)?);
        }
        Ok(out)
    }

    /// Read a counted map.  Later duplicates of a key overwrite earlier ones.
    pub fn read_map<K, V, FK, FV>(
        &mut self,
        mut key:   FK,
        mut value: FV,
    ) -> Result<BTreeMap<K, V>, StreamError>
    where
        K:  Ord,
        FK: FnMut(&mut Self) -> Result<K, StreamError>,
        FV: FnMut(&mut Self) -> Result<V, StreamError>,
    {
        let count = self.read_u32()?;
        let mut out = BTreeMap::new();
        for _ in 0..count {
            let k = key(self)?;
            let v = value(self)?;
            out.insert(k, v);
        }
        Ok(out)
    }
}
