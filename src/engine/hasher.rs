//! Rolling 32-bit key hash
//!
//! Station names are hashed byte by byte in the same loop that searches for
//! the `;` delimiter, so the key is read exactly once. The merger recomputes
//! the same value from an owned key with [`hash_key`].

use crate::constants::{DELIMITER, HASH_OFFSET_BASIS, HASH_PRIME, NEWLINE};

/// Incremental FNV-1a hasher
#[derive(Debug, Clone, Copy)]
pub struct KeyHasher {
    state: u32,
}

impl KeyHasher {
    pub fn new() -> Self {
        Self {
            state: HASH_OFFSET_BASIS,
        }
    }

    /// Fold one byte into the hash
    #[inline(always)]
    pub fn write_byte(&mut self, byte: u8) {
        self.state ^= byte as u32;
        self.state = self.state.wrapping_mul(HASH_PRIME);
    }

    #[inline(always)]
    pub fn finish(&self) -> u32 {
        self.state
    }
}

impl Default for KeyHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a complete key
pub fn hash_key(key: &[u8]) -> u32 {
    let mut hasher = KeyHasher::new();
    for &byte in key {
        hasher.write_byte(byte);
    }
    hasher.finish()
}

/// Outcome of scanning a line for its key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScan {
    /// The key is `bytes[..len]` and the delimiter sits at `len`
    Delimited { len: usize, hash: u32 },
    /// A newline (at `len`) or the end of input came before any delimiter
    Undelimited { len: usize },
}

/// Scan `bytes` from the start for the delimiter, hashing every key byte.
#[inline]
pub fn scan_key(bytes: &[u8]) -> KeyScan {
    let mut hasher = KeyHasher::new();
    for (position, &byte) in bytes.iter().enumerate() {
        match byte {
            DELIMITER => {
                return KeyScan::Delimited {
                    len: position,
                    hash: hasher.finish(),
                };
            }
            NEWLINE => return KeyScan::Undelimited { len: position },
            _ => hasher.write_byte(byte),
        }
    }
    KeyScan::Undelimited { len: bytes.len() }
}
