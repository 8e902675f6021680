//! SHAKE256-backed deterministic byte stream.
//!
//! The Keccak-f[1600] permutation itself is not implemented here; it is provided by the
//! `sha3` crate, the same dependency the teacher crate uses for its own XOF/hash needs.
//! Delegating the squeeze-window bookkeeping to `sha3::Shake256`'s reader means this type
//! carries no fixed-width byte-offset counter of its own, unlike the C reference's
//! single-byte `pos` field (which cannot represent a 136-byte block boundary).

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

/// A deterministic pseudo-random byte stream keyed by a seed of arbitrary length.
pub struct Prng {
    reader: <Shake256 as ExtendableOutput>::Reader,
}

impl Prng {
    /// Initializes a fresh stream from a seed (32 bytes for every caller in this crate).
    pub fn new(seed: &[u8]) -> Self {
        let mut hasher = Shake256::default();
        Update::update(&mut hasher, seed);
        Prng { reader: hasher.finalize_xof() }
    }

    /// Squeezes the next `out.len()` bytes from the stream.
    pub fn squeeze(&mut self, out: &mut [u8]) {
        self.reader.read(out);
    }

    /// Squeezes the next 4 bytes, interpreted as a little-endian `u32`.
    pub fn squeeze_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.squeeze(&mut buf);
        u32::from_le_bytes(buf)
    }
}
