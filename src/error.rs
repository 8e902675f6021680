//! Crate-wide error type shared by key generation, encapsulation, and decapsulation.

/// Errors surfaced by the public KEM operations.
///
/// Decapsulation never returns an error: a malformed or tampered ciphertext is handled
/// via implicit rejection rather than by propagating a failure to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The entropy source failed to supply the requested random bytes.
    Entropy,
    /// The SHAKE256 PRNG was squeezed before being initialized.
    ///
    /// Structurally unreachable: [`crate::prng::Prng`] can only be constructed already
    /// keyed with a seed, so there is no state in which a squeeze can observe this.
    PrngFail,
    /// The SHA3-384 primitive reported a failure.
    ///
    /// Unreachable with a host `Digest` implementation; retained for taxonomy symmetry
    /// with the other variants.
    HashFail,
    /// `h0` has no multiplicative inverse in `R`; the caller should retry key generation
    /// with fresh randomness.
    NotInvertible,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

impl core::error::Error for Error {}
