#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
//! BIKE: Bit Flipping Key Encapsulation Mechanism, a post-quantum KEM built on QC-MDPC
//! codes and an iterative Black-Gray-Flip bit-flipping decoder.
//!
//! Three NIST security levels are provided as feature-gated modules: [`bike_l1`],
//! [`bike_l3`], [`bike_l5`]. Each exposes the same `KG`/`EncapsKey`/`DecapsKey`/
//! `CipherText` shape through the [`traits`] module, sized for that level's parameters.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::traits::SerDes;

// Functionality map:
//
// PRNG / XOF (SHAKE256)                      --> prng.rs
// Sparse vector sampling                     --> sampling.rs
// Ring arithmetic over GF(2)[x]/(x^r - 1)    --> ring.rs
// Bit-flipping threshold oracle               --> threshold.rs
// Black-Gray-Flip decoder                     --> decoder.rs
// KeyGen / Encaps / Decaps core algorithms    --> kem.rs
// L, K hash wrappers                          --> helpers.rs
// Error type                                  --> error.rs
//
// The three parameter sets are modules in this file with injected macro code that
// connects them into the functionality in kem.rs.

mod decoder;
pub mod error;
mod helpers;
mod kem;
mod prng;
mod ring;
mod sampling;
mod threshold;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;

/// Shared Secret Key Length for all BIKE variants (in bytes)
pub const SSK_LEN: usize = 32;

/// The (opaque) shared secret that can be de/serialized by each party.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);

impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, error::Error> {
        Ok(SharedSecretKey(ssk))
    }
}

// Conservative (constant-time) paranoia...
impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        let mut result = true;
        for i in 0..self.0.len() {
            result &= self.0[i] == other.0[i];
        }
        result
    }
}

// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        use crate::error::Error;
        use crate::kem::{
            decaps_internal, encaps_internal, keygen_internal, DecapsScratch, EncapsScratch,
            KeyGenScratch,
        };
        use crate::decoder::DecoderScratch;
        use crate::ring::{self, InvScratch};
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKey;

        const N_BITS: usize = 2 * R_BITS;
        const PK_LEN: usize = (R_BITS + 7) / 8;
        const E_PACKED_LEN: usize = (N_BITS + 7) / 8;
        const MAX_KEYGEN_RETRIES: usize = 16;

        /// Correctly sized public (encapsulation) key specific to this security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct EncapsKey([u8; PK_LEN]);

        /// Correctly sized private (decapsulation) key specific to this security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct DecapsKey([u8; SK_LEN]);

        /// Correctly sized ciphertext specific to this security parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);

        /// Key generation: accepts no input, consumes randomness, and produces an
        /// encapsulation key (public) and a decapsulation key (private).
        pub struct KG();

        impl KeyGen for KG {
            type DecapsByteArray = [u8; SK_LEN];
            type DecapsKey = DecapsKey;
            type EncapsByteArray = [u8; PK_LEN];
            type EncapsKey = EncapsKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(EncapsKey, DecapsKey), Error> {
                for _ in 0..MAX_KEYGEN_RETRIES {
                    let mut seed_d = [0u8; 32];
                    rng.try_fill_bytes(&mut seed_d).map_err(|_| Error::Entropy)?;
                    let mut sigma = [0u8; 32];
                    rng.try_fill_bytes(&mut sigma).map_err(|_| Error::Entropy)?;

                    let mut pk = [0u8; PK_LEN];
                    let mut sk = [0u8; SK_LEN];
                    let (mut h0_bits, mut h1_bits, mut h0_inv, mut pk_bits) =
                        ([0u8; R_BITS], [0u8; R_BITS], [0u8; R_BITS], [0u8; R_BITS]);
                    let mut h1_compact = [0usize; D];
                    let (mut f, mut g, mut c, mut d) = (
                        [0u8; R_BITS + 1],
                        [0u8; R_BITS + 1],
                        [0u8; R_BITS + 1],
                        [0u8; R_BITS + 1],
                    );
                    let scratch = KeyGenScratch {
                        h0_bits: &mut h0_bits,
                        h1_bits: &mut h1_bits,
                        h1_compact: &mut h1_compact,
                        h0_inv: &mut h0_inv,
                        pk_bits: &mut pk_bits,
                        inv_scratch: InvScratch { f: &mut f, g: &mut g, c: &mut c, d: &mut d },
                    };
                    match keygen_internal(&seed_d, R_BITS, D, &mut pk, &mut sk[..2 * PK_LEN], scratch)
                    {
                        Ok(()) => {
                            sk[2 * PK_LEN..].copy_from_slice(&sigma);
                            return Ok((EncapsKey(pk), DecapsKey(sk)));
                        }
                        Err(Error::NotInvertible) => continue,
                        Err(e) => return Err(e),
                    }
                }
                Err(Error::NotInvertible)
            }

            fn validate_keypair_with_rng_vartime(
                _rng: &mut impl CryptoRngCore, ek: &Self::EncapsByteArray,
                dk: &Self::DecapsByteArray,
            ) -> bool {
                let (mut h0_bits, mut h1_bits) = ([0u8; R_BITS], [0u8; R_BITS]);
                ring::byte_to_bit(&dk[..PK_LEN], R_BITS, &mut h0_bits);
                ring::byte_to_bit(&dk[PK_LEN..2 * PK_LEN], R_BITS, &mut h1_bits);

                let mut h0_inv = [0u8; R_BITS];
                let (mut f, mut g, mut c, mut d) = (
                    [0u8; R_BITS + 1],
                    [0u8; R_BITS + 1],
                    [0u8; R_BITS + 1],
                    [0u8; R_BITS + 1],
                );
                let scratch = InvScratch { f: &mut f, g: &mut g, c: &mut c, d: &mut d };
                if !ring::mod_inv(&h0_bits, R_BITS, &mut h0_inv, scratch) {
                    return false;
                }

                let mut h1_compact = [0usize; D];
                let n1 = ring::row_to_compact(&h1_bits, &mut h1_compact);
                let mut pk_bits = [0u8; R_BITS];
                ring::mod_mul(&h1_compact[..n1], &h0_inv, R_BITS, &mut pk_bits);
                let mut pk_packed = [0u8; PK_LEN];
                ring::bit_to_byte(&pk_bits, R_BITS, &mut pk_packed);
                pk_packed == *ek
            }
        }

        impl Encaps for EncapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(Self::SharedSecretKey, Self::CipherText), Error> {
                let mut seed_m = [0u8; 32];
                rng.try_fill_bytes(&mut seed_m).map_err(|_| Error::Entropy)?;

                let mut ct = [0u8; CT_LEN];
                let mut ss = [0u8; 32];
                let (mut pk_bits, mut e_dense, mut e0, mut e1, mut tmp, mut c0_bits) = (
                    [0u8; R_BITS],
                    [0u8; N_BITS],
                    [0u8; R_BITS],
                    [0u8; R_BITS],
                    [0u8; R_BITS],
                    [0u8; R_BITS],
                );
                let mut e_packed = [0u8; E_PACKED_LEN];
                let mut e1_compact = [0usize; T];
                let (mut e0_packed, mut e1_packed) = ([0u8; PK_LEN], [0u8; PK_LEN]);
                let scratch = EncapsScratch {
                    pk_bits: &mut pk_bits,
                    e_packed: &mut e_packed,
                    e_dense: &mut e_dense,
                    e0: &mut e0,
                    e1: &mut e1,
                    e1_compact: &mut e1_compact,
                    tmp: &mut tmp,
                    c0_bits: &mut c0_bits,
                    e0_packed: &mut e0_packed,
                    e1_packed: &mut e1_packed,
                };
                encaps_internal(&self.0, &seed_m, R_BITS, T, N_BITS, &mut ct, &mut ss, scratch);
                Ok((SharedSecretKey(ss), CipherText(ct)))
            }
        }

        impl Decaps for DecapsKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, Error> {
                let mut ss = [0u8; 32];
                let (mut h0_bits, mut h1_bits, mut c0_bits, mut syndrome, mut syndrome_transposed) = (
                    [0u8; R_BITS],
                    [0u8; R_BITS],
                    [0u8; R_BITS],
                    [0u8; R_BITS],
                    [0u8; R_BITS],
                );
                let (mut h0_compact, mut h1_compact) = ([0usize; D], [0usize; D]);
                let mut e = [0u8; N_BITS];
                let (mut e0_prime, mut e1_prime) = ([0u8; R_BITS], [0u8; R_BITS]);
                let (mut e0_prime_packed, mut e1_prime_packed) = ([0u8; PK_LEN], [0u8; PK_LEN]);
                let (mut e_check_packed, mut e_out_packed) =
                    ([0u8; E_PACKED_LEN], [0u8; E_PACKED_LEN]);
                let (mut black, mut gray, mut pos) =
                    ([0u8; N_BITS], [0u8; N_BITS], [0u8; N_BITS]);
                let (mut h0_col, mut h1_col) = ([0usize; D], [0usize; D]);

                let scratch = DecapsScratch {
                    h0_bits: &mut h0_bits,
                    h1_bits: &mut h1_bits,
                    h0_compact: &mut h0_compact,
                    h1_compact: &mut h1_compact,
                    c0_bits: &mut c0_bits,
                    syndrome: &mut syndrome,
                    syndrome_transposed: &mut syndrome_transposed,
                    e: &mut e,
                    e0_prime: &mut e0_prime,
                    e1_prime: &mut e1_prime,
                    e0_prime_packed: &mut e0_prime_packed,
                    e1_prime_packed: &mut e1_prime_packed,
                    e_check_packed: &mut e_check_packed,
                    e_out_packed: &mut e_out_packed,
                    decoder: DecoderScratch {
                        black: &mut black,
                        gray: &mut gray,
                        pos: &mut pos,
                        h0_col: &mut h0_col,
                        h1_col: &mut h1_col,
                    },
                };
                decaps_internal(
                    &self.0, &ct.0, R_BITS, T, N_BITS, TH_A, TH_B, TH_C, &mut ss, scratch,
                );
                Ok(SharedSecretKey(ss))
            }
        }

        impl SerDes for EncapsKey {
            type ByteArray = [u8; PK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, Error> { Ok(EncapsKey(ek)) }
        }

        impl SerDes for DecapsKey {
            type ByteArray = [u8; SK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, Error> { Ok(DecapsKey(dk)) }
        }

        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, Error> { Ok(CipherText(ct)) }
        }
    };
}

/// Functionality for the BIKE-L1 security parameter set (NIST category 1).
#[cfg(feature = "bike-l1")]
pub mod bike_l1 {
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` to get an encaps key and a decaps key.
    //! 2. The originator serializes the encaps key via `into_bytes()` and sends it to the remote party.
    //! 3. The remote party deserializes it via `try_from_bytes(...)` and runs `try_encaps()` to
    //!    get a shared secret and a ciphertext.
    //! 4. The remote party serializes the ciphertext and sends it to the originator.
    //! 5. The originator deserializes the ciphertext and runs `try_decaps(...)` to recover the
    //!    same shared secret.

    const R_BITS: usize = 12323;
    const D: usize = 71;
    const T: usize = 134;
    const TH_A: f64 = 13.530;
    const TH_B: f64 = 0.0069722;
    const TH_C: f64 = 36.0;

    /// Serialized private key length (in bytes): `h0` then `h1`, each `ceil(r/8)` bytes, then `sigma`.
    pub const SK_LEN: usize = 2 * ((R_BITS + 7) / 8) + 32;
    /// Serialized ciphertext length (in bytes): `c0` (`ceil(r/8)` bytes) then `c1` (32 bytes).
    pub const CT_LEN: usize = (R_BITS + 7) / 8 + 32;

    functionality!();
}

/// Functionality for the BIKE-L3 security parameter set (NIST category 3).
#[cfg(feature = "bike-l3")]
pub mod bike_l3 {
    //! See [`crate::bike_l1`] for the usage flow; identical across all three levels.

    const R_BITS: usize = 24659;
    const D: usize = 103;
    const T: usize = 199;
    const TH_A: f64 = 15.2588;
    const TH_B: f64 = 0.005265;
    const TH_C: f64 = 52.0;

    /// Serialized private key length (in bytes): `h0` then `h1`, each `ceil(r/8)` bytes, then `sigma`.
    pub const SK_LEN: usize = 2 * ((R_BITS + 7) / 8) + 32;
    /// Serialized ciphertext length (in bytes): `c0` (`ceil(r/8)` bytes) then `c1` (32 bytes).
    pub const CT_LEN: usize = (R_BITS + 7) / 8 + 32;

    functionality!();
}

/// Functionality for the BIKE-L5 security parameter set (NIST category 5).
#[cfg(feature = "bike-l5")]
pub mod bike_l5 {
    //! See [`crate::bike_l1`] for the usage flow; identical across all three levels.

    const R_BITS: usize = 40973;
    const D: usize = 137;
    const T: usize = 264;
    const TH_A: f64 = 17.8785;
    const TH_B: f64 = 0.00402312;
    const TH_C: f64 = 69.0;

    /// Serialized private key length (in bytes): `h0` then `h1`, each `ceil(r/8)` bytes, then `sigma`.
    pub const SK_LEN: usize = 2 * ((R_BITS + 7) / 8) + 32;
    /// Serialized ciphertext length (in bytes): `c0` (`ceil(r/8)` bytes) then `c1` (32 bytes).
    pub const CT_LEN: usize = (R_BITS + 7) / 8 + 32;

    functionality!();
}
