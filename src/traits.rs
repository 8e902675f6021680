use rand_core::{CryptoRng, CryptoRngCore, RngCore};

#[cfg(feature = "default-rng")]
use rand_core::OsRng;

use crate::error::Error;

/// The `KeyGen` trait is defined to allow trait objects.
pub trait KeyGen {
    /// The (public) encapsulation key sent from the originator to the remote party.
    type EncapsKey;
    /// The (private) decapsulation key used by the originator to generate the shared secret.
    type DecapsKey;
    /// A serialized (public) encapsulation key byte array of the correct length.
    type EncapsByteArray;
    /// A serialized (private) decapsulation key byte array of the correct length.
    type DecapsByteArray;

    /// Generates an encapsulation and decapsulation key pair specific to this security
    /// parameter set, using the OS default random number generator.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails, or if key generation does
    /// not converge on an invertible `h0` within its retry budget.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "bike-l1")] {
    /// use bike_kem::bike_l1;
    /// use bike_kem::traits::{KeyGen, SerDes, Decaps, Encaps};
    ///
    /// let (ek1, dk1) = bike_l1::KG::try_keygen()?;
    /// let ek1_bytes = ek1.into_bytes();
    ///
    /// let ek2_bytes = ek1_bytes;
    /// let ek2 = bike_l1::EncapsKey::try_from_bytes(ek2_bytes)?;
    /// let (ssk2, ct2) = ek2.try_encaps()?;
    /// let ct2_bytes = ct2.into_bytes();
    ///
    /// let ct1_bytes = ct2_bytes;
    /// let ct1 = bike_l1::CipherText::try_from_bytes(ct1_bytes)?;
    /// let ssk1 = dk1.try_decaps(&ct1)?;
    ///
    /// assert_eq!(ssk1, ssk2);
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::EncapsKey, Self::DecapsKey), Error> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates an encapsulation and decapsulation key pair using a provided random
    /// number generator.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails, or if key generation does
    /// not converge on an invertible `h0` within its retry budget.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::EncapsKey, Self::DecapsKey), Error>;

    /// Generates an encapsulation and decapsulation key pair specific to this security
    /// parameter set from a provided 64-byte seed: the first 32 bytes seed the sampling of
    /// the private polynomials `h0`/`h1`, the last 32 bytes become `sigma`, the
    /// implicit-rejection fallback secret.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(feature = "bike-l1")] {
    /// use rand_core::OsRng;
    /// use rand_core::RngCore;
    /// use bike_kem::bike_l1;
    /// use bike_kem::traits::{KeyGen, SerDes, Decaps, Encaps};
    ///
    /// let mut d_z = [0u8; 64];
    /// OsRng.fill_bytes(&mut d_z);
    ///
    /// let (ek1, dk1) =
    ///     bike_l1::KG::keygen_from_seed(d_z[0..32].try_into().unwrap(), d_z[32..64].try_into().unwrap());
    /// let ek1_bytes = ek1.into_bytes();
    ///
    /// let ek2_bytes = ek1_bytes;
    /// let ek2 = bike_l1::EncapsKey::try_from_bytes(ek2_bytes)?;
    /// let (ssk2, ct2) = ek2.try_encaps_with_rng(&mut OsRng)?;
    /// let ct2_bytes = ct2.into_bytes();
    ///
    /// let ct1_bytes = ct2_bytes;
    /// let ct1 = bike_l1::CipherText::try_from_bytes(ct1_bytes)?;
    /// let ssk1 = dk1.try_decaps(&ct1)?;
    ///
    /// assert_eq!(ssk1, ssk2);
    /// # }
    /// # Ok(())}
    /// ```
    #[must_use]
    fn keygen_from_seed(d: [u8; 32], z: [u8; 32]) -> (Self::EncapsKey, Self::DecapsKey) {
        Self::try_keygen_with_rng(&mut SeedPairRng { first: d, second: z, drawn_first: false })
            .expect("fixed-weight sampling from a 32-byte seed is invertible with overwhelming probability")
    }

    /// Performs validation between an encapsulation key and a decapsulation key (both in
    /// byte arrays), for example after both have been serialized, stored to disk, and then
    /// retrieved. Not intended to operate in constant time.
    fn validate_keypair_with_rng_vartime(
        rng: &mut impl CryptoRngCore, ek: &Self::EncapsByteArray, dk: &Self::DecapsByteArray,
    ) -> bool;
}

/// The `Encaps` trait defines methods for generating shared secrets and ciphertexts using
/// an encapsulation key.
pub trait Encaps {
    /// The shared secret key type generated during encapsulation
    type SharedSecretKey;
    /// The ciphertext type transmitted from the encapsulating party to the decapsulating party
    type CipherText;

    /// Generates a shared secret and ciphertext from an encapsulation key specific to this
    /// security parameter set, using the OS default random number generator.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails.
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKey, Self::CipherText), Error> {
        self.try_encaps_with_rng(&mut OsRng)
    }

    /// Generates a shared secret and ciphertext from an encapsulation key specific to this
    /// security parameter set, using a provided random number generator.
    ///
    /// # Errors
    /// Returns an error when the random number generator fails.
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKey, Self::CipherText), Error>;

    /// Generates a shared secret and ciphertext from an encapsulation key specific to this
    /// security parameter set, using a provided 32-byte seed in place of a random number
    /// generator; the seed doubles as the encapsulated message.
    fn encaps_from_seed(&self, seed: &[u8; 32]) -> (Self::SharedSecretKey, Self::CipherText) {
        self.try_encaps_with_rng(&mut DummyRng { data: *seed }).expect("rng will not fail")
    }
}

/// Internal RNG implementation that always returns the same fixed seed; backs
/// [`Encaps::encaps_from_seed`].
struct DummyRng {
    data: [u8; 32],
}

impl RngCore for DummyRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, _out: &mut [u8]) { unimplemented!() }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        out.copy_from_slice(&self.data);
        Ok(())
    }
}

impl CryptoRng for DummyRng {}

/// Internal RNG implementation that returns one fixed 32-byte seed on its first draw and a
/// second on every draw after that; backs [`KeyGen::keygen_from_seed`], which needs a
/// sampling seed (`d`) followed by the fallback secret `sigma` (`z`).
struct SeedPairRng {
    first: [u8; 32],
    second: [u8; 32],
    drawn_first: bool,
}

impl RngCore for SeedPairRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, _out: &mut [u8]) { unimplemented!() }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        if self.drawn_first {
            out.copy_from_slice(&self.second);
        } else {
            out.copy_from_slice(&self.first);
            self.drawn_first = true;
        }
        Ok(())
    }
}

impl CryptoRng for SeedPairRng {}

/// The `Decaps` trait defines methods for recovering the shared secret using
/// a decapsulation key and ciphertext.
pub trait Decaps {
    /// The ciphertext type received from the encapsulating party
    type CipherText;
    /// The shared secret key type generated during decapsulation
    type SharedSecretKey;

    /// Recovers the shared secret from a decapsulation key and ciphertext specific to this
    /// security parameter set. Operates in constant time and never fails: a malformed or
    /// tampered ciphertext is rejected implicitly (the returned secret is indistinguishable
    /// from a genuine one to a caller without the decapsulation key's `sigma`), not by
    /// returning an error.
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, Error>;
}

/// The `SerDes` trait provides methods for serializing and deserializing cryptographic objects.
pub trait SerDes {
    /// The fixed-size byte array type used for serialization
    type ByteArray;

    /// Produces a byte array of fixed size specific to the struct being serialized.
    fn into_bytes(self) -> Self::ByteArray;

    /// Consumes a byte array of fixed size specific to the struct being deserialized;
    /// performs validation.
    ///
    /// # Errors
    /// Returns an error on malformed input.
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, Error>
    where
        Self: Sized;
}
