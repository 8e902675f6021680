// Fixed-seed determinism, round-trip, and implicit-rejection coverage for each security
// level. Unlike the teacher crate's ACVP-JSON-driven `tests/nist_vectors/`, these vectors
// are small literal fixed seeds defined inline, replayed through a custom `RngCore` the
// same way the teacher's `TestRng` replays downloaded ACVP vectors.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_core::{CryptoRng, RngCore};

use bike_kem::traits::{Decaps, Encaps, KeyGen, SerDes};

/// Replays a fixed sequence of byte buffers, one per `fill_bytes` call — used to pin down
/// `try_keygen_with_rng`'s two draws (`d`, `sigma`) and `try_encaps_with_rng`'s one draw (`m`).
struct ReplayRng {
    buffers: Vec<Vec<u8>>,
    next: usize,
}

impl ReplayRng {
    fn new(buffers: Vec<Vec<u8>>) -> Self { ReplayRng { buffers, next: 0 } }
}

impl RngCore for ReplayRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, out: &mut [u8]) {
        let buf = &self.buffers[self.next];
        out.copy_from_slice(buf);
        self.next += 1;
    }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(out);
        Ok(())
    }
}

impl CryptoRng for ReplayRng {}

macro_rules! level_tests {
    ($mod_name:ident, $level:ident) => {
        mod $mod_name {
            use super::*;
            use bike_kem::$level;

            #[test]
            fn fixed_seed_keygen_is_deterministic() {
                let mut rng_a = ReplayRng::new(vec![vec![0x11u8; 32], vec![0x22u8; 32]]);
                let mut rng_b = ReplayRng::new(vec![vec![0x11u8; 32], vec![0x22u8; 32]]);
                let (ek_a, _dk_a) = $level::KG::try_keygen_with_rng(&mut rng_a).unwrap();
                let (ek_b, _dk_b) = $level::KG::try_keygen_with_rng(&mut rng_b).unwrap();
                assert_eq!(ek_a.into_bytes(), ek_b.into_bytes());
            }

            #[test]
            fn round_trip_over_many_trials() {
                let mut rng = ChaCha8Rng::seed_from_u64(42);
                for _ in 0..20 {
                    let (ek, dk) = $level::KG::try_keygen_with_rng(&mut rng).unwrap();
                    let ek_bytes = ek.into_bytes();
                    let ek2 = $level::EncapsKey::try_from_bytes(ek_bytes).unwrap();
                    let (ssk_sender, ct) = ek2.try_encaps_with_rng(&mut rng).unwrap();
                    let ct_bytes = ct.into_bytes();
                    let ct2 = $level::CipherText::try_from_bytes(ct_bytes).unwrap();
                    let ssk_receiver = dk.try_decaps(&ct2).unwrap();
                    assert_eq!(ssk_sender, ssk_receiver);
                }
            }

            #[test]
            fn tampered_ciphertext_does_not_panic_and_diverges() {
                let mut rng = ChaCha8Rng::seed_from_u64(7);
                let (ek, dk) = $level::KG::try_keygen_with_rng(&mut rng).unwrap();
                let (ssk_sender, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();

                let mut ct_bytes = ct.into_bytes();
                ct_bytes[0] ^= 0x01;
                let tampered = $level::CipherText::try_from_bytes(ct_bytes).unwrap();

                let ssk_receiver = dk.try_decaps(&tampered).unwrap();
                assert_ne!(ssk_sender, ssk_receiver);
            }

            #[test]
            fn seed_based_encaps_matches_rng_based_with_matching_seed() {
                let mut rng = ChaCha8Rng::seed_from_u64(99);
                let (ek, _dk) = $level::KG::try_keygen_with_rng(&mut rng).unwrap();

                let seed = [0x42u8; 32];
                let (ssk_a, ct_a) = ek.encaps_from_seed(&seed);
                let (ssk_b, ct_b) = ek.encaps_from_seed(&seed);
                assert_eq!(ssk_a, ssk_b);
                assert_eq!(ct_a.into_bytes(), ct_b.into_bytes());
            }
        }
    };
}

#[cfg(feature = "bike-l1")]
level_tests!(bike_l1_tests, bike_l1);

#[cfg(feature = "bike-l3")]
level_tests!(bike_l3_tests, bike_l3);

#[cfg(feature = "bike-l5")]
level_tests!(bike_l5_tests, bike_l5);
