use sha3::{Digest, Sha3_384};

/// If the condition is not met, return the given error. Borrowed from the `anyhow` crate.
#[allow(unused_macros)]
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}

#[allow(unused_imports)]
pub(crate) use ensure; // make available throughout crate

/// Function L: `H(e0 || e1)` truncated to 32 bytes, used to derive the shared secret from
/// the decoded error vector.
pub(crate) fn l(e0: &[u8], e1: &[u8], out: &mut [u8; 32]) {
    let mut hasher = Sha3_384::new();
    Digest::update(&mut hasher, e0);
    Digest::update(&mut hasher, e1);
    let digest = hasher.finalize();
    out.copy_from_slice(&digest[..32]);
}

/// Function K: `H(m || c0 || c1)` truncated to 32 bytes, the implicit-rejection fallback
/// used when the decoder fails or the re-encryption check does not match.
pub(crate) fn k(m: &[u8], c0: &[u8], c1: &[u8], out: &mut [u8; 32]) {
    let mut hasher = Sha3_384::new();
    Digest::update(&mut hasher, m);
    Digest::update(&mut hasher, c0);
    Digest::update(&mut hasher, c1);
    let digest = hasher.finalize();
    out.copy_from_slice(&digest[..32]);
}

#[cfg(test)]
mod tests {
    use super::{k, l};

    #[test]
    fn l_is_deterministic_and_depends_on_both_halves() {
        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        l(&[1, 2, 3], &[4, 5, 6], &mut out_a);
        l(&[1, 2, 3], &[4, 5, 6], &mut out_b);
        assert_eq!(out_a, out_b);

        let mut out_c = [0u8; 32];
        l(&[1, 2, 3], &[4, 5, 7], &mut out_c);
        assert_ne!(out_a, out_c);
    }

    #[test]
    fn k_is_deterministic_and_depends_on_all_inputs() {
        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        k(&[9; 32], &[1, 2], &[3, 4], &mut out_a);
        k(&[9; 32], &[1, 2], &[3, 4], &mut out_b);
        assert_eq!(out_a, out_b);

        let mut out_c = [0u8; 32];
        k(&[8; 32], &[1, 2], &[3, 4], &mut out_c);
        assert_ne!(out_a, out_c);
    }
}
