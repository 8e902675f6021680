//! Bit-flipping threshold oracle: given the current syndrome weight, decides how many
//! unsatisfied parity checks must touch a column before its bit is flipped.
//!
//! Two profiles are provided. [`affine_threshold`] is what [`crate::kem`] wires into the
//! decoder. [`info_theoretic_threshold`] is the source project's alternative derivation
//! (log-binomial analysis of the parity-check distribution); it is implemented and tested
//! but not called from the KEM path, matching the source's note that only one threshold
//! function is load-bearing at a time.

#![allow(dead_code)]

use libm::{exp, floor, lgamma, log};

/// `T = floor(max(a + b * S, c))`, the affine profile used by the decoder.
pub fn affine_threshold(a: f64, b: f64, c: f64, syndrome_weight: usize) -> usize {
    let t = a + b * syndrome_weight as f64;
    let t = if t > c { t } else { c };
    floor(t) as usize
}

fn lnbino(n: usize, t: usize) -> f64 {
    if t == 0 || n == t {
        0.0
    } else {
        lgamma((n + 1) as f64) - lgamma((t + 1) as f64) - lgamma((n - t + 1) as f64)
    }
}

fn xlny(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x * log(y)
    }
}

fn lnbinomialpmf(n: usize, k: usize, p: f64, q: f64) -> f64 {
    lnbino(n, k) + xlny(k as f64, p) + xlny((n - k) as f64, q)
}

fn euh_log(n: usize, w: usize, t: usize, i: usize) -> f64 {
    lnbino(w, i) + lnbino(n - w, t - i) - lnbino(n, t)
}

/// `X = sum((i - 1) * E_i, i odd, i < 10)` where `E_i = exp(euh_log(n, w, t, i))`.
fn iks(n: usize, w: usize, t: usize) -> f64 {
    let mut x = 0.0;
    let mut denom = 0.0;
    let mut i = 1usize;
    while i < 10 && i < t {
        let e_i = exp(euh_log(n, w, t, i));
        x += (i as f64 - 1.0) * e_i;
        denom += e_i;
        i += 2;
    }
    if denom == 0.0 {
        0.0
    } else {
        x / denom
    }
}

/// Information-theoretic threshold: largest `T` in `((d+1)/2, d]` for which the estimated
/// likelihood of a genuine error bit exceeds that of a spurious flip, given parity-check
/// row weight `w`, block length `n`, block count's error weight `t`, and syndrome weight `s`.
pub fn info_theoretic_threshold(n: usize, d: usize, w: usize, s: usize, t: usize) -> usize {
    let x = iks(n, w, t) * s as f64;
    let p = ((w - 1) as f64 * s as f64 - x) / (n - t) as f64 / d as f64;
    let q = (s as f64 + x) / t as f64 / d as f64;

    if p >= 1.0 || p > q {
        return d;
    }
    if q >= 1.0 {
        let mut threshold = d + 1;
        loop {
            threshold -= 1;
            let diff = -exp(lnbinomialpmf(d, threshold, p, 1.0 - p)) * (n - t) as f64 + 1.0;
            if !(diff >= 0.0 && threshold > (d + 1) / 2) {
                break;
            }
        }
        return if threshold < d { threshold + 1 } else { d };
    }
    let mut threshold = d + 1;
    loop {
        threshold -= 1;
        let diff = -exp(lnbinomialpmf(d, threshold, p, 1.0 - p)) * (n - t) as f64
            + exp(lnbinomialpmf(d, threshold, q, 1.0 - q)) * t as f64;
        if !(diff >= 0.0 && threshold > (d + 1) / 2) {
            break;
        }
    }
    if threshold < d {
        threshold + 1
    } else {
        d
    }
}
