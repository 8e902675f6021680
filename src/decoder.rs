//! Black-Gray-Flip (BGF) iterative bit-flipping decoder.

use crate::ring;
use crate::threshold;

const TAU: usize = 3;
const N_ITER: usize = 5;

/// Outcome of running the decoder to convergence or exhausting its iteration budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The syndrome reached zero: `e` is the recovered error vector.
    Success,
    /// The syndrome never reached zero after the iteration budget.
    Failure,
}

fn hamming_weight(s: &[u8]) -> usize {
    s.iter().map(|&b| b as usize).sum()
}

fn recompute_syndrome(s: &mut [u8], pos: usize, r: usize, h0_compact: &[usize], h1_compact: &[usize]) {
    if pos < r {
        for &h in h0_compact {
            if h <= pos {
                s[pos - h] ^= 1;
            } else {
                s[r - h + pos] ^= 1;
            }
        }
    } else {
        let p = pos - r;
        for &h in h1_compact {
            if h <= p {
                s[p - h] ^= 1;
            } else {
                s[r - h + p] ^= 1;
            }
        }
    }
}

fn ctr(h_col: &[usize], position: usize, r: usize, s: &[u8]) -> usize {
    h_col.iter().filter(|&&h| s[(h + position) % r] != 0).count()
}

/// The position in `e` is adjusted because the decoder's syndrome is transposed relative
/// to the caller's (e0 || e1) layout.
fn flip_adjusted_error_position(e: &mut [u8], position: usize, r: usize, n_bits: usize) {
    let adjusted = if position == 0 || position == r {
        position
    } else if position > r {
        (n_bits - position) + r
    } else {
        r - position
    };
    e[adjusted] ^= 1;
}

#[allow(clippy::too_many_arguments)]
fn bf_masked_iter(
    e: &mut [u8],
    s: &mut [u8],
    mask: &[u8],
    t: usize,
    r: usize,
    n_bits: usize,
    h0_compact: &[usize],
    h1_compact: &[usize],
    h0_col: &[usize],
    h1_col: &[usize],
    pos: &mut [u8],
) {
    for p in pos.iter_mut() {
        *p = 0;
    }
    for j in 0..r {
        if ctr(h0_col, j, r, s) >= t && mask[j] != 0 {
            flip_adjusted_error_position(e, j, r, n_bits);
            pos[j] = 1;
        }
    }
    for j in 0..r {
        if ctr(h1_col, j, r, s) >= t && mask[r + j] != 0 {
            flip_adjusted_error_position(e, r + j, r, n_bits);
            pos[r + j] = 1;
        }
    }
    for (j, &p) in pos.iter().enumerate().take(n_bits) {
        if p == 1 {
            recompute_syndrome(s, j, r, h0_compact, h1_compact);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn bf_iter(
    e: &mut [u8],
    black: &mut [u8],
    gray: &mut [u8],
    s: &mut [u8],
    t: usize,
    r: usize,
    n_bits: usize,
    h0_compact: &[usize],
    h1_compact: &[usize],
    h0_col: &[usize],
    h1_col: &[usize],
    pos: &mut [u8],
) {
    for p in pos.iter_mut() {
        *p = 0;
    }
    for j in 0..r {
        let c = ctr(h0_col, j, r, s);
        if c >= t {
            flip_adjusted_error_position(e, j, r, n_bits);
            pos[j] = 1;
            black[j] = 1;
        } else if c + TAU >= t {
            gray[j] = 1;
        }
    }
    for j in 0..r {
        let c = ctr(h1_col, j, r, s);
        if c >= t {
            flip_adjusted_error_position(e, r + j, r, n_bits);
            pos[r + j] = 1;
            black[r + j] = 1;
        } else if c + TAU >= t {
            gray[r + j] = 1;
        }
    }
    for (j, &p) in pos.iter().enumerate().take(n_bits) {
        if p == 1 {
            recompute_syndrome(s, j, r, h0_compact, h1_compact);
        }
    }
}

/// Scratch buffers needed by [`decode`], all sized by the caller's concrete parameter set:
/// `black`/`gray`/`pos` have length `2r`, `h0_col`/`h1_col` have length `d`.
pub struct DecoderScratch<'a> {
    /// Positions flipped in the main pass, re-examined under a stricter threshold.
    pub black: &'a mut [u8],
    /// Positions near the threshold, re-examined under a stricter threshold.
    pub gray: &'a mut [u8],
    /// Scratch recording which positions were flipped in the current pass.
    pub pos: &'a mut [u8],
    /// Column-index view of `h0_compact`.
    pub h0_col: &'a mut [usize],
    /// Column-index view of `h1_compact`.
    pub h1_col: &'a mut [usize],
}

/// Runs the BGF decoder for up to 5 outer iterations, recovering a `2r`-bit dense-bit error
/// vector `e` from the transposed syndrome `s` (consumed: left at its final value).
#[allow(clippy::too_many_arguments)]
pub fn decode(
    e: &mut [u8],
    s: &mut [u8],
    r: usize,
    n_bits: usize,
    h0_compact: &[usize],
    h1_compact: &[usize],
    th_a: f64,
    th_b: f64,
    th_c: f64,
    scratch: DecoderScratch<'_>,
) -> DecodeOutcome {
    for x in e.iter_mut() {
        *x = 0;
    }

    let DecoderScratch { black, gray, pos, h0_col, h1_col } = scratch;
    ring::compact_row_to_column(h0_compact, r, h0_col);
    ring::compact_row_to_column(h1_compact, r, h1_col);

    for iter in 1..=N_ITER {
        for b in black.iter_mut() {
            *b = 0;
        }
        for g in gray.iter_mut() {
            *g = 0;
        }

        let t = threshold::affine_threshold(th_a, th_b, th_c, hamming_weight(s));
        bf_iter(e, black, gray, s, t, r, n_bits, h0_compact, h1_compact, h0_col, h1_col, pos);

        if iter == 1 {
            let t_masked = (h0_compact.len() + 1) / 2 + 1;
            bf_masked_iter(e, s, black, t_masked, r, n_bits, h0_compact, h1_compact, h0_col, h1_col, pos);
            bf_masked_iter(e, s, gray, t_masked, r, n_bits, h0_compact, h1_compact, h0_col, h1_col, pos);
        }
    }

    if hamming_weight(s) == 0 {
        DecodeOutcome::Success
    } else {
        DecodeOutcome::Failure
    }
}
