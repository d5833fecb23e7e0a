//! Scalar multiplication strategies built on top of [`primeorder`]'s
//! double-and-add baseline and [`crate::edwards`]'s: fixed 4-bit windows for
//! secret scalars, Shamir's trick (via [`crate::sc::naf_pair_vartime`]) for
//! double-base verification exponents, and the secp256k1 GLV endomorphism
//! split, ported from `k256::arithmetic::mul`'s `decompose_scalar`.

use crate::curve::k256;
use crate::edwards::{EdwardsParams, ExtendedPoint};
use crate::sc::{naf_pair_vartime, Sc};
use crate::weier::K256Projective;
use primefield::Modulus;
use primeorder::{FieldElement, ProjectivePoint, WeierstrassParams};
use subtle::{Choice, ConditionallySelectable};

/// Constant-time fixed-window scalar multiplication: 4-bit unsigned digits,
/// most significant window first, with a 16-entry conditional-select
/// lookup table (`0*P, 1*P, ..., 15*P`) standing in for the signed 8-entry
/// table `k256::arithmetic::mul::LookupTable` uses, since these digits are
/// unsigned rather than NAF-recoded.
pub fn windowed_mul<P: WeierstrassParams>(
    point: &ProjectivePoint<P>,
    digits_lsb_first: &[u32],
) -> ProjectivePoint<P> {
    let mut table = [ProjectivePoint::<P>::identity(); 16];
    for i in 1..16 {
        table[i] = table[i - 1].add(point);
    }

    let mut acc = ProjectivePoint::<P>::identity();
    for (i, &digit) in digits_lsb_first.iter().enumerate().rev() {
        if i != digits_lsb_first.len() - 1 {
            for _ in 0..4 {
                acc = acc.double();
            }
        }
        let mut selected = ProjectivePoint::<P>::identity();
        for (j, candidate) in table.iter().enumerate() {
            let choice = Choice::from((digit == j as u32) as u8);
            selected = ProjectivePoint::conditional_select(&selected, candidate, choice);
        }
        acc = acc.add(&selected);
    }
    acc
}

/// Shamir's trick: `u1*g + u2*q` in a single combined ladder via paired NAF
/// recoding (see [`crate::sc::naf_pair_vartime`]), instead of two separate
/// scalar multiplications. Used by ECDSA/ECGDSA-style verification, whose
/// exponents are public by definition, so the non-constant-time digit
/// dispatch below is sound.
pub fn double_scalar_mul_vartime<
    P: WeierstrassParams,
    const LIMBS: usize,
    const WIDE: usize,
    M: Modulus<LIMBS, WIDE>,
>(
    u1: &Sc<LIMBS, WIDE, M>,
    g: &ProjectivePoint<P>,
    u2: &Sc<LIMBS, WIDE, M>,
    q: &ProjectivePoint<P>,
) -> ProjectivePoint<P> {
    let digits = naf_pair_vartime(u1, u2);

    let g_neg = g.negate();
    let q_neg = q.negate();
    let gq = g.add(q);
    let gnq = g.add(&q_neg);
    let gq_neg = gq.negate();
    let gnq_neg = gnq.negate();

    let mut acc = ProjectivePoint::<P>::identity();
    for &(d0, d1) in digits.iter().rev() {
        acc = acc.double();
        let term = match (d0, d1) {
            (0, 0) => None,
            (1, 0) => Some(*g),
            (-1, 0) => Some(g_neg),
            (0, 1) => Some(*q),
            (0, -1) => Some(q_neg),
            (1, 1) => Some(gq),
            (-1, -1) => Some(gq_neg),
            (1, -1) => Some(gnq),
            (-1, 1) => Some(gnq_neg),
            _ => unreachable!("NAF digits are always in {{-1, 0, 1}}"),
        };
        if let Some(t) = term {
            acc = acc.add(&t);
        }
    }
    acc
}

/// Splits `k` into `(r1, r2)` with `r1 + r2*lambda == k (mod n)` and both
/// about half the bit length of `n`, via the rounded-multiplication method
/// `k256::arithmetic::mul::decompose_scalar` implements (itself citing
/// Gouvea-Oliveira-Lopez 2012 and HMV algorithm 3.74).
pub fn glv_decompose(k: &k256::Scalar) -> (k256::Scalar, k256::Scalar) {
    let c1 = k.mul_shift_var(&k256::G1, 272);
    let c2 = k.mul_shift_var(&k256::G2, 272);
    let c1 = c1.mul(&k256::MINUS_B1);
    let c2 = c2.mul(&k256::MINUS_B2);
    let r2 = c1.add(&c2);
    let r1 = k.add(&r2.mul(&k256::MINUS_LAMBDA));
    (r1, r2)
}

/// GLV-accelerated variable-time scalar multiplication for secp256k1:
/// decomposes `k` into two half-width scalars `r1, r2` with
/// `k*P == r1*P + r2*(lambda*P) == r1*P + r2*(beta*x(P), y(P))`, then runs
/// Shamir's trick on the two half-width exponents instead of one full-width
/// ladder.
pub fn glv_mul_vartime(k: &k256::Scalar, point: &K256Projective) -> K256Projective {
    let (r1, r2) = glv_decompose(k);

    let affine = point.to_affine();
    let endo_x = affine.x().mul(&k256::BETA);
    let endo = primeorder::AffinePoint::<crate::weier::k256_curve::Params>::new(endo_x, affine.y())
        .to_projective();

    let (r1_abs, p1) = abs_and_negate(r1, *point);
    let (r2_abs, p2) = abs_and_negate(r2, endo);

    double_scalar_mul_vartime(&r1_abs, &p1, &r2_abs, &p2)
}

/// `decompose_scalar` can return a scalar representing a small negative
/// integer (stored as its reduction mod `n`, i.e. `n - |value|`); since the
/// half-width scalars produced by GLV decomposition are far smaller than
/// `n/2`, any scalar whose top half is all-ones is treated as negative and
/// negated back to its small positive magnitude alongside the point.
fn abs_and_negate<P: WeierstrassParams>(
    s: k256::Scalar,
    p: ProjectivePoint<P>,
) -> (k256::Scalar, ProjectivePoint<P>) {
    if s.is_small_vartime() {
        (s, p)
    } else {
        (s.neg(), p.negate())
    }
}

/// Fixed-window scalar multiplication for twisted-Edwards curves, mirroring
/// [`windowed_mul`] but over [`ExtendedPoint`]'s unified addition law.
pub fn edwards_windowed_mul<P: EdwardsParams>(
    point: &ExtendedPoint<P>,
    digits_lsb_first: &[u32],
) -> ExtendedPoint<P> {
    let mut table = [ExtendedPoint::<P>::identity(); 16];
    for i in 1..16 {
        table[i] = table[i - 1].add(point);
    }

    let mut acc = ExtendedPoint::<P>::identity();
    for (i, &digit) in digits_lsb_first.iter().enumerate().rev() {
        if i != digits_lsb_first.len() - 1 {
            for _ in 0..4 {
                acc = acc.double();
            }
        }
        let mut selected = ExtendedPoint::<P>::identity();
        for (j, candidate) in table.iter().enumerate() {
            let choice = Choice::from((digit == j as u32) as u8);
            selected = ExtendedPoint::conditional_select(&selected, candidate, choice);
        }
        acc = acc.add(&selected);
    }
    acc
}
