//! X-only Montgomery-curve arithmetic (`v^2 = u^3 + A*u^2 + u`), the
//! representation used by Curve25519/X25519 and Curve448/X448.
//!
//! The ladder follows Algorithm 8 of Costello-Smith, "Montgomery curves and
//! their arithmetic" (2017), the same formulation `ed448-goldilocks`'s
//! `differential_add_and_double` implements; RFC 7748's clamping and wire
//! encoding live in [`crate::xdh`], which drives this module.

use primeorder::FieldElement;
use subtle::{Choice, ConditionallySelectable};

/// A Montgomery curve's field backend and `A` coefficient, reduced to the
/// single constant the ladder needs.
pub trait MontgomeryParams: Copy + Clone + 'static {
    type Field: FieldElement;

    /// `(A + 2) / 4`.
    const A24: Self::Field;
}

/// A point in `(U : W)` projective coordinates, `u = U/W`.
#[derive(Clone, Copy, Debug)]
pub struct XPoint<P: MontgomeryParams> {
    u: P::Field,
    w: P::Field,
}

impl<P: MontgomeryParams> XPoint<P> {
    /// The point at infinity, `(1 : 0)`.
    pub fn identity() -> Self {
        Self {
            u: P::Field::one(),
            w: P::Field::zero(),
        }
    }

    pub fn from_affine_u(u: P::Field) -> Self {
        Self {
            u,
            w: P::Field::one(),
        }
    }

    /// Recovers the affine `u`-coordinate. Returns `u = 0` for the point at
    /// infinity, matching RFC 7748 §5's behavior for a zero shared secret
    /// rather than signalling an error — callers that must reject that case
    /// (e.g. Diffie-Hellman) check for it explicitly.
    pub fn to_affine_u(&self) -> P::Field {
        match Option::from(self.w.invert()) {
            Some(w_inv) => self.u.mul(&w_inv),
            None => P::Field::zero(),
        }
    }
}

impl<P: MontgomeryParams> ConditionallySelectable for XPoint<P> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            u: P::Field::conditional_select(&a.u, &b.u, choice),
            w: P::Field::conditional_select(&a.w, &b.w, choice),
        }
    }
}

/// One differential addition-and-doubling step of the Montgomery ladder:
/// `p` becomes `2p`, `q` becomes `p + q`, given the affine `u`-coordinate of
/// `p - q` (which stays fixed across the whole ladder).
fn differential_add_and_double<P: MontgomeryParams>(
    p: &mut XPoint<P>,
    q: &mut XPoint<P>,
    affine_diff_u: &P::Field,
) {
    let t0 = p.u.add(&p.w);
    let t1 = p.u.sub(&p.w);
    let t2 = q.u.add(&q.w);
    let t3 = q.u.sub(&q.w);

    let t4 = t0.square();
    let t5 = t1.square();
    let t6 = t4.sub(&t5);

    let t7 = t0.mul(&t3);
    let t8 = t1.mul(&t2);

    let t9 = t7.add(&t8);
    let t10 = t7.sub(&t8);

    let t11 = t9.square();
    let t12 = t10.square();
    let t13 = P::A24.mul(&t6);

    let t14 = t4.mul(&t5);
    let t15 = t13.add(&t5);

    let t16 = t6.mul(&t15);
    let t17 = affine_diff_u.mul(&t12);
    let t18 = t11;

    p.u = t14;
    p.w = t16;
    q.u = t18;
    q.w = t17;
}

/// Scalar-multiplies the ladder's distinguished base `u`-coordinate by the
/// integer whose big-endian bits are given, most significant bit first.
/// Every call inspects every bit (constant-time in the scalar), matching
/// RFC 7748's `Z(n, P)` with `n`'s representation already clamped by the
/// caller.
pub fn x_ladder<P: MontgomeryParams>(bits_msb_first: &[bool], u: P::Field) -> P::Field {
    let mut x0 = XPoint::<P>::identity();
    let mut x1 = XPoint::<P>::from_affine_u(u);

    let mut swap = Choice::from(0);
    for &bit in bits_msb_first {
        let choice = Choice::from(bit as u8);
        let do_swap = choice ^ swap;
        XPoint::conditional_swap(&mut x0, &mut x1, do_swap);
        differential_add_and_double(&mut x0, &mut x1, &u);
        swap = choice;
    }
    XPoint::conditional_swap(&mut x0, &mut x1, swap);

    x0.to_affine_u()
}

impl<P: MontgomeryParams> XPoint<P> {
    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        <P::Field as ConditionalSwap>::conditional_swap(&mut a.u, &mut b.u, choice);
        <P::Field as ConditionalSwap>::conditional_swap(&mut a.w, &mut b.w, choice);
    }
}

/// A tiny extension trait so [`XPoint::conditional_swap`] can swap two field
/// elements in place without requiring `subtle::ConditionallyNegatable`-style
/// plumbing for every [`FieldElement`] impl.
trait ConditionalSwap: Sized + ConditionallySelectable {
    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        let new_a = Self::conditional_select(a, b, choice);
        let new_b = Self::conditional_select(b, a, choice);
        *a = new_a;
        *b = new_b;
    }
}
impl<T: Sized + ConditionallySelectable> ConditionalSwap for T {}

use crate::curve::{c25519, c448};

#[derive(Clone, Copy)]
pub struct C25519Params;
impl MontgomeryParams for C25519Params {
    type Field = c25519::Field;
    const A24: Self::Field = c25519::MONT_A24;
}

#[derive(Clone, Copy)]
pub struct C448Params;
impl MontgomeryParams for C448Params {
    type Field = c448::Field;
    const A24: Self::Field = c448::MONT_A24;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_by_one_is_identity_on_u() {
        let bits = {
            let mut b = [false; 255];
            b[254] = true;
            b
        };
        let out = x_ladder::<C25519Params>(&bits, c25519::MONT_U);
        assert_eq!(out, c25519::MONT_U);
    }

    #[test]
    fn ladder_by_zero_is_identity_point() {
        let bits = [false; 255];
        let out = x_ladder::<C25519Params>(&bits, c25519::MONT_U);
        assert_eq!(out, c25519::Field::ZERO);
    }
}
