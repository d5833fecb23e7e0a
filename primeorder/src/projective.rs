//! Jacobian-coordinate short-Weierstrass arithmetic.
//!
//! Points are held as `(X : Y : Z)` with affine coordinates
//! `x = X/Z^2, y = Y/Z^3`, satisfying `Y^2 = X^3 + a*X*Z^4 + b*Z^6`. The
//! identity is represented by `Z = 0`.
//!
//! Doubling uses the standard `dbl-2007-bl` / `dbl-2001-b` / `dbl-2009-l`
//! formulas (selected per curve by [`WeierstrassParams::A_IS_ZERO`] /
//! [`WeierstrassParams::A_IS_MINUS_3`], a compile-time, public choice — the
//! curve in use is never secret). Addition uses the general Jacobian
//! `add-2007-bl` formula, then resolves the degenerate inputs (either
//! operand the identity, equal points, or mutually negated points) by
//! conditionally selecting among the generic-add result, the dedicated
//! doubling result, and the identity, per Brier-Joye's unification
//! technique — branch-free so that adding two points never leaks which of
//! the degenerate cases (if any) occurred.

use crate::affine::AffinePoint;
use crate::field::{FieldElement, WeierstrassParams};
use core::ops::{Add, Neg, Sub};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// A point on a short-Weierstrass curve in Jacobian coordinates.
#[derive(Clone, Copy)]
pub struct ProjectivePoint<P: WeierstrassParams> {
    pub(crate) x: P::Field,
    pub(crate) y: P::Field,
    pub(crate) z: P::Field,
}

impl<P: WeierstrassParams> ProjectivePoint<P> {
    /// The point at infinity, represented by `Z = 0`.
    pub fn identity() -> Self {
        Self {
            x: P::Field::zero(),
            y: P::Field::zero(),
            z: P::Field::zero(),
        }
    }

    pub fn generator(gx: P::Field, gy: P::Field) -> Self {
        Self {
            x: gx,
            y: gy,
            z: P::Field::one(),
        }
    }

    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    pub fn from_affine(p: &AffinePoint<P>) -> Self {
        let identity = Self::identity();
        let affine = Self {
            x: p.x,
            y: p.y,
            z: P::Field::one(),
        };
        Self::conditional_select(&affine, &identity, p.is_identity())
    }

    pub fn to_affine(&self) -> AffinePoint<P> {
        let zinv = self.z.invert();
        let is_ident = self.is_identity();
        let zinv = zinv.unwrap_or_else(P::Field::zero);
        let zinv2 = zinv.square();
        let zinv3 = zinv2.mul(&zinv);
        let x = self.x.mul(&zinv2);
        let y = self.y.mul(&zinv3);
        AffinePoint {
            x: P::Field::conditional_select(&x, &P::Field::zero(), is_ident),
            y: P::Field::conditional_select(&y, &P::Field::zero(), is_ident),
            infinity: is_ident,
        }
    }

    /// Point negation: `(X, -Y, Z)`.
    pub fn negate(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
        }
    }

    fn double_a_zero(&self) -> Self {
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let xb = self.x.add(&b).square();
        let d = xb.sub(&a).sub(&c).double();
        let e = a.double().add(&a);
        let f = e.square();
        let x3 = f.sub(&d.double());
        let y3 = e.mul(&d.sub(&x3)).sub(&c.double().double().double());
        let z3 = self.y.mul(&self.z).double();
        Self { x: x3, y: y3, z: z3 }
    }

    fn double_a_minus3(&self) -> Self {
        let delta = self.z.square();
        let gamma = self.y.square();
        let beta = self.x.mul(&gamma);
        let alpha = self.x.sub(&delta).mul(&self.x.add(&delta));
        let alpha3 = alpha.add(&alpha).add(&alpha);
        let x3 = alpha3.square().sub(&beta.double().double().double());
        let y1z1 = self.y.add(&self.z).square();
        let z3 = y1z1.sub(&gamma).sub(&delta);
        let beta4 = beta.double().double();
        let y3 = alpha3
            .mul(&beta4.sub(&x3))
            .sub(&gamma.square().double().double().double());
        Self { x: x3, y: y3, z: z3 }
    }

    fn double_general(&self) -> Self {
        let xx = self.x.square();
        let yy = self.y.square();
        let yyyy = yy.square();
        let zz = self.z.square();
        let s = self
            .x
            .add(&yy)
            .square()
            .sub(&xx)
            .sub(&yyyy)
            .double();
        let m = xx.double().add(&xx).add(&P::A.mul(&zz.square()));
        let t = m.square().sub(&s.double());
        let x3 = t;
        let y3 = m.mul(&s.sub(&t)).sub(&yyyy.double().double().double());
        let z3 = self.y.add(&self.z).square().sub(&yy).sub(&zz);
        Self { x: x3, y: y3, z: z3 }
    }

    /// Dedicated doubling formula, valid for all inputs including identity
    /// (doubling the identity yields the identity, since every coordinate
    /// stays zero throughout).
    pub fn double(&self) -> Self {
        if P::A_IS_ZERO {
            self.double_a_zero()
        } else if P::A_IS_MINUS_3 {
            self.double_a_minus3()
        } else {
            self.double_general()
        }
    }

    fn add_generic(&self, rhs: &Self) -> Self {
        let z1z1 = self.z.square();
        let z2z2 = rhs.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = rhs.x.mul(&z1z1);
        let s1 = self.y.mul(&rhs.z).mul(&z2z2);
        let s2 = rhs.y.mul(&self.z).mul(&z1z1);
        let h = u2.sub(&u1);
        let i = h.double().square();
        let j = h.mul(&i);
        let r = s2.sub(&s1).double();
        let v = u1.mul(&i);
        let x3 = r.square().sub(&j).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&j).double());
        let z3 = self
            .z
            .add(&rhs.z)
            .square()
            .sub(&z1z1)
            .sub(&z2z2)
            .mul(&h);
        Self { x: x3, y: y3, z: z3 }
    }

    /// Full point addition, correct for every input including the identity,
    /// equal operands, and mutually negated operands.
    pub fn add(&self, rhs: &Self) -> Self {
        let generic = self.add_generic(rhs);
        let doubled = self.double();

        let z1z1 = self.z.square();
        let z2z2 = rhs.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = rhs.x.mul(&z1z1);
        let s1 = self.y.mul(&rhs.z).mul(&z2z2);
        let s2 = rhs.y.mul(&self.z).mul(&z1z1);

        let same_x = u1.ct_eq(&u2);
        let same_y = s1.ct_eq(&s2);
        let is_double = same_x & same_y;
        let is_inverse = same_x & !same_y;

        let lhs_identity = self.is_identity();
        let rhs_identity = rhs.is_identity();

        let mut result = Self::conditional_select(&generic, &doubled, is_double);
        result = Self::conditional_select(&result, &Self::identity(), is_inverse);
        result = Self::conditional_select(&result, rhs, lhs_identity);
        result = Self::conditional_select(&result, self, rhs_identity);
        result
    }

    pub fn add_mixed(&self, rhs: &AffinePoint<P>) -> Self {
        self.add(&Self::from_affine(rhs))
    }

    /// Constant-time scalar multiplication by a big-endian bit sequence
    /// (MSB first), via the textbook double-and-add-always ladder. Callers
    /// needing windowed or GLV-accelerated multiplication build on top of
    /// this in the `ecc` crate; this is the baseline every other method is
    /// checked against.
    pub fn mul_bits_be(&self, bits: impl Iterator<Item = bool>) -> Self {
        let mut acc = Self::identity();
        for bit in bits {
            acc = acc.double();
            let added = ProjectivePoint::add(&acc, self);
            acc = Self::conditional_select(&acc, &added, Choice::from(bit as u8));
        }
        acc
    }
}

impl<P: WeierstrassParams> Default for ProjectivePoint<P> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<P: WeierstrassParams> ConditionallySelectable for ProjectivePoint<P> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: P::Field::conditional_select(&a.x, &b.x, choice),
            y: P::Field::conditional_select(&a.y, &b.y, choice),
            z: P::Field::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl<P: WeierstrassParams> PartialEq for ProjectivePoint<P> {
    fn eq(&self, other: &Self) -> bool {
        let a = self.to_affine();
        let b = other.to_affine();
        bool::from(a.x.ct_eq(&b.x) & a.y.ct_eq(&b.y) & a.infinity.ct_eq(&b.infinity))
    }
}
impl<P: WeierstrassParams> Eq for ProjectivePoint<P> {}

impl<P: WeierstrassParams> Add for ProjectivePoint<P> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        ProjectivePoint::add(&self, &rhs)
    }
}

impl<P: WeierstrassParams> Sub for ProjectivePoint<P> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        ProjectivePoint::add(&self, &rhs.negate())
    }
}

impl<P: WeierstrassParams> Neg for ProjectivePoint<P> {
    type Output = Self;
    fn neg(self) -> Self {
        self.negate()
    }
}

impl<P: WeierstrassParams> Zeroize for ProjectivePoint<P> {
    fn zeroize(&mut self) {
        *self = Self::identity();
    }
}

impl<P: WeierstrassParams> core::fmt::Debug for ProjectivePoint<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProjectivePoint")
            .field("identity", &bool::from(self.is_identity()))
            .finish()
    }
}
