//! Twisted-Edwards curve arithmetic (`a*x^2 + y^2 = 1 + d*x^2*y^2`) in
//! extended projective coordinates `(X : Y : Z : T)`, `x = X/Z`, `y = Y/Z`,
//! `xy = T/Z`.
//!
//! The unified addition law is formula (3.1) of Hisil-Wong-Carter-Dawson,
//! "Twisted Edwards Curves Revisited" (Asiacrypt 2008), the same one
//! `ed448-goldilocks::edwards::extended::EdwardsPoint::add` implements;
//! ported here generically over `a` so it also covers Ed25519's `a = -1`
//! shape, not just Ed448-Goldilocks and Ed1174's `a = 1`.

use primeorder::FieldElement;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// A twisted-Edwards curve's field backend, equation coefficients, and
/// distinguished base point.
pub trait EdwardsParams: Copy + Clone + 'static {
    type Field: FieldElement;

    const D: Self::Field;
    const A: Self::Field;
    const GX: Self::Field;
    const GY: Self::Field;
}

#[derive(Clone, Copy, Debug)]
pub struct ExtendedPoint<P: EdwardsParams> {
    x: P::Field,
    y: P::Field,
    z: P::Field,
    t: P::Field,
}

impl<P: EdwardsParams> ExtendedPoint<P> {
    pub fn identity() -> Self {
        Self {
            x: P::Field::zero(),
            y: P::Field::one(),
            z: P::Field::one(),
            t: P::Field::zero(),
        }
    }

    pub fn generator() -> Self {
        Self::from_affine(P::GX, P::GY)
    }

    pub fn from_affine(x: P::Field, y: P::Field) -> Self {
        Self {
            x,
            y,
            z: P::Field::one(),
            t: x.mul(&y),
        }
    }

    pub fn is_identity(&self) -> Choice {
        self.x.is_zero() & self.y.ct_eq(&self.z)
    }

    /// Affine `(x, y)`.
    pub fn to_affine(&self) -> (P::Field, P::Field) {
        match Option::from(self.z.invert()) {
            Some(z_inv) => (self.x.mul(&z_inv), self.y.mul(&z_inv)),
            None => (P::Field::zero(), P::Field::zero()),
        }
    }

    pub fn negate(&self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y,
            z: self.z,
            t: self.t.neg(),
        }
    }

    /// Unified point addition; also used for doubling (`add(self, self)`),
    /// at the cost of a few redundant multiplications relative to a
    /// dedicated doubling formula.
    pub fn add(&self, other: &Self) -> Self {
        let a_xx = P::A.mul(&self.x.mul(&other.x));
        let d_tt = P::D.mul(&self.t.mul(&other.t));
        let zz = self.z.mul(&other.z);
        let yy = self.y.mul(&other.y);
        let cross = self.x.mul(&other.y).add(&self.y.mul(&other.x));

        let x = cross.mul(&zz.sub(&d_tt));
        let y = yy.sub(&a_xx).mul(&zz.add(&d_tt));
        let t = yy.sub(&a_xx).mul(&cross);
        let z = zz.sub(&d_tt).mul(&zz.add(&d_tt));

        Self { x, y, z, t }
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }

    pub fn is_on_curve(&self) -> Choice {
        let xy = self.x.mul(&self.y);
        let zt = self.z.mul(&self.t);
        let yy = self.y.square();
        let xx = self.x.square();
        let zz = self.z.square();
        let tt = self.t.square();
        let lhs = yy.add(&P::A.mul(&xx));
        let rhs = zz.add(&P::D.mul(&tt));
        xy.ct_eq(&zt) & lhs.ct_eq(&rhs)
    }

    /// Plain double-and-add scalar multiplication, most significant bit
    /// first. Used directly by small call sites and as the base case for
    /// the windowed multiplier in [`crate::mul`].
    pub fn mul_bits_be(&self, bits_msb_first: &[bool]) -> Self {
        let mut acc = Self::identity();
        for &bit in bits_msb_first {
            acc = acc.double();
            let added = acc.add(self);
            acc = Self::conditional_select(&acc, &added, Choice::from(bit as u8));
        }
        acc
    }

    /// Recovers `x` from `y` and a target sign bit, solving
    /// `x^2 = (1 - y^2) / (a - d*y^2)`.
    pub fn recover_x(y: P::Field, sign: Choice) -> CtOption<P::Field> {
        let yy = y.square();
        let num = P::Field::one().sub(&yy);
        let den = P::A.sub(&P::D.mul(&yy));
        den.invert().and_then(|den_inv| {
            let xx = num.mul(&den_inv);
            xx.sqrt().map(|root| {
                let mut x = root;
                let want_odd = sign;
                let is_odd = x.is_odd();
                let flip = want_odd ^ is_odd;
                x = P::Field::conditional_select(&x, &x.neg(), flip);
                x
            })
        })
    }
}

impl<P: EdwardsParams> ConditionallySelectable for ExtendedPoint<P> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: P::Field::conditional_select(&a.x, &b.x, choice),
            y: P::Field::conditional_select(&a.y, &b.y, choice),
            z: P::Field::conditional_select(&a.z, &b.z, choice),
            t: P::Field::conditional_select(&a.t, &b.t, choice),
        }
    }
}

impl<P: EdwardsParams> ConstantTimeEq for ExtendedPoint<P> {
    fn ct_eq(&self, other: &Self) -> Choice {
        let xz = self.x.mul(&other.z);
        let zx = self.z.mul(&other.x);
        let yz = self.y.mul(&other.z);
        let zy = self.z.mul(&other.y);
        xz.ct_eq(&zx) & yz.ct_eq(&zy)
    }
}

impl<P: EdwardsParams> PartialEq for ExtendedPoint<P> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}
impl<P: EdwardsParams> Eq for ExtendedPoint<P> {}

use crate::curve::{c25519, c448, ed1174};

#[derive(Clone, Copy)]
pub struct Ed25519Params;
impl EdwardsParams for Ed25519Params {
    type Field = c25519::Field;
    const D: Self::Field = c25519::EDWARDS_D;
    const A: Self::Field = minus_one::<4, 8, c25519::FieldMod>();
    const GX: Self::Field = c25519::EDWARDS_GX;
    const GY: Self::Field = c25519::EDWARDS_GY;
}

#[derive(Clone, Copy)]
pub struct Ed448Params;
impl EdwardsParams for Ed448Params {
    type Field = c448::Field;
    const D: Self::Field = c448::EDWARDS_D;
    const A: Self::Field = c448::Field::from_raw([1, 0, 0, 0, 0, 0, 0]);
    const GX: Self::Field = c448::EDWARDS_GX;
    const GY: Self::Field = c448::EDWARDS_GY;
}

#[derive(Clone, Copy)]
pub struct Ed1174Params;
impl EdwardsParams for Ed1174Params {
    type Field = ed1174::Field;
    const D: Self::Field = ed1174::EDWARDS_D;
    const A: Self::Field = ed1174::Field::from_raw([1, 0, 0, 0]);
    const GX: Self::Field = ed1174::EDWARDS_GX;
    const GY: Self::Field = ed1174::EDWARDS_GY;
}

/// `-1 mod p`, built directly from the modulus constant rather than hand
/// transcribed, mirroring [`crate::weier::sub_small`]'s role for `a = -3`.
const fn minus_one<const LIMBS: usize, const WIDE: usize, M: primefield::Modulus<LIMBS, WIDE>>(
) -> crate::fe::Fe<LIMBS, WIDE, M> {
    crate::fe::Fe::from_raw(crate::curve::sub_small::<LIMBS>(M::N, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_on_curve() {
        let g = ExtendedPoint::<Ed25519Params>::generator();
        assert!(bool::from(g.is_on_curve()));
    }

    #[test]
    fn double_matches_add_to_self() {
        let g = ExtendedPoint::<Ed25519Params>::generator();
        assert_eq!(g.double(), g.add(&g));
    }

    #[test]
    fn identity_is_neutral() {
        let g = ExtendedPoint::<Ed25519Params>::generator();
        let id = ExtendedPoint::<Ed25519Params>::identity();
        assert_eq!(g.add(&id), g);
    }
}
