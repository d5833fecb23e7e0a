//! The field-element surface [`projective`](crate::projective) and
//! [`affine`](crate::affine) need from a curve's base field backend.
//!
//! This crate never constructs a concrete field; it only asks for one via
//! this trait, so the same Jacobian arithmetic serves every curve in `ecc`
//! regardless of which [`primefield::Residue`] instantiation backs it.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// A base-field element usable by the generic Weierstrass point types.
pub trait FieldElement:
    Copy + Clone + Default + PartialEq + Eq + ConditionallySelectable + ConstantTimeEq
{
    /// The additive identity.
    fn zero() -> Self;
    /// The multiplicative identity.
    fn one() -> Self;
    fn is_zero(&self) -> Choice;
    fn add(&self, rhs: &Self) -> Self;
    fn sub(&self, rhs: &Self) -> Self;
    fn neg(&self) -> Self;
    fn mul(&self, rhs: &Self) -> Self;
    fn square(&self) -> Self;
    fn double(&self) -> Self {
        self.add(self)
    }
    fn invert(&self) -> CtOption<Self>;
    /// A square root of `self`, when one exists (curve base fields in this
    /// crate are always `p ≡ 3 (mod 4)` so this can use the `(p+3)/4` power
    /// map; implementations that aren't use Tonelli-Shanks instead).
    fn sqrt(&self) -> CtOption<Self>;
    fn is_odd(&self) -> Choice;
    /// Reduces a big-endian byte string into a field element.
    fn from_be_bytes_reduce(bytes: &[u8]) -> Self;
    /// Writes the canonical big-endian encoding of `self` into `out`.
    fn to_be_bytes_into(&self, out: &mut [u8]);
    fn mul_by_small(&self, scalar: u64) -> Self {
        let mut acc = Self::zero();
        let mut addend = *self;
        let mut s = scalar;
        while s != 0 {
            if s & 1 == 1 {
                acc = acc.add(&addend);
            }
            addend = addend.double();
            s >>= 1;
        }
        acc
    }
}

/// The coefficients and field backend of a short-Weierstrass curve
/// `y^2 = x^3 + a*x + b`.
pub trait WeierstrassParams: Copy + Clone + 'static {
    type Field: FieldElement;

    const A: Self::Field;
    const B: Self::Field;

    /// `true` when `a == -3`, enabling the cheaper doubling formula.
    const A_IS_MINUS_3: bool = false;
    /// `true` when `a == 0` (e.g. secp256k1), enabling the cheapest
    /// doubling formula.
    const A_IS_ZERO: bool = false;
}
