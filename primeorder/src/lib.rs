//! Generic short-Weierstrass curve arithmetic, generic over a field element
//! backend and per-curve equation coefficients.
//!
//! This crate knows nothing about any specific curve; `ecc` instantiates
//! [`WeierstrassParams`] once per named curve (P-192/224/256/384/521,
//! secp256k1) and gets Jacobian point arithmetic, on-curve validation, and
//! affine conversion for free.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod affine;
pub mod field;
pub mod projective;

pub use affine::AffinePoint;
pub use field::{FieldElement, WeierstrassParams};
pub use projective::ProjectivePoint;

#[cfg(test)]
mod tests {
    use super::*;
    use core::marker::PhantomData;
    use primefield::{Modulus, Residue};
    use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

    // A toy curve over a small Mersenne-like prime, used only to exercise
    // the generic arithmetic paths in this crate (not a cryptographic
    // curve: the field is far too small for anything but testing group-law
    // identities).
    #[derive(Clone, Copy, PartialEq, Eq)]
    struct ToyMod;
    impl Modulus<1, 2> for ToyMod {
        const N: [u64; 1] = [2147483647]; // 2^31 - 1
        const MU: [u64; 2] = primefield::compute_mu(Self::N);
        const BYTES: usize = 4;
    }
    type ToyResidue = Residue<1, 2, ToyMod>;

    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    struct ToyField(ToyResidue);

    impl ConditionallySelectable for ToyField {
        fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
            ToyField(ToyResidue::conditional_select(&a.0, &b.0, choice))
        }
    }
    impl ConstantTimeEq for ToyField {
        fn ct_eq(&self, other: &Self) -> Choice {
            self.0.ct_eq(&other.0)
        }
    }
    impl FieldElement for ToyField {
        fn zero() -> Self {
            ToyField(ToyResidue::ZERO)
        }
        fn one() -> Self {
            ToyField(ToyResidue::one())
        }
        fn is_zero(&self) -> Choice {
            self.0.is_zero()
        }
        fn add(&self, rhs: &Self) -> Self {
            ToyField(self.0.add(&rhs.0))
        }
        fn sub(&self, rhs: &Self) -> Self {
            ToyField(self.0.sub(&rhs.0))
        }
        fn neg(&self) -> Self {
            ToyField(self.0.neg())
        }
        fn mul(&self, rhs: &Self) -> Self {
            ToyField(self.0.mul(&rhs.0))
        }
        fn square(&self) -> Self {
            ToyField(self.0.square())
        }
        fn invert(&self) -> CtOption<Self> {
            self.0.invert().map(ToyField)
        }
        fn sqrt(&self) -> CtOption<Self> {
            // p = 2^31-1 is prime and p % 4 == 3, so sqrt(a) = a^((p+1)/4).
            let mut exp = [0u64; 1];
            exp[0] = (2147483647u64 + 1) / 4;
            let bits: alloc_free_bits::Bits = alloc_free_bits::Bits::from_u64(exp[0]);
            let cand = self.0.pow_vartime(&bits.0);
            CtOption::new(ToyField(cand), cand.square().ct_eq(&self.0))
        }
        fn is_odd(&self) -> Choice {
            self.0.is_odd()
        }
        fn from_be_bytes_reduce(bytes: &[u8]) -> Self {
            ToyField(ToyResidue::from_be_bytes_reduce(bytes))
        }
        fn to_be_bytes_into(&self, out: &mut [u8]) {
            self.0.to_be_bytes_into(out)
        }
    }

    mod alloc_free_bits {
        pub struct Bits(pub [bool; 32]);
        impl Bits {
            pub fn from_u64(v: u64) -> Self {
                let mut bits = [false; 32];
                for i in 0..32 {
                    bits[i] = (v >> (31 - i)) & 1 == 1;
                }
                Bits(bits)
            }
        }
    }

    #[derive(Clone, Copy)]
    struct ToyCurve(PhantomData<()>);
    impl WeierstrassParams for ToyCurve {
        type Field = ToyField;
        const A: ToyField = ToyField(ToyResidue::ZERO);
        const B: ToyField = ToyField(ToyResidue::ZERO);
        const A_IS_ZERO: bool = true;
    }

    fn b() -> ToyField {
        // b = 7, matching y^2 = x^3 + 7 shape (secp256k1-like), chosen so a
        // base point exists in this toy field.
        ToyField(ToyResidue::from_be_bytes_reduce(&[7]))
    }

    fn find_generator() -> AffinePoint<ToyCurve> {
        let bb = b();
        let mut x = ToyField::one();
        loop {
            let rhs = x.square().mul(&x).add(&bb);
            if let Some(y) = Option::from(rhs.sqrt()) {
                return AffinePoint::new(x, y);
            }
            x = x.add(&ToyField::one());
        }
    }

    #[test]
    fn double_matches_add_self() {
        let g = find_generator().to_projective();
        assert_eq!(g.double(), g.add(&g));
    }

    #[test]
    fn identity_is_additive_identity() {
        let g = find_generator().to_projective();
        let id = ProjectivePoint::<ToyCurve>::identity();
        assert_eq!(g.add(&id), g);
        assert_eq!(id.add(&g), g);
    }

    #[test]
    fn point_plus_negation_is_identity() {
        let g = find_generator().to_projective();
        let sum = g.add(&g.negate());
        assert!(bool::from(sum.is_identity()));
    }

    #[test]
    fn addition_is_commutative() {
        let g = find_generator().to_projective();
        let h = g.double();
        assert_eq!(g.add(&h), h.add(&g));
    }

    #[test]
    fn mul_by_bits_matches_repeated_doubling() {
        let g = find_generator().to_projective();
        // 5 = 0b101
        let bits = [true, false, true];
        let by_ladder = g.mul_bits_be(bits.into_iter());
        let by_add = g.add(&g).add(&g).add(&g).add(&g);
        assert_eq!(by_ladder, by_add);
    }
}
