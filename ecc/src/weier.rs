//! Short-Weierstrass curve instantiations, wiring each named curve's field
//! and equation coefficients into the generic Jacobian arithmetic from
//! `primeorder`.

use crate::curve::{k256, p192, p224, p256, p384, p521, sub_small};
use primefield::Modulus;
use primeorder::WeierstrassParams;

macro_rules! weierstrass_a_minus3 {
    ($modname:ident, $params:ident, $field:ty, $modtype:ty, $limbs:expr) => {
        #[derive(Clone, Copy)]
        pub struct $params;
        impl WeierstrassParams for $params {
            type Field = $field;
            const A: Self::Field = <$field>::from_raw(sub_small::<$limbs>(<$modtype>::N, 3));
            const B: Self::Field = $modname::B;
            const A_IS_MINUS_3: bool = true;
        }

        pub type Affine = primeorder::AffinePoint<$params>;
        pub type Projective = primeorder::ProjectivePoint<$params>;
    };
}

pub mod p192_curve {
    use super::*;
    weierstrass_a_minus3!(p192, Params, p192::Field, p192::FieldMod, 3);
}
pub mod p224_curve {
    use super::*;
    weierstrass_a_minus3!(p224, Params, p224::Field, p224::FieldMod, 4);
}
pub mod p256_curve {
    use super::*;
    weierstrass_a_minus3!(p256, Params, p256::Field, p256::FieldMod, 4);
}
pub mod p384_curve {
    use super::*;
    weierstrass_a_minus3!(p384, Params, p384::Field, p384::FieldMod, 6);
}
pub mod p521_curve {
    use super::*;
    weierstrass_a_minus3!(p521, Params, p521::Field, p521::FieldMod, 9);
}

pub mod k256_curve {
    use super::*;

    #[derive(Clone, Copy)]
    pub struct Params;
    impl WeierstrassParams for Params {
        type Field = k256::Field;
        const A: Self::Field = k256::Field::ZERO;
        const B: Self::Field = k256::B;
        const A_IS_ZERO: bool = true;
    }

    pub type Affine = primeorder::AffinePoint<Params>;
    pub type Projective = primeorder::ProjectivePoint<Params>;
}

pub use k256_curve::{Affine as K256Affine, Projective as K256Projective};
pub use p192_curve::{Affine as P192Affine, Projective as P192Projective};
pub use p224_curve::{Affine as P224Affine, Projective as P224Projective};
pub use p256_curve::{Affine as P256Affine, Projective as P256Projective};
pub use p384_curve::{Affine as P384Affine, Projective as P384Projective};
pub use p521_curve::{Affine as P521Affine, Projective as P521Projective};
