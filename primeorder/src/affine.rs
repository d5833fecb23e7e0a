//! Affine short-Weierstrass points.

use crate::field::{FieldElement, WeierstrassParams};
use crate::projective::ProjectivePoint;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// A point in affine `(x, y)` coordinates, or the point at infinity.
#[derive(Clone, Copy)]
pub struct AffinePoint<P: WeierstrassParams> {
    pub(crate) x: P::Field,
    pub(crate) y: P::Field,
    pub(crate) infinity: Choice,
}

impl<P: WeierstrassParams> AffinePoint<P> {
    pub fn identity() -> Self {
        Self {
            x: P::Field::zero(),
            y: P::Field::zero(),
            infinity: Choice::from(1),
        }
    }

    pub fn new(x: P::Field, y: P::Field) -> Self {
        Self {
            x,
            y,
            infinity: Choice::from(0),
        }
    }

    pub fn is_identity(&self) -> Choice {
        self.infinity
    }

    pub fn x(&self) -> P::Field {
        self.x
    }

    pub fn y(&self) -> P::Field {
        self.y
    }

    /// Checks `y^2 == x^3 + a*x + b`, also accepting the point at infinity.
    pub fn is_on_curve(&self) -> Choice {
        let lhs = self.y.square();
        let rhs = self
            .x
            .square()
            .mul(&self.x)
            .add(&P::A.mul(&self.x))
            .add(&P::B);
        self.infinity | lhs.ct_eq(&rhs)
    }

    pub fn to_projective(&self) -> ProjectivePoint<P> {
        ProjectivePoint::from_affine(self)
    }

    pub fn negate(&self) -> Self {
        Self {
            x: self.x,
            y: self.y.neg(),
            infinity: self.infinity,
        }
    }
}

impl<P: WeierstrassParams> ConditionallySelectable for AffinePoint<P> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: P::Field::conditional_select(&a.x, &b.x, choice),
            y: P::Field::conditional_select(&a.y, &b.y, choice),
            infinity: Choice::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl<P: WeierstrassParams> PartialEq for AffinePoint<P> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y) & self.infinity.ct_eq(&other.infinity))
    }
}
impl<P: WeierstrassParams> Eq for AffinePoint<P> {}

impl<P: WeierstrassParams> core::fmt::Debug for AffinePoint<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AffinePoint")
            .field("infinity", &bool::from(self.infinity))
            .finish()
    }
}
