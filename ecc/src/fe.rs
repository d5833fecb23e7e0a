//! Base-field elements: a thin [`primeorder::FieldElement`] wrapper around
//! [`primefield::Residue`], adding square roots (Tonelli-Shanks, generic
//! over any odd prime modulus) and the Legendre-symbol test the hash-to-curve
//! encoding maps need.

use alloc::vec::Vec;
use primefield::{Modulus, Residue};
use primeorder::FieldElement as WeierstrassField;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// A base-field element over the modulus described by `M`.
#[derive(Clone, Copy, Debug)]
pub struct Fe<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
    pub(crate) Residue<LIMBS, WIDE, M>,
);

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Fe<LIMBS, WIDE, M> {
    pub const ZERO: Self = Self(Residue::ZERO);

    /// Builds an element directly from little-endian limbs; see
    /// [`Residue::from_raw`] for when this is sound to use.
    pub const fn from_raw(limbs: [u64; LIMBS]) -> Self {
        Self(Residue::from_raw(limbs))
    }

    pub fn one() -> Self {
        Self(Residue::one())
    }

    pub fn from_be_bytes(bytes: &[u8]) -> CtOption<Self> {
        Residue::from_be_bytes(bytes).map(Self)
    }

    pub fn from_be_bytes_reduce(bytes: &[u8]) -> Self {
        Self(Residue::from_be_bytes_reduce(bytes))
    }

    pub fn to_be_bytes_into(&self, out: &mut [u8]) {
        self.0.to_be_bytes_into(out)
    }

    pub fn random(rng: &mut impl rand_core::CryptoRngCore) -> Self {
        Self(Residue::random(rng))
    }

    pub fn invert_vartime(&self) -> Option<Self> {
        // Inversion has no faster variable-time path implemented here over
        // the constant-time Fermat method; kept as a distinct name so
        // call sites documenting their vartime context read accurately.
        Option::from(self.invert())
    }

    /// Euler's criterion: `true` iff `self` is a nonzero quadratic residue.
    pub fn is_square(&self) -> Choice {
        let exp = half_of(&M::N);
        let bits = msb_bits(&exp);
        let legendre = self.0.pow_vartime(&bits);
        legendre.ct_eq(&Residue::one())
    }

    /// Tonelli-Shanks square root. Variable-time in `self` (as is every
    /// known square-root algorithm over a generic prime field); callers
    /// needing this for secret data should instead use a curve whose prime
    /// fits the fast `p ≡ 3 (mod 4)` case and blind the input.
    pub fn sqrt_vartime(&self) -> CtOption<Self> {
        if bool::from(self.0.is_zero()) {
            return CtOption::new(*self, Choice::from(1));
        }
        let is_qr = self.is_square();

        // p - 1 = q * 2^s, q odd.
        let mut q = M::N;
        sub1(&mut q);
        let mut s = 0u32;
        while is_even(&q) {
            shr1(&mut q);
            s += 1;
        }

        if s == 1 {
            // p ≡ 3 (mod 4): r = a^((p+1)/4).
            let mut exp = M::N;
            add1(&mut exp);
            shr1_n(&mut exp, 2);
            let r = self.0.pow_vartime(&msb_bits(&exp));
            let ok = r.square().ct_eq(&self.0) & is_qr;
            return CtOption::new(Self(r), ok);
        }

        // General Tonelli-Shanks.
        let z = find_nonresidue::<LIMBS, WIDE, M>();
        let mut m = s;
        let mut c = z.0.pow_vartime(&msb_bits(&q));
        let mut t = self.0.pow_vartime(&msb_bits(&q));
        let mut qp1 = q;
        add1(&mut qp1);
        shr1(&mut qp1);
        let mut r = self.0.pow_vartime(&msb_bits(&qp1));

        while !bool::from(t.ct_eq(&Residue::one())) {
            // Least i in (0, m) with t^(2^i) == 1.
            let mut i = 1u32;
            let mut t2i = t.square();
            while !bool::from(t2i.ct_eq(&Residue::one())) {
                t2i = t2i.square();
                i += 1;
                if i >= m {
                    return CtOption::new(*self, Choice::from(0));
                }
            }
            let mut b = c;
            for _ in 0..(m - i - 1) {
                b = b.square();
            }
            m = i;
            c = b.square();
            t = t.mul(&c);
            r = r.mul(&b);
        }

        let ok = r.square().ct_eq(&self.0) & is_qr;
        CtOption::new(Self(r), ok)
    }
}

fn half_of<const LIMBS: usize>(n: &[u64; LIMBS]) -> [u64; LIMBS] {
    let mut out = *n;
    sub1(&mut out);
    shr1(&mut out);
    out
}

fn is_even<const LIMBS: usize>(n: &[u64; LIMBS]) -> bool {
    n[0] & 1 == 0
}

fn shr1<const LIMBS: usize>(n: &mut [u64; LIMBS]) {
    let mut carry = 0u64;
    for w in n.iter_mut().rev() {
        let new_carry = *w & 1;
        *w = (*w >> 1) | (carry << 63);
        carry = new_carry;
    }
}

fn shr1_n<const LIMBS: usize>(n: &mut [u64; LIMBS], times: u32) {
    for _ in 0..times {
        shr1(n);
    }
}

fn sub1<const LIMBS: usize>(n: &mut [u64; LIMBS]) {
    let mut borrow = 1u64;
    for w in n.iter_mut() {
        let (d, b) = w.overflowing_sub(borrow);
        *w = d;
        borrow = b as u64;
        if borrow == 0 {
            break;
        }
    }
}

fn add1<const LIMBS: usize>(n: &mut [u64; LIMBS]) {
    let mut carry = 1u64;
    for w in n.iter_mut() {
        let (s, c) = w.overflowing_add(carry);
        *w = s;
        carry = c as u64;
        if carry == 0 {
            break;
        }
    }
}

/// MSB-first bit vector of a little-endian limb array, skipping leading
/// zero bits.
fn msb_bits<const LIMBS: usize>(n: &[u64; LIMBS]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(LIMBS * 64);
    let mut started = false;
    for i in (0..LIMBS * 64).rev() {
        let limb = i / 64;
        let off = i % 64;
        let bit = (n[limb] >> off) & 1 == 1;
        if bit {
            started = true;
        }
        if started {
            bits.push(bit);
        }
    }
    if bits.is_empty() {
        bits.push(false);
    }
    bits
}

/// Finds a quadratic non-residue mod `M::N` by trying small odd integers;
/// public, deterministic, and run at most a handful of times per curve
/// (density of non-residues is 1/2).
fn find_nonresidue<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
) -> Fe<LIMBS, WIDE, M> {
    let mut candidate = 2u64;
    loop {
        let z = Fe(Residue::from_be_bytes_reduce(&candidate.to_be_bytes()));
        if !bool::from(z.is_square()) {
            return z;
        }
        candidate += 1;
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Default for Fe<LIMBS, WIDE, M> {
    fn default() -> Self {
        Self::ZERO
    }
}
impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> PartialEq for Fe<LIMBS, WIDE, M> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}
impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Eq for Fe<LIMBS, WIDE, M> {}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> ConditionallySelectable
    for Fe<LIMBS, WIDE, M>
{
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(Residue::conditional_select(&a.0, &b.0, choice))
    }
}
impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> ConstantTimeEq
    for Fe<LIMBS, WIDE, M>
{
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> WeierstrassField
    for Fe<LIMBS, WIDE, M>
{
    fn zero() -> Self {
        Self::ZERO
    }
    fn one() -> Self {
        Fe::one()
    }
    fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }
    fn add(&self, rhs: &Self) -> Self {
        Self(self.0.add(&rhs.0))
    }
    fn sub(&self, rhs: &Self) -> Self {
        Self(self.0.sub(&rhs.0))
    }
    fn neg(&self) -> Self {
        Self(self.0.neg())
    }
    fn mul(&self, rhs: &Self) -> Self {
        Self(self.0.mul(&rhs.0))
    }
    fn square(&self) -> Self {
        Self(self.0.square())
    }
    fn invert(&self) -> CtOption<Self> {
        self.0.invert().map(Self)
    }
    fn sqrt(&self) -> CtOption<Self> {
        self.sqrt_vartime()
    }
    fn is_odd(&self) -> Choice {
        self.0.is_odd()
    }
    fn from_be_bytes_reduce(bytes: &[u8]) -> Self {
        Self(Residue::from_be_bytes_reduce(bytes))
    }
    fn to_be_bytes_into(&self, out: &mut [u8]) {
        self.0.to_be_bytes_into(out)
    }
}
