//! Generic constant-time prime-field residue arithmetic.
//!
//! [`Residue`] implements Barrett reduction over saturated 64-bit limbs for
//! an arbitrary compile-time modulus described by a [`Modulus`] impl. It is
//! the single generic backend shared by every curve's base field and scalar
//! field: callers never see limbs, only byte encodings and arithmetic.
//!
//! The modulus width (`LIMBS`) and the Barrett scratch width (`WIDE`, which
//! a `Modulus` impl must set to exactly `2 * LIMBS`) are independent const
//! generic parameters rather than one derived from the other, because stable
//! Rust has no const-generic arithmetic in array lengths. All arithmetic
//! that needs intermediate widths wider than `LIMBS` or `WIDE` is written in
//! terms of runtime slices, not new array types, so this restriction never
//! leaks into the algorithms themselves.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

mod barrett;
mod limbs;

pub use barrett::compute_mu;

/// Largest canonical byte encoding this crate supports (covers every curve
/// this engine implements, the widest being P-521's 66-byte field and
/// 66-byte scalar, with ample headroom).
const MAX_BYTES: usize = 128;

use core::fmt;
use core::marker::PhantomData;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

/// Describes a prime modulus `n` for use as a [`Residue`] backend.
///
/// `N` is little-endian, `LIMBS` words wide. `MU` is the Barrett constant
/// `floor(b^(2*LIMBS) / n)` (`b = 2^64`), little-endian, zero-padded out to
/// `WIDE = 2 * LIMBS` words (its true value never exceeds `LIMBS + 1` words
/// for any modulus close to a full `LIMBS`-word value, so the padding is
/// always zero in the high words).
pub trait Modulus<const LIMBS: usize, const WIDE: usize>: Copy + Eq + 'static {
    /// The modulus itself, little-endian.
    const N: [u64; LIMBS];
    /// `floor(2^(128*LIMBS) / N)`, little-endian, zero-padded to `WIDE`.
    const MU: [u64; WIDE];
    /// Canonical big-endian encoded length in bytes.
    const BYTES: usize;
}

/// An element of `Z/nZ` for the modulus described by `M`.
///
/// Internally represented by `LIMBS` 64-bit words, always held fully
/// reduced (`< N`). All arithmetic is constant-time in the limb values;
/// functions documented `_vartime` are not.
#[derive(Clone, Copy, Debug)]
pub struct Residue<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> {
    limbs: [u64; LIMBS],
    _modulus: PhantomData<M>,
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Residue<LIMBS, WIDE, M> {
    /// The additive identity.
    pub const ZERO: Self = Self {
        limbs: [0u64; LIMBS],
        _modulus: PhantomData,
    };

    /// Builds an element directly from little-endian limbs, trusting the
    /// caller that `limbs < N`. Used only for compile-time curve constants
    /// (generator coordinates, equation coefficients) where the value is
    /// public and known in advance to be reduced; everywhere else, use
    /// [`Self::from_be_bytes`], which checks the range.
    pub const fn from_raw(limbs: [u64; LIMBS]) -> Self {
        Self {
            limbs,
            _modulus: PhantomData,
        }
    }

    /// Reduces a big-endian byte string into an element, rejecting inputs
    /// that, interpreted as an integer, are `>= N`.
    pub fn from_be_bytes(bytes: &[u8]) -> CtOption<Self> {
        let mut limbs = [0u64; LIMBS];
        if bytes.len() > LIMBS * 8 {
            // Still parse the low `LIMBS * 8` bytes so this runs in
            // constant time with respect to valid-length inputs; the
            // overflow is caught by the final range check below.
            let skip = bytes.len() - LIMBS * 8;
            Self::fill_be(&bytes[skip..], &mut limbs);
            let overflow_extra = bytes[..skip].iter().any(|&b| b != 0);
            let in_range = limbs::cmp(&limbs, &M::N) == core::cmp::Ordering::Less;
            let ok = in_range && !overflow_extra;
            return CtOption::new(
                Self {
                    limbs,
                    _modulus: PhantomData,
                },
                Choice::from(ok as u8),
            );
        }
        Self::fill_be(bytes, &mut limbs);
        let in_range = limbs::cmp(&limbs, &M::N) == core::cmp::Ordering::Less;
        CtOption::new(
            Self {
                limbs,
                _modulus: PhantomData,
            },
            Choice::from(in_range as u8),
        )
    }

    fn fill_be(bytes: &[u8], limbs: &mut [u64; LIMBS]) {
        let mut padded = [0u8; MAX_BYTES];
        let cap = LIMBS * 8;
        debug_assert!(cap <= padded.len());
        let pad = cap - bytes.len();
        padded[pad..cap].copy_from_slice(bytes);
        for i in 0..LIMBS {
            let off = cap - (i + 1) * 8;
            let mut word = [0u8; 8];
            word.copy_from_slice(&padded[off..off + 8]);
            limbs[i] = u64::from_be_bytes(word);
        }
    }

    /// Writes this element's canonical big-endian encoding into `out`
    /// (`out.len()` must equal `M::BYTES`).
    pub fn to_be_bytes_into(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), M::BYTES);
        out.fill(0);
        let cap = LIMBS * 8;
        let mut full = [0u8; MAX_BYTES];
        debug_assert!(cap <= full.len());
        for i in 0..LIMBS {
            let off = cap - (i + 1) * 8;
            full[off..off + 8].copy_from_slice(&self.limbs[i].to_be_bytes());
        }
        let skip = cap - out.len();
        out.copy_from_slice(&full[skip..cap]);
    }

    /// Reduces an arbitrary-length big-endian byte string modulo `N`,
    /// accepting any input length (used for hash-to-field / wide reduction,
    /// e.g. RFC 6979 bit string truncation and SHA-512 wide reduction).
    pub fn from_be_bytes_reduce(bytes: &[u8]) -> Self {
        let mut acc = Self::ZERO;
        for &byte in bytes {
            acc = acc.shl8_add_byte(byte);
        }
        acc
    }

    fn shl8_add_byte(self, byte: u8) -> Self {
        // acc = acc * 256 + byte, reduced. Implemented via repeated
        // doubling (8 times) plus a conditional add, reusing the
        // constant-time add already defined below.
        let mut acc = self;
        for bit in (0..8).rev() {
            acc = acc.double();
            if (byte >> bit) & 1 == 1 {
                acc = acc.add(&Self::one_internal());
            }
        }
        acc
    }

    fn one_internal() -> Self {
        let mut limbs = [0u64; LIMBS];
        limbs[0] = 1;
        Self {
            limbs,
            _modulus: PhantomData,
        }
    }

    /// The multiplicative identity, `1`. Requires `N > 1`.
    pub fn one() -> Self {
        Self::one_internal()
    }

    pub fn is_zero(&self) -> Choice {
        let mut acc = 0u64;
        for &w in self.limbs.iter() {
            acc |= w;
        }
        Choice::from((acc == 0) as u8)
    }

    pub fn is_odd(&self) -> Choice {
        Choice::from((self.limbs[0] & 1) as u8)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        let mut sum = [0u64; LIMBS];
        let carry = limbs::add(&self.limbs, &rhs.limbs, &mut sum);
        Self::reduce_once(sum, carry)
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        let mut diff = [0u64; LIMBS];
        let borrow = limbs::sub(&self.limbs, &rhs.limbs, &mut diff);
        // If the subtraction underflowed, add N back.
        let mut plus_n = diff;
        limbs::add_assign(&mut plus_n, &M::N);
        let choice = Choice::from(borrow as u8);
        let mut out = diff;
        for i in 0..LIMBS {
            out[i] = u64::conditional_select(&diff[i], &plus_n[i], choice);
        }
        Self {
            limbs: out,
            _modulus: PhantomData,
        }
    }

    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Conditionally subtracts `N` up to twice, bringing a sum that is at
    /// most `2N - 2` back under `N`.
    fn reduce_once(mut sum: [u64; LIMBS], mut carry: u64) -> Self {
        for _ in 0..2 {
            let mut trial = sum;
            let borrow = limbs::sub_assign(&mut trial, &M::N);
            // Subtraction is valid (sum >= N) iff it didn't borrow past the
            // extra carry limb, i.e. carry == 1 or no borrow occurred.
            let ge = Choice::from(((carry == 1) || borrow == 0) as u8);
            for i in 0..LIMBS {
                sum[i] = u64::conditional_select(&sum[i], &trial[i], ge);
            }
            carry = u64::conditional_select(&carry, &0, ge);
        }
        Self {
            limbs: sum,
            _modulus: PhantomData,
        }
    }

    /// Barrett reduction of a `2*LIMBS`-word value modulo `N`.
    fn barrett_reduce(x: &[u64; WIDE]) -> Self {
        let k = LIMBS;
        // q1 = x >> (k-1) words: a subslice of the existing buffer, length
        // WIDE - (k - 1).
        let q1 = &x[k.saturating_sub(1)..];
        // q3 = floor(q1 * MU / b^(k+1)): columns [k+1, k+1+WIDE) of q1*MU,
        // stored in a WIDE-word buffer (that range always has length WIDE
        // since q1 has k+1 words and MU has WIDE words, giving a product of
        // up to WIDE + k columns, comfortably covered).
        let mut q3 = [0u64; WIDE];
        limbs::mul_range(q1, &M::MU, k + 1, k + 1 + WIDE, &mut q3);

        // r1 = x mod b^(k+1): low k+1 words of x.
        let r1 = &x[..k + 1];
        // r2 = (q3 * N) mod b^(k+1): low k+1 words of q3 * N.
        let mut r2 = vec_buf::<WIDE>();
        limbs::mul_range(&q3, &M::N, 0, k + 1, &mut r2[..k + 1]);

        // r1 - r2 computed mod b^(k+1): two's-complement subtraction already
        // wraps correctly when r1 < r2 (the Barrett algorithm's "add back
        // b^(k+1) on underflow" step is exactly this wraparound), so the
        // borrow flag itself needs no further handling here.
        let mut r = vec_buf::<WIDE>();
        let _borrow = limbs::sub(r1, &r2[..k + 1], &mut r[..k + 1]);

        let mut out = [0u64; LIMBS];
        out.copy_from_slice(&r[..LIMBS]);
        let mut result = Self {
            limbs: out,
            _modulus: PhantomData,
        };
        // At most a small constant number of extra subtractions remain.
        for _ in 0..3 {
            let mut trial = result.limbs;
            let borrow = limbs::sub_assign(&mut trial, &M::N);
            let ge = Choice::from((borrow == 0) as u8);
            for i in 0..LIMBS {
                result.limbs[i] = u64::conditional_select(&result.limbs[i], &trial[i], ge);
            }
        }
        result
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        let mut wide = [0u64; WIDE];
        limbs::mul_full(&self.limbs, &rhs.limbs, &mut wide);
        Self::barrett_reduce(&wide)
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Exponentiation by a public, little-endian bit-indexed exponent.
    /// Variable-time in the exponent — callers must only use this with
    /// public exponents (e.g. `N - 2` for inversion, where `N` is the
    /// public modulus).
    pub fn pow_vartime(&self, exp_bits_be: &[bool]) -> Self {
        let mut acc = Self::one();
        for &bit in exp_bits_be {
            acc = acc.square();
            if bit {
                acc = acc.mul(self);
            }
        }
        acc
    }

    /// Inversion via Fermat's little theorem, `self^(N - 2)`. Constant-time
    /// in `self` (the exponent, `N - 2`, is public).
    pub fn invert(&self) -> CtOption<Self> {
        let mut exp = M::N;
        limbs::sub_assign(&mut exp, &[2u64]);
        let bits = be_bits(&exp);
        let inv = self.pow_vartime_ct(&bits);
        CtOption::new(inv, !self.is_zero())
    }

    /// Like [`Self::pow_vartime`] but always performs the multiply even when
    /// the bit is zero (discarding the result), so the instruction sequence
    /// does not depend on the exponent bits — used for inversion, where the
    /// exponent is a compile-time-fixed public constant but we still take
    /// care not to introduce a `self`-dependent timing signature via branch
    /// prediction effects.
    fn pow_vartime_ct(&self, exp_bits_be: &[bool]) -> Self {
        let mut acc = Self::one();
        for &bit in exp_bits_be {
            acc = acc.square();
            let mul = acc.mul(self);
            acc = Self::conditional_select(&acc, &mul, Choice::from(bit as u8));
        }
        acc
    }

    pub fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; LIMBS];
        for i in 0..LIMBS {
            out[i] = u64::conditional_select(&a.limbs[i], &b.limbs[i], choice);
        }
        Self {
            limbs: out,
            _modulus: PhantomData,
        }
    }

    pub fn ct_eq(&self, rhs: &Self) -> Choice {
        let mut acc = Choice::from(1u8);
        for i in 0..LIMBS {
            acc &= self.limbs[i].ct_eq(&rhs.limbs[i]);
        }
        acc
    }

    /// Draws a uniformly random element by rejection sampling on a random
    /// byte string of the modulus's canonical length.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        loop {
            let mut bytes = [0u8; MAX_BYTES];
            let len = M::BYTES;
            rng.fill_bytes(&mut bytes[..len]);
            // Clear high bits beyond the modulus's bit length is handled by
            // from_be_bytes's range rejection; for moduli close to a power
            // of two this terminates in O(1) expected iterations.
            if let Some(v) = Option::from(Self::from_be_bytes(&bytes[..len])) {
                return v;
            }
        }
    }
}

fn be_bits<const LIMBS: usize>(limbs: &[u64; LIMBS]) -> heapless_bits::Bits {
    heapless_bits::Bits::from_limbs(limbs)
}

/// A tiny fixed-capacity bit vector, avoiding a dependency on `alloc` for
/// the handful of call sites that need an exponent's bits in MSB-first
/// order (inversion's fixed public exponent).
mod heapless_bits {
    const MAX_BITS: usize = super::MAX_BYTES * 8;

    pub struct Bits {
        bits: [bool; MAX_BITS],
        len: usize,
    }

    impl Bits {
        pub fn from_limbs<const LIMBS: usize>(limbs: &[u64; LIMBS]) -> Self {
            let mut bits = [false; MAX_BITS];
            let total = LIMBS * 64;
            debug_assert!(total <= bits.len());
            let mut started = false;
            let mut len = 0;
            for i in (0..total).rev() {
                let b = super::limbs::bit(limbs, i) == 1;
                if b {
                    started = true;
                }
                if started {
                    bits[len] = b;
                    len += 1;
                }
            }
            if len == 0 {
                bits[0] = false;
                len = 1;
            }
            Self { bits, len }
        }
    }

    impl core::ops::Deref for Bits {
        type Target = [bool];
        fn deref(&self) -> &[bool] {
            &self.bits[..self.len]
        }
    }
}

/// Scratch allocation helper: a fixed-size, stack-allocated `[u64; N]`
/// zero buffer, used where a function needs a `WIDE`-sized temporary.
fn vec_buf<const N: usize>() -> [u64; N] {
    [0u64; N]
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> PartialEq
    for Residue<LIMBS, WIDE, M>
{
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Eq for Residue<LIMBS, WIDE, M> {}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> ConditionallySelectable
    for Residue<LIMBS, WIDE, M>
{
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Residue::conditional_select(a, b, choice)
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> ConstantTimeEq
    for Residue<LIMBS, WIDE, M>
{
    fn ct_eq(&self, other: &Self) -> Choice {
        Residue::ct_eq(self, other)
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Zeroize
    for Residue<LIMBS, WIDE, M>
{
    fn zeroize(&mut self) {
        self.limbs.zeroize();
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Default
    for Residue<LIMBS, WIDE, M>
{
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> fmt::Debug
    for Residue<LIMBS, WIDE, M>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = [0u8; MAX_BYTES];
        self.to_be_bytes_into(&mut bytes[..M::BYTES]);
        write!(f, "Residue(0x")?;
        for b in &bytes[..M::BYTES] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq)]
    struct Mod255;

    // n = 2^255 - 19 (Curve25519 base field), 4 limbs, WIDE = 8.
    impl Modulus<4, 8> for Mod255 {
        const N: [u64; 4] = [
            0xffff_ffff_ffff_ffed,
            0xffff_ffff_ffff_ffff,
            0xffff_ffff_ffff_ffff,
            0x7fff_ffff_ffff_ffff,
        ];
        const MU: [u64; 8] = compute_mu(Self::N);
        const BYTES: usize = 32;
    }

    type Fe = Residue<4, 8, Mod255>;

    #[test]
    fn zero_one_distinct() {
        assert_ne!(Fe::ZERO, Fe::one());
    }

    #[test]
    fn add_sub_roundtrip() {
        let a = Fe::from_be_bytes_reduce(b"hello world, this is a field element test input");
        let b = Fe::from_be_bytes_reduce(b"another distinct byte string for the second value");
        let c = a.add(&b);
        let back = c.sub(&b);
        assert_eq!(back, a);
    }

    #[test]
    fn neg_is_additive_inverse() {
        let a = Fe::from_be_bytes_reduce(b"nonzero seed");
        let sum = a.add(&a.neg());
        assert_eq!(sum, Fe::ZERO);
    }

    #[test]
    fn mul_one_is_identity() {
        let a = Fe::from_be_bytes_reduce(b"some value for multiplicative identity check");
        assert_eq!(a.mul(&Fe::one()), a);
    }

    #[test]
    fn double_equals_add_self() {
        let a = Fe::from_be_bytes_reduce(b"doubling check value");
        assert_eq!(a.double(), a.add(&a));
    }

    #[test]
    fn invert_roundtrip() {
        let a = Fe::from_be_bytes_reduce(b"invertible nonzero field element");
        let inv = a.invert().unwrap();
        assert_eq!(a.mul(&inv), Fe::one());
    }

    #[test]
    fn be_bytes_roundtrip() {
        let a = Fe::from_be_bytes_reduce(b"roundtrip through canonical encoding");
        let mut bytes = [0u8; 32];
        a.to_be_bytes_into(&mut bytes);
        let back = Fe::from_be_bytes(&bytes).unwrap();
        assert_eq!(a, back);
    }
}
