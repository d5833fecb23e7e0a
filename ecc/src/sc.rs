//! Scalar-field elements and the recoding helpers scalar multiplication
//! needs: windowed digit extraction, wNAF, and a paired NAF recoding for
//! double-scalar multiplication.

use alloc::vec::Vec;
use primefield::{Modulus, Residue};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// A scalar modulo a curve's group order.
#[derive(Clone, Copy, Debug)]
pub struct Sc<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
    pub(crate) Residue<LIMBS, WIDE, M>,
);

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Sc<LIMBS, WIDE, M> {
    pub const ZERO: Self = Self(Residue::ZERO);

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

    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Self(self.0.add(&rhs.0))
    }
    pub fn sub(&self, rhs: &Self) -> Self {
        Self(self.0.sub(&rhs.0))
    }
    pub fn neg(&self) -> Self {
        Self(self.0.neg())
    }
    pub fn mul(&self, rhs: &Self) -> Self {
        Self(self.0.mul(&rhs.0))
    }
    pub fn invert(&self) -> CtOption<Self> {
        self.0.invert().map(Self)
    }

    pub fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }

    /// The order `N`, as a little-endian byte-reversal-free big-endian
    /// limb array (exposed for curve-level bit-length computations).
    pub fn order() -> [u64; LIMBS] {
        M::N
    }

    /// Extracts `w`-bit little-endian digits, least-significant window
    /// first, for fixed-window scalar multiplication. Pads the final
    /// window with zero bits. Constant-time with respect to the value of
    /// `self` (always reads every bit), but the *number* of windows is
    /// public (determined by the modulus bit length only).
    pub fn windows(&self, w: u32, total_bits: u32) -> Vec<u32> {
        let mut bytes = [0u8; 128];
        let len = byte_len::<LIMBS>();
        self.to_be_bytes_into(&mut bytes[..len]);
        let nwindows = (total_bits + w - 1) / w;
        let mut out = Vec::with_capacity(nwindows as usize);
        for win in 0..nwindows {
            let mut digit = 0u32;
            for b in 0..w {
                let bit_idx = win * w + b;
                if bit_idx >= total_bits {
                    break;
                }
                let byte_idx = len - 1 - (bit_idx as usize / 8);
                let bit_off = bit_idx as usize % 8;
                let bit = (bytes[byte_idx] >> bit_off) & 1;
                digit |= (bit as u32) << b;
            }
            out.push(digit);
        }
        out
    }

    /// Width-`w` NAF recoding of the integer represented by `self`, as
    /// signed digits `{0} ∪ {±1, ±3, ..., ±(2^(w-1)-1)}`, least significant
    /// digit first. Variable-time: callers must only use this on public
    /// scalars (verification exponents, never signing nonces or private
    /// keys).
    pub fn naf_vartime(&self, w: u32) -> Vec<i64> {
        let mut bytes = [0u8; 128];
        let len = byte_len::<LIMBS>();
        self.to_be_bytes_into(&mut bytes[..len]);
        let mut k = be_bytes_to_u64_limbs(&bytes[..len]);
        let mut digits = Vec::new();
        let width_max = 1i64 << w;
        let half = width_max / 2;
        while !limb_is_zero(&k) {
            if limb_is_odd(&k) {
                let km = (k[0] & (width_max as u64 - 1)) as i64;
                let d = if km >= half { km - width_max } else { km };
                digits.push(d);
                if d >= 0 {
                    limb_sub_u64(&mut k, d as u64);
                } else {
                    limb_add_u64(&mut k, (-d) as u64);
                }
            } else {
                digits.push(0);
            }
            limb_shr1(&mut k);
        }
        digits
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Sc<LIMBS, WIDE, M> {
    /// `round(self * rhs / 2^shift) mod n`, computed on the full
    /// non-reduced product rather than via division. This is the
    /// `mul_shift_var` building block GLV scalar decomposition uses to
    /// replace a division with a constant multiply-and-shift (Gouvea,
    /// Oliveira, Lopez 2012, §4.3); only ever applied to public scalars, so
    /// the schoolbook multiply below does not need to run in constant time.
    pub fn mul_shift_var(&self, rhs: &Self, shift: u32) -> Self {
        let len = byte_len::<LIMBS>();
        let mut ab = [0u8; 128];
        let mut bb = [0u8; 128];
        self.to_be_bytes_into(&mut ab[..len]);
        rhs.to_be_bytes_into(&mut bb[..len]);
        let a = be_bytes_to_u64_limbs(&ab[..len]);
        let b = be_bytes_to_u64_limbs(&bb[..len]);
        let n = a.len();

        let mut prod = alloc::vec![0u64; n * 2];
        for i in 0..n {
            let mut carry: u128 = 0;
            for j in 0..n {
                let t = prod[i + j] as u128 + (a[i] as u128) * (b[j] as u128) + carry;
                prod[i + j] = t as u64;
                carry = t >> 64;
            }
            prod[i + n] = carry as u64;
        }

        let word_shift = (shift / 64) as usize;
        let bit_shift = shift % 64;
        let total = n * 2;
        let mut shifted = alloc::vec![0u64; n];
        for i in 0..n {
            let src = i + word_shift;
            if src >= total {
                break;
            }
            let lo = prod[src];
            let hi = if bit_shift == 0 || src + 1 >= total {
                0
            } else {
                prod[src + 1]
            };
            shifted[i] = if bit_shift == 0 {
                lo
            } else {
                (lo >> bit_shift) | (hi << (64 - bit_shift))
            };
        }

        let mut result_be = alloc::vec![0u8; len];
        for (i, &w) in shifted.iter().enumerate() {
            let bytes = w.to_be_bytes();
            let start = len - (i + 1) * 8;
            result_be[start..start + 8].copy_from_slice(&bytes);
        }
        Self::from_be_bytes_reduce(&result_be)
    }

    /// `true` if `self`'s canonical representative fits in half the
    /// modulus's bit width. GLV decomposition represents a signed value
    /// `v` with `|v| < sqrt(n)` as `v mod n`: a genuinely small positive
    /// `v` stays under half width, while a negative `v` wraps to `n - |v|`,
    /// whose top half-width bits all sit just below `n`'s. Only meaningful
    /// for scalars known to come from such a decomposition; never used on
    /// secret data.
    pub fn is_small_vartime(&self) -> bool {
        let len = byte_len::<LIMBS>();
        let mut bytes = [0u8; 128];
        self.to_be_bytes_into(&mut bytes[..len]);
        bytes[..len / 2].iter().all(|&b| b == 0)
    }
}

const fn byte_len<const LIMBS: usize>() -> usize {
    LIMBS * 8
}

fn be_bytes_to_u64_limbs(bytes: &[u8]) -> Vec<u64> {
    let nlimbs = (bytes.len() + 7) / 8;
    let mut out = alloc::vec![0u64; nlimbs];
    for (i, chunk) in bytes.rchunks(8).enumerate() {
        let mut word = [0u8; 8];
        word[8 - chunk.len()..].copy_from_slice(chunk);
        out[i] = u64::from_be_bytes(word);
    }
    out
}

fn limb_is_zero(k: &[u64]) -> bool {
    k.iter().all(|&w| w == 0)
}

fn limb_is_odd(k: &[u64]) -> bool {
    k[0] & 1 == 1
}

fn limb_shr1(k: &mut [u64]) {
    let mut carry = 0u64;
    for w in k.iter_mut().rev() {
        let nc = *w & 1;
        *w = (*w >> 1) | (carry << 63);
        carry = nc;
    }
}

fn limb_sub_u64(k: &mut [u64], v: u64) {
    let (d, borrow) = k[0].overflowing_sub(v);
    k[0] = d;
    if borrow {
        for w in k.iter_mut().skip(1) {
            let (d2, b2) = w.overflowing_sub(1);
            *w = d2;
            if !b2 {
                break;
            }
        }
    }
}

fn limb_add_u64(k: &mut [u64], v: u64) {
    let (s, carry) = k[0].overflowing_add(v);
    k[0] = s;
    if carry {
        for w in k.iter_mut().skip(1) {
            let (s2, c2) = w.overflowing_add(1);
            *w = s2;
            if !c2 {
                break;
            }
        }
    }
}

/// Recodes two scalars into paired signed digits for double-scalar
/// multiplication (e.g. ECDSA verification's `u1*G + u2*Q`): each scalar is
/// NAF-recoded independently (width 2: digits in `{-1, 0, 1}`, no two
/// adjacent nonzero), and the two digit streams are walked in lockstep so
/// the caller can combine `d0*g + d1*q` one step at a time. This is not
/// Joint Sparse Form proper — true JSF (Solinas 2001) recodes both scalars'
/// digits jointly, each consulting the other's low bits, for a denser
/// (non-adjacent-pair) combined stream. [`crate::mul::double_scalar_mul_vartime`]
/// handles all nine `(d0, d1)` combinations, so correctness doesn't depend
/// on that joint sparseness, only on each stream individually being a valid
/// signed-digit recoding.
///
/// Returns digit pairs `(d0, d1) ∈ {-1, 0, 1}^2`, least significant first,
/// one entry per bit of the wider scalar. Variable-time; for public
/// verification exponents only.
pub fn naf_pair_vartime<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
    a: &Sc<LIMBS, WIDE, M>,
    b: &Sc<LIMBS, WIDE, M>,
) -> Vec<(i8, i8)> {
    let len = byte_len::<LIMBS>();
    let mut ab = [0u8; 128];
    let mut bb = [0u8; 128];
    a.to_be_bytes_into(&mut ab[..len]);
    b.to_be_bytes_into(&mut bb[..len]);
    let mut ka = be_bytes_to_u64_limbs(&ab[..len]);
    let mut kb = be_bytes_to_u64_limbs(&bb[..len]);

    let mut digits = Vec::new();
    while !limb_is_zero(&ka) || !limb_is_zero(&kb) {
        let da = naf_digit(&ka);
        let db = naf_digit(&kb);
        digits.push((da, db));
        if da != 0 {
            if da > 0 {
                limb_sub_u64(&mut ka, 1);
            } else {
                limb_add_u64(&mut ka, 1);
            }
        }
        if db != 0 {
            if db > 0 {
                limb_sub_u64(&mut kb, 1);
            } else {
                limb_add_u64(&mut kb, 1);
            }
        }
        limb_shr1(&mut ka);
        limb_shr1(&mut kb);
    }
    digits
}

/// Width-2 NAF digit for the current low bits of `k`: `0` when even, else
/// `+1`/`-1` chosen so subtracting it leaves the next bit clear. `k` is odd
/// whenever this runs, so `k mod 4` is always 1 or 3.
fn naf_digit(k: &[u64]) -> i8 {
    if limb_is_odd(k) {
        if k[0] & 3 == 1 {
            1
        } else {
            -1
        }
    } else {
        0
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> PartialEq for Sc<LIMBS, WIDE, M> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}
impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Eq for Sc<LIMBS, WIDE, M> {}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> ConditionallySelectable
    for Sc<LIMBS, WIDE, M>
{
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(Residue::conditional_select(&a.0, &b.0, choice))
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> Default for Sc<LIMBS, WIDE, M> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>> zeroize::Zeroize
    for Sc<LIMBS, WIDE, M>
{
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
