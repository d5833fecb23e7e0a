//! Deterministic nonce generation for ECDSA/Schnorr signing, following the
//! HMAC-DRBG construction of RFC 6979 §3.2 (steps a-h), generalized here
//! over any [`digest::Digest`] + scalar field pair. Avoiding a user-supplied
//! RNG for the per-signature nonce removes the catastrophic "reused `k`
//! leaks the private key" failure mode a bad RNG invites.

extern crate alloc;

use alloc::vec::Vec;
use digest::Digest;
use hmac::{Hmac, Mac};
use primefield::Modulus;

use crate::sc::Sc;

/// Derives the RFC 6979 nonce `k` for signing `msg_hash` (the digest output,
/// not the raw message) under scalar-field scalar `private_key`.
///
/// `bit_len` is the group order's bit length and `byte_len` its
/// ceil-to-byte length; callers pass their curve's canonical values rather
/// than deriving them from `LIMBS*8`, since several curves (P-521, Ed448)
/// don't use every byte of their last limb.
pub fn generate_k<D, const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
    private_key: &Sc<LIMBS, WIDE, M>,
    msg_hash: &[u8],
    bit_len: u32,
    byte_len: usize,
) -> Sc<LIMBS, WIDE, M>
where
    D: Digest + Clone,
{
    let mut x = [0u8; 128];
    private_key.to_be_bytes_into(&mut x[..byte_len]);
    let h1 = bits2octets::<LIMBS, WIDE, M>(msg_hash, bit_len, byte_len);

    let hlen = <D as Digest>::output_size();
    let mut v = Vec::from(vec_of(0x01, hlen));
    let mut k = Vec::from(vec_of(0x00, hlen));

    k = hmac::<D>(&k, &[&v, &[0x00], &x[..byte_len], &h1[..byte_len]]);
    v = hmac::<D>(&k, &[&v]);
    k = hmac::<D>(&k, &[&v, &[0x01], &x[..byte_len], &h1[..byte_len]]);
    v = hmac::<D>(&k, &[&v]);

    loop {
        let mut t: Vec<u8> = Vec::new();
        while t.len() < byte_len {
            v = hmac::<D>(&k, &[&v]);
            t.extend_from_slice(&v);
        }
        t.truncate(byte_len);

        if let Some(candidate) = Option::from(Sc::<LIMBS, WIDE, M>::from_be_bytes(&t)) {
            let candidate: Sc<LIMBS, WIDE, M> = candidate;
            if !bool::from(candidate.is_zero()) {
                return candidate;
            }
        }

        k = hmac::<D>(&k, &[&v, &[0x00]]);
        v = hmac::<D>(&k, &[&v]);
    }
}

/// RFC 6979 §2.3.4 `bits2octets`: `bits2int(hash) mod q`, encoded back to
/// `byte_len` octets. Delegates the truncate-then-reduce work to
/// [`bits2int`] rather than reducing the hash's full width.
fn bits2octets<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
    hash: &[u8],
    bit_len: u32,
    byte_len: usize,
) -> [u8; 128] {
    let reduced = bits2int::<LIMBS, WIDE, M>(hash, bit_len, byte_len);
    let mut out = [0u8; 128];
    reduced.to_be_bytes_into(&mut out[..byte_len]);
    out
}

/// SEC1 §4.1.3 step 5 / RFC 6979 §2.3.2 `bits2int`: takes the leftmost
/// `bit_len` bits of `hash` (left-padding with zero bytes first if `hash`
/// is shorter than `byte_len`), then reduces once modulo the group order.
///
/// Digests wider than the order (SHA-256 over P-192's 192-bit order, or
/// P-224's 224-bit order) must be truncated to the order's bit length
/// *before* reduction, not reduced at full width — those are different
/// values. Matches `ecdsa_reduce`/`sc_import_weak`'s truncate-and-shift
/// construction rather than FIPS 186's "mod the whole digest" alternative
/// (the two standards disagree; this follows SEC1's).
pub(crate) fn bits2int<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
    hash: &[u8],
    bit_len: u32,
    byte_len: usize,
) -> Sc<LIMBS, WIDE, M> {
    let take = hash.len().min(byte_len);
    let mut tmp = [0u8; 128];
    tmp[byte_len - take..byte_len].copy_from_slice(&hash[..take]);

    let total_bits = (byte_len as u32) * 8;
    if total_bits > bit_len {
        let shift = total_bits - bit_len;
        let mask = (1u8 << shift) - 1;
        let mut carry = 0u8;
        for byte in tmp[..byte_len].iter_mut() {
            let ch = *byte;
            *byte = (carry << (8 - shift)) | (ch >> shift);
            carry = ch & mask;
        }
    }

    Sc::from_be_bytes_reduce(&tmp[..byte_len])
}

fn vec_of(byte: u8, len: usize) -> Vec<u8> {
    let mut v = Vec::with_capacity(len);
    v.resize(len, byte);
    v
}

fn hmac<D: Digest + digest::core_api::CoreProxy>(key: &[u8], parts: &[&[u8]]) -> Vec<u8>
where
    Hmac<D>: Mac,
{
    let mut mac = Hmac::<D>::new_from_slice(key).expect("HMAC accepts any key length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{p192, p256};
    use subtle::ConstantTimeEq;

    #[test]
    fn bits2int_truncates_rather_than_reducing_full_width() {
        // A 32-byte digest over P-192's 192-bit (24-byte) order: bits2int
        // must reduce the leftmost 24 bytes, not the full 32.
        let mut hash = [0u8; 32];
        for (i, b) in hash.iter_mut().enumerate() {
            *b = i as u8;
        }
        let got = bits2int::<3, 6, p192::ScalarMod>(&hash, 192, 24);
        let truncated_then_reduced =
            Sc::<3, 6, p192::ScalarMod>::from_be_bytes_reduce(&hash[..24]);
        let full_width_reduced = Sc::<3, 6, p192::ScalarMod>::from_be_bytes_reduce(&hash);

        assert!(bool::from(got.ct_eq(&truncated_then_reduced)));
        assert!(!bool::from(got.ct_eq(&full_width_reduced)));
    }

    #[test]
    fn bits2int_is_a_no_op_when_hash_already_matches_order_width() {
        let mut hash = [0u8; 32];
        for (i, b) in hash.iter_mut().enumerate() {
            *b = (i * 7) as u8;
        }
        let got = bits2int::<4, 8, p256::ScalarMod>(&hash, 256, 32);
        let want = Sc::<4, 8, p256::ScalarMod>::from_be_bytes_reduce(&hash);
        assert!(bool::from(got.ct_eq(&want)));
    }
}
