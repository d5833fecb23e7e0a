//! ECDSA over short-Weierstrass curves: RFC 6979 deterministic nonces,
//! public-key recovery, and low-`S` normalization, generic over the curve's
//! point type, field, scalar, and preferred digest the way `ecdsa-core`'s
//! `hazmat::{SignPrimitive, VerifyPrimitive}` traits are generic over a
//! `PrimeCurve`, but collapsed into free functions since this crate carries
//! its own field/scalar/point types instead of the `elliptic-curve` crate's.

extern crate alloc;

use digest::Digest;
use primefield::Modulus;
use primeorder::{AffinePoint, FieldElement, ProjectivePoint, WeierstrassParams};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::error::{Error, Result};
use crate::fe::Fe;
use crate::mul::{double_scalar_mul_vartime, windowed_mul};
use crate::sc::Sc;
use crate::{der, drbg};

/// An `(r, s)` ECDSA signature pair. Pairs with [`RecoveryId`], the extra
/// bit SEC1 §4.1.6 needs to reconstruct the signer's public key from the
/// signature and message alone.
#[derive(Clone, Copy, Debug)]
pub struct Signature<const LIMBS: usize, const WIDE: usize, SM: Modulus<LIMBS, WIDE>> {
    pub r: Sc<LIMBS, WIDE, SM>,
    pub s: Sc<LIMBS, WIDE, SM>,
}

/// Bit 0: `y` of the ephemeral point `R` was odd. Bit 1: `x` of `R`
/// overflowed the field and had to be reduced mod the (smaller) group
/// order before verification — vanishingly rare, but part of SEC1's
/// recovery id so it is tracked rather than assumed away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryId(pub u8);

fn windows_of_bit_len<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
    s: &Sc<LIMBS, WIDE, M>,
    bit_len: u32,
) -> alloc::vec::Vec<u32> {
    s.windows(4, bit_len)
}

/// Signs `msg_hash` (the output of the curve's preferred digest, already
/// hashed by the caller) with RFC 6979 nonce derivation. `bit_len` is the
/// group order's bit length (used for windowed scalar multiplication);
/// `byte_len` its ceil-to-byte length (used for wire/DRBG sizing).
pub fn sign_prehashed<P, const LIMBS: usize, const WIDE: usize, FM, SM, D>(
    private_key: &Sc<LIMBS, WIDE, SM>,
    msg_hash: &[u8],
    generator: &ProjectivePoint<P>,
    bit_len: u32,
    byte_len: usize,
) -> Result<(Signature<LIMBS, WIDE, SM>, RecoveryId)>
where
    P: WeierstrassParams<Field = Fe<LIMBS, WIDE, FM>>,
    FM: Modulus<LIMBS, WIDE>,
    SM: Modulus<LIMBS, WIDE>,
    D: Digest,
{
    let z = drbg::bits2int::<LIMBS, WIDE, SM>(msg_hash, bit_len, byte_len);

    loop {
        let k = drbg::generate_k::<D, LIMBS, WIDE, SM>(private_key, msg_hash, bit_len, byte_len);
        let digits = windows_of_bit_len(&k, bit_len);
        let r_point = windowed_mul(generator, &digits);
        let affine = r_point.to_affine();
        if bool::from(affine.is_identity()) {
            continue;
        }

        let mut xb = [0u8; 128];
        affine.x().to_be_bytes_into(&mut xb[..byte_len]);
        let r = Sc::<LIMBS, WIDE, SM>::from_be_bytes_reduce(&xb[..byte_len]);
        if bool::from(r.is_zero()) {
            continue;
        }

        let k_inv = match Option::from(k.invert()) {
            Some(v) => v,
            None => continue,
        };
        let mut s = k_inv.mul(&z.add(&r.mul(private_key)));
        if bool::from(s.is_zero()) {
            continue;
        }

        let y_odd = bool::from(affine.y().is_odd());
        let mut recovery_bit = y_odd as u8;

        // Low-S normalization (BIP-62 / the de facto ECDSA convention):
        // whichever of `s`/`n-s` is smaller is canonical, and flipping `s`
        // flips the parity the recovery id records.
        let s_neg = s.neg();
        let is_high = is_greater_than_half_order::<LIMBS, WIDE, SM>(&s, byte_len);
        s = Sc::conditional_select(&s, &s_neg, Choice::from(is_high as u8));
        if is_high {
            recovery_bit ^= 1;
        }

        return Ok((Signature { r, s }, RecoveryId(recovery_bit)));
    }
}

/// `true` if `s > n/2`. Walks the order's bytes once to build `n/2`'s
/// big-endian encoding (`n` is odd for every curve here, so this floors
/// correctly) rather than keeping a second precomputed constant per curve.
fn is_greater_than_half_order<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
    s: &Sc<LIMBS, WIDE, M>,
    byte_len: usize,
) -> bool {
    let n = M::N;
    let mut half = [0u64; LIMBS];
    let mut carry = 0u64;
    for i in (0..LIMBS).rev() {
        let bit0 = n[i] & 1;
        half[i] = (n[i] >> 1) | (carry << 63);
        carry = bit0;
    }
    let mut half_be = [0u8; 128];
    for (i, limb) in half.iter().rev().enumerate() {
        half_be[i * 8..i * 8 + 8].copy_from_slice(&limb.to_be_bytes());
    }
    let skip = 128 - byte_len.min(128);
    let half_be = &half_be[skip..];

    let mut s_be = [0u8; 128];
    s.to_be_bytes_into(&mut s_be[..byte_len]);
    s_be[..byte_len] > *half_be
}

/// Verifies `(r, s)` over `msg_hash` against the public key `q`, via
/// Shamir's trick (`u1*G + u2*Q`).
pub fn verify_prehashed<P, const LIMBS: usize, const WIDE: usize, FM, SM>(
    q: &ProjectivePoint<P>,
    msg_hash: &[u8],
    sig: &Signature<LIMBS, WIDE, SM>,
    generator: &ProjectivePoint<P>,
    bit_len: u32,
    byte_len: usize,
) -> Result<()>
where
    P: WeierstrassParams<Field = Fe<LIMBS, WIDE, FM>>,
    FM: Modulus<LIMBS, WIDE>,
    SM: Modulus<LIMBS, WIDE>,
{
    if bool::from(sig.r.is_zero()) || bool::from(sig.s.is_zero()) {
        return Err(Error::Verify);
    }
    let s_inv = Option::<Sc<LIMBS, WIDE, SM>>::from(sig.s.invert()).ok_or(Error::Verify)?;
    let z = drbg::bits2int::<LIMBS, WIDE, SM>(msg_hash, bit_len, byte_len);
    let u1 = z.mul(&s_inv);
    let u2 = sig.r.mul(&s_inv);

    let point = double_scalar_mul_vartime(&u1, generator, &u2, q);
    let affine = point.to_affine();
    if bool::from(affine.is_identity()) {
        return Err(Error::Verify);
    }

    let mut xb = [0u8; 128];
    affine.x().to_be_bytes_into(&mut xb[..byte_len]);
    let r_check = Sc::<LIMBS, WIDE, SM>::from_be_bytes_reduce(&xb[..byte_len]);
    if bool::from(r_check.ct_eq(&sig.r)) {
        Ok(())
    } else {
        Err(Error::Verify)
    }
}

/// SEC1 §4.1.6 public-key recovery: reconstructs the signer's public key
/// from `(msg_hash, sig, recovery_id)` alone, the other half of the
/// `sign_prehashed`/[`RecoveryId`] pair.
pub fn recover<P, const LIMBS: usize, const WIDE: usize, FM, SM>(
    msg_hash: &[u8],
    sig: &Signature<LIMBS, WIDE, SM>,
    recovery_id: RecoveryId,
    generator: &ProjectivePoint<P>,
    bit_len: u32,
    byte_len: usize,
) -> Result<ProjectivePoint<P>>
where
    P: WeierstrassParams<Field = Fe<LIMBS, WIDE, FM>>,
    FM: Modulus<LIMBS, WIDE>,
    SM: Modulus<LIMBS, WIDE>,
{
    if bool::from(sig.r.is_zero()) || bool::from(sig.s.is_zero()) {
        return Err(Error::Verify);
    }
    if recovery_id.0 & 2 != 0 {
        // Bit 1 flags that x(R) overflowed the field and was reduced mod
        // the (smaller) group order before signing. None of this crate's
        // curves have a field/order gap wide enough for that to happen in
        // practice, so there is nothing to add back; treat it as
        // undecodable rather than guess which multiple of n to restore.
        return Err(Error::Decode);
    }

    let mut rb = [0u8; 128];
    sig.r.to_be_bytes_into(&mut rb[..byte_len]);
    let x = Option::<Fe<LIMBS, WIDE, FM>>::from(Fe::from_be_bytes(&rb[..byte_len]))
        .ok_or(Error::Decode)?;
    let rhs = x.square().mul(&x).add(&P::A.mul(&x)).add(&P::B);
    let y = Option::from(rhs.sqrt()).ok_or(Error::Decode)?;
    let want_odd = Choice::from(recovery_id.0 & 1);
    let y = Fe::conditional_select(&y, &y.neg(), y.is_odd() ^ want_odd);
    let r_point = AffinePoint::<P>::new(x, y).to_projective();

    let z = drbg::bits2int::<LIMBS, WIDE, SM>(msg_hash, bit_len, byte_len);
    let r_inv = Option::<Sc<LIMBS, WIDE, SM>>::from(sig.r.invert()).ok_or(Error::Decode)?;
    let u1 = z.neg().mul(&r_inv);
    let u2 = sig.s.mul(&r_inv);

    let q = double_scalar_mul_vartime(&u1, generator, &u2, &r_point);
    if bool::from(q.to_affine().is_identity()) {
        return Err(Error::Verify);
    }
    Ok(q)
}

/// ECDH key agreement (SEC1 §3.3.1): `private_key * their_public`. Returns
/// `Error::Identity` if the result is the point at infinity (an invalid
/// peer key, or `private_key == 0`), since using that as shared key
/// material would be catastrophic rather than merely wrong.
pub fn derive<P, const LIMBS: usize, const WIDE: usize, FM, SM>(
    private_key: &Sc<LIMBS, WIDE, SM>,
    their_public: &ProjectivePoint<P>,
    bit_len: u32,
) -> Result<ProjectivePoint<P>>
where
    P: WeierstrassParams<Field = Fe<LIMBS, WIDE, FM>>,
    FM: Modulus<LIMBS, WIDE>,
    SM: Modulus<LIMBS, WIDE>,
{
    let shared = windowed_mul(their_public, &private_key.windows(4, bit_len));
    if bool::from(shared.to_affine().is_identity()) {
        return Err(Error::Identity);
    }
    Ok(shared)
}

/// Encodes `sig` as the fixed-width `r || s` format SEC1 §C.3 calls "the
/// concatenation representation".
pub fn to_fixed_bytes<const LIMBS: usize, const WIDE: usize, SM: Modulus<LIMBS, WIDE>>(
    sig: &Signature<LIMBS, WIDE, SM>,
    byte_len: usize,
    out: &mut [u8],
) {
    sig.r.to_be_bytes_into(&mut out[..byte_len]);
    sig.s.to_be_bytes_into(&mut out[byte_len..2 * byte_len]);
}

pub fn from_fixed_bytes<const LIMBS: usize, const WIDE: usize, SM: Modulus<LIMBS, WIDE>>(
    bytes: &[u8],
    byte_len: usize,
) -> Result<Signature<LIMBS, WIDE, SM>> {
    if bytes.len() != 2 * byte_len {
        return Err(Error::Decode);
    }
    let r = Option::from(Sc::from_be_bytes(&bytes[..byte_len])).ok_or(Error::Decode)?;
    let s = Option::from(Sc::from_be_bytes(&bytes[byte_len..])).ok_or(Error::Decode)?;
    Ok(Signature { r, s })
}

/// Encodes `sig` as an X9.62 DER `SEQUENCE { r, s }`.
pub fn to_der<const LIMBS: usize, const WIDE: usize, SM: Modulus<LIMBS, WIDE>>(
    sig: &Signature<LIMBS, WIDE, SM>,
    byte_len: usize,
    out: &mut [u8],
) -> Result<usize> {
    let mut rb = [0u8; 128];
    let mut sb = [0u8; 128];
    sig.r.to_be_bytes_into(&mut rb[..byte_len]);
    sig.s.to_be_bytes_into(&mut sb[..byte_len]);
    der::encode_into(&rb[..byte_len], &sb[..byte_len], out)
}

pub fn from_der<const LIMBS: usize, const WIDE: usize, SM: Modulus<LIMBS, WIDE>>(
    der_bytes: &[u8],
    byte_len: usize,
) -> Result<Signature<LIMBS, WIDE, SM>> {
    let mut rb = [0u8; 128];
    let mut sb = [0u8; 128];
    der::decode_into(der_bytes, &mut rb[..byte_len], &mut sb[..byte_len])?;
    let r = Option::from(Sc::from_be_bytes(&rb[..byte_len])).ok_or(Error::Decode)?;
    let s = Option::from(Sc::from_be_bytes(&sb[..byte_len])).ok_or(Error::Decode)?;
    Ok(Signature { r, s })
}

/// Instantiates ergonomic `SigningKey`/`VerifyingKey` wrappers around the
/// generic core above for one named curve, the way `p256::ecdsa` and
/// `k256::ecdsa` wrap `ecdsa-core`'s generic `SigningKey<C>`/`VerifyingKey<C>`
/// with a concrete curve parameter baked in.
macro_rules! ecdsa_curve {
    ($modname:ident, $params:ty, $field_mod:ty, $scalar_mod:ty, $limbs:expr, $wide:expr, $digest:ty, $bit_len:expr, $byte_len:expr, $gx:expr, $gy:expr) => {
        pub mod $modname {
            use super::*;
            use primeorder::ProjectivePoint;

            pub type Scalar = Sc<$limbs, $wide, $scalar_mod>;
            pub type Signature = super::Signature<$limbs, $wide, $scalar_mod>;
            pub type RecoveryId = super::RecoveryId;

            fn generator() -> ProjectivePoint<$params> {
                ProjectivePoint::<$params>::generator($gx, $gy)
            }

            #[derive(Clone)]
            pub struct SigningKey {
                secret: Scalar,
                verifying: VerifyingKey,
            }

            impl SigningKey {
                pub fn new(secret: Scalar) -> Result<Self> {
                    if bool::from(secret.is_zero()) {
                        return Err(Error::Parameter);
                    }
                    let point = windowed_mul(&generator(), &secret.windows(4, $bit_len));
                    Ok(Self {
                        secret,
                        verifying: VerifyingKey { point },
                    })
                }

                pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
                    let secret = Option::from(Scalar::from_be_bytes(bytes)).ok_or(Error::Decode)?;
                    Self::new(secret)
                }

                pub fn verifying_key(&self) -> &VerifyingKey {
                    &self.verifying
                }

                /// Signs a pre-hashed message (the caller runs the curve's
                /// preferred digest over the message first) with an RFC 6979
                /// deterministic nonce.
                pub fn sign_prehash(&self, msg_hash: &[u8]) -> Result<(Signature, RecoveryId)> {
                    super::sign_prehashed::<$params, $limbs, $wide, $field_mod, $scalar_mod, $digest>(
                        &self.secret,
                        msg_hash,
                        &generator(),
                        $bit_len,
                        $byte_len,
                    )
                }

                pub fn sign(&self, msg: &[u8]) -> Result<(Signature, RecoveryId)> {
                    let digest = <$digest as digest::Digest>::digest(msg);
                    self.sign_prehash(&digest)
                }

                /// ECDH key agreement against `their_public`, returning the
                /// shared point's x-coordinate (SEC1 §3.3.1's `Z`).
                pub fn ecdh(&self, their_public: &VerifyingKey) -> Result<[u8; $byte_len]> {
                    let shared = super::derive::<$params, $limbs, $wide, $field_mod, $scalar_mod>(
                        &self.secret,
                        &their_public.point,
                        $bit_len,
                    )?;
                    let mut out = [0u8; $byte_len];
                    shared.to_affine().x().to_be_bytes_into(&mut out);
                    Ok(out)
                }
            }

            #[derive(Clone, Copy)]
            pub struct VerifyingKey {
                point: ProjectivePoint<$params>,
            }

            impl VerifyingKey {
                pub fn from_point(point: ProjectivePoint<$params>) -> Self {
                    Self { point }
                }

                pub fn as_point(&self) -> &ProjectivePoint<$params> {
                    &self.point
                }

                pub fn verify_prehash(&self, msg_hash: &[u8], sig: &Signature) -> Result<()> {
                    super::verify_prehashed::<$params, $limbs, $wide, $field_mod, $scalar_mod>(
                        &self.point,
                        msg_hash,
                        sig,
                        &generator(),
                        $bit_len,
                        $byte_len,
                    )
                }

                pub fn verify(&self, msg: &[u8], sig: &Signature) -> Result<()> {
                    let digest = <$digest as digest::Digest>::digest(msg);
                    self.verify_prehash(&digest, sig)
                }

                /// Reconstructs the signer's public key from `(msg_hash,
                /// sig, recovery_id)` alone.
                pub fn recover_from_prehash(
                    msg_hash: &[u8],
                    sig: &Signature,
                    recovery_id: RecoveryId,
                ) -> Result<Self> {
                    let point = super::recover::<$params, $limbs, $wide, $field_mod, $scalar_mod>(
                        msg_hash,
                        sig,
                        recovery_id,
                        &generator(),
                        $bit_len,
                        $byte_len,
                    )?;
                    Ok(Self { point })
                }

                pub fn recover(msg: &[u8], sig: &Signature, recovery_id: RecoveryId) -> Result<Self> {
                    let digest = <$digest as digest::Digest>::digest(msg);
                    Self::recover_from_prehash(&digest, sig, recovery_id)
                }
            }
        }
    };
}

ecdsa_curve!(
    p192,
    crate::weier::p192_curve::Params,
    crate::curve::p192::FieldMod,
    crate::curve::p192::ScalarMod,
    3,
    6,
    sha2::Sha256,
    192,
    24,
    crate::curve::p192::GX,
    crate::curve::p192::GY
);

ecdsa_curve!(
    p224,
    crate::weier::p224_curve::Params,
    crate::curve::p224::FieldMod,
    crate::curve::p224::ScalarMod,
    4,
    8,
    sha2::Sha256,
    224,
    28,
    crate::curve::p224::GX,
    crate::curve::p224::GY
);

ecdsa_curve!(
    p256,
    crate::weier::p256_curve::Params,
    crate::curve::p256::FieldMod,
    crate::curve::p256::ScalarMod,
    4,
    8,
    sha2::Sha256,
    256,
    32,
    crate::curve::p256::GX,
    crate::curve::p256::GY
);

ecdsa_curve!(
    p384,
    crate::weier::p384_curve::Params,
    crate::curve::p384::FieldMod,
    crate::curve::p384::ScalarMod,
    6,
    12,
    sha2::Sha384,
    384,
    48,
    crate::curve::p384::GX,
    crate::curve::p384::GY
);

ecdsa_curve!(
    p521,
    crate::weier::p521_curve::Params,
    crate::curve::p521::FieldMod,
    crate::curve::p521::ScalarMod,
    9,
    18,
    sha2::Sha512,
    521,
    66,
    crate::curve::p521::GX,
    crate::curve::p521::GY
);

ecdsa_curve!(
    k256,
    crate::weier::k256_curve::Params,
    crate::curve::k256::FieldMod,
    crate::curve::k256::ScalarMod,
    4,
    8,
    sha2::Sha256,
    256,
    32,
    crate::curve::k256::GX,
    crate::curve::k256::GY
);

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_from_u64<const LIMBS: usize, const WIDE: usize, M: Modulus<LIMBS, WIDE>>(
        v: u64,
    ) -> Sc<LIMBS, WIDE, M> {
        let mut bytes = [0u8; 128];
        let len = bytes.len();
        bytes[len - 8..].copy_from_slice(&v.to_be_bytes());
        Sc::from_be_bytes_reduce(&bytes)
    }

    #[test]
    fn p256_sign_then_verify_roundtrip() {
        let sk = p256::SigningKey::new(scalar_from_u64(424242)).unwrap();
        let (sig, _rid) = sk.sign(b"ecdsa over p256").unwrap();
        sk.verifying_key()
            .verify(b"ecdsa over p256", &sig)
            .unwrap();
    }

    #[test]
    fn p256_tampered_message_rejected() {
        let sk = p256::SigningKey::new(scalar_from_u64(7)).unwrap();
        let (sig, _rid) = sk.sign(b"original message").unwrap();
        assert!(sk
            .verifying_key()
            .verify(b"tampered message", &sig)
            .is_err());
    }

    #[test]
    fn p256_signatures_are_low_s() {
        let sk = p256::SigningKey::new(scalar_from_u64(99)).unwrap();
        let (sig, _rid) = sk.sign(b"low-s check").unwrap();
        assert!(!is_greater_than_half_order::<4, 8, crate::curve::p256::ScalarMod>(&sig.s, 32));
    }

    #[test]
    fn p256_der_roundtrip() {
        let sk = p256::SigningKey::new(scalar_from_u64(55)).unwrap();
        let (sig, _rid) = sk.sign(b"der roundtrip").unwrap();
        let mut der = [0u8; 80];
        let len = to_der(&sig, 32, &mut der).unwrap();
        let decoded: Signature<4, 8, crate::curve::p256::ScalarMod> =
            from_der(&der[..len], 32).unwrap();
        assert!(bool::from(decoded.r.ct_eq(&sig.r)));
        assert!(bool::from(decoded.s.ct_eq(&sig.s)));
    }

    #[test]
    fn k256_sign_then_verify_roundtrip() {
        let sk = k256::SigningKey::new(scalar_from_u64(13)).unwrap();
        let (sig, _rid) = sk.sign(b"secp256k1 ecdsa").unwrap();
        sk.verifying_key()
            .verify(b"secp256k1 ecdsa", &sig)
            .unwrap();
    }

    #[test]
    fn p521_sign_then_verify_roundtrip() {
        let sk = p521::SigningKey::new(scalar_from_u64(31337)).unwrap();
        let (sig, _rid) = sk.sign(b"p521 ecdsa").unwrap();
        sk.verifying_key().verify(b"p521 ecdsa", &sig).unwrap();
    }

    // P-192 and P-224 both sign with SHA-256, a digest wider than their
    // group order (256 bits over a 192- or 224-bit order): these exercise
    // `bits2int`'s truncate-before-reduce path that a full-width reduction
    // gets wrong.

    #[test]
    fn p192_sign_then_verify_roundtrip() {
        let sk = p192::SigningKey::new(scalar_from_u64(4242)).unwrap();
        let (sig, _rid) = sk.sign(b"ecdsa over p192 with a wider-than-order digest").unwrap();
        sk.verifying_key()
            .verify(b"ecdsa over p192 with a wider-than-order digest", &sig)
            .unwrap();
    }

    #[test]
    fn p192_tampered_message_rejected() {
        let sk = p192::SigningKey::new(scalar_from_u64(17)).unwrap();
        let (sig, _rid) = sk.sign(b"original").unwrap();
        assert!(sk.verifying_key().verify(b"tampered", &sig).is_err());
    }

    #[test]
    fn p224_sign_then_verify_roundtrip() {
        let sk = p224::SigningKey::new(scalar_from_u64(909090)).unwrap();
        let (sig, _rid) = sk.sign(b"ecdsa over p224 with a wider-than-order digest").unwrap();
        sk.verifying_key()
            .verify(b"ecdsa over p224 with a wider-than-order digest", &sig)
            .unwrap();
    }

    #[test]
    fn p224_tampered_message_rejected() {
        let sk = p224::SigningKey::new(scalar_from_u64(3)).unwrap();
        let (sig, _rid) = sk.sign(b"original").unwrap();
        assert!(sk.verifying_key().verify(b"tampered", &sig).is_err());
    }

    #[test]
    fn k256_recover_reconstructs_verifying_key() {
        let sk = k256::SigningKey::new(scalar_from_u64(777)).unwrap();
        let msg = b"recoverable secp256k1 ecdsa";
        let (sig, rid) = sk.sign(msg).unwrap();
        let recovered = k256::VerifyingKey::recover(msg, &sig, rid).unwrap();
        recovered.verify(msg, &sig).unwrap();
        assert!(bool::from(
            recovered
                .as_point()
                .to_affine()
                .x()
                .ct_eq(&sk.verifying_key().as_point().to_affine().x())
        ));
    }

    #[test]
    fn p256_ecdh_is_symmetric() {
        let alice = p256::SigningKey::new(scalar_from_u64(111)).unwrap();
        let bob = p256::SigningKey::new(scalar_from_u64(222)).unwrap();
        let shared_a = alice.ecdh(bob.verifying_key()).unwrap();
        let shared_b = bob.ecdh(alice.verifying_key()).unwrap();
        assert_eq!(shared_a, shared_b);
    }
}
