//! EdDSA (RFC 8032) over twisted-Edwards curves: the `H(priv)`-derived key
//! schedule, domain-separated sign/verify, and the prehash (`...ph`)
//! variants, generic the way [`crate::ecdsa`]'s core is generic over a
//! curve's field/scalar pair — but specialized per curve below since
//! Ed25519, Ed448, and Ed1174 each pick a different hash primitive and
//! domain convention (RFC 8032 gives Ed25519 a hash-free "pure" mode but
//! always domain-separates Ed448; Ed1174 has no RFC at all, see `DESIGN.md`).

extern crate alloc;

use alloc::vec::Vec;
use digest::Digest;
use primefield::Modulus;
use primeorder::FieldElement;
use sha2::Sha512;
use sha3::digest::{ExtendableOutput, Update as XofUpdate, XofReader};
use sha3::Shake256;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::edwards::{EdwardsParams, ExtendedPoint};
use crate::error::{Error, Result};
use crate::fe::Fe;
use crate::mul::edwards_windowed_mul;
use crate::sc::Sc;

fn sha512_concat(parts: &[&[u8]]) -> Vec<u8> {
    let mut h = Sha512::new();
    for p in parts {
        Digest::update(&mut h, p);
    }
    h.finalize().to_vec()
}

fn shake256_concat(parts: &[&[u8]], out_len: usize) -> Vec<u8> {
    let mut h = Shake256::default();
    for p in parts {
        XofUpdate::update(&mut h, p);
    }
    let mut reader = h.finalize_xof();
    let mut out = alloc::vec![0u8; out_len];
    reader.read(&mut out);
    out
}

fn encode_point<P, const LIMBS: usize, const WIDE: usize, FM>(
    x: Fe<LIMBS, WIDE, FM>,
    y: Fe<LIMBS, WIDE, FM>,
    field_byte_len: usize,
    encode_len: usize,
) -> Vec<u8>
where
    P: EdwardsParams<Field = Fe<LIMBS, WIDE, FM>>,
    FM: Modulus<LIMBS, WIDE>,
{
    let mut be = alloc::vec![0u8; field_byte_len];
    y.to_be_bytes_into(&mut be);
    be.reverse();
    let mut out = alloc::vec![0u8; encode_len];
    out[..field_byte_len].copy_from_slice(&be);
    if bool::from(x.is_odd()) {
        out[encode_len - 1] |= 0x80;
    }
    out
}

fn decode_point<P, const LIMBS: usize, const WIDE: usize, FM>(
    bytes: &[u8],
    field_byte_len: usize,
    encode_len: usize,
) -> Result<(Fe<LIMBS, WIDE, FM>, Fe<LIMBS, WIDE, FM>)>
where
    P: EdwardsParams<Field = Fe<LIMBS, WIDE, FM>>,
    FM: Modulus<LIMBS, WIDE>,
{
    if bytes.len() != encode_len {
        return Err(Error::Decode);
    }
    let sign = bytes[encode_len - 1] & 0x80 != 0;
    let mut be: Vec<u8> = bytes[..field_byte_len].to_vec();
    if encode_len == field_byte_len {
        be[field_byte_len - 1] &= 0x7f;
    } else if bytes[field_byte_len] & 0x7f != 0 {
        return Err(Error::Decode);
    }
    be.reverse();
    let y = Option::from(Fe::<LIMBS, WIDE, FM>::from_be_bytes(&be)).ok_or(Error::Decode)?;
    let x = Option::from(ExtendedPoint::<P>::recover_x(y, Choice::from(sign as u8)))
        .ok_or(Error::Decode)?;
    Ok((x, y))
}

fn encode_scalar<const LIMBS: usize, const WIDE: usize, SM: Modulus<LIMBS, WIDE>>(
    s: &Sc<LIMBS, WIDE, SM>,
    field_byte_len: usize,
    encode_len: usize,
) -> Vec<u8> {
    let mut be = alloc::vec![0u8; field_byte_len];
    s.to_be_bytes_into(&mut be);
    be.reverse();
    let mut out = alloc::vec![0u8; encode_len];
    out[..field_byte_len].copy_from_slice(&be);
    out
}

fn decode_scalar<const LIMBS: usize, const WIDE: usize, SM: Modulus<LIMBS, WIDE>>(
    bytes: &[u8],
) -> Result<Sc<LIMBS, WIDE, SM>> {
    let mut be = bytes.to_vec();
    be.reverse();
    Option::from(Sc::from_be_bytes(&be)).ok_or(Error::Decode)
}

/// Builds the RFC 8032 domain-separation prefix (empty for Ed25519's "pure"
/// mode with no context and no prehash — every other combination, including
/// every Ed448 mode, always includes it).
fn dom(prefix: &[u8], always: bool, prehash: bool, context: &[u8]) -> Result<Vec<u8>> {
    if context.len() > 255 {
        return Err(Error::Parameter);
    }
    if !always && !prehash && context.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(prefix.len() + 2 + context.len());
    out.extend_from_slice(prefix);
    out.push(prehash as u8);
    out.push(context.len() as u8);
    out.extend_from_slice(context);
    Ok(out)
}

/// The generic EdDSA core: signs `msg_or_digest` (the raw message in pure
/// mode, the curve's prehash digest in `...ph` mode) under `secret_scalar`
/// (already clamped) and `nonce_seed` (the key schedule's second half).
#[allow(clippy::too_many_arguments)]
fn sign_core<P, const LIMBS: usize, const WIDE: usize, FM, SM>(
    secret_scalar: &Sc<LIMBS, WIDE, SM>,
    nonce_seed: &[u8],
    public_key_bytes: &[u8],
    msg_or_digest: &[u8],
    domain: &[u8],
    field_byte_len: usize,
    encode_len: usize,
    order_bit_len: u32,
    hash: impl Fn(&[&[u8]]) -> Vec<u8>,
) -> Vec<u8>
where
    P: EdwardsParams<Field = Fe<LIMBS, WIDE, FM>>,
    FM: Modulus<LIMBS, WIDE>,
    SM: Modulus<LIMBS, WIDE>,
{
    let r_hash = hash(&[domain, nonce_seed, msg_or_digest]);
    let r_scalar = Sc::<LIMBS, WIDE, SM>::from_be_bytes_reduce(&r_hash);

    let r_point = edwards_windowed_mul(&ExtendedPoint::<P>::generator(), &r_scalar.windows(4, order_bit_len));
    let (rx, ry) = r_point.to_affine();
    let r_bytes = encode_point::<P, LIMBS, WIDE, FM>(rx, ry, field_byte_len, encode_len);

    let e_hash = hash(&[domain, &r_bytes, public_key_bytes, msg_or_digest]);
    let e = Sc::<LIMBS, WIDE, SM>::from_be_bytes_reduce(&e_hash);

    let s = r_scalar.add(&e.mul(secret_scalar));
    let s_bytes = encode_scalar(&s, field_byte_len, encode_len);

    let mut sig = Vec::with_capacity(2 * encode_len);
    sig.extend_from_slice(&r_bytes);
    sig.extend_from_slice(&s_bytes);
    sig
}

#[allow(clippy::too_many_arguments)]
fn verify_core<P, const LIMBS: usize, const WIDE: usize, FM, SM>(
    public_key_bytes: &[u8],
    msg_or_digest: &[u8],
    sig: &[u8],
    domain: &[u8],
    field_byte_len: usize,
    encode_len: usize,
    order_bit_len: u32,
    hash: impl Fn(&[&[u8]]) -> Vec<u8>,
) -> Result<()>
where
    P: EdwardsParams<Field = Fe<LIMBS, WIDE, FM>>,
    FM: Modulus<LIMBS, WIDE>,
    SM: Modulus<LIMBS, WIDE>,
{
    if sig.len() != 2 * encode_len {
        return Err(Error::Decode);
    }
    let (r_bytes, s_bytes) = sig.split_at(encode_len);
    let (rx, ry) = decode_point::<P, LIMBS, WIDE, FM>(r_bytes, field_byte_len, encode_len)?;
    let r_point = ExtendedPoint::<P>::from_affine(rx, ry);
    let s = decode_scalar::<LIMBS, WIDE, SM>(s_bytes)?;

    let (ax, ay) = decode_point::<P, LIMBS, WIDE, FM>(public_key_bytes, field_byte_len, encode_len)?;
    let a_point = ExtendedPoint::<P>::from_affine(ax, ay);

    let e_hash = hash(&[domain, r_bytes, public_key_bytes, msg_or_digest]);
    let e = Sc::<LIMBS, WIDE, SM>::from_be_bytes_reduce(&e_hash);

    let lhs = edwards_windowed_mul(&ExtendedPoint::<P>::generator(), &s.windows(4, order_bit_len));
    let rhs = r_point.add(&edwards_windowed_mul(&a_point, &e.windows(4, order_bit_len)));

    if bool::from(lhs.ct_eq(&rhs)) {
        Ok(())
    } else {
        Err(Error::Verify)
    }
}

/// Instantiates a full EdDSA (`SigningKey`/`VerifyingKey`) surface for one
/// named curve: the key schedule (`H(seed)` split into clamped scalar +
/// nonce prefix), pure/prehash/context signing and verification.
macro_rules! eddsa_curve {
    (
        $modname:ident,
        $params:ty,
        $field_mod:ty,
        $scalar_mod:ty,
        $limbs:expr,
        $wide:expr,
        $field_byte_len:expr,
        $encode_len:expr,
        $order_bit_len:expr,
        $seed_len:expr,
        $hash_wide:expr,
        $hash_concat:expr,
        $dom_prefix:expr,
        $dom_always:expr,
        $clamp:expr
    ) => {
        pub mod $modname {
            use super::*;

            pub const SEED_LEN: usize = $seed_len;
            pub const SIGNATURE_LEN: usize = 2 * $encode_len;

            fn generator_point() -> ExtendedPoint<$params> {
                ExtendedPoint::<$params>::generator()
            }

            // RFC 8032's key schedule splits `H(seed)` into two halves of
            // `encode_len` bytes each — Ed448's clamp zeroes its half's top
            // octet entirely, which is why this half is `encode_len` (57)
            // wide rather than the 56-byte field element length.
            fn expand_seed(seed: &[u8; $seed_len]) -> ([u8; $encode_len], Vec<u8>) {
                let wide = $hash_wide(seed);
                let mut scalar_bytes: [u8; $encode_len] = [0u8; $encode_len];
                scalar_bytes.copy_from_slice(&wide[..$encode_len]);
                $clamp(&mut scalar_bytes);
                let nonce_seed = wide[$encode_len..].to_vec();
                (scalar_bytes, nonce_seed)
            }

            fn scalar_from_clamped(bytes: &[u8; $encode_len]) -> Scalar {
                let mut be = bytes.to_vec();
                be.reverse();
                Scalar::from_be_bytes_reduce(&be)
            }

            pub type Scalar = Sc<$limbs, $wide, $scalar_mod>;

            #[derive(Clone)]
            pub struct SigningKey {
                seed: [u8; $seed_len],
                secret: Scalar,
                nonce_seed: Vec<u8>,
                verifying: VerifyingKey,
            }

            impl SigningKey {
                pub fn from_seed(seed: [u8; $seed_len]) -> Self {
                    let (scalar_bytes, nonce_seed) = expand_seed(&seed);
                    let secret = scalar_from_clamped(&scalar_bytes);
                    let point = edwards_windowed_mul(&generator_point(), &secret.windows(4, $order_bit_len));
                    let (x, y) = point.to_affine();
                    let public_bytes =
                        encode_point::<$params, $limbs, $wide, $field_mod>(x, y, $field_byte_len, $encode_len);
                    Self {
                        seed,
                        secret,
                        nonce_seed,
                        verifying: VerifyingKey { bytes: public_bytes },
                    }
                }

                pub fn verifying_key(&self) -> &VerifyingKey {
                    &self.verifying
                }

                /// Pure EdDSA signing over the raw message, with an
                /// optional context string (empty for the RFC 8032 default).
                pub fn sign(&self, msg: &[u8], context: &[u8]) -> Result<Vec<u8>> {
                    let domain = dom($dom_prefix, $dom_always, false, context)?;
                    Ok(sign_core::<$params, $limbs, $wide, $field_mod, $scalar_mod>(
                        &self.secret,
                        &self.nonce_seed,
                        &self.verifying.bytes,
                        msg,
                        &domain,
                        $field_byte_len,
                        $encode_len,
                        $order_bit_len,
                        $hash_concat,
                    ))
                }

                /// The `...ph` prehash variant: `digest` is the curve's
                /// prehash of the message, computed by the caller.
                pub fn sign_prehashed(&self, digest: &[u8], context: &[u8]) -> Result<Vec<u8>> {
                    let domain = dom($dom_prefix, $dom_always, true, context)?;
                    Ok(sign_core::<$params, $limbs, $wide, $field_mod, $scalar_mod>(
                        &self.secret,
                        &self.nonce_seed,
                        &self.verifying.bytes,
                        digest,
                        &domain,
                        $field_byte_len,
                        $encode_len,
                        $order_bit_len,
                        $hash_concat,
                    ))
                }
            }

            impl Drop for SigningKey {
                fn drop(&mut self) {
                    self.seed.zeroize();
                    self.nonce_seed.zeroize();
                }
            }

            #[derive(Clone, Debug, PartialEq, Eq)]
            pub struct VerifyingKey {
                bytes: Vec<u8>,
            }

            impl VerifyingKey {
                pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
                    if bytes.len() != $encode_len {
                        return Err(Error::Decode);
                    }
                    decode_point::<$params, $limbs, $wide, $field_mod>(
                        bytes,
                        $field_byte_len,
                        $encode_len,
                    )?;
                    Ok(Self { bytes: bytes.to_vec() })
                }

                pub fn to_bytes(&self) -> &[u8] {
                    &self.bytes
                }

                pub fn verify(&self, msg: &[u8], context: &[u8], sig: &[u8]) -> Result<()> {
                    let domain = dom($dom_prefix, $dom_always, false, context)?;
                    verify_core::<$params, $limbs, $wide, $field_mod, $scalar_mod>(
                        &self.bytes,
                        msg,
                        sig,
                        &domain,
                        $field_byte_len,
                        $encode_len,
                        $order_bit_len,
                        $hash_concat,
                    )
                }

                pub fn verify_prehashed(&self, digest: &[u8], context: &[u8], sig: &[u8]) -> Result<()> {
                    let domain = dom($dom_prefix, $dom_always, true, context)?;
                    verify_core::<$params, $limbs, $wide, $field_mod, $scalar_mod>(
                        &self.bytes,
                        digest,
                        sig,
                        &domain,
                        $field_byte_len,
                        $encode_len,
                        $order_bit_len,
                        $hash_concat,
                    )
                }
            }
        }
    };
}

fn ed25519_clamp(b: &mut [u8; 32]) {
    b[0] &= 0xf8;
    b[31] &= 0x7f;
    b[31] |= 0x40;
}

fn ed448_clamp(b: &mut [u8; 57]) {
    b[0] &= 0xfc;
    b[55] |= 0x80;
    b[56] = 0;
}

/// Not part of any RFC: Ed1174 has no standardized signature scheme, so this
/// clamp generalizes Ed25519's "clear the cofactor bits, pin the top valid
/// bit" recipe to Ed1174's 251-bit order and cofactor of 4 (two low bits
/// cleared instead of three, top bit pinned at 250 instead of 254). See
/// `DESIGN.md`.
fn ed1174_clamp(b: &mut [u8; 32]) {
    b[0] &= 0xfc;
    b[31] &= 0x07;
    b[31] |= 0x04;
}

eddsa_curve!(
    ed25519,
    crate::edwards::Ed25519Params,
    crate::curve::c25519::FieldMod,
    crate::curve::c25519::ScalarMod,
    4,
    8,
    32,
    32,
    253,
    32,
    |seed: &[u8; 32]| sha512_concat(&[seed]),
    |parts: &[&[u8]]| sha512_concat(parts),
    b"SigEd25519 no Ed25519 collisions",
    false,
    ed25519_clamp
);

eddsa_curve!(
    ed448,
    crate::edwards::Ed448Params,
    crate::curve::c448::FieldMod,
    crate::curve::c448::ScalarMod,
    7,
    14,
    56,
    57,
    448,
    57,
    |seed: &[u8; 57]| shake256_concat(&[seed], 114),
    |parts: &[&[u8]]| shake256_concat(parts, 114),
    b"SigEd448",
    true,
    ed448_clamp
);

eddsa_curve!(
    ed1174,
    crate::edwards::Ed1174Params,
    crate::curve::ed1174::FieldMod,
    crate::curve::ed1174::ScalarMod,
    4,
    8,
    32,
    32,
    251,
    32,
    |seed: &[u8; 32]| sha512_concat(&[seed]),
    |parts: &[&[u8]]| sha512_concat(parts),
    b"SigEd1174",
    true,
    ed1174_clamp
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_sign_then_verify_roundtrip() {
        let sk = ed25519::SigningKey::from_seed([7u8; 32]);
        let msg = b"eddsa over ed25519";
        let sig = sk.sign(msg, b"").unwrap();
        sk.verifying_key().verify(msg, b"", &sig).unwrap();
    }

    #[test]
    fn ed25519_tampered_message_rejected() {
        let sk = ed25519::SigningKey::from_seed([9u8; 32]);
        let sig = sk.sign(b"original", b"").unwrap();
        assert!(sk.verifying_key().verify(b"tampered", b"", &sig).is_err());
    }

    #[test]
    fn ed25519_context_changes_signature() {
        let sk = ed25519::SigningKey::from_seed([1u8; 32]);
        let msg = b"context sensitive message";
        let sig_a = sk.sign(msg, b"context-a").unwrap();
        let sig_b = sk.sign(msg, b"context-b").unwrap();
        assert_ne!(sig_a, sig_b);
        sk.verifying_key().verify(msg, b"context-a", &sig_a).unwrap();
        assert!(sk
            .verifying_key()
            .verify(msg, b"context-b", &sig_a)
            .is_err());
    }

    #[test]
    fn ed25519_verifying_key_roundtrips_through_bytes() {
        let sk = ed25519::SigningKey::from_seed([3u8; 32]);
        let bytes = sk.verifying_key().to_bytes().to_vec();
        let vk = ed25519::VerifyingKey::from_bytes(&bytes).unwrap();
        let msg = b"roundtrip check";
        let sig = sk.sign(msg, b"").unwrap();
        vk.verify(msg, b"", &sig).unwrap();
    }

    #[test]
    fn ed448_sign_then_verify_roundtrip() {
        let sk = ed448::SigningKey::from_seed([11u8; 57]);
        let msg = b"eddsa over ed448";
        let sig = sk.sign(msg, b"").unwrap();
        sk.verifying_key().verify(msg, b"", &sig).unwrap();
    }

    #[test]
    fn ed1174_sign_then_verify_roundtrip() {
        let sk = ed1174::SigningKey::from_seed([5u8; 32]);
        let msg = b"eddsa over ed1174";
        let sig = sk.sign(msg, b"").unwrap();
        sk.verifying_key().verify(msg, b"", &sig).unwrap();
    }
}
