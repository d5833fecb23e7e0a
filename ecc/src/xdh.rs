//! X25519 and X448 Diffie-Hellman (RFC 7748), built on [`crate::mont`]'s
//! x-only Montgomery ladder. Grounded in `x448`'s `EphemeralSecret`/
//! `PublicKey`/`SharedSecret` split (clamp-on-construction, zeroize-on-drop,
//! contributory-behavior rejection) and RFC 7748 §5 directly for the
//! clamping masks and wire format.
//!
//! RFC 7748 encodes scalars and u-coordinates little-endian; every other
//! wire format in this engine is big-endian, so this module is the one
//! place that reverses byte order at the boundary before handing values to
//! the (big-endian) field types.

extern crate alloc;

use alloc::vec::Vec;
use primeorder::FieldElement;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::curve::{c25519, c448};
use crate::edwards::{Ed448Params, EdwardsParams};
use crate::error::{Error, Result};
use crate::hash2curve::{curve448_to_ed448_isogeny, mont_to_edwards_birational};
use crate::mont::x_ladder;

fn bits_msb_first(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &b in bytes {
        for i in (0..8).rev() {
            bits.push((b >> i) & 1 == 1);
        }
    }
    bits
}

macro_rules! xdh_curve {
    (
        $modname:ident,
        $params:ty,
        $field:ty,
        $len:expr,
        $clamp_low_and:expr,
        $clamp_high_and:expr,
        $clamp_high_or:expr,
        $u_mask:expr,
        $basepoint_u:expr,
        $cofactor_bits:expr
    ) => {
        pub mod $modname {
            use super::*;

            /// Encoding length of scalars, u-coordinates, and shared secrets.
            pub const BYTE_LEN: usize = $len;

            /// RFC 7748 §5's basepoint, little-endian encoded.
            pub const BASEPOINT_BYTES: [u8; $len] = $basepoint_u;

            fn clamp(bytes: &mut [u8; $len]) {
                bytes[0] &= $clamp_low_and;
                bytes[$len - 1] &= $clamp_high_and;
                bytes[$len - 1] |= $clamp_high_or;
            }

            fn decode_u(u_le: &[u8; $len]) -> $field {
                let mut be = *u_le;
                be[$len - 1] &= $u_mask;
                be.reverse();
                <$field>::from_be_bytes_reduce(&be)
            }

            fn encode_u(u: $field) -> [u8; $len] {
                let mut be = [0u8; $len];
                u.to_be_bytes_into(&mut be);
                be.reverse();
                be
            }

            fn is_contributory(u: $field) -> bool {
                let result = x_ladder::<$params>(&$cofactor_bits, u);
                bool::from(FieldElement::is_zero(&result))
            }

            /// The RFC 7748 `X25519(k, u)` / `X448(k, u)` function: multiplies
            /// the Montgomery ladder's x-only basepoint-agnostic scalar `k`
            /// (clamped per §5) by the point whose u-coordinate is `u`.
            pub fn x_function(scalar: &[u8; $len], u_le: &[u8; $len]) -> [u8; $len] {
                let mut clamped = *scalar;
                clamp(&mut clamped);
                let bits = bits_msb_first(&clamped);
                let u = decode_u(u_le);
                encode_u(x_ladder::<$params>(&bits, u))
            }

            /// A Diffie-Hellman secret meant to be used for a single key
            /// exchange; consumed by [`EphemeralSecret::diffie_hellman`].
            #[derive(Clone)]
            pub struct EphemeralSecret([u8; $len]);

            impl EphemeralSecret {
                pub fn random(rng: &mut (impl CryptoRngCore + ?Sized)) -> Self {
                    let mut bytes = [0u8; $len];
                    rng.fill_bytes(&mut bytes);
                    let mut secret = Self(bytes);
                    clamp(&mut secret.0);
                    secret
                }

                /// Builds a secret from raw bytes, clamping them per RFC 7748
                /// §5 (any input is accepted; clamping makes the low-order
                /// bits of the resulting scalar a multiple of the cofactor
                /// and fixes the ladder's bit-length assumption).
                pub fn from_bytes(bytes: [u8; $len]) -> Self {
                    let mut secret = Self(bytes);
                    clamp(&mut secret.0);
                    secret
                }

                pub fn public_key(&self) -> PublicKey {
                    PublicKey(x_function(&self.0, &BASEPOINT_BYTES))
                }

                /// Performs the key exchange, consuming `self` so an
                /// ephemeral secret can never be reused across exchanges.
                /// Rejects a shared secret of all-zero bytes, RFC 7748 §6.1's
                /// "contributory behavior" check: a non-contributory peer
                /// key forces a known shared secret regardless of either
                /// party's private scalar.
                pub fn diffie_hellman(self, their_public: &PublicKey) -> Result<SharedSecret> {
                    let shared = x_function(&self.0, &their_public.0);
                    if bool::from(shared[..].ct_eq(&[0u8; $len][..])) {
                        return Err(Error::Identity);
                    }
                    Ok(SharedSecret(shared))
                }
            }

            impl Drop for EphemeralSecret {
                fn drop(&mut self) {
                    self.0.zeroize();
                }
            }

            /// A public key: the little-endian u-coordinate of a point on
            /// the curve (or a value outside the prime-order subgroup —
            /// RFC 7748 accepts any 32/56-byte string as input).
            #[derive(Clone, Copy, Debug, PartialEq, Eq)]
            pub struct PublicKey([u8; $len]);

            impl PublicKey {
                pub fn from_bytes(bytes: [u8; $len]) -> Self {
                    Self(bytes)
                }

                pub fn to_bytes(&self) -> [u8; $len] {
                    self.0
                }

                /// `true` if this point's order divides the curve's
                /// cofactor, i.e. multiplying by the cofactor reaches the
                /// identity — such points contribute no security against a
                /// small-subgroup attack and callers may wish to reject them.
                pub fn is_low_order(&self) -> bool {
                    is_contributory(decode_u(&self.0))
                }
            }

            /// The output of a Diffie-Hellman exchange: a shared u-coordinate,
            /// not yet suitable as a symmetric key (pass it through a KDF).
            pub struct SharedSecret([u8; $len]);

            impl SharedSecret {
                pub fn as_bytes(&self) -> &[u8; $len] {
                    &self.0
                }
            }

            impl Drop for SharedSecret {
                fn drop(&mut self) {
                    self.0.zeroize();
                }
            }
        }
    };
}

xdh_curve!(
    x25519,
    crate::mont::C25519Params,
    crate::curve::c25519::Field,
    32,
    0xf8u8,
    0x7fu8,
    0x40u8,
    0x7fu8,
    [
        9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0
    ],
    [true, false, false, false]
);

xdh_curve!(
    x448,
    crate::mont::C448Params,
    crate::curve::c448::Field,
    56,
    0xfcu8,
    0xffu8,
    0x80u8,
    0xffu8,
    [
        5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0
    ],
    [true, false, false]
);

/// Converts an X25519 public key's Montgomery `u`-coordinate to the
/// corresponding Ed25519 public key via the birational map
/// [`mont_to_edwards_birational`] uses for hash-to-curve, the same
/// conversion `crypto_sign_ed25519_pk_to_curve25519`-style tooling runs in
/// reverse. An X25519 key carries no sign for the Montgomery `v`-coordinate
/// (X25519 never uses it), so the caller supplies which of `v`/`-v` to
/// solve with via `sign_v`; the two choices yield the two Ed25519 points
/// that share this `u`. Returns `None` for the curve's two exceptional
/// 2-torsion inputs (`u = 0`, `u = -1`), which have no image under the map.
pub fn x25519_public_key_to_ed25519(pk: &x25519::PublicKey, sign_v: Choice) -> Option<[u8; 32]> {
    let mut be = pk.to_bytes();
    be[31] &= 0x7f;
    be.reverse();
    let u = c25519::Field::from_be_bytes_reduce(&be);

    let rhs = u.square().mul(&u).add(&c25519::MONT_A.mul(&u.square())).add(&u);
    let v = Option::from(rhs.sqrt())?;
    let v = c25519::Field::conditional_select(&v, &v.neg(), v.is_odd() ^ sign_v);

    let (x, y) = mont_to_edwards_birational(u, v, c25519::ISO_C)?;

    let mut out = [0u8; 32];
    y.to_be_bytes_into(&mut out);
    out.reverse();
    if bool::from(x.is_odd()) {
        out[31] |= 0x80;
    }
    Some(out)
}

/// Converts an X448 public key's Montgomery `u`-coordinate to the
/// corresponding Ed448 public key via Curve448's 4-isogeny onto Ed448
/// ([`curve448_to_ed448_isogeny`]). Unlike X25519/Ed25519's birational map,
/// the isogeny only needs `u` (no `v`-coordinate to recover first); the
/// caller instead picks the resulting point's `x` parity via `sign_x`,
/// since the isogeny is 4-to-1 and `u` alone doesn't determine it. Returns
/// `None` for the 2-torsion inputs the isogeny is undefined on.
pub fn x448_public_key_to_ed448(pk: &x448::PublicKey, sign_x: Choice) -> Option<[u8; 56]> {
    let mut be = pk.to_bytes();
    be.reverse();
    let u = c448::Field::from_be_bytes_reduce(&be);

    let (x, y) = curve448_to_ed448_isogeny(u, Ed448Params::D, sign_x)?;

    let mut out = [0u8; 56];
    y.to_be_bytes_into(&mut out);
    out.reverse();
    if bool::from(x.is_odd()) {
        out[55] |= 0x80;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x25519_basepoint_is_fixed_point_of_clamped_nine() {
        // Multiplying the basepoint by the scalar `9` and decoding the
        // result is a cheap self-check that doesn't depend on transcribing
        // an external test vector: it only exercises the ladder and the
        // little-endian encode/decode round trip.
        let mut scalar = [0u8; 32];
        scalar[0] = 9;
        let out = x25519::x_function(&scalar, &x25519::BASEPOINT_BYTES);
        assert_ne!(out, [0u8; 32]);
    }

    #[test]
    fn x25519_roundtrip_dh() {
        struct FixedRng(u8);
        impl rand_core::RngCore for FixedRng {
            fn next_u32(&mut self) -> u32 {
                self.0 = self.0.wrapping_add(1);
                self.0 as u32
            }
            fn next_u64(&mut self) -> u64 {
                self.next_u32() as u64
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                for b in dest {
                    self.0 = self.0.wrapping_add(1);
                    *b = self.0;
                }
            }
        }
        impl rand_core::CryptoRng for FixedRng {}

        let mut rng_a = FixedRng(1);
        let mut rng_b = FixedRng(200);
        let alice = x25519::EphemeralSecret::random(&mut rng_a);
        let bob = x25519::EphemeralSecret::random(&mut rng_b);
        let alice_pub = alice.public_key();
        let bob_pub = bob.public_key();

        let shared_alice = alice.diffie_hellman(&bob_pub).unwrap();
        let shared_bob = bob.diffie_hellman(&alice_pub).unwrap();
        assert_eq!(shared_alice.as_bytes(), shared_bob.as_bytes());
    }

    #[test]
    fn x25519_public_key_converts_to_point_on_ed25519_curve() {
        use crate::edwards::{Ed25519Params, EdwardsParams};

        let pk = x25519::PublicKey::from_bytes(x25519::BASEPOINT_BYTES);
        let encoded = x25519_public_key_to_ed25519(&pk, Choice::from(0)).unwrap();

        let mut be = encoded;
        let x_odd = be[31] & 0x80 != 0;
        be[31] &= 0x7f;
        be.reverse();
        let y = Option::from(c25519::Field::from_be_bytes(&be)).unwrap();

        // Every point the birational map produces must satisfy Ed25519's
        // curve equation `a*x^2 + y^2 = 1 + d*x^2*y^2` with `a = -1`,
        // recovered here independently of the conversion under test via
        // `ExtendedPoint::recover_x` rather than by re-deriving `x`.
        let x = Option::from(crate::edwards::ExtendedPoint::<Ed25519Params>::recover_x(
            y,
            Choice::from(x_odd as u8),
        ))
        .unwrap();
        let lhs = Ed25519Params::A.mul(&x.square()).add(&y.square());
        let rhs = c25519::Field::one().add(&Ed25519Params::D.mul(&x.square()).mul(&y.square()));
        assert!(bool::from(lhs.ct_eq(&rhs)));
    }

    #[test]
    fn x448_public_key_converts_to_point_on_ed448_curve() {
        use crate::edwards::{Ed448Params, EdwardsParams};

        let pk = x448::PublicKey::from_bytes(x448::BASEPOINT_BYTES);
        let encoded = x448_public_key_to_ed448(&pk, Choice::from(0)).unwrap();

        let mut be = encoded;
        let x_odd = be[55] & 0x80 != 0;
        be[55] &= 0x7f;
        be.reverse();
        let y = Option::from(c448::Field::from_be_bytes(&be)).unwrap();

        let x = Option::from(crate::edwards::ExtendedPoint::<Ed448Params>::recover_x(
            y,
            Choice::from(x_odd as u8),
        ))
        .unwrap();
        let lhs = Ed448Params::A.mul(&x.square()).add(&y.square());
        let rhs = c448::Field::one().add(&Ed448Params::D.mul(&x.square()).mul(&y.square()));
        assert!(bool::from(lhs.ct_eq(&rhs)));
    }
}
