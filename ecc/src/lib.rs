//! A from-scratch elliptic curve cryptography engine: short-Weierstrass,
//! Montgomery, and twisted-Edwards curve arithmetic, hash-to-curve
//! encodings, and the ECDSA, BIP-340 Schnorr, X25519/X448, and EdDSA
//! protocols, over P-192/224/256/384/521, secp256k1, Curve25519, Curve448,
//! and Ed1174.
//!
//! # Layout
//!
//! - [`fe`]/[`sc`] — generic prime-field and scalar-field element types,
//!   parameterized over [`primefield::Modulus`].
//! - [`curve`] — the nine named curves' moduli, coefficients, and base
//!   points, each parsed at compile time from its standard hex constants.
//! - [`weier`]/[`mont`]/[`edwards`] — the three curve shapes' group-law
//!   implementations, generic over [`primeorder::WeierstrassParams`]/
//!   [`mont::MontgomeryParams`]/[`edwards::EdwardsParams`] respectively.
//! - [`mul`] — scalar multiplication strategies (fixed-window, Shamir's
//!   trick, the secp256k1 GLV split) shared across protocols.
//! - [`hash2curve`] — SSWU/SVDW/Elligator2 encodings from field elements (or
//!   hashed byte strings) to curve points.
//! - [`der`] — the minimal DER codec ECDSA's `SEQUENCE { r, s }` needs.
//! - [`drbg`] — RFC 6979 deterministic nonce generation.
//! - [`ecdsa`]/[`schnorr`]/[`xdh`]/[`eddsa`] — the four signature/agreement
//!   protocols built on the above.
//! - [`error`] — the engine-wide `Result`/`Error` type every fallible
//!   operation returns.
//!
//! No type in this crate is generic over "the curve" as a single parameter;
//! each curve shape's generic point type is instantiated once per curve in
//! [`weier`]/[`mont`]/[`edwards`], and the protocol modules are generic over
//! *that* point type. [`curve::CurveId`] exists only for run-time curve
//! selection by name — it is not used internally by the arithmetic.

#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod curve;
pub mod der;
pub mod drbg;
pub mod ecdsa;
pub mod eddsa;
pub mod edwards;
pub mod error;
pub mod fe;
pub mod hash2curve;
pub mod mont;
pub mod mul;
pub mod sc;
pub mod schnorr;
pub mod weier;
pub mod xdh;

pub use error::{Error, Result};
