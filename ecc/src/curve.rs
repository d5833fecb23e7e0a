//! Named curve parameters.
//!
//! Every constant below is parsed at compile time from its standard
//! big-endian hex representation via [`parse_hex_be`], rather than
//! hand-split into 64-bit limbs — transcribing a hex string correctly is a
//! much lower-risk activity than manually computing limb boundaries by hand,
//! and the Barrett constant for each modulus is derived automatically by
//! [`primefield::compute_mu`] rather than transcribed at all.
//!
//! Sources: FIPS 186-4 (P-192/224/256/384/521), SEC 2 (secp256k1),
//! RFC 7748 (Curve25519/X25519, Curve448/X448), RFC 8032 (Ed25519, Ed448),
//! and the original Ed1174 proposal (Bernstein/Hamburg/Krasnova/Lange/
//! Lange-style safe-curve parameters, `p = 2^251 - 9`, `d = -1174`).

use crate::fe::Fe;
use crate::sc::Sc;
use primefield::{compute_mu, Modulus};

const fn hex_val(b: u8) -> u64 {
    match b {
        b'0'..=b'9' => (b - b'0') as u64,
        b'a'..=b'f' => (b - b'a' + 10) as u64,
        b'A'..=b'F' => (b - b'A' + 10) as u64,
        _ => panic!("invalid hex digit in curve constant"),
    }
}

/// Parses a big-endian hex string (no `0x` prefix) into little-endian
/// 64-bit limbs, left-padding with zero limbs as needed.
pub(crate) const fn parse_hex_be<const LIMBS: usize>(s: &str) -> [u64; LIMBS] {
    let bytes = s.as_bytes();
    let mut out = [0u64; LIMBS];
    let mut i = 0;
    while i < bytes.len() {
        let pos_from_end = bytes.len() - 1 - i;
        let limb = pos_from_end / 16;
        let nibble = pos_from_end % 16;
        let v = hex_val(bytes[i]);
        if limb < LIMBS {
            out[limb] |= v << (nibble * 4);
        }
        i += 1;
    }
    out
}

/// `n - v` for a small public `v <= n[0]`'s low word, used to derive a
/// curve's `a = -3` (mod p) coefficient directly from the modulus constant
/// instead of hand-subtracting a multi-hundred-bit hex string.
pub(crate) const fn sub_small<const LIMBS: usize>(mut n: [u64; LIMBS], v: u64) -> [u64; LIMBS] {
    let (d, mut borrow) = n[0].overflowing_sub(v);
    n[0] = d;
    let mut i = 1;
    while borrow && i < LIMBS {
        let (d2, b2) = n[i].overflowing_sub(1);
        n[i] = d2;
        borrow = b2;
        i += 1;
    }
    n
}

macro_rules! modulus {
    ($name:ident, $limbs:expr, $wide:expr, $hex:expr, $bytes:expr) => {
        #[derive(Clone, Copy, PartialEq, Eq)]
        pub struct $name;
        impl Modulus<$limbs, $wide> for $name {
            const N: [u64; $limbs] = parse_hex_be($hex);
            const MU: [u64; $wide] = compute_mu(Self::N);
            const BYTES: usize = $bytes;
        }
    };
}

// ---------------------------------------------------------------- P-192 ---
pub mod p192 {
    use super::*;
    modulus!(
        FieldMod,
        3,
        6,
        "fffffffffffffffffffffffffffffffeffffffffffffffff",
        24
    );
    modulus!(
        ScalarMod,
        3,
        6,
        "ffffffffffffffffffffffff99def836146bc9b1b4d22831",
        24
    );
    pub type Field = Fe<3, 6, FieldMod>;
    pub type Scalar = Sc<3, 6, ScalarMod>;

    pub const B: Field = Field::from_raw(parse_hex_be(
        "64210519e59c80e70fa7e9ab72243049feb8deecc146b9b1",
    ));
    pub const GX: Field = Field::from_raw(parse_hex_be(
        "188da80eb03090f67cbf20eb43a18800f4ff0afd82ff1012",
    ));
    pub const GY: Field = Field::from_raw(parse_hex_be(
        "07192b95ffc8da78631011ed6b24cdd573f977a11e794811",
    ));
}

// ---------------------------------------------------------------- P-224 ---
pub mod p224 {
    use super::*;
    modulus!(
        FieldMod,
        4,
        8,
        "ffffffffffffffffffffffffffffffff000000000000000000000001",
        28
    );
    modulus!(
        ScalarMod,
        4,
        8,
        "ffffffffffffffffffffffffffff16a2e0b8f03e13dd29455c5c2a3d",
        28
    );
    pub type Field = Fe<4, 8, FieldMod>;
    pub type Scalar = Sc<4, 8, ScalarMod>;

    pub const B: Field = Field::from_raw(parse_hex_be(
        "b4050a850c04b3abf54132565044b0b7d7bfd8ba270b39432355ffb4",
    ));
    pub const GX: Field = Field::from_raw(parse_hex_be(
        "b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21",
    ));
    pub const GY: Field = Field::from_raw(parse_hex_be(
        "bd376388b5f723fb4c22dfe6cd4375a05a07476444d5819985007e34",
    ));
}

// ---------------------------------------------------------------- P-256 ---
pub mod p256 {
    use super::*;
    modulus!(
        FieldMod,
        4,
        8,
        "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
        32
    );
    modulus!(
        ScalarMod,
        4,
        8,
        "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
        32
    );
    pub type Field = Fe<4, 8, FieldMod>;
    pub type Scalar = Sc<4, 8, ScalarMod>;

    pub const B: Field = Field::from_raw(parse_hex_be(
        "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b",
    ));
    pub const GX: Field = Field::from_raw(parse_hex_be(
        "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
    ));
    pub const GY: Field = Field::from_raw(parse_hex_be(
        "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5",
    ));
}

// ---------------------------------------------------------------- P-384 ---
pub mod p384 {
    use super::*;
    modulus!(
        FieldMod,
        6,
        12,
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff",
        48
    );
    modulus!(
        ScalarMod,
        6,
        12,
        "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973",
        48
    );
    pub type Field = Fe<6, 12, FieldMod>;
    pub type Scalar = Sc<6, 12, ScalarMod>;

    pub const B: Field = Field::from_raw(parse_hex_be(
        "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef",
    ));
    pub const GX: Field = Field::from_raw(parse_hex_be(
        "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7",
    ));
    pub const GY: Field = Field::from_raw(parse_hex_be(
        "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c00a60b1ce1d7e819d7a431d7c90ea0e5f",
    ));
}

// ---------------------------------------------------------------- P-521 ---
pub mod p521 {
    use super::*;
    modulus!(
        FieldMod,
        9,
        18,
        "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        66
    );
    modulus!(
        ScalarMod,
        9,
        18,
        "01fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386409",
        66
    );
    pub type Field = Fe<9, 18, FieldMod>;
    pub type Scalar = Sc<9, 18, ScalarMod>;

    pub const B: Field = Field::from_raw(parse_hex_be(
        "51953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef109e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b503f00",
    ));
    pub const GX: Field = Field::from_raw(parse_hex_be(
        "c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5bd66",
    ));
    pub const GY: Field = Field::from_raw(parse_hex_be(
        "11839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd16650",
    ));
}

// ------------------------------------------------------------ secp256k1 ---
pub mod k256 {
    use super::*;
    modulus!(
        FieldMod,
        4,
        8,
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
        32
    );
    modulus!(
        ScalarMod,
        4,
        8,
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
        32
    );
    pub type Field = Fe<4, 8, FieldMod>;
    pub type Scalar = Sc<4, 8, ScalarMod>;

    pub const B: Field = Field::from_raw(parse_hex_be("7"));
    pub const GX: Field = Field::from_raw(parse_hex_be(
        "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
    ));
    pub const GY: Field = Field::from_raw(parse_hex_be(
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
    ));
    // GLV endomorphism constants: `lambda^3 = 1 mod n`, `beta^3 = 1 mod p`,
    // satisfying `lambda * (x, y) = (beta * x, y)` for points on the curve.
    pub const LAMBDA: Scalar = Scalar::from_raw(parse_hex_be(
        "5363ad4cc05c30e0a5261c028812645a122e22ea20816678df02967c1b23bd72",
    ));
    pub const BETA: Field = Field::from_raw(parse_hex_be(
        "7ae96a2b657c07106e64479eac3434e99cf0497512f58995c1396c28719501ee",
    ));

    // GLV scalar-decomposition constants, straight from libsecp256k1 /
    // "Guide to Elliptic Curve Cryptography" algorithm 3.74, in the
    // `-lambda`/`-b1`/`-b2`/`g1`/`g2` form `k256::arithmetic::mul` uses so
    // `crate::mul::glv_decompose` can avoid a division per scalar.
    pub const MINUS_LAMBDA: Scalar = Scalar::from_raw(parse_hex_be(
        "ac9c52b33fa3cf1f5ad9e3fd77ed9ba4a880b9fc8ec739c2e0cfc810b51283cf",
    ));
    pub const MINUS_B1: Scalar = Scalar::from_raw(parse_hex_be(
        "00000000000000000000000000000000e4437ed6010e88286f547fa90abfe4c3",
    ));
    pub const MINUS_B2: Scalar = Scalar::from_raw(parse_hex_be(
        "fffffffffffffffffffffffffffffffe8a280ac50774346dd765cda83db1562c",
    ));
    pub const G1: Scalar = Scalar::from_raw(parse_hex_be(
        "00000000000000000000000000003086d221a7d46bcde86c90e49284eb153dab",
    ));
    pub const G2: Scalar = Scalar::from_raw(parse_hex_be(
        "0000000000000000000000000000e4437ed6010e88286f547fa90abfe4c42212",
    ));
}

// --------------------------------------------------- Curve25519 family ---
pub mod c25519 {
    use super::*;
    modulus!(
        FieldMod,
        4,
        8,
        "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed",
        32
    );
    modulus!(
        ScalarMod,
        4,
        8,
        "1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed",
        32
    );
    pub type Field = Fe<4, 8, FieldMod>;
    pub type Scalar = Sc<4, 8, ScalarMod>;

    /// Montgomery `A` coefficient: `y^2 = x^3 + A*x^2 + x`.
    pub const MONT_A: Field = Field::from_raw(parse_hex_be("76d06"));
    pub const MONT_U: Field = Field::from_raw(parse_hex_be("9"));
    /// `(A + 2) / 4`, the constant the x-only ladder's doubling step needs.
    pub const MONT_A24: Field = Field::from_raw(parse_hex_be("1db42"));

    /// Twisted-Edwards `d = -121665/121666` (Ed25519).
    pub const EDWARDS_D: Field = Field::from_raw(parse_hex_be(
        "52036cee2b6ffe738cc740797779e89800700a4d4141d8ab75eb4dca135978a3",
    ));
    pub const EDWARDS_GX: Field = Field::from_raw(parse_hex_be(
        "216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a",
    ));
    pub const EDWARDS_GY: Field = Field::from_raw(parse_hex_be(
        "6666666666666666666666666666666666666666666666666666666666666658",
    ));

    /// Birational-map scaling factor `c` with `c^2 = (A+2)/B` (`B = 1` here)
    /// for `(u, v) -> (x, y) = (c*u/v, (u-1)/(u+1))` onto Ed25519's
    /// `a = -1` curve, fixed to the sign that reproduces `EDWARDS_GX` from
    /// `MONT_U`/the Montgomery generator's `v`.
    pub const ISO_C: Field = Field::from_raw(parse_hex_be(
        "70d9120b9f5ff9442d84f723fc03b0813a5e2c2eb482e57d3391fb5500ba81e7",
    ));
}

// ----------------------------------------------------- Curve448 family ---
pub mod c448 {
    use super::*;
    modulus!(
        FieldMod,
        7,
        14,
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        56
    );
    modulus!(
        ScalarMod,
        7,
        14,
        "3fffffffffffffffffffffffffffffffffffffffffffffffffffffff7cca23e9c44edb49aed63690216cc2728dc58f552378c292ab5844f3",
        56
    );
    pub type Field = Fe<7, 14, FieldMod>;
    pub type Scalar = Sc<7, 14, ScalarMod>;

    pub const MONT_A: Field = Field::from_raw(parse_hex_be("262a6"));
    pub const MONT_U: Field = Field::from_raw(parse_hex_be("5"));
    /// `(A + 2) / 4`, the constant the x-only ladder's doubling step needs.
    pub const MONT_A24: Field = Field::from_raw(parse_hex_be("98aa"));

    /// Edwards `d = -39081` (Ed448-Goldilocks).
    pub const EDWARDS_D: Field = Field::from_raw(parse_hex_be(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffffffffffffffffffffffffffffffffffffffffffffffff6756",
    ));
    pub const EDWARDS_GX: Field = Field::from_raw(parse_hex_be(
        "4f1970c66bed0ded221d15a622bf36da9e146570470f1767ea6de324a3d3a46412ae1af72ab66511433b80e18b00938e2626a82bc70cc05e",
    ));
    pub const EDWARDS_GY: Field = Field::from_raw(parse_hex_be(
        "693f46716eb6bc248876203756c9c7624bea73736ca3984087789c1e05a0c2d73ad3ff1ce67c39c4fdbd132c4ed7c8ad9808795bf230fa14",
    ));
}

// -------------------------------------------------------------- Ed1174 ---
pub mod ed1174 {
    use super::*;
    modulus!(
        FieldMod,
        4,
        8,
        "07fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7",
        32
    );
    modulus!(
        ScalarMod,
        4,
        8,
        "1fffffffffffffffffffffffffffffff77965c4dfd307348944d45fd166c971",
        32
    );
    pub type Field = Fe<4, 8, FieldMod>;
    pub type Scalar = Sc<4, 8, ScalarMod>;

    /// `d = -1174 mod p`.
    pub const EDWARDS_D: Field = Field::from_raw(parse_hex_be(
        "07fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffb61",
    ));

    /// Montgomery twin `y^2 = x^3 + A*x^2 + B*x` derived from
    /// `A = 2*(a+d)/(a-d)`, `B = 4/(a-d)` with `a = 1`, `d = -1174`.
    pub const MONT_A: Field = Field::from_raw(parse_hex_be(
        "73e87843f9e64a8328bdfc140b54510c6b3174ff58ac8e0d8211dd937fe41c2",
    ));
    pub const MONT_B: Field = Field::from_raw(parse_hex_be(
        "73e87843f9e64a8328bdfc140b54510c6b3174ff58ac8e0d8211dd937fe41c4",
    ));
    /// `c^2 = (A+2)/B` happens to be `1` for this curve's twin.
    pub const ISO_C: Field = Field::from_raw([1, 0, 0, 0]);
    pub const EDWARDS_GX: Field = Field::from_raw(parse_hex_be(
        "37fbb0cea308c479343aee7c029a190c021d96a492ecd6516123f27bce29eda",
    ));
    pub const EDWARDS_GY: Field = Field::from_raw(parse_hex_be(
        "06b72f82d47fb7cc6656841169840e0c4fe2dee2af3f976ba4ccb1bf9b46360e",
    ));
}

/// Identifies one of the seven curves this engine supports, independent of
/// the concrete point/field type used to represent it (those differ by
/// curve shape and live in [`crate::weier`], [`crate::mont`], and
/// [`crate::edwards`]). This is the engine's only configuration surface:
/// curve choice is a value, not a compiled-in mode or environment setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveId {
    P192,
    P224,
    P256,
    P384,
    P521,
    Secp256k1,
    Curve25519,
    Curve448,
    Ed1174,
}

impl CurveId {
    /// Looks up a curve by its canonical name. Returns `None` for any
    /// unrecognized identifier — the "null handle" a caller gets back for
    /// a curve this engine does not implement.
    pub fn by_name(name: &str) -> Option<Self> {
        Some(match name {
            "P192" | "secp192r1" | "prime192v1" => Self::P192,
            "P224" | "secp224r1" => Self::P224,
            "P256" | "secp256r1" | "prime256v1" => Self::P256,
            "P384" | "secp384r1" => Self::P384,
            "P521" | "secp521r1" => Self::P521,
            "SECP256K1" | "secp256k1" => Self::Secp256k1,
            "Curve25519" | "X25519" | "Ed25519" => Self::Curve25519,
            "Curve448" | "X448" | "Ed448" => Self::Curve448,
            "Ed1174" => Self::Ed1174,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::P192 => "P192",
            Self::P224 => "P224",
            Self::P256 => "P256",
            Self::P384 => "P384",
            Self::P521 => "P521",
            Self::Secp256k1 => "secp256k1",
            Self::Curve25519 => "Curve25519",
            Self::Curve448 => "Curve448",
            Self::Ed1174 => "Ed1174",
        }
    }

    /// Canonical encoded field/scalar element byte length.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::P192 => 24,
            Self::P224 => 28,
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
            Self::Secp256k1 => 32,
            Self::Curve25519 => 32,
            Self::Curve448 => 56,
            Self::Ed1174 => 32,
        }
    }
}
