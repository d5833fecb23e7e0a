//! Engine-wide error type.
//!
//! Every fallible operation returns `Result<T, Error>`. No variant carries
//! secret material, partial output, or a human-readable cause string: an
//! error that explains *why* decoding or verification failed is a
//! padding/timing oracle. This engine keeps four variants, one per
//! rejection *kind* a caller may need to branch on, but none of them say
//! more than that.

use core::fmt;

/// The four rejection kinds this engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A byte string did not decode to a valid point, scalar, or field
    /// element encoding.
    Decode,
    /// An operation was asked to proceed with the identity element where
    /// the protocol forbids it (e.g. a zero ECDH shared point, a
    /// public key that is the group identity).
    Identity,
    /// A signature, MAC, or proof failed to verify.
    Verify,
    /// An out-of-range or otherwise invalid parameter was supplied (e.g.
    /// an unrecognized curve name, a zero scalar where a nonzero one is
    /// required).
    Parameter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Error::Decode => "decode error",
            Error::Identity => "unexpected identity element",
            Error::Verify => "verification failed",
            Error::Parameter => "invalid parameter",
        };
        f.write_str(s)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
