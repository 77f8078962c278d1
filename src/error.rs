use thiserror::Error;

/// Crate-wide error type.
///
/// Every fallible operation in this crate returns `Result<_, Error>` rather
/// than panicking; builder operations fail atomically, before any partial
/// transaction state is returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] InvalidAddressReason),

    /// Covers both a length mismatch against the address type's expected
    /// payload size and, for ECDSA, a leading byte outside `{0x02, 0x03,
    /// 0x04}` (the only valid compressed/hybrid pubkey prefixes).
    #[error("invalid public key, expected {expected_length} bytes")]
    InvalidPublicKey { expected_length: usize },

    #[error("invalid amount {actual}, expected between {min} and {max}")]
    InvalidAmount { min: u64, max: u64, actual: u64 },

    #[error("invalid fee {actual}, expected between {min} and {max}")]
    InvalidFee { min: u64, max: u64, actual: u64 },

    #[error("invalid sighash type byte {0:#04x}")]
    InvalidSighashType(u8),

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("cryptographic error: {0}")]
    Cryptographic(String),

    #[error("network error: {message} (status {status_code:?})")]
    Network {
        message: String,
        status_code: Option<u16>,
    },

    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// JSON codec failures are stored as their rendered message rather than
    /// the original `serde_json::Error`, which implements neither `Clone`
    /// nor `PartialEq`.
    #[error("JSON codec error: {0}")]
    Codec(String),

    /// Same reasoning as `Codec`: `hex::FromHexError` is `Copy`/`Eq` in
    /// principle but we keep the representation uniform with `Codec` here.
    #[error("hex codec error: {0}")]
    Hex(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Codec(err.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Hex(err.to_string())
    }
}

/// Reasons an address string or payload failed to decode, per §4.1.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidAddressReason {
    #[error("address is empty")]
    Empty,
    #[error("unrecognized address prefix")]
    BadPrefix,
    #[error("character outside the cashaddr alphabet")]
    BadChar,
    #[error("checksum verification failed")]
    BadChecksum,
    #[error("non-zero padding bits in final 5-bit group")]
    BadPadding,
    #[error("unrecognized address version byte")]
    BadVersion,
    #[error("payload length does not match address type")]
    BadPayloadLength,
}

pub type Result<T> = std::result::Result<T, Error>;
