//! CashAddr-style encoding, adapted to Kaspa's version-byte scheme (§4.1).
//!
//! Unlike Bitcoin Cash, Kaspa does not fold the payload length into the
//! version byte -- type discrimination is exact: Schnorr = 0, ECDSA = 1,
//! P2SH = 8.

use crate::error::{Error, InvalidAddressReason};

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const GENERATOR: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470,
];

/// Address type discriminated by the CashAddr version byte (§3/§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Schnorr,
    Ecdsa,
    P2sh,
}

impl AddressType {
    pub fn version_byte(self) -> u8 {
        match self {
            AddressType::Schnorr => 0,
            AddressType::Ecdsa => 1,
            AddressType::P2sh => 8,
        }
    }

    pub fn from_version_byte(byte: u8) -> Result<Self, InvalidAddressReason> {
        match byte {
            0 => Ok(AddressType::Schnorr),
            1 => Ok(AddressType::Ecdsa),
            8 => Ok(AddressType::P2sh),
            _ => Err(InvalidAddressReason::BadVersion),
        }
    }

    fn expected_payload_len(self) -> usize {
        match self {
            AddressType::Schnorr | AddressType::P2sh => 32,
            AddressType::Ecdsa => 33,
        }
    }
}

/// ECDSA payloads must lead with a valid compressed/hybrid pubkey prefix
/// byte (§3 invariant); Schnorr/P2SH payloads carry no such constraint.
fn check_ecdsa_prefix(addr_type: AddressType, payload: &[u8]) -> Result<(), Error> {
    if addr_type == AddressType::Ecdsa && !matches!(payload.first(), Some(0x02 | 0x03 | 0x04)) {
        return Err(Error::InvalidPublicKey {
            expected_length: addr_type.expected_payload_len(),
        });
    }
    Ok(())
}

fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07ffffffff) << 5) ^ u64::from(d);
        for (i, gen) in GENERATOR.iter().enumerate() {
            if (c0 >> i) & 1 != 0 {
                c ^= gen;
            }
        }
    }
    c ^ 1
}

fn prefix_expand(prefix: &str) -> Vec<u8> {
    prefix.bytes().map(|b| b & 0x1f).collect()
}

/// Converts 8-bit bytes into 5-bit groups, padding the final group with
/// trailing zero bits (encode direction only -- decode never pads).
fn convert_bits_8_to_5(data: &[u8]) -> Vec<u8> {
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    let mut out = Vec::with_capacity((data.len() * 8 + 4) / 5);
    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((acc >> bits) & 0x1f) as u8);
        }
    }
    if bits > 0 {
        out.push(((acc << (5 - bits)) & 0x1f) as u8);
    }
    out
}

/// Converts 5-bit groups back to 8-bit bytes. Per §4.1, decode does NOT
/// tolerate non-zero padding bits in the final partial group.
fn convert_bits_5_to_8(data: &[u8]) -> Result<Vec<u8>, InvalidAddressReason> {
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    let mut out = Vec::with_capacity(data.len() * 5 / 8);
    for &group in data {
        acc = (acc << 5) | u32::from(group);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((acc >> bits) & 0xff) as u8);
        }
    }
    if bits >= 5 || (acc & ((1 << bits) - 1)) != 0 {
        return Err(InvalidAddressReason::BadPadding);
    }
    Ok(out)
}

fn checksum(prefix: &str, payload_5bit: &[u8]) -> [u8; 8] {
    let mut values = prefix_expand(prefix);
    values.push(0);
    values.extend_from_slice(payload_5bit);
    values.extend_from_slice(&[0u8; 8]);
    let poly = polymod(&values);
    let mut out = [0u8; 8];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((poly >> (5 * (7 - i))) & 0x1f) as u8;
    }
    out
}

/// Encodes `payload` (version byte prepended internally) as `<prefix>:<body>`.
pub fn encode(payload: &[u8], addr_type: AddressType, prefix: &str) -> Result<String, Error> {
    if payload.len() != addr_type.expected_payload_len() {
        return Err(Error::InvalidPublicKey {
            expected_length: addr_type.expected_payload_len(),
        });
    }
    check_ecdsa_prefix(addr_type, payload)?;

    let mut versioned = Vec::with_capacity(payload.len() + 1);
    versioned.push(addr_type.version_byte());
    versioned.extend_from_slice(payload);

    let payload_5bit = convert_bits_8_to_5(&versioned);
    let checksum_5bit = checksum(prefix, &payload_5bit);

    let mut body = String::with_capacity(payload_5bit.len() + checksum_5bit.len());
    for group in payload_5bit.iter().chain(checksum_5bit.iter()) {
        body.push(CHARSET[*group as usize] as char);
    }

    Ok(format!("{prefix}:{body}"))
}

/// Decoded address contents: type plus the payload bytes (version byte
/// stripped).
pub struct DecodedAddress {
    pub addr_type: AddressType,
    pub payload: Vec<u8>,
    pub prefix: String,
}

/// Decodes `address`, accepting prefixes `kaspa` and `kaspatest` (§4.1).
pub fn decode(address: &str) -> Result<DecodedAddress, Error> {
    if address.is_empty() {
        return Err(InvalidAddressReason::Empty.into());
    }

    let (prefix, body) = match address.split_once(':') {
        Some((p, b)) => (p, b),
        None => return Err(InvalidAddressReason::BadPrefix.into()),
    };

    if prefix != "kaspa" && prefix != "kaspatest" {
        return Err(InvalidAddressReason::BadPrefix.into());
    }
    if body.is_empty() {
        return Err(InvalidAddressReason::Empty.into());
    }

    let mut symbols = Vec::with_capacity(body.len());
    for ch in body.chars() {
        let byte = ch as u32;
        if byte > 127 {
            return Err(InvalidAddressReason::BadChar.into());
        }
        let idx = CHARSET
            .iter()
            .position(|&c| c == byte as u8)
            .ok_or(InvalidAddressReason::BadChar)?;
        symbols.push(idx as u8);
    }

    if symbols.len() < 8 {
        return Err(InvalidAddressReason::BadChecksum.into());
    }

    let (payload_5bit, checksum_5bit) = symbols.split_at(symbols.len() - 8);
    let computed = checksum(prefix, payload_5bit);
    if computed != checksum_5bit {
        return Err(InvalidAddressReason::BadChecksum.into());
    }

    let versioned = convert_bits_5_to_8(payload_5bit)?;
    let (version_byte, payload) = versioned
        .split_first()
        .ok_or(InvalidAddressReason::BadPayloadLength)?;

    let addr_type = AddressType::from_version_byte(*version_byte)?;
    if payload.len() != addr_type.expected_payload_len() {
        return Err(InvalidAddressReason::BadPayloadLength.into());
    }
    check_ecdsa_prefix(addr_type, payload)?;

    Ok(DecodedAddress {
        addr_type,
        payload: payload.to_vec(),
        prefix: prefix.to_string(),
    })
}
