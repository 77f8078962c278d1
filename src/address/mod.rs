mod cashaddr;

pub use cashaddr::AddressType;

use crate::error::Error;
use crate::opcodes::{OP_BLAKE2B, OP_CHECKSIG, OP_CHECKSIG_ECDSA, OP_DATA_32, OP_DATA_33, OP_EQUAL};
use crate::primitives::to_hex;

/// A decoded or synthesized address, carrying everything a caller needs to
/// build a transaction output without re-parsing the address string (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressInfo {
    pub address: String,
    pub addr_type: AddressType,
    pub payload: Vec<u8>,
    pub script_public_key_hex: String,
}

/// Synthesizes the scriptPublicKey bytes for `payload`/`addr_type` (§4.1).
///
/// Per the resolved open question on P2SH hashing (see DESIGN.md), this
/// crate uses `OP_BLAKE2B` for address-derived P2SH scriptPublicKeys, the
/// same opcode the commit/reveal script builder uses, rather than the
/// `OP_HASH256` the original source annotated as unverified.
pub fn script_pubkey(payload: &[u8], addr_type: AddressType) -> Vec<u8> {
    match addr_type {
        AddressType::Schnorr => {
            let mut script = Vec::with_capacity(34);
            script.push(OP_DATA_32);
            script.extend_from_slice(payload);
            script.push(OP_CHECKSIG);
            script
        }
        AddressType::Ecdsa => {
            let mut script = Vec::with_capacity(35);
            script.push(OP_DATA_33);
            script.extend_from_slice(payload);
            script.push(OP_CHECKSIG_ECDSA);
            script
        }
        AddressType::P2sh => {
            let mut script = Vec::with_capacity(35);
            script.push(OP_BLAKE2B);
            script.push(OP_DATA_32);
            script.extend_from_slice(payload);
            script.push(OP_EQUAL);
            script
        }
    }
}

/// Decodes `address` into an [`AddressInfo`], synthesizing its
/// scriptPublicKey along the way.
pub fn decode(address: &str) -> Result<AddressInfo, Error> {
    let decoded = cashaddr::decode(address)?;
    let script = script_pubkey(&decoded.payload, decoded.addr_type);
    Ok(AddressInfo {
        address: address.to_string(),
        addr_type: decoded.addr_type,
        payload: decoded.payload,
        script_public_key_hex: to_hex(&script),
    })
}

/// Encodes `payload`/`addr_type` under `prefix`, returning the same
/// [`AddressInfo`] shape [`decode`] produces.
pub fn encode(payload: &[u8], addr_type: AddressType, prefix: &str) -> Result<AddressInfo, Error> {
    let address = cashaddr::encode(payload, addr_type, prefix)?;
    let script = script_pubkey(payload, addr_type);
    Ok(AddressInfo {
        address,
        addr_type,
        payload: payload.to_vec(),
        script_public_key_hex: to_hex(&script),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_schnorr_script_pubkey_is_34_bytes() {
        let info = encode(&[0xaa; 32], AddressType::Schnorr, "kaspa").unwrap();
        assert_eq!(
            info.script_public_key_hex,
            format!("20{}ac", "aa".repeat(32))
        );
    }

    #[test]
    fn ecdsa_script_pubkey_is_35_bytes() {
        let mut payload = [0x11; 33];
        payload[0] = 0x02;
        let info = encode(&payload, AddressType::Ecdsa, "kaspa").unwrap();
        let bytes = hex::decode(&info.script_public_key_hex).unwrap();
        assert_eq!(bytes.len(), 35);
        assert_eq!(bytes[0], OP_DATA_33);
        assert_eq!(*bytes.last().unwrap(), OP_CHECKSIG_ECDSA);
    }

    #[test]
    fn p2sh_script_pubkey_uses_op_blake2b() {
        let info = encode(&[0x55; 32], AddressType::P2sh, "kaspa").unwrap();
        let bytes = hex::decode(&info.script_public_key_hex).unwrap();
        assert_eq!(bytes.len(), 35);
        assert_eq!(bytes[0], OP_BLAKE2B);
        assert_eq!(bytes[1], OP_DATA_32);
        assert_eq!(*bytes.last().unwrap(), OP_EQUAL);
    }

    #[test]
    fn decode_round_trips_through_address_info() {
        let encoded = encode(&[0x99; 32], AddressType::Schnorr, "kaspatest").unwrap();
        let decoded = decode(&encoded.address).unwrap();
        assert_eq!(decoded, encoded);
    }
}
