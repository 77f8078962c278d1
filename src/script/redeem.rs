use crate::opcodes::{OP_BLAKE2B, OP_CHECKSIG, OP_CHECKSIG_ECDSA, OP_DATA_32, OP_EQUAL};
use crate::primitives::blake2b_256;
use crate::script::ScriptBuilder;

/// The public key carried by a redeem script, distinguished by signature
/// scheme the same way the teacher's `RedeemScriptPubkey` enum separates
/// taproot x-only keys from ECDSA compressed keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemPubkey {
    /// 32-byte Schnorr (BIP340-style) x-only public key.
    Schnorr([u8; 32]),
    /// 33-byte compressed ECDSA public key.
    Ecdsa([u8; 33]),
}

impl RedeemPubkey {
    fn push_bytes(&self) -> &[u8] {
        match self {
            RedeemPubkey::Schnorr(bytes) => bytes.as_slice(),
            RedeemPubkey::Ecdsa(bytes) => bytes.as_slice(),
        }
    }

    fn checksig_opcode(&self) -> u8 {
        match self {
            RedeemPubkey::Schnorr(_) => OP_CHECKSIG,
            RedeemPubkey::Ecdsa(_) => OP_CHECKSIG_ECDSA,
        }
    }
}

/// Builds a KRC20 redeem script: `push(pubkey) <OP_CHECKSIG[_ECDSA]> <envelope>`
/// (§4.2). `envelope` is the data envelope produced by
/// [`crate::script::build_envelope`], appended verbatim after the signature
/// check so the whole thing remains script-engine-valid (the envelope is
/// only ever reached via the `OP_FALSE OP_IF ... OP_ENDIF` branch it never
/// actually executes).
pub fn redeem_script(pubkey: &RedeemPubkey, envelope: &[u8]) -> Vec<u8> {
    let mut script = ScriptBuilder::new()
        .push_data(pubkey.push_bytes())
        .push_opcode(pubkey.checksig_opcode())
        .into_script();
    script.extend_from_slice(envelope);
    script
}

/// Builds the P2SH commit scriptPublicKey for a redeem script (§4.2/§4.3):
/// `OP_BLAKE2B OP_DATA_32 <BLAKE2B-256(redeem_script)> OP_EQUAL`, always
/// exactly 35 bytes. Per the resolved open question on P2SH hashing (see
/// DESIGN.md), this crate uses `OP_BLAKE2B` uniformly for every P2SH
/// scriptPublicKey, matching `kaspa-txscript`'s `is_p2sh` detection.
pub fn commit_script_pubkey(redeem_script: &[u8]) -> Vec<u8> {
    let hash = blake2b_256(redeem_script);
    let script = ScriptBuilder::new()
        .push_opcode(OP_BLAKE2B)
        .push_opcode(OP_DATA_32)
        .push_data_raw(&hash)
        .push_opcode(OP_EQUAL)
        .into_script();
    debug_assert_eq!(script.len(), 35);
    script
}
