//! Signature-hash engine (§4.3): computes the 32-byte digest a signer signs
//! over, with five cached subhashes shared across every input of one
//! transaction.

use crate::error::Error;
use crate::primitives::{
    blake2b_256_keyed, blake2b_256_keyed_state, finalize_state, sha256, u16_le, u32_le, u64_le, Hash256,
};
use crate::tx::{KaspaTransaction, TransactionOutput};

const SCHNORR_DOMAIN: &[u8] = b"TransactionSigningHash";
const ECDSA_DOMAIN: &[u8] = b"TransactionSigningHashECDSA";

/// Sighash type byte, per §4.3. `All`/`None`/`Single` are mutually
/// exclusive base types; `AnyOneCanPay` is a modifier bit that may combine
/// with any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigHashType(u8);

impl SigHashType {
    pub const ALL: u8 = 0x01;
    pub const NONE: u8 = 0x02;
    pub const SINGLE: u8 = 0x04;
    pub const ANY_ONE_CAN_PAY: u8 = 0x80;

    /// Parses a sighash type byte, rejecting anything other than the four
    /// base types and their three legal `AnyOneCanPay` combinations.
    pub fn from_byte(byte: u8) -> Result<Self, Error> {
        match byte {
            Self::ALL | Self::NONE | Self::SINGLE => Ok(Self(byte)),
            b if b == (Self::ALL | Self::ANY_ONE_CAN_PAY)
                || b == (Self::NONE | Self::ANY_ONE_CAN_PAY)
                || b == (Self::SINGLE | Self::ANY_ONE_CAN_PAY) =>
            {
                Ok(Self(byte))
            }
            other => Err(Error::InvalidSighashType(other)),
        }
    }

    pub fn byte(self) -> u8 {
        self.0
    }

    pub fn any_one_can_pay(self) -> bool {
        self.0 & Self::ANY_ONE_CAN_PAY != 0
    }

    fn base(self) -> u8 {
        self.0 & !Self::ANY_ONE_CAN_PAY
    }

    pub fn is_none(self) -> bool {
        self.base() == Self::NONE
    }

    pub fn is_single(self) -> bool {
        self.base() == Self::SINGLE
    }
}

/// The UTXO entry being spent by one input, as needed by the pre-image
/// (§4.3 step 2). A subset of the full UTXO record in `tx::UTXO`.
#[derive(Debug, Clone)]
pub struct SpentOutput {
    pub script_version: u16,
    pub script_public_key: Vec<u8>,
    pub amount: u64,
}

/// Per-transaction cache of the five subhashes that are identical across
/// every input sharing the same sighash type (§4.3/§9). Populated lazily;
/// pre-populate before signing inputs concurrently.
#[derive(Debug, Default, Clone)]
pub struct SighashMidstateCache {
    prev: Option<Hash256>,
    seq: Option<Hash256>,
    sigops: Option<Hash256>,
    outputs_all: Option<Hash256>,
}

const ZERO_HASH: Hash256 = [0u8; 32];

impl SighashMidstateCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn h_prev(&mut self, tx: &KaspaTransaction, sighash_type: SigHashType) -> Hash256 {
        if sighash_type.any_one_can_pay() {
            return ZERO_HASH;
        }
        if let Some(h) = self.prev {
            return h;
        }
        let mut state = blake2b_256_keyed_state(SCHNORR_DOMAIN);
        for input in &tx.inputs {
            state.update(&input.previous_outpoint.transaction_id);
            state.update(&u32_le(input.previous_outpoint.index));
        }
        let h = finalize_state(state);
        self.prev = Some(h);
        h
    }

    fn h_seq(&mut self, tx: &KaspaTransaction, sighash_type: SigHashType) -> Hash256 {
        if sighash_type.any_one_can_pay() || sighash_type.is_none() || sighash_type.is_single() {
            return ZERO_HASH;
        }
        if let Some(h) = self.seq {
            return h;
        }
        let mut state = blake2b_256_keyed_state(SCHNORR_DOMAIN);
        for input in &tx.inputs {
            state.update(&u64_le(input.sequence));
        }
        let h = finalize_state(state);
        self.seq = Some(h);
        h
    }

    fn h_sigops(&mut self, tx: &KaspaTransaction, sighash_type: SigHashType) -> Hash256 {
        if sighash_type.any_one_can_pay() || sighash_type.is_none() || sighash_type.is_single() {
            return ZERO_HASH;
        }
        if let Some(h) = self.sigops {
            return h;
        }
        let mut state = blake2b_256_keyed_state(SCHNORR_DOMAIN);
        for input in &tx.inputs {
            state.update(&[input.sig_op_count]);
        }
        let h = finalize_state(state);
        self.sigops = Some(h);
        h
    }

    fn h_out(&mut self, tx: &KaspaTransaction, index: usize, sighash_type: SigHashType) -> Hash256 {
        if sighash_type.is_none() {
            return ZERO_HASH;
        }
        if sighash_type.is_single() {
            return match tx.outputs.get(index) {
                Some(output) => {
                    let mut state = blake2b_256_keyed_state(SCHNORR_DOMAIN);
                    write_output(&mut state, output);
                    finalize_state(state)
                }
                None => ZERO_HASH,
            };
        }
        if let Some(h) = self.outputs_all {
            return h;
        }
        let mut state = blake2b_256_keyed_state(SCHNORR_DOMAIN);
        for output in &tx.outputs {
            write_output(&mut state, output);
        }
        let h = finalize_state(state);
        self.outputs_all = Some(h);
        h
    }
}

fn write_output(state: &mut blake2b_simd::State, output: &TransactionOutput) {
    state.update(&u64_le(output.amount));
    state.update(&u16_le(output.script_public_key.version));
    state.update(&u32_le(output.script_public_key.script_bytes.len() as u32));
    state.update(&output.script_public_key.script_bytes);
}

fn h_payload(tx: &KaspaTransaction) -> Hash256 {
    let mut state = blake2b_256_keyed_state(SCHNORR_DOMAIN);
    state.update(&u16_le(tx.version));
    state.update(&tx.payload);
    finalize_state(state)
}

/// Composes the sighash pre-image for input `index` of `tx`, spending
/// `spent`, under `sighash_type` (§4.3 step 2).
fn pre_image(
    tx: &KaspaTransaction,
    index: usize,
    spent: &SpentOutput,
    sighash_type: SigHashType,
    cache: &mut SighashMidstateCache,
) -> Result<Vec<u8>, Error> {
    let input = tx
        .inputs
        .get(index)
        .ok_or_else(|| Error::InvalidTransaction(format!("no input at index {index}")))?;

    let mut buf = Vec::new();
    buf.extend_from_slice(&u16_le(tx.version));
    buf.extend_from_slice(&cache.h_prev(tx, sighash_type));
    buf.extend_from_slice(&cache.h_seq(tx, sighash_type));
    buf.extend_from_slice(&cache.h_sigops(tx, sighash_type));

    buf.extend_from_slice(&input.previous_outpoint.transaction_id);
    buf.extend_from_slice(&u32_le(input.previous_outpoint.index));

    buf.extend_from_slice(&u16_le(spent.script_version));
    buf.extend_from_slice(&u64_le(spent.script_public_key.len() as u64));
    buf.extend_from_slice(&spent.script_public_key);
    buf.extend_from_slice(&u64_le(spent.amount));

    buf.extend_from_slice(&u64_le(input.sequence));
    buf.push(input.sig_op_count);

    buf.extend_from_slice(&cache.h_out(tx, index, sighash_type));

    buf.extend_from_slice(&u64_le(tx.lock_time));
    buf.extend_from_slice(&tx.subnetwork_id);
    buf.extend_from_slice(&u64_le(tx.gas));
    buf.extend_from_slice(&h_payload(tx));

    buf.push(sighash_type.byte());

    Ok(buf)
}

/// Computes the Schnorr sighash digest for input `index` (§4.3 step 3).
///
/// **Critical P2SH rule**: when `index` spends a P2SH output, `spent`'s
/// `script_public_key` MUST be the P2SH scriptPublicKey
/// (`OP_BLAKE2B OP_DATA_32 <hash> OP_EQUAL`), never the redeem script --
/// this is what makes KRC20 reveal signatures verifiable.
pub fn compute_schnorr_digest(
    tx: &KaspaTransaction,
    index: usize,
    spent: &SpentOutput,
    sighash_type: SigHashType,
    cache: &mut SighashMidstateCache,
) -> Result<Hash256, Error> {
    let image = pre_image(tx, index, spent, sighash_type, cache)?;
    Ok(blake2b_256_keyed(SCHNORR_DOMAIN, &image))
}

/// Computes the ECDSA sighash digest (§4.3 step 4):
/// `SHA-256(SHA-256("TransactionSigningHashECDSA") ∥ schnorr_digest)`.
pub fn compute_ecdsa_digest(
    tx: &KaspaTransaction,
    index: usize,
    spent: &SpentOutput,
    sighash_type: SigHashType,
    cache: &mut SighashMidstateCache,
) -> Result<Hash256, Error> {
    let schnorr_digest = compute_schnorr_digest(tx, index, spent, sighash_type, cache)?;
    let domain_hash = sha256(ECDSA_DOMAIN);
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(&domain_hash);
    buf.extend_from_slice(&schnorr_digest);
    Ok(sha256(&buf))
}
