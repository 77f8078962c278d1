mod wire;

pub use wire::{BroadcastResponse, RestUtxoEntry};

use serde::{Deserialize, Serialize};

/// A previous transaction output being spent (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outpoint {
    pub transaction_id: [u8; 32],
    pub index: u32,
}

/// One input of an unsigned or signed transaction (§3). `signature_script`
/// is empty before signing and push-only once signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    pub previous_outpoint: Outpoint,
    pub signature_script: Vec<u8>,
    pub sequence: u64,
    pub sig_op_count: u8,
}

/// A Kaspa scriptPublicKey: a version tag plus opaque script bytes (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPublicKey {
    pub version: u16,
    pub script_bytes: Vec<u8>,
}

/// One output of a transaction (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub amount: u64,
    pub script_public_key: ScriptPublicKey,
}

/// A full Kaspa transaction (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KaspaTransaction {
    pub version: u16,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u64,
    pub subnetwork_id: [u8; 20],
    pub gas: u64,
    pub payload: Vec<u8>,
}

impl KaspaTransaction {
    /// The default, all-zero subnetwork id used by ordinary (non-subnetwork)
    /// transactions.
    pub const DEFAULT_SUBNETWORK_ID: [u8; 20] = [0u8; 20];

    pub fn sum_inputs(&self, spent_amounts: &[u64]) -> u64 {
        spent_amounts.iter().sum()
    }

    pub fn sum_outputs(&self) -> u64 {
        self.outputs.iter().map(|o| o.amount).sum()
    }
}

/// A fetched, unspent transaction output, plus the address it pays to (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub outpoint: Outpoint,
    pub amount: u64,
    pub script_version: u16,
    pub script_public_key: Vec<u8>,
    pub address: String,
    pub is_coinbase: bool,
}

/// A commit transaction plus everything needed to later build its matching
/// reveal (§3). The redeem script is the only artifact that must survive
/// between the two; everything else is reconstructible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRevealPair {
    pub commit_transaction: KaspaTransaction,
    pub redeem_script: Vec<u8>,
    pub p2sh_script_public_key: Vec<u8>,
    pub script_hash: [u8; 32],
}

/// Wire-form mirrors of the data model, field-order- and name-exact with
/// what Kaspa's REST node accepts (§6). Kept separate from the domain types
/// above so internal code never has to think in hex.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOutpoint {
    pub transaction_id: String,
    pub index: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireInput {
    pub previous_outpoint: WireOutpoint,
    pub signature_script: String,
    pub sequence: u64,
    pub sig_op_count: u8,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScriptPublicKey {
    pub version: u16,
    pub script_public_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOutput {
    pub amount: u64,
    pub script_public_key: WireScriptPublicKey,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTransaction {
    pub version: u16,
    pub inputs: Vec<WireInput>,
    pub outputs: Vec<WireOutput>,
    pub lock_time: u64,
    pub subnetwork_id: String,
    pub gas: u64,
    pub payload: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WireTransactionEnvelope {
    pub transaction: WireTransaction,
}

impl From<&KaspaTransaction> for WireTransactionEnvelope {
    fn from(tx: &KaspaTransaction) -> Self {
        WireTransactionEnvelope {
            transaction: WireTransaction {
                version: tx.version,
                inputs: tx
                    .inputs
                    .iter()
                    .map(|input| WireInput {
                        previous_outpoint: WireOutpoint {
                            transaction_id: hex::encode(input.previous_outpoint.transaction_id),
                            index: input.previous_outpoint.index,
                        },
                        signature_script: hex::encode(&input.signature_script),
                        sequence: input.sequence,
                        sig_op_count: input.sig_op_count,
                    })
                    .collect(),
                outputs: tx
                    .outputs
                    .iter()
                    .map(|output| WireOutput {
                        amount: output.amount,
                        script_public_key: WireScriptPublicKey {
                            version: output.script_public_key.version,
                            script_public_key: hex::encode(&output.script_public_key.script_bytes),
                        },
                    })
                    .collect(),
                lock_time: tx.lock_time,
                subnetwork_id: hex::encode(tx.subnetwork_id),
                gas: tx.gas,
                payload: hex::encode(&tx.payload),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KaspaTransaction {
        KaspaTransaction {
            version: 0,
            inputs: vec![TransactionInput {
                previous_outpoint: Outpoint {
                    transaction_id: [0x11; 32],
                    index: 0,
                },
                signature_script: vec![0xde, 0xad],
                sequence: 0,
                sig_op_count: 1,
            }],
            outputs: vec![TransactionOutput {
                amount: 1000,
                script_public_key: ScriptPublicKey {
                    version: 0,
                    script_bytes: vec![0xac],
                },
            }],
            lock_time: 0,
            subnetwork_id: KaspaTransaction::DEFAULT_SUBNETWORK_ID,
            gas: 0,
            payload: Vec::new(),
        }
    }

    #[test]
    fn wire_shape_matches_expected_field_names() {
        let tx = sample();
        let envelope = WireTransactionEnvelope::from(&tx);
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.starts_with(r#"{"transaction":{"version":0,"inputs":[{"previousOutpoint":"#));
        assert!(json.contains(r#""signatureScript":"dead""#));
        assert!(json.contains(r#""sigOpCount":1"#));
        assert!(json.contains(r#""scriptPublicKey":{"version":0,"scriptPublicKey":"ac"}"#));
        assert!(json.contains(r#""lockTime":0"#));
        assert!(json.contains(r#""subnetworkId":""#));
    }

    #[test]
    fn sum_outputs_adds_amounts() {
        let tx = sample();
        assert_eq!(tx.sum_outputs(), 1000);
    }
}
