//! REST wire-form glue (§6): the UTXO response's tri-shaped `amount` field
//! and the broadcast response's aliased transaction-id field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::tx::Utxo;

fn deserialize_flexible_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    flexible_amount_from_value(&value).map_err(serde::de::Error::custom)
}

fn flexible_amount_from_value(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| format!("amount number out of range: {n}")),
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|e| format!("amount string not a valid u64: {e}")),
        Value::Array(items) => match items.first() {
            Some(inner) => flexible_amount_from_value(inner),
            None => Err("amount array was empty".to_string()),
        },
        other => Err(format!("unsupported amount shape: {other}")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestOutpoint {
    transaction_id: String,
    index: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestScriptPublicKey {
    script_public_key: String,
    #[serde(default)]
    version: u16,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestUtxoEntryInner {
    #[serde(deserialize_with = "deserialize_flexible_amount")]
    amount: u64,
    script_public_key: RestScriptPublicKey,
    #[serde(default)]
    is_coinbase: bool,
}

/// One element of the UTXO REST response array (§6): tolerates `amount`
/// appearing as a JSON number, a string, or a single-element array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestUtxoEntry {
    outpoint: RestOutpoint,
    utxo_entry: RestUtxoEntryInner,
}

impl RestUtxoEntry {
    pub fn into_utxo(self, address: String) -> Result<Utxo, Error> {
        let transaction_id_bytes = hex::decode(&self.outpoint.transaction_id)?;
        let transaction_id: [u8; 32] = transaction_id_bytes.try_into().map_err(|bytes: Vec<u8>| {
            Error::InvalidTransaction(format!(
                "outpoint.transactionId must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        let script_public_key = hex::decode(&self.utxo_entry.script_public_key.script_public_key)?;

        Ok(Utxo {
            outpoint: crate::tx::Outpoint {
                transaction_id,
                index: self.outpoint.index,
            },
            amount: self.utxo_entry.amount,
            script_version: self.utxo_entry.script_public_key.version,
            script_public_key,
            address,
            is_coinbase: self.utxo_entry.is_coinbase,
        })
    }
}

/// Broadcast response (§6): the id may appear under `transactionId`,
/// `txid`, or `id`.
#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub transaction_id: String,
}

impl BroadcastResponse {
    pub fn parse(body: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(body)?;
        let transaction_id = value
            .get("transactionId")
            .or_else(|| value.get("txid"))
            .or_else(|| value.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::Internal(
                    "broadcast response missing transactionId/txid/id".to_string(),
                )
            })?;
        Ok(BroadcastResponse {
            transaction_id: transaction_id.to_string(),
        })
    }
}
