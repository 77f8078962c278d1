pub mod coins;
pub mod fee;
pub mod signer;

use log::debug;

use crate::address::{self, AddressType};
use crate::config::TxBuilderConfig;
use crate::error::Error;
use crate::script::RedeemPubkey;
use crate::sighash::{self, SigHashType, SighashMidstateCache, SpentOutput};
use crate::tx::{KaspaTransaction, Outpoint, ScriptPublicKey, TransactionInput, TransactionOutput, Utxo};

/// A fully assembled but unsigned transaction, plus the per-input digests a
/// caller must forward to the signing oracle (§2 control flow,
/// `build_unsigned` / `install_signatures` split per §9's injected-signer
/// note -- this crate never talks to a signer directly).
pub struct UnsignedTransaction {
    pub transaction: KaspaTransaction,
    pub digests: Vec<[u8; 32]>,
    #[allow(dead_code)]
    spent: Vec<SpentOutput>,
    #[allow(dead_code)]
    redeem_pubkeys: Vec<Option<RedeemPubkey>>,
}

/// Builds, coin-selects, and sign-integrates plain Kaspa transactions
/// (§4.4). Holds no secret key material and never calls a signing oracle
/// itself -- callers drive the two-phase `build_unsigned` /
/// `install_signatures` protocol.
pub struct TransactionBuilder<'a> {
    config: &'a TxBuilderConfig,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(config: &'a TxBuilderConfig) -> Self {
        Self { config }
    }

    /// Enforces `min_fee <= fee <= max_fee_configured` (§4.4). The floor is
    /// the same dust threshold a change output must clear -- a fee below it
    /// is not a meaningful network fee.
    fn validate_fee(&self, fee: u64) -> Result<(), Error> {
        if fee < fee::MIN_FEE_SOMPI || fee > self.config.max_fee {
            return Err(Error::InvalidFee {
                min: fee::MIN_FEE_SOMPI,
                max: self.config.max_fee,
                actual: fee,
            });
        }
        Ok(())
    }

    fn validate_amount(&self, amount: u64) -> Result<(), Error> {
        if amount < fee::DUST_THRESHOLD_SOMPI || amount > fee::MAX_SUPPLY_SOMPI {
            return Err(Error::InvalidAmount {
                min: fee::DUST_THRESHOLD_SOMPI,
                max: fee::MAX_SUPPLY_SOMPI,
                actual: amount,
            });
        }
        Ok(())
    }

    /// Builds an unsigned send of `amount` sompi from `from_pubkey`'s
    /// address to `to_address`, selecting coins from `utxos` (§2 control
    /// flow for a plain send).
    pub fn build_send(
        &self,
        from_address: &str,
        to_address: &str,
        amount: u64,
        fee_override: Option<u64>,
        utxos: &[Utxo],
    ) -> Result<UnsignedTransaction, Error> {
        self.validate_amount(amount)?;

        let from = address::decode(from_address)?;
        let to = address::decode(to_address)?;

        let selected = self.select_for_send(utxos, amount, fee_override)?;
        let total_in: u64 = selected.iter().map(|u| u.amount).sum();
        let fee = fee_override.unwrap_or_else(|| fee::estimate_fee(selected.len(), 2, self.config.default_fee_rate));
        self.validate_fee(fee)?;

        let change = total_in.saturating_sub(amount).saturating_sub(fee);

        let mut outputs = vec![TransactionOutput {
            amount,
            script_public_key: ScriptPublicKey {
                version: 0,
                script_bytes: hex::decode(&to.script_public_key_hex)?,
            },
        }];

        if change >= fee::DUST_THRESHOLD_SOMPI {
            outputs.push(TransactionOutput {
                amount: change,
                script_public_key: ScriptPublicKey {
                    version: 0,
                    script_bytes: hex::decode(&from.script_public_key_hex)?,
                },
            });
        }

        debug!(
            "build_send: {} input(s), {} output(s), fee={fee}, change={change}",
            selected.len(),
            outputs.len()
        );

        self.finalize_unsigned(selected, outputs, Vec::new(), from.addr_type)
    }

    /// Single-UTXO fast path (§4.4), used when a caller already knows they
    /// want exactly one input spent (e.g. funding a KRC20 commit).
    pub fn build_single_input_send(
        &self,
        from_address: &str,
        to_address: &str,
        amount: u64,
        fee_override: Option<u64>,
        utxos: &[Utxo],
    ) -> Result<UnsignedTransaction, Error> {
        self.validate_amount(amount)?;
        let from = address::decode(from_address)?;
        let to = address::decode(to_address)?;

        let fee = fee_override.unwrap_or_else(|| fee::estimate_fee(1, 2, self.config.default_fee_rate));
        self.validate_fee(fee)?;

        let selected = coins::select_single_utxo(utxos, amount, fee)?;
        let change = selected.amount.saturating_sub(amount).saturating_sub(fee);

        let mut outputs = vec![TransactionOutput {
            amount,
            script_public_key: ScriptPublicKey {
                version: 0,
                script_bytes: hex::decode(&to.script_public_key_hex)?,
            },
        }];
        if change >= fee::DUST_THRESHOLD_SOMPI {
            outputs.push(TransactionOutput {
                amount: change,
                script_public_key: ScriptPublicKey {
                    version: 0,
                    script_bytes: hex::decode(&from.script_public_key_hex)?,
                },
            });
        }

        self.finalize_unsigned(vec![selected], outputs, Vec::new(), from.addr_type)
    }

    fn select_for_send(
        &self,
        utxos: &[Utxo],
        amount: u64,
        fee_override: Option<u64>,
    ) -> Result<Vec<Utxo>, Error> {
        match fee_override {
            Some(fee) => coins::select_coins(utxos, amount, fee),
            None => {
                // estimate fee against a guessed 2-output shape first, then
                // re-select if the actual input count changes the estimate
                let mut fee = fee::estimate_fee(1, 2, self.config.default_fee_rate);
                loop {
                    let selected = coins::select_coins(utxos, amount, fee)?;
                    let refined = fee::estimate_fee(selected.len(), 2, self.config.default_fee_rate);
                    if refined == fee {
                        return Ok(selected);
                    }
                    fee = refined;
                }
            }
        }
    }

    fn finalize_unsigned(
        &self,
        selected: Vec<Utxo>,
        outputs: Vec<TransactionOutput>,
        payload: Vec<u8>,
        spender_type: AddressType,
    ) -> Result<UnsignedTransaction, Error> {
        let inputs: Vec<TransactionInput> = selected
            .iter()
            .map(|utxo| TransactionInput {
                previous_outpoint: utxo.outpoint.clone(),
                signature_script: Vec::new(),
                sequence: 0,
                sig_op_count: 1,
            })
            .collect();

        let transaction = KaspaTransaction {
            version: 0,
            inputs,
            outputs,
            lock_time: 0,
            subnetwork_id: KaspaTransaction::DEFAULT_SUBNETWORK_ID,
            gas: 0,
            payload,
        };

        let spent: Vec<SpentOutput> = selected
            .iter()
            .map(|utxo| SpentOutput {
                script_version: utxo.script_version,
                script_public_key: utxo.script_public_key.clone(),
                amount: utxo.amount,
            })
            .collect();

        let sighash_type = SigHashType::from_byte(SigHashType::ALL)?;
        let mut cache = SighashMidstateCache::new();
        let mut digests = Vec::with_capacity(spent.len());
        let use_ecdsa = spender_type == AddressType::Ecdsa;
        for (i, spent_output) in spent.iter().enumerate() {
            let digest = if use_ecdsa {
                sighash::compute_ecdsa_digest(&transaction, i, spent_output, sighash_type, &mut cache)?
            } else {
                sighash::compute_schnorr_digest(&transaction, i, spent_output, sighash_type, &mut cache)?
            };
            digests.push(digest);
        }

        let redeem_pubkeys = vec![None; spent.len()];

        Ok(UnsignedTransaction {
            transaction,
            digests,
            spent,
            redeem_pubkeys,
        })
    }

    /// Installs oracle-produced signatures into `unsigned`'s inputs (§4.4
    /// sign-integrate). `signatures[i]` is the raw signature for input `i`:
    /// 64-byte `(r, s)` for ECDSA inputs, or a 64-byte Schnorr signature.
    /// P2SH inputs additionally need `redeem_scripts[i]` set.
    pub fn install_signatures(
        &self,
        mut unsigned: UnsignedTransaction,
        signatures: &[Vec<u8>],
        redeem_scripts: &[Option<Vec<u8>>],
        use_ecdsa: &[bool],
    ) -> Result<KaspaTransaction, Error> {
        if signatures.len() != unsigned.transaction.inputs.len() {
            return Err(Error::InvalidTransaction(
                "signature count does not match input count".to_string(),
            ));
        }

        for (i, input) in unsigned.transaction.inputs.iter_mut().enumerate() {
            let hashtype = SigHashType::ALL;
            let script = match redeem_scripts.get(i).and_then(Option::as_ref) {
                Some(redeem_script) => {
                    if use_ecdsa.get(i).copied().unwrap_or(false) {
                        let (r, s) = signer::split_raw_ecdsa_signature(&signatures[i])?;
                        let der = signer::der_encode_signature(&r, &s);
                        signer::p2sh_signature_script(&der, hashtype, redeem_script)
                    } else {
                        signer::p2sh_signature_script(&signatures[i], hashtype, redeem_script)
                    }
                }
                None => {
                    if use_ecdsa.get(i).copied().unwrap_or(false) {
                        let (r, s) = signer::split_raw_ecdsa_signature(&signatures[i])?;
                        let der = signer::der_encode_signature(&r, &s);
                        signer::p2pk_signature_script(&der, hashtype)
                    } else {
                        signer::p2pk_signature_script(&signatures[i], hashtype)
                    }
                }
            };
            input.signature_script = script;
        }

        Ok(unsigned.transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Network;

    fn make_utxo(address: &str, script_hex: &str, amount: u64, tx_byte: u8) -> Utxo {
        Utxo {
            outpoint: Outpoint {
                transaction_id: [tx_byte; 32],
                index: 0,
            },
            amount,
            script_version: 0,
            script_public_key: hex::decode(script_hex).unwrap(),
            address: address.to_string(),
            is_coinbase: false,
        }
    }

    #[test]
    fn build_send_produces_recipient_and_change_outputs() {
        let config = TxBuilderConfig::new("key-1", "https://example.invalid", Network::Mainnet);
        let builder = TransactionBuilder::new(&config);

        let from = address::encode(&[0xaa; 32], AddressType::Schnorr, "kaspa").unwrap();
        let to = address::encode(&[0xbb; 32], AddressType::Schnorr, "kaspa").unwrap();

        let utxos = vec![make_utxo(
            &from.address,
            &from.script_public_key_hex,
            1_000_000,
            0x01,
        )];

        let unsigned = builder
            .build_send(&from.address, &to.address, 500_000, None, &utxos)
            .unwrap();

        assert_eq!(unsigned.transaction.inputs.len(), 1);
        assert_eq!(unsigned.digests.len(), 1);
        assert!(unsigned.transaction.outputs.len() <= 2);
    }

    #[test]
    fn property_8_inputs_equal_outputs_plus_fee() {
        let config = TxBuilderConfig::new("key-1", "https://example.invalid", Network::Mainnet);
        let builder = TransactionBuilder::new(&config);

        let from = address::encode(&[0xaa; 32], AddressType::Schnorr, "kaspa").unwrap();
        let to = address::encode(&[0xbb; 32], AddressType::Schnorr, "kaspa").unwrap();
        let utxos = vec![make_utxo(
            &from.address,
            &from.script_public_key_hex,
            1_000_000,
            0x01,
        )];

        let fee = 50_000;
        let unsigned = builder
            .build_send(&from.address, &to.address, 500_000, Some(fee), &utxos)
            .unwrap();

        let total_in: u64 = utxos.iter().map(|u| u.amount).sum();
        let total_out: u64 = unsigned.transaction.sum_outputs();
        assert_eq!(total_in, total_out + fee);
    }

    #[test]
    fn property_9_sub_dust_change_collapses_to_single_output() {
        let config = TxBuilderConfig::new("key-1", "https://example.invalid", Network::Mainnet);
        let builder = TransactionBuilder::new(&config);

        let from = address::encode(&[0xaa; 32], AddressType::Schnorr, "kaspa").unwrap();
        let to = address::encode(&[0xbb; 32], AddressType::Schnorr, "kaspa").unwrap();

        let amount = 500_000;
        let fee = 50_000;
        // leftover after amount+fee is 500 sompi, under the 1000-sompi dust
        // threshold, so the change output must be dropped entirely.
        let leftover = 500;
        let utxos = vec![make_utxo(
            &from.address,
            &from.script_public_key_hex,
            amount + fee + leftover,
            0x01,
        )];

        let unsigned = builder
            .build_send(&from.address, &to.address, amount, Some(fee), &utxos)
            .unwrap();

        assert_eq!(unsigned.transaction.outputs.len(), 1);
        assert_eq!(unsigned.transaction.outputs[0].amount, amount);
    }

    #[test]
    fn validate_fee_rejects_below_min_fee() {
        let config = TxBuilderConfig::new("key-1", "https://example.invalid", Network::Mainnet);
        let builder = TransactionBuilder::new(&config);

        let from = address::encode(&[0xaa; 32], AddressType::Schnorr, "kaspa").unwrap();
        let to = address::encode(&[0xbb; 32], AddressType::Schnorr, "kaspa").unwrap();
        let utxos = vec![make_utxo(
            &from.address,
            &from.script_public_key_hex,
            1_000_000,
            0x01,
        )];

        let result = builder.build_send(&from.address, &to.address, 500_000, Some(1), &utxos);
        assert!(matches!(result, Err(Error::InvalidFee { .. })));
    }

    #[test]
    fn install_signatures_produces_push_only_script() {
        let config = TxBuilderConfig::new("key-1", "https://example.invalid", Network::Mainnet);
        let builder = TransactionBuilder::new(&config);

        let from = address::encode(&[0xaa; 32], AddressType::Schnorr, "kaspa").unwrap();
        let to = address::encode(&[0xbb; 32], AddressType::Schnorr, "kaspa").unwrap();
        let utxos = vec![make_utxo(
            &from.address,
            &from.script_public_key_hex,
            1_000_000,
            0x01,
        )];

        let unsigned = builder
            .build_send(&from.address, &to.address, 500_000, Some(50_000), &utxos)
            .unwrap();

        let signatures = vec![vec![0x01u8; 64]];
        let signed = builder
            .install_signatures(unsigned, &signatures, &[None], &[false])
            .unwrap();

        assert!(!signed.inputs[0].signature_script.is_empty());
        assert_eq!(signed.inputs[0].signature_script[0], 65);
    }
}
