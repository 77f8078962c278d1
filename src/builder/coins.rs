//! UTXO selection (§4.4): descending-by-amount greedy accumulation, with a
//! deterministic tie-break so selection is reproducible across runs (§5).

use crate::error::Error;
use crate::tx::Utxo;

fn sort_key(utxo: &Utxo) -> (std::cmp::Reverse<u64>, [u8; 32], u32) {
    (
        std::cmp::Reverse(utxo.amount),
        utxo.outpoint.transaction_id,
        utxo.outpoint.index,
    )
}

/// Selects UTXOs greedily by descending amount until their sum covers
/// `amount + fee`. Ties are broken by `(transaction_id, index)`
/// lexicographically, per §5's ordering guarantee.
pub fn select_coins(utxos: &[Utxo], amount: u64, fee: u64) -> Result<Vec<Utxo>, Error> {
    let required = amount.checked_add(fee).ok_or_else(|| {
        Error::InvalidTransaction("amount + fee overflowed u64".to_string())
    })?;

    let mut sorted: Vec<&Utxo> = utxos.iter().collect();
    sorted.sort_by_key(|utxo| sort_key(utxo));

    let mut selected = Vec::new();
    let mut total = 0u64;
    for utxo in sorted {
        if total >= required {
            break;
        }
        selected.push(utxo.clone());
        total = total.saturating_add(utxo.amount);
    }

    if total < required {
        let available = utxos.iter().map(|u| u.amount).sum();
        return Err(Error::InsufficientFunds { required, available });
    }

    Ok(selected)
}

/// Single-UTXO fast path (§4.4): picks the single largest UTXO able to
/// cover `amount + fee` alone, for callers that need exactly one input
/// (e.g. KRC20 commit funding).
pub fn select_single_utxo(utxos: &[Utxo], amount: u64, fee: u64) -> Result<Utxo, Error> {
    let required = amount.checked_add(fee).ok_or_else(|| {
        Error::InvalidTransaction("amount + fee overflowed u64".to_string())
    })?;

    // Ascending by amount (then the same tie-break) so the smallest UTXO
    // that still covers `required` is chosen, minimizing leftover change.
    let mut sorted: Vec<&Utxo> = utxos.iter().collect();
    sorted.sort_by_key(|utxo| (utxo.amount, utxo.outpoint.transaction_id, utxo.outpoint.index));

    sorted
        .into_iter()
        .find(|utxo| utxo.amount >= required)
        .cloned()
        .ok_or_else(|| {
            let available = utxos.iter().map(|u| u.amount).max().unwrap_or(0);
            Error::InsufficientFunds { required, available }
        })
}
