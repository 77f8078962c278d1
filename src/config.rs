/// Network the caller is targeting. Only affects which address prefix is
/// accepted/produced by the address codec (§4.1/§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// CashAddr prefix for this network (`kaspa` / `kaspatest`).
    pub fn prefix(self) -> &'static str {
        match self {
            Network::Mainnet => "kaspa",
            Network::Testnet => "kaspatest",
        }
    }
}

/// Explicit configuration passed at construction time (§6). There is no
/// global mutable state anywhere in this crate: a `TxBuilderConfig` is the
/// only way a `TransactionBuilder` or `Krc20Builder` learns about fee bounds,
/// network, or the key identifier it is building for.
#[derive(Debug, Clone)]
pub struct TxBuilderConfig {
    /// Opaque identifier the caller uses to correlate a digest with the
    /// signing oracle's key material. Never inspected by this crate.
    pub key_name: String,
    /// Host serving the UTXO/broadcast REST API (§6). Not dialed by this
    /// crate -- the HTTP client is an external collaborator -- but carried
    /// through so callers can thread one config object end to end.
    pub api_host: String,
    pub network: Network,
    pub max_fee: u64,
    pub default_fee_rate: u64,
}

impl TxBuilderConfig {
    pub fn new(key_name: impl Into<String>, api_host: impl Into<String>, network: Network) -> Self {
        Self {
            key_name: key_name.into(),
            api_host: api_host.into(),
            network,
            max_fee: crate::builder::fee::DEFAULT_MAX_FEE,
            default_fee_rate: crate::builder::fee::DEFAULT_FEE_RATE,
        }
    }
}
