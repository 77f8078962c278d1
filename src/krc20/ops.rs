//! KRC20 operation JSON formatting (§4.5). Each operation gets its own
//! struct with fields declared in the exact required order: `serde_json`
//! serializes plain structs field-by-field in declaration order, which is
//! what gives us the bit-exact, no-whitespace output the Kasplex indexer
//! expects, without reaching for a map type that could reorder keys.

use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::error::Error;

const PROTOCOL: &str = "krc-20";

#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct DeployMintMode {
    p: &'static str,
    op: &'static str,
    tick: String,
    #[serde_as(as = "DisplayFromStr")]
    max: u64,
    #[serde_as(as = "DisplayFromStr")]
    lim: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    dec: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pre: Option<u64>,
}

#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct DeployIssueMode {
    p: &'static str,
    op: &'static str,
    #[serde(rename = "mod")]
    mod_: String,
    name: String,
    #[serde_as(as = "DisplayFromStr")]
    max: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    dec: Option<u64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pre: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mint {
    p: &'static str,
    op: &'static str,
    tick: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct Transfer {
    p: &'static str,
    op: &'static str,
    tick: String,
    #[serde_as(as = "DisplayFromStr")]
    amt: u64,
    to: String,
}

#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct Burn {
    p: &'static str,
    op: &'static str,
    tick: String,
    #[serde_as(as = "DisplayFromStr")]
    amt: u64,
}

#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct List {
    p: &'static str,
    op: &'static str,
    tick: String,
    #[serde_as(as = "DisplayFromStr")]
    amt: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Send {
    p: &'static str,
    op: &'static str,
    tick: String,
}

#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    p: &'static str,
    op: &'static str,
    ca: String,
    #[serde_as(as = "DisplayFromStr")]
    amt: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
}

/// Every KRC20 operation this crate can format (§4.5 table).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Krc20Operation {
    DeployMint(DeployMintMode),
    DeployIssue(DeployIssueMode),
    Mint(Mint),
    Transfer(Transfer),
    Burn(Burn),
    List(List),
    Send(Send),
    Issue(Issue),
}

impl Krc20Operation {
    pub fn deploy_mint_mode(
        tick: impl Into<String>,
        max: u64,
        lim: u64,
        to: Option<String>,
        dec: Option<u64>,
        pre: Option<u64>,
    ) -> Self {
        Krc20Operation::DeployMint(DeployMintMode {
            p: PROTOCOL,
            op: "deploy",
            tick: tick.into(),
            max,
            lim,
            to,
            dec,
            pre,
        })
    }

    pub fn deploy_issue_mode(
        mod_: impl Into<String>,
        name: impl Into<String>,
        max: u64,
        to: Option<String>,
        dec: Option<u64>,
        pre: Option<u64>,
    ) -> Self {
        Krc20Operation::DeployIssue(DeployIssueMode {
            p: PROTOCOL,
            op: "deploy",
            mod_: mod_.into(),
            name: name.into(),
            max,
            to,
            dec,
            pre,
        })
    }

    pub fn mint(tick: impl Into<String>, to: Option<String>) -> Self {
        Krc20Operation::Mint(Mint {
            p: PROTOCOL,
            op: "mint",
            tick: tick.into(),
            to,
        })
    }

    pub fn transfer(tick: impl Into<String>, amt: u64, to: impl Into<String>) -> Self {
        Krc20Operation::Transfer(Transfer {
            p: PROTOCOL,
            op: "transfer",
            tick: tick.into(),
            amt,
            to: to.into(),
        })
    }

    pub fn burn(tick: impl Into<String>, amt: u64) -> Self {
        Krc20Operation::Burn(Burn {
            p: PROTOCOL,
            op: "burn",
            tick: tick.into(),
            amt,
        })
    }

    /// Per §3's invariant, `list` lowercases `tick`.
    pub fn list(tick: impl Into<String>, amt: u64) -> Self {
        Krc20Operation::List(List {
            p: PROTOCOL,
            op: "list",
            tick: tick.into().to_lowercase(),
            amt,
        })
    }

    /// Per §3's invariant, `send` lowercases `tick`.
    pub fn send(tick: impl Into<String>) -> Self {
        Krc20Operation::Send(Send {
            p: PROTOCOL,
            op: "send",
            tick: tick.into().to_lowercase(),
        })
    }

    pub fn issue(ca: impl Into<String>, amt: u64, to: Option<String>) -> Self {
        Krc20Operation::Issue(Issue {
            p: PROTOCOL,
            op: "issue",
            ca: ca.into(),
            amt,
            to,
        })
    }

    /// Renders the operation as compact, no-whitespace JSON (§4.5).
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_deploy_mint_mode_minimal_fields() {
        let op = Krc20Operation::deploy_mint_mode("KASP", 2_100_000_000_000_000, 100_000_000_000, None, None, None);
        assert_eq!(
            op.to_json().unwrap(),
            r#"{"p":"krc-20","op":"deploy","tick":"KASP","max":"2100000000000000","lim":"100000000000"}"#
        );
    }

    #[test]
    fn s2_deploy_mint_mode_with_optional_fields_in_order() {
        let op = Krc20Operation::deploy_mint_mode(
            "KASP",
            2_100_000_000_000_000,
            100_000_000_000,
            Some("kaspa:example".to_string()),
            Some(8),
            Some(500_000),
        );
        let json = op.to_json().unwrap();
        assert!(json.contains(r#""dec":"8""#));
        assert!(json.contains(r#""pre":"500000""#));
        assert!(json.contains(r#""to":"kaspa:example""#));

        let to_pos = json.find(r#""to""#).unwrap();
        let dec_pos = json.find(r#""dec""#).unwrap();
        let pre_pos = json.find(r#""pre""#).unwrap();
        assert!(to_pos < dec_pos);
        assert!(dec_pos < pre_pos);
    }

    #[test]
    fn s3_list_lowercases_ticker() {
        let op = Krc20Operation::list("TEST", 1000);
        let json = op.to_json().unwrap();
        assert!(json.contains(r#""tick":"test""#));
    }

    #[test]
    fn send_lowercases_ticker() {
        let op = Krc20Operation::send("TEST");
        let json = op.to_json().unwrap();
        assert!(json.contains(r#""tick":"test""#));
    }

    #[test]
    fn transfer_preserves_ticker_case() {
        let op = Krc20Operation::transfer("KASP", 1000, "kaspa:example");
        let json = op.to_json().unwrap();
        assert!(json.contains(r#""tick":"KASP""#));
    }

    #[test]
    fn deploy_issue_mode_field_order() {
        let op = Krc20Operation::deploy_issue_mode("nft", "My Collection", 1000, None, None, None);
        let json = op.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"p":"krc-20","op":"deploy","mod":"nft","name":"My Collection","max":"1000"}"#
        );
    }

    #[test]
    fn no_operation_produces_whitespace() {
        let op = Krc20Operation::mint("KASP", None);
        let json = op.to_json().unwrap();
        assert!(!json.contains(' '));
        assert!(!json.contains('\n'));
    }
}
