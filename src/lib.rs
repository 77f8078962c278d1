//! Address codec, script builder, sighash engine, and transaction/KRC20
//! builder for constructing Kaspa transactions outside of a signer.
//!
//! This crate holds no private key material. Every signing operation is
//! two-phase: callers build an unsigned transaction (or commit/reveal
//! pair), forward the returned digests to an external signing oracle, then
//! hand the signatures back to install the signature scripts.

pub mod address;
pub mod builder;
pub mod config;
pub mod error;
pub mod krc20;
pub mod opcodes;
pub mod primitives;
pub mod script;
pub mod sighash;
pub mod tx;

pub use error::{Error, Result};
