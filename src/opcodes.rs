//! Named opcode constants for Kaspa/Bitcoin-compatible scripts, grounded in
//! `kaspa-txscript`'s `opcodes::codes` module (`OpBlake2b`, `OpData32`,
//! `OpEqual`, `OpCheckSig`, `OpIf`, `OpEndIf`, ...).

/// Pushes an empty byte array / boolean false.
pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = OP_0;

/// The literal "push the number 1" opcode, used both as a stack value and,
/// per §4.2, as the data envelope's metadata-marker byte.
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = OP_1;

pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;

pub const OP_IF: u8 = 0x63;
pub const OP_ENDIF: u8 = 0x68;

pub const OP_EQUAL: u8 = 0x87;

pub const OP_CHECKSIG: u8 = 0xac;
/// ECDSA variant of OP_CHECKSIG. Not standardized by name in the retrieved
/// source; kept distinct from `OP_CHECKSIG` as required by §4.1/§4.2 so that
/// Schnorr and ECDSA redeem scripts remain byte-distinguishable.
pub const OP_CHECKSIG_ECDSA: u8 = 0xab;

/// BLAKE2B-256 of the top stack item, used for the P2SH commit script
/// (§4.2) and, per the resolved open question in DESIGN.md, for every
/// address-derived P2SH scriptPublicKey as well (§4.1).
pub const OP_BLAKE2B: u8 = 0xb3;

/// `OP_DATA_N` opcodes are just the literal byte `N` for `1 <= N <= 75`;
/// these two constants name the two fixed-length pushes this crate uses
/// most often (32-byte Schnorr/P2SH payloads, 33-byte ECDSA payloads).
pub const OP_DATA_32: u8 = 32;
pub const OP_DATA_33: u8 = 33;

/// Maximum length of a single script push (§4.2).
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
