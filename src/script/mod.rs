mod envelope;
pub mod parser;
mod push;
mod redeem;

pub use envelope::build_envelope;
pub use parser::read_envelope;
pub use push::{chunk, encode_chunked_push, encode_push};
pub use redeem::{commit_script_pubkey, redeem_script, RedeemPubkey};

/// Minimal opcode-level script assembler, the idiomatic analogue of
/// `bitcoin::script::Builder` used by the teacher's redeem-script
/// generators (`append_reveal_script_to_builder`), generalized to Kaspa's
/// opcode set and push rules (§4.2).
#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    bytes: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.bytes.push(opcode);
        self
    }

    /// Pushes `data` as a single push operation (§4.2 push encoding).
    pub fn push_data(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(&encode_push(data));
        self
    }

    /// Pushes `data`, chunked into <=520-byte pieces if necessary.
    pub fn push_data_chunked(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(&encode_chunked_push(data));
        self
    }

    /// Appends `data` verbatim, with no push opcode of its own. Used after
    /// an explicit `OP_DATA_N` opcode has already been pushed, where adding
    /// a second length prefix via [`Self::push_data`] would double it up.
    pub fn push_data_raw(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(data);
        self
    }

    pub fn into_script(self) -> Vec<u8> {
        self.bytes
    }
}
