use crate::opcodes::{MAX_SCRIPT_ELEMENT_SIZE, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};
use crate::primitives::{u16_le, u32_le};

/// Encodes `data` as a single push operation, per §4.2:
///
/// - `N = 0` -> `OP_0` alone.
/// - `1..=75` -> `<N as byte> <data>`.
/// - `76..=255` -> `OP_PUSHDATA1 <N> <data>`.
/// - `256..=65535` -> `OP_PUSHDATA2 <N as u16 LE> <data>`.
/// - `>= 65536` -> `OP_PUSHDATA4 <N as u32 LE> <data>`.
///
/// Does not enforce the 520-byte single-push limit -- callers that may
/// exceed it should go through [`chunk`] first.
pub fn encode_push(data: &[u8]) -> Vec<u8> {
    let n = data.len();
    let mut out = Vec::with_capacity(n + 5);
    match n {
        0 => out.push(0x00),
        1..=75 => {
            out.push(n as u8);
            out.extend_from_slice(data);
        }
        76..=255 => {
            out.push(OP_PUSHDATA1);
            out.push(n as u8);
            out.extend_from_slice(data);
        }
        256..=65535 => {
            out.push(OP_PUSHDATA2);
            out.extend_from_slice(&u16_le(n as u16));
            out.extend_from_slice(data);
        }
        _ => {
            out.push(OP_PUSHDATA4);
            out.extend_from_slice(&u32_le(n as u32));
            out.extend_from_slice(data);
        }
    }
    out
}

/// Splits `data` into chunks of at most `max_len` bytes, each to be pushed
/// as its own operation (§4.2 data envelope content, and any push the
/// builder knows may exceed [`MAX_SCRIPT_ELEMENT_SIZE`]).
pub fn chunk(data: &[u8], max_len: usize) -> Vec<&[u8]> {
    if data.is_empty() {
        return vec![data];
    }
    data.chunks(max_len).collect()
}

/// Encodes `data` as one or more chunked pushes, each no larger than
/// [`MAX_SCRIPT_ELEMENT_SIZE`].
pub fn encode_chunked_push(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for piece in chunk(data, MAX_SCRIPT_ELEMENT_SIZE) {
        out.extend_from_slice(&encode_push(piece));
    }
    out
}
