//! Round-trip reader for the data envelope §4.2 defines, added purely for
//! test/debug symmetry with `build_envelope` -- not on the hot path of any
//! builder operation.

use crate::opcodes::{OP_0, OP_1, OP_ENDIF, OP_FALSE, OP_IF, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};

/// Reads a single push operation starting at `pos`, returning the pushed
/// bytes and the offset just past it. Returns `None` if `pos` is not the
/// start of a push (or the push overruns the script).
fn read_push(script: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    let opcode = *script.get(pos)?;
    let (len, data_start) = match opcode {
        0x00 => (0usize, pos + 1),
        1..=75 => (opcode as usize, pos + 1),
        OP_PUSHDATA1 => {
            let len = *script.get(pos + 1)? as usize;
            (len, pos + 2)
        }
        OP_PUSHDATA2 => {
            let b = script.get(pos + 1..pos + 3)?;
            (u16::from_le_bytes([b[0], b[1]]) as usize, pos + 3)
        }
        OP_PUSHDATA4 => {
            let b = script.get(pos + 1..pos + 5)?;
            (u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize, pos + 5)
        }
        _ => return None,
    };
    let data = script.get(data_start..data_start + len)?;
    Some((data, data_start + len))
}

/// Parses `script` back into the `(protocol, metadata, content)` triple
/// `build_envelope` assembled it from, or `None` if `script` does not match
/// the envelope grammar exactly (including trailing bytes after `OP_ENDIF`).
pub fn read_envelope(script: &[u8]) -> Option<(String, Vec<u8>, Vec<u8>)> {
    if script.len() < 2 || script[0] != OP_FALSE || script[1] != OP_IF {
        return None;
    }
    let (protocol_bytes, pos) = read_push(script, 2)?;
    let protocol = String::from_utf8(protocol_bytes.to_vec()).ok()?;

    if *script.get(pos)? != OP_1 {
        return None;
    }
    let (metadata, pos) = read_push(script, pos + 1)?;
    let metadata = metadata.to_vec();

    if *script.get(pos)? != OP_0 {
        return None;
    }
    let mut pos = pos + 1;
    let mut content = Vec::new();
    loop {
        match *script.get(pos)? {
            OP_ENDIF => {
                pos += 1;
                break;
            }
            _ => {
                let (piece, next) = read_push(script, pos)?;
                content.extend_from_slice(piece);
                pos = next;
            }
        }
    }

    if pos != script.len() {
        return None;
    }
    Some((protocol, metadata, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::build_envelope;

    #[test]
    fn round_trips_s4_vector() {
        let script = build_envelope("kasplex", b"meta", b"content");
        let (protocol, metadata, content) = read_envelope(&script).unwrap();
        assert_eq!(protocol, "kasplex");
        assert_eq!(metadata, b"meta");
        assert_eq!(content, b"content");
    }

    #[test]
    fn round_trips_chunked_content() {
        let big_content = vec![0xabu8; 1000];
        let script = build_envelope("kasplex", b"meta", &big_content);
        let (protocol, metadata, content) = read_envelope(&script).unwrap();
        assert_eq!(protocol, "kasplex");
        assert_eq!(metadata, b"meta");
        assert_eq!(content, big_content);
    }

    #[test]
    fn rejects_missing_endif() {
        let mut script = build_envelope("kasplex", b"meta", b"content");
        script.pop();
        assert!(read_envelope(&script).is_none());
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut script = build_envelope("kasplex", b"meta", b"content");
        script.push(0xff);
        assert!(read_envelope(&script).is_none());
    }

    #[test]
    fn rejects_non_envelope_script() {
        assert!(read_envelope(&[0x51, 0xac]).is_none());
    }
}
