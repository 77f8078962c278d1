use crate::opcodes::{OP_0, OP_1, OP_ENDIF, OP_FALSE, OP_IF};
use crate::script::ScriptBuilder;

/// Builds a Kasplex-style data envelope (§4.2):
///
/// ```text
/// OP_FALSE OP_IF
///   push(protocol)
///   OP_1            (literal marker opcode, not a push)
///   push(metadata)
///   OP_0            (literal marker opcode, not a push)
///   push(content)   (chunked if > 520 bytes)
/// OP_ENDIF
/// ```
///
/// `OP_1`/`OP_0` here are bare opcodes, not wrapped push operations -- this
/// is what the Kasplex indexer's envelope grammar requires, and is the one
/// place in this crate's script construction where a single-byte opcode and
/// a push of equal encoded length must not be confused for one another.
pub fn build_envelope(protocol: &str, metadata: &[u8], content: &[u8]) -> Vec<u8> {
    ScriptBuilder::new()
        .push_opcode(OP_FALSE)
        .push_opcode(OP_IF)
        .push_data(protocol.as_bytes())
        .push_opcode(OP_1)
        .push_data(metadata)
        .push_opcode(OP_0)
        .push_data_chunked(content)
        .push_opcode(OP_ENDIF)
        .into_script()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_recognizes_expected_shape_s4() {
        let envelope = build_envelope("kasplex", &[], b"hello");

        assert_eq!(envelope[0], OP_FALSE);
        assert_eq!(envelope[1], OP_IF);

        let protocol_bytes = b"kasplex";
        assert!(
            envelope
                .windows(protocol_bytes.len())
                .any(|w| w == protocol_bytes),
            "protocol tag bytes must appear in the envelope"
        );

        // after push("kasplex") = [0x07, ...7 bytes...], next byte is OP_1
        let after_protocol = 2 + 1 + protocol_bytes.len();
        assert_eq!(envelope[after_protocol], OP_1);
        // metadata push is empty -> single OP_0 byte
        assert_eq!(envelope[after_protocol + 1], 0x00);
        // content marker: literal 0x00
        assert_eq!(envelope[after_protocol + 2], 0x00);

        assert_eq!(*envelope.last().unwrap(), 0x68); // OP_ENDIF
    }

    #[test]
    fn envelope_ends_with_op_endif() {
        let envelope = build_envelope("kasplex", b"meta", b"content");
        assert_eq!(*envelope.last().unwrap(), 0x68);
    }

    #[test]
    fn envelope_chunks_oversized_content() {
        let content = vec![0xffu8; 1000];
        let envelope = build_envelope("kasplex", &[], &content);
        // two PUSHDATA2 headers must appear for the two content chunks
        let pushdata2_count = envelope.windows(1).filter(|w| w[0] == 0x4d).count();
        assert!(pushdata2_count >= 2);
    }
}
