mod bytes;
mod hash;

pub use bytes::{from_hex, to_hex, u16_le, u32_le, u64_le};
pub use hash::{
    blake2b_256, blake2b_256_keyed, blake2b_256_keyed_state, finalize_state, sha256, Hash256,
};
