pub mod codec;
pub mod fingerprint;

pub use codec::TokenCodec;
pub use fingerprint::fingerprint;
