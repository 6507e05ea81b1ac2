use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::Digest;
use sha2::Sha256;

/// One-way fingerprint of a raw token, suitable for storage.
///
/// SHA-256 of the token bytes, base64 (standard alphabet, padded).
pub fn fingerprint(token: &str) -> String {
    STANDARD.encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_value() {
        // sha256("abc")
        assert_eq!(
            fingerprint("abc"),
            "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="
        );
    }

    #[test]
    fn test_fingerprint_does_not_contain_token() {
        let token = "header.payload.signature";
        let hashed = fingerprint(token);

        assert_eq!(hashed.len(), 44);
        assert!(!hashed.contains("payload"));
        assert_eq!(hashed, fingerprint(token));
        assert_ne!(hashed, fingerprint("header.payload.signaturf"));
    }
}
