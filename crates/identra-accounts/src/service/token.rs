//! Token Generation
//!
//! Opaque single-use secrets for the validation and recovery flows.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Produces the opaque secrets stored on accounts.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 32 bytes of OS randomness, URL-safe base64 without padding.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tokens_are_unique() {
        let gen = RandomTokenGenerator;
        let tokens: HashSet<String> = (0..100).map(|_| gen.generate()).collect();
        assert_eq!(tokens.len(), 100);
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = RandomTokenGenerator.generate();
        // 32 bytes -> 43 base64 characters, no padding
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
