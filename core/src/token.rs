//! Confirmation token generation.
//!
//! Tokens authorize a confirm/decline action without a login session, so
//! they must be unguessable: 256 bits of randomness, base64url encoded
//! (43 characters, no padding). A booking keeps its token for its entire
//! lifetime — tokens are never reissued, which bounds the consequence of
//! a forwarded email link.

use base64::Engine;
use rand::RngCore;

/// Generate a cryptographically secure confirmation token.
#[must_use]
pub fn mint_token() -> String {
    let mut rng = rand::thread_rng();
    let mut random_bytes = [0u8; 32];
    rng.fill_bytes(&mut random_bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_have_expected_shape() {
        let token = mint_token();

        // 256 bits base64url encoded without padding
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn tokens_are_unique() {
        let a = mint_token();
        let b = mint_token();
        assert_ne!(a, b);
    }
}
