use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Discriminates access tokens from refresh tokens.
///
/// Serialized into the `type` claim so a token of one kind can never be
/// accepted where the other is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Token kind
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID, unique per issued token
    pub jti: String,
}

impl Claims {
    /// Create claims for a user valid from `issued_at` for `validity`.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `token_type` - Access or refresh
    /// * `issued_at` - Issuance instant
    /// * `validity` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, type, iat, exp and a fresh jti
    pub fn for_user(
        user_id: impl ToString,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            token_type,
            iat: issued_at.timestamp(),
            exp: (issued_at + validity).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is no longer usable from its `exp` second onwards.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let now = Utc::now();
        let claims = Claims::for_user("user123", TokenType::Access, now, Duration::minutes(15));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_jti_is_unique() {
        let now = Utc::now();
        let first = Claims::for_user("user123", TokenType::Refresh, now, Duration::days(1));
        let second = Claims::for_user("user123", TokenType::Refresh, now, Duration::days(1));

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: "user123".to_string(),
            token_type: TokenType::Access,
            iat: 900,
            exp: 1000,
            jti: "id".to_string(),
        };

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_type_claim_serialization() {
        let claims = Claims::for_user("u", TokenType::Refresh, Utc::now(), Duration::days(1));
        let json = serde_json::to_value(&claims).expect("Failed to serialize claims");

        assert_eq!(json["type"], "refresh");
        assert!(json.get("token_type").is_none());
    }
}
