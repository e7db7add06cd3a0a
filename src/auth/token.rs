// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret loaded at
//! startup. The validity window is fixed by configuration (7 days by
//! default) and a token stops verifying at exactly `exp`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{claims::TokenClaims, AuthError, AuthenticatedUser};

/// Issues and verifies bearer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], validity: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            validity,
        }
    }

    /// Length of the validity window.
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issue a token for `user_id`, valid from now.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("Failed to sign token: {e}")))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// Bad signatures, malformed tokens and expired tokens all come back as
    /// `AuthError::InvalidToken`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthenticatedUser, AuthError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        let claims = token_data.claims;
        if now.timestamp() >= claims.exp {
            tracing::debug!(user_id = %claims.user_id, "Token expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::TimeZone;

    fn service() -> TokenService {
        TokenService::new(b"test_secret_key_for_testing_purposes_only", Duration::days(7))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 12, 10, 30, 0).unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let tokens = service();
        let token = tokens.issue("user123").unwrap();
        let user = tokens.verify(&token).unwrap();
        assert_eq!(user.user_id, "user123");
        assert_eq!(user.expires_at - user.issued_at, Duration::days(7).num_seconds());
    }

    #[test]
    fn token_valid_until_expiry_instant() {
        let tokens = service();
        let token = tokens.issue_at("user123", t0()).unwrap();
        let expiry = t0() + Duration::days(7);

        assert!(tokens.verify_at(&token, t0()).is_ok());
        assert!(tokens.verify_at(&token, expiry - Duration::seconds(1)).is_ok());
        assert!(matches!(
            tokens.verify_at(&token, expiry),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            tokens.verify_at(&token, expiry + Duration::hours(1)),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = TokenService::new(b"another_secret", Duration::days(7));
        let token = other.issue("user123").unwrap();
        assert!(matches!(service().verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tokens = service();
        let token = tokens.issue("user123").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        let forged_payload = payload.replace("user123", "user999");
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(forged_payload.as_bytes()),
            parts[2]
        );

        assert!(matches!(tokens.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = service();
        assert!(matches!(tokens.verify("invalid.token.string"), Err(AuthError::InvalidToken)));
        assert!(matches!(tokens.verify(""), Err(AuthError::InvalidToken)));
    }
}
