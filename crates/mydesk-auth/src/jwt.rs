//! JWT creation and verification.
//!
//! Tokens are HS256-signed with the configured secret. Verification checks the
//! signature and `exp`; any failure becomes an unauthorized error with a single
//! generic message.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use mydesk_config::JwtConfig;
use mydesk_core::AppError;

use crate::claims::Claims;

/// Creates an access token for `user_id`, valid for `access_token_expiry` seconds.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {e}")))
}

/// Verifies the token and returns its claims.
///
/// ```ignore
/// let claims = verify_token(&token, &jwt_config)?;
/// println!("User ID: {}", claims.sub);
/// ```
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mydesk_core::ErrorKind;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_create_and_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "a@b.test", &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "a@b.test");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = create_access_token(Uuid::new_v4(), "a@b.test", &config()).unwrap();
        let other = JwtConfig {
            secret: "other".to_string(),
            ..config()
        };
        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "a@b.test".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config().secret.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            verify_token(&token, &config()).unwrap_err().kind,
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let err = verify_token("not.a.token", &config()).unwrap_err();
        assert_eq!(err.message(), "Invalid or expired token");
    }
}
