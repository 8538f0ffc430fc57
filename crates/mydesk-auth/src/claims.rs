//! JWT claim structure for access tokens.

use mydesk_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: User ID (subject)
/// - `email`: User's email address
/// - `exp`: Token expiration timestamp
/// - `iat`: Token issued-at timestamp
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Parses the subject claim. A token whose `sub` is not a UUID is treated
    /// like any other bad credential.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::unauthorized("Invalid token subject"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "test@example.com".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(serialized.contains(r#""email":"test@example.com""#));
    }

    #[test]
    fn test_user_id_parses_uuid_subject() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id.to_string(),
            email: "teacher@school.test".to_string(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.user_id().unwrap(), id);
    }

    #[test]
    fn test_user_id_rejects_non_uuid_subject() {
        let claims = Claims {
            sub: "42".to_string(),
            email: "x@y.test".to_string(),
            exp: 0,
            iat: 0,
        };
        let err = claims.user_id().unwrap_err();
        assert_eq!(err.kind, mydesk_core::ErrorKind::Unauthorized);
    }
}
