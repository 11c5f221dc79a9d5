//! Operator identity carried by bearer tokens

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Operator role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including exception list, window and reports
    Admin,
    /// Scan ingestion (cameras, gate staff)
    Operator,
}

/// JWT claims for authenticated operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorClaims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
}

impl OperatorClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Authorization("Admin rights required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> OperatorClaims {
        OperatorClaims {
            sub: "gate-1".to_string(),
            role,
            exp: chrono::Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = claims(Role::Operator).create_token("secret").unwrap();
        let parsed = OperatorClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.sub, "gate-1");
        assert_eq!(parsed.role, Role::Operator);
        assert!(OperatorClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_require_admin() {
        assert!(claims(Role::Admin).require_admin().is_ok());
        assert!(matches!(
            claims(Role::Operator).require_admin(),
            Err(AppError::Authorization(_))
        ));
    }
}
