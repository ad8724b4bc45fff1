use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::types::error::AppError;
use crate::types::token::Claims;
use crate::types::user::User;

/// Validity window for issued tokens.
pub const TOKEN_TTL_DAYS: i64 = 60;

/// Signs and verifies session tokens with a single HS256 secret. Built
/// once from config at startup; there is no key versioning, so rotating
/// the secret invalidates everything already issued.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a token over `{id, username, exp}` expiring 60 days out,
    /// in whole seconds since the epoch.
    pub fn sign(&self, user: &User) -> Result<String, AppError> {
        let exp = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp();
        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Rejects bad signatures and expired tokens as distinct errors.
    /// No clock leeway: a token whose `exp` has passed is expired,
    /// even by a second.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(AppError::TokenExpired),
            Err(_) => Err(AppError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_user() -> User {
        User::new(Uuid::new_v4(), "jake".into(), "jake@jake.jake".into(), Utc::now())
    }

    #[test]
    fn sign_then_verify_round_trips_identity() {
        let signer = TokenSigner::new("secret");
        let user = sample_user();

        let issued_at = Utc::now().timestamp();
        let token = signer.sign(&user).unwrap();
        let claims = signer.verify(&token).unwrap();

        assert_eq!(claims.id, user.id);
        assert_eq!(claims.username, user.username);
        // exp lands 60 days out, give or take a second of test runtime
        let expected = issued_at + TOKEN_TTL_DAYS * 24 * 60 * 60;
        assert!((claims.exp - expected).abs() <= 1);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let signer = TokenSigner::new("secret");
        let user = sample_user();
        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            // expired only just; decoding must not grant leeway
            exp: Utc::now().timestamp() - 30,
        };
        let stale = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(signer.verify(&stale), Err(AppError::TokenExpired)));
    }

    #[test]
    fn verify_rejects_foreign_signature() {
        let signer = TokenSigner::new("secret");
        let other = TokenSigner::new("rotated");
        let token = signer.sign(&sample_user()).unwrap();

        assert!(matches!(other.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_garbage() {
        let signer = TokenSigner::new("secret");
        assert!(matches!(
            signer.verify("not.a.token"),
            Err(AppError::InvalidToken)
        ));
    }
}
