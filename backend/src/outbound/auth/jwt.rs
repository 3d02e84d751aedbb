//! HS256 JSON Web Token adapter for the `TokenService` port.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, AuthenticatedUser, User, UserId};

/// Registered and private claims carried by issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl JwtTokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    fn sign(&self, claims: &Claims) -> Result<AccessToken, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<AccessToken, TokenError> {
        let iat = chrono::Utc::now().timestamp();
        self.sign(&Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role.as_str().to_owned(),
            iat,
            exp: iat.saturating_add(self.ttl_seconds),
        })
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        let claims = data.claims;
        let id: UserId = claims
            .sub
            .parse()
            .map_err(|_| TokenError::invalid("subject is not a user id"))?;
        let role = claims
            .role
            .parse()
            .map_err(|_| TokenError::invalid("unknown role claim"))?;
        Ok(AuthenticatedUser {
            id,
            email: claims.email,
            role,
        })
    }
}
