//! JWT issuance/validation and request authorization.
//!
//! Two token lineages: short-lived access tokens carried as a bearer
//! header, and long-lived refresh tokens carried in an HttpOnly cookie.
//! Refresh tokens embed the user's `refreshTokenVersion`; bumping the
//! stored version invalidates every refresh token signed before it.
use async_graphql::{Context, Error, Guard, Result};
use axum::http::{HeaderMap, header::AUTHORIZATION};
use bcrypt::{DEFAULT_COST, hash, verify};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, get_current_timestamp,
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const ACCESS_TOKEN_TTL_SECS: u64 = 15 * 60;
pub const REFRESH_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

pub const REFRESH_COOKIE: &str = "jwt";
const REFRESH_COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Message matched by the frontend for any guard rejection.
pub const FORBIDDEN_MESSAGE: &str = "Forbidden resource";

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub is_admin: bool,
    pub exp: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub is_admin: bool,
    pub token_version: i32,
    pub exp: u64,
}

/// Request-scoped identity, inserted into the GraphQL request data by
/// the HTTP handler when a valid bearer token is present.
#[derive(Debug, Clone, Copy)]
pub struct TokenPayload {
    pub user_id: ObjectId,
    pub is_admin: bool,
}

pub struct AuthKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl AuthKeys {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        }
    }

    pub fn sign_access_token(&self, user_id: ObjectId, is_admin: bool) -> Result<String, AppError> {
        let claims = AccessClaims {
            sub: user_id.to_hex(),
            is_admin,
            exp: get_current_timestamp() + ACCESS_TOKEN_TTL_SECS,
        };

        Ok(encode(&Header::default(), &claims, &self.access_encoding)?)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())?;

        Ok(data.claims)
    }

    pub fn sign_refresh_token(
        &self,
        user_id: ObjectId,
        is_admin: bool,
        token_version: i32,
    ) -> Result<String, AppError> {
        let claims = RefreshClaims {
            sub: user_id.to_hex(),
            is_admin,
            token_version,
            exp: get_current_timestamp() + REFRESH_TOKEN_TTL_SECS,
        };

        Ok(encode(&Header::default(), &claims, &self.refresh_encoding)?)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, AppError> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())?;

        Ok(data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed)?)
}

/// Parses and validates the `Authorization: Bearer` header.
///
/// Invalid or absent tokens yield `None` so unauthenticated operations
/// keep working; guarded resolvers reject on the missing payload.
pub fn bearer_payload(keys: &AuthKeys, headers: &HeaderMap) -> Option<TokenPayload> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    let claims = keys.verify_access_token(token).ok()?;
    let user_id = ObjectId::parse_str(&claims.sub).ok()?;

    Some(TokenPayload {
        user_id,
        is_admin: claims.is_admin,
    })
}

pub fn refresh_cookie(token: &str) -> String {
    format!(
        "{REFRESH_COOKIE}={token}; HttpOnly; Secure; SameSite=None; Max-Age={REFRESH_COOKIE_MAX_AGE_SECS}; Path=/"
    )
}

pub fn clear_refresh_cookie() -> String {
    format!("{REFRESH_COOKIE}=; HttpOnly; Secure; SameSite=None; Max-Age=0; Path=/")
}

/// Requires a logged-in caller.
pub struct AuthGuard;

impl Guard for AuthGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        match ctx.data_opt::<TokenPayload>() {
            Some(_) => Ok(()),
            None => Err(Error::new(FORBIDDEN_MESSAGE)),
        }
    }
}

/// Requires the caller's access token to carry the admin flag.
pub struct AdminGuard;

impl Guard for AdminGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        match ctx.data_opt::<TokenPayload>() {
            Some(payload) if payload.is_admin => Ok(()),
            _ => Err(Error::new(FORBIDDEN_MESSAGE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> AuthKeys {
        AuthKeys::new("access-secret", "refresh-secret")
    }

    #[test]
    fn test_access_token_round_trip() {
        let keys = keys();
        let user_id = ObjectId::new();

        let token = keys.sign_access_token(user_id, true).unwrap();
        let claims = keys.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_hex());
        assert!(claims.is_admin);
        assert!(claims.exp > get_current_timestamp());
    }

    #[test]
    fn test_refresh_token_carries_version() {
        let keys = keys();
        let user_id = ObjectId::new();

        let token = keys.sign_refresh_token(user_id, false, 7).unwrap();
        let claims = keys.verify_refresh_token(&token).unwrap();

        assert_eq!(claims.token_version, 7);
        assert!(!claims.is_admin);
    }

    #[test]
    fn test_tokens_not_interchangeable() {
        let keys = keys();
        let user_id = ObjectId::new();

        let refresh = keys.sign_refresh_token(user_id, false, 0).unwrap();

        // signed with the refresh secret, must not validate as access
        assert!(keys.verify_access_token(&refresh).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let keys = keys();
        let other = AuthKeys::new("other-secret", "other-refresh");
        let user_id = ObjectId::new();

        let token = other.sign_access_token(user_id, true).unwrap();

        assert!(keys.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hashed = hash_password("P4ssw0rd!").unwrap();

        assert_ne!(hashed, "P4ssw0rd!");
        assert!(verify_password("P4ssw0rd!", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn test_bearer_payload_parsing() {
        let keys = keys();
        let user_id = ObjectId::new();
        let token = keys.sign_access_token(user_id, false).unwrap();

        let mut headers = HeaderMap::new();
        assert!(bearer_payload(&keys, &headers).is_none());

        headers.insert(AUTHORIZATION, token.parse().unwrap());
        assert!(bearer_payload(&keys, &headers).is_none());

        headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        let payload = bearer_payload(&keys, &headers).unwrap();
        assert_eq!(payload.user_id, user_id);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = refresh_cookie("abc");

        assert!(cookie.starts_with("jwt=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Max-Age=86400"));

        assert!(clear_refresh_cookie().contains("Max-Age=0"));
    }
}
