//! JWT token service

use std::sync::LazyLock;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moka::sync::Cache;

use crate::model::MasarJwtPayload;

/// Cached token data containing the full payload
#[derive(Clone)]
struct CachedTokenData {
    claims: MasarJwtPayload,
}

/// JWT Token cache to avoid repeated validation of the same token
static TOKEN_CACHE: LazyLock<Cache<String, CachedTokenData>> = LazyLock::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(300)) // 5 minutes TTL
        .build()
});

/// Decode and validate JWT token with caching
pub fn decode_jwt_token_cached(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<MasarJwtPayload>> {
    if let Some(cached) = TOKEN_CACHE.get(token) {
        let now = chrono::Utc::now().timestamp();
        if cached.claims.exp > now {
            return Ok(jsonwebtoken::TokenData {
                header: jsonwebtoken::Header::default(),
                claims: cached.claims,
            });
        }
        // Token expired in cache, invalidate it
        TOKEN_CACHE.invalidate(token);
    }

    let result = decode_jwt_token(token, secret_key)?;

    TOKEN_CACHE.insert(
        token.to_string(),
        CachedTokenData {
            claims: result.claims.clone(),
        },
    );

    Ok(result)
}

/// Decode and validate JWT token without caching
pub fn decode_jwt_token(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<MasarJwtPayload>> {
    let decoding_key = DecodingKey::from_base64_secret(secret_key)?;
    decode::<MasarJwtPayload>(token, &decoding_key, &Validation::default())
}

/// Invalidate a token from the cache
pub fn invalidate_token(token: &str) {
    TOKEN_CACHE.invalidate(token);
}

/// Clear the entire token cache
pub fn clear_token_cache() {
    TOKEN_CACHE.invalidate_all();
}

/// Encode a JWT token carrying the subject and role
pub fn encode_jwt_token(
    sub: &str,
    role: &str,
    secret_key: &str,
    expire_seconds: i64,
) -> jsonwebtoken::errors::Result<String> {
    let exp = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(expire_seconds))
        .unwrap_or_else(chrono::Utc::now)
        .timestamp();

    let payload = MasarJwtPayload {
        sub: sub.to_string(),
        role: role.to_string(),
        exp,
    };

    let header = Header {
        typ: None,
        alg: Algorithm::HS256,
        ..Header::default()
    };

    let encoding_key = EncodingKey::from_base64_secret(secret_key)?;
    encode(&header, &payload, &encoding_key)
}

#[cfg(test)]
mod tests {
    use base64::Engine;

    use super::*;

    fn test_secret() -> String {
        base64::engine::general_purpose::STANDARD.encode(b"masar-test-secret-key-0123456789")
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let secret = test_secret();
        let token = encode_jwt_token("amal", "ROLE_STUDENT", &secret, 3600).unwrap();
        let data = decode_jwt_token(&token, &secret).unwrap();
        assert_eq!(data.claims.sub, "amal");
        assert_eq!(data.claims.role, "ROLE_STUDENT");
        assert!(data.claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let token = encode_jwt_token("amal", "ROLE_STUDENT", &test_secret(), 3600).unwrap();
        let other = base64::engine::general_purpose::STANDARD.encode(b"another-secret-key-entirely!!");
        assert!(decode_jwt_token(&token, &other).is_err());
    }

    #[test]
    fn test_cached_decode_hits() {
        let secret = test_secret();
        let token = encode_jwt_token("cache-user", "ROLE_ADMIN", &secret, 3600).unwrap();
        let first = decode_jwt_token_cached(&token, &secret).unwrap();
        let second = decode_jwt_token_cached(&token, &secret).unwrap();
        assert_eq!(first.claims.sub, second.claims.sub);
        invalidate_token(&token);
    }
}
