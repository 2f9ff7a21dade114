use crate::config::{AppConfig, JwtConfig};
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,           // 用户 ID
    pub role: String,          // 用户角色
    pub token_type: TokenKind, // access / refresh
    pub exp: usize,            // 过期时间戳
    pub iat: usize,            // 签发时间戳
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

// Token 响应结构体
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn config() -> &'static JwtConfig {
        &AppConfig::get().jwt
    }

    // 签发指定类型和有效期的 token
    pub fn issue(
        secret: &str,
        user_id: i64,
        role: &str,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    // 校验签名、有效期与 token 类型
    pub fn verify(
        secret: &str,
        token: &str,
        expected: TokenKind,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != expected {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = Self::config();
        Self::issue(
            &config.secret,
            user_id,
            role,
            TokenKind::Access,
            chrono::Duration::minutes(config.access_token_expiry),
        )
    }

    // 生成完整的 Token 对；refresh 有效期缺省取配置
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let config = Self::config();
        let refresh_ttl = refresh_token_expiry
            .unwrap_or_else(|| chrono::Duration::days(config.refresh_token_expiry));

        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::issue(
                &config.secret,
                user_id,
                role,
                TokenKind::Refresh,
                refresh_ttl,
            )?,
        })
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(&Self::config().secret, token, TokenKind::Access)
    }

    // 验证 Refresh Token
    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(&Self::config().secret, token, TokenKind::Refresh)
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age_days: i64,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::days(max_age_days))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production()) // 生产环境下使用 HTTPS
            .finish()
    }

    /// 清除 Refresh Token 的 Cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/")
            .same_site(SameSite::Strict)
            .http_only(true)
            .finish();
        cookie.make_removal();
        cookie
    }

    /// 从请求中提取 Refresh Token
    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_issue_and_verify() {
        let token = JwtUtils::issue(
            SECRET,
            42,
            "teacher",
            TokenKind::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        let claims = JwtUtils::verify(SECRET, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_wrong_kind_or_secret_rejected() {
        let token = JwtUtils::issue(
            SECRET,
            1,
            "student",
            TokenKind::Refresh,
            chrono::Duration::days(1),
        )
        .unwrap();
        assert!(JwtUtils::verify(SECRET, &token, TokenKind::Access).is_err());
        assert!(JwtUtils::verify("other", &token, TokenKind::Refresh).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::issue(
            SECRET,
            1,
            "student",
            TokenKind::Access,
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify(SECRET, &token, TokenKind::Access).is_err());
    }
}
