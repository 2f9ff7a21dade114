use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt;

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    // 从 cookie 中提取 refresh token
    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match jwt::JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired());
        }
    };

    // 用户被删除或停用后 refresh token 失效
    let storage = service.get_storage(request)?;
    let user = match claims.user_id() {
        Some(id) => match storage.get_user_by_id(id).await {
            Ok(Some(user)) if user.status == UserStatus::Active => user,
            Ok(_) => return Ok(expired()),
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        },
        None => return Ok(expired()),
    };

    match jwt::JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            )
        }
    }
}

// 清除无效的 refresh token cookie
fn expired() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::Cookie;
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::Value;

    use crate::models::users::entities::UserRole;
    use crate::services::test_support;
    use crate::utils::jwt::{JwtUtils, REFRESH_TOKEN_COOKIE};

    #[actix_web::test]
    async fn test_refresh_and_me() {
        let storage = test_support::storage().await;
        let user = test_support::user(&storage, "teacher1", UserRole::Teacher).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(crate::routes::configure_auth_routes),
        )
        .await;

        let pair = JwtUtils::generate_token_pair(user.id, "teacher", None).unwrap();
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .cookie(Cookie::new(REFRESH_TOKEN_COOKIE, pair.refresh_token.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // access token 不能当作 refresh token 使用
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .cookie(Cookie::new(REFRESH_TOKEN_COOKIE, pair.access_token.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(test_support::bearer(&user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user"]["username"], "teacher1");

        let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
