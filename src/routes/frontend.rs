//! 前端静态资源路由
//!
//! 构建产物通过 rust-embed 嵌入二进制，浏览器路由（学生 / 教师视图）
//! 由前端自行解析，未匹配到文件的路径一律回退到 index.html。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::borrow::Cow;
use std::path::Path;

use crate::config::AppConfig;

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const INDEX: &str = "index.html";

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

fn get_mime_type(path: &str) -> &'static str {
    match extension(path) {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "webmanifest" => "application/manifest+json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" => "text/plain; charset=utf-8",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// 带 hash 的构建产物可以长期缓存，index.html 不缓存
fn is_immutable_asset(path: &str) -> bool {
    path.starts_with("assets/")
        && matches!(
            extension(path),
            "js" | "mjs" | "css" | "woff" | "woff2" | "ttf" | "png" | "jpg" | "jpeg" | "svg" | "webp"
        )
}

/// index.html 中的 `%APP_NAME%` 替换为系统名称
fn render_index(content: &[u8], system_name: &str) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%APP_NAME%", system_name)
        .into_bytes()
}

fn resolve(path: &str) -> Option<(Cow<'static, [u8]>, &str)> {
    if !path.is_empty()
        && let Some(file) = FrontendAssets::get(path)
    {
        return Some((file.data, path));
    }
    // api 前缀下的未知路径不回退
    if path.starts_with("api/") {
        return None;
    }
    FrontendAssets::get(INDEX).map(|file| (file.data, INDEX))
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    let Some((data, file_path)) = resolve(path) else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("Not Found"));
    };

    let mime = get_mime_type(file_path);
    let mut response = HttpResponse::Ok();
    response.content_type(mime);
    if is_immutable_asset(file_path) {
        response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
    } else {
        response.insert_header(("Cache-Control", "no-cache"));
    }

    if file_path == INDEX {
        let system_name = &AppConfig::get().app.system_name;
        return Ok(response.body(render_index(&data, system_name)));
    }
    Ok(response.body(data.into_owned()))
}

/// 必须最后注册，所有非 API 路由都交给前端处理
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("assets/app.mjs"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("manifest.webmanifest"), "application/manifest+json");
        assert_eq!(get_mime_type("Makefile"), "application/octet-stream");
    }

    #[test]
    fn test_immutable_assets() {
        assert!(is_immutable_asset("assets/index-3f2a.js"));
        assert!(is_immutable_asset("assets/logo.svg"));
        assert!(!is_immutable_asset("favicon.svg"));
        assert!(!is_immutable_asset("index.html"));
    }

    #[test]
    fn test_render_index() {
        let html = b"<title>%APP_NAME%</title>";
        assert_eq!(render_index(html, "SchoolHub"), b"<title>SchoolHub</title>".to_vec());
    }

    #[test]
    fn test_api_paths_do_not_fall_back() {
        assert!(resolve("api/v1/unknown").is_none());
    }
}
