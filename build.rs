use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    // rust-embed 要求目录在编译期存在
    if !dist_path.join("index.html").exists() {
        println!("cargo:warning=frontend/dist not found, embedding a placeholder page");
        write_placeholder(&dist_path);
    }
}

fn write_placeholder(dist_path: &Path) {
    fs::create_dir_all(dist_path.join("assets")).expect("Failed to create frontend/dist");

    let html = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>%APP_NAME%</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 560px; margin: 96px auto; text-align: center; }
        code { background: #f1f3f4; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>%APP_NAME%</h1>
    <p>前端尚未构建，API 位于 <code>/api/v1</code>。</p>
    <p><code>cd frontend && bun install && bun run build</code></p>
</body>
</html>"#;

    fs::write(dist_path.join("index.html"), html).expect("Failed to write placeholder index.html");
}
