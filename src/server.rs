use std::path::{Path, PathBuf};

use axum::{routing::get, Router};
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::{parse_log_level, parse_non_empty_string, parse_u64_with_bounds};
use crate::log::{log_event, LogLevel, DEFAULT_LOG_LEVEL};

const DEFAULT_PORT: u64 = 8080;
const PORT_BOUNDS: (u64, u64) = (1, 65_535);
const DEFAULT_DIST_DIR: &str = "dist";

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub dist_dir: PathBuf,
    pub log_level: LogLevel,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_u64_with_bounds(lookup("PORT").as_deref(), DEFAULT_PORT, PORT_BOUNDS);
        let dist_dir = parse_non_empty_string(lookup("SITE_DIST_DIR").as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let log_level = parse_log_level(lookup("LOG_LEVEL").as_deref(), DEFAULT_LOG_LEVEL);

        Self {
            port: u16::try_from(port).unwrap_or(DEFAULT_PORT as u16),
            dist_dir,
            log_level,
        }
    }
}

/// Static bundle with an `index.html` fallback for unknown paths.
pub fn router(dist_dir: &Path) -> Router {
    let static_service =
        ServeDir::new(dist_dir).not_found_service(ServeFile::new(dist_dir.join("index.html")));

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .fallback_service(static_service)
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();
    let bind_address = format!("0.0.0.0:{}", config.port);
    let app = router(&config.dist_dir);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        config.log_level,
        LogLevel::Info,
        "server_started",
        json!({
            "url": format!("http://127.0.0.1:{}", config.port),
            "dist_dir": config.dist_dir.display().to_string(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dist(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("brightline-site-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dist");
        fs::write(dir.join("index.html"), "<div id=\"app\"></div>").expect("write index");
        fs::write(dir.join("site.css"), "body{}").expect("write css");
        dir
    }

    async fn serve(dist: &Path) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = listener.local_addr().expect("local addr");
        let app = router(dist);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{address}")
    }

    #[test]
    fn config_defaults_when_env_is_empty() {
        let config = ServerConfig::from_lookup(|_| None);

        assert_eq!(config.port, 8080);
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn config_rejects_out_of_range_port() {
        let config = ServerConfig::from_lookup(|name| match name {
            "PORT" => Some("70000".to_string()),
            "SITE_DIST_DIR" => Some(" public ".to_string()),
            "LOG_LEVEL" => Some("DEBUG".to_string()),
            _ => None,
        });

        assert_eq!(config.port, 8080);
        assert_eq!(config.dist_dir, PathBuf::from("public"));
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[tokio::test]
    async fn serves_assets_and_falls_back_to_index() {
        let dist = temp_dist("fallback");
        let base = serve(&dist).await;

        let css = reqwest::get(format!("{base}/site.css"))
            .await
            .expect("css request");
        assert!(css.status().is_success());
        assert_eq!(css.text().await.expect("css body"), "body{}");

        let page = reqwest::get(format!("{base}/services/web-design"))
            .await
            .expect("fallback request");
        assert_eq!(page.text().await.expect("fallback body"), "<div id=\"app\"></div>");

        let health = reqwest::get(format!("{base}/healthz"))
            .await
            .expect("health request");
        assert_eq!(health.text().await.expect("health body"), "ok");
    }
}
