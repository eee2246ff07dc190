//! Runtime configuration read from the environment (and an optional `.env`).

use log::warn;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "signing.sqlite";
const DEFAULT_EXPORT_DIR: &str = "./pdfs";
const DEFAULT_FONTS_DIR: &str = "./fonts";
const DEFAULT_SURFACE_WIDTH: u32 = 600;
const DEFAULT_SURFACE_HEIGHT: u32 = 160;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite file backing the key/value store.
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
    pub fonts_dir: PathBuf,
    /// Base URL used in document links handed out to recipients.
    pub public_url: String,
    /// Signature box size in display pixels.
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SIGNING_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "SIGNING_PORT", DEFAULT_PORT);
        let public_url = lookup("SIGNING_PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{}:{}", host, port));

        Self {
            db_path: lookup("SIGNING_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
                .into(),
            export_dir: lookup("SIGNING_EXPORT_DIR")
                .unwrap_or_else(|| DEFAULT_EXPORT_DIR.to_string())
                .into(),
            fonts_dir: lookup("SIGNING_FONTS_DIR")
                .unwrap_or_else(|| DEFAULT_FONTS_DIR.to_string())
                .into(),
            surface_width: parse_or(&lookup, "SIGNING_SURFACE_WIDTH", DEFAULT_SURFACE_WIDTH),
            surface_height: parse_or(&lookup, "SIGNING_SURFACE_HEIGHT", DEFAULT_SURFACE_HEIGHT),
            host,
            port,
            public_url,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using default", raw, key);
            default
        }),
        None => default,
    }
}
