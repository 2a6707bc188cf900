use std::env;
use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub host: String,
    pub port: u16,
    pub storage_dir: PathBuf,
    pub currency: String,
    pub delivery_fee: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:4001".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let storage_dir = env::var("CART_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".storefront"));
        let currency = env::var("CURRENCY").unwrap_or_else(|_| "$".to_string());
        let delivery_fee = env::var("DELIVERY_FEE")
            .ok()
            .and_then(|fee| fee.parse::<Decimal>().ok())
            .filter(|fee| !fee.is_sign_negative())
            .unwrap_or_else(|| Decimal::from(10));

        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            anyhow::bail!("BACKEND_URL must be an http(s) url, got {backend_url:?}");
        }

        Ok(Self {
            backend_url,
            host,
            port,
            storage_dir,
            currency,
            delivery_fee,
        })
    }
}
