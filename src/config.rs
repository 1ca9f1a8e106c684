use std::{env, str::FromStr, time::Duration};

use rust_decimal::Decimal;

use crate::domain::catalog::{MenuItemKind, MenuItemRef};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub session_poll_interval: Duration,
    pub custom_cake_menu_item_id: i64,
    pub custom_cake_base_price: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://kiosk.db?mode=rwc".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let backend_timeout = env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15));
        let session_poll_interval = env::var("SESSION_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(2000));
        let custom_cake_menu_item_id = env::var("CUSTOM_CAKE_MENU_ITEM_ID")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(1);
        let custom_cake_base_price = match env::var("CUSTOM_CAKE_BASE_PRICE") {
            Ok(raw) => Decimal::from_str(&raw)?,
            Err(_) => Decimal::ZERO,
        };

        Ok(Self {
            database_url,
            host,
            port,
            backend_url,
            backend_timeout,
            session_poll_interval,
            custom_cake_menu_item_id,
            custom_cake_base_price,
        })
    }

    /// Catalog entry a finished design is sold under.
    pub fn custom_cake_item(&self) -> MenuItemRef {
        MenuItemRef {
            id: self.custom_cake_menu_item_id,
            name: "Custom Cake".to_string(),
            base_price: self.custom_cake_base_price,
            kind: MenuItemKind::CustomCake,
        }
    }
}
