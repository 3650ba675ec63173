//! Runtime settings of the dashboard.
//!
//! Values come from compile-time environment variables (set when building the
//! wasm bundle) and fall back to defaults derived from the browser location.

use once_cell::sync::Lazy;

const DEFAULT_API_PORT: u16 = 3000;
const DEFAULT_MAX_BOOKINGS_PER_DAY: usize = 1;
const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Origin of the studio API, without a trailing slash
    pub api_base: String,
    /// Approved bookings a single date can hold
    pub max_bookings_per_day: usize,
    pub default_page_size: usize,
}

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::resolve);

impl AppConfig {
    fn resolve() -> Self {
        let api_base = option_env!("STUDIO_API_BASE")
            .map(|v| v.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(location_api_base);

        let max_bookings_per_day = option_env!("STUDIO_MAX_BOOKINGS_PER_DAY")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_BOOKINGS_PER_DAY);

        let config = Self {
            api_base,
            max_bookings_per_day,
            default_page_size: DEFAULT_PAGE_SIZE,
        };
        log::info!(
            "config: api_base={} max_bookings_per_day={}",
            config.api_base,
            config.max_bookings_per_day
        );
        config
    }
}

/// `{protocol}//{hostname}:3000` of the page that loaded the app
fn location_api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, DEFAULT_API_PORT)
}

pub fn config() -> &'static AppConfig {
    &CONFIG
}
