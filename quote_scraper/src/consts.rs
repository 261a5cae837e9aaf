//! Default settings for the scraper.

/// Equities quote page on the exchange website; the code goes in `?sym=`.
pub const HKEX_QUOTE_URL: &str =
    "https://www.hkex.com.hk/Market-Data/Securities-Prices/Equities/Equities-Quote";
/// Prefix of the per-worker user agent.
pub const USER_AGENT_PREFIX: &str = "Mozilla/5.0 StockScraper";
/// Default number of workers.
pub const DEFAULT_WORKERS: &str = "8";
/// Default number of codes taken from the universe.
pub const DEFAULT_COUNT: &str = "50";
/// Default per-fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 25;
/// Default TCP connect timeout for sessions, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default retries for a failed append.
pub const DEFAULT_WRITE_RETRIES: u32 = 1;
/// Default diagnostic log file.
pub const DEFAULT_LOG_FILE: &str = "stock_scraper_debug.log";
