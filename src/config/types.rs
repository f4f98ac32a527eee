use serde::Deserialize;

/// Main configuration structure for Category-Census
///
/// Every section is optional; a missing section falls back to the defaults
/// below, which crawl the Russian Wikipedia animals-by-alphabet category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the category lives and how its pages are laid out
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root index page listing one entry link per alphabetic bucket
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Base for resolving relative hrefs found on any page
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Selects the bucket entry anchors on the root index page
    #[serde(rename = "index-selector")]
    pub index_selector: String,

    /// Selects the item anchors on a listing page
    #[serde(rename = "item-selector")]
    pub item_selector: String,

    /// Exact text of the "next page" anchor on a listing page
    #[serde(rename = "next-page-label")]
    pub next_page_label: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root_url: "https://ru.wikipedia.org/wiki/Категория:Животные_по_алфавиту"
                .to_string(),
            base_url: "https://ru.wikipedia.org".to_string(),
            index_selector: "div.ts-module-Индекс_категории-container > ul > li > a".to_string(),
            item_selector:
                "div.mw-category.mw-category-columns > div.mw-category-group > ul > li > a"
                    .to_string(),
            next_page_label: "Следующая страница".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Per-request deadline in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-pages-open")]
    pub max_concurrent_pages_open: u32,

    /// Inclusive code point range; names starting inside it are not counted
    #[serde(rename = "excluded-lead-range")]
    pub excluded_lead_range: [u32; 2],
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_concurrent_pages_open: 32,
            // 'A'..='z', Latin-script titles
            excluded_lead_range: [65, 122],
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "category-census".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/category-census/category-census".to_string(),
            contact_email: "census@example.org".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the letter tally CSV file
    #[serde(rename = "tally-path")]
    pub tally_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tally_path: "beasts.csv".to_string(),
        }
    }
}
