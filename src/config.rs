//! Page contract and tunables.
//!
//! Every id, selector, class name and timing constant the components rely on
//! lives here. Defaults match the shipped markup; a page may override any of
//! them with an inline `<script type="application/json" id="site-config">`
//! block. Numeric values outside their bounds fall back to the default.

use serde::Deserialize;

use crate::error::Result;

pub const CONFIG_ELEMENT_ID: &str = "site-config";

const DEFAULT_COPY_FEEDBACK_MS: u32 = 2_000;
const DEFAULT_NAV_SHADOW_OFFSET: f64 = 10.0;
const DEFAULT_SECTION_OFFSET: f64 = 100.0;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;

const COPY_FEEDBACK_MS_BOUNDS: (u32, u32) = (100, 60_000);
const NAV_SHADOW_OFFSET_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const SECTION_OFFSET_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub theme_key: String,
    pub theme_attribute: String,
    pub theme_toggle_id: String,
    pub dark_mode_query: String,

    pub nav_toggle_id: String,
    pub nav_menu_id: String,
    pub open_class: String,

    pub copy_selector: String,
    pub copy_attribute: String,
    pub copied_class: String,
    pub copy_feedback_ms: u32,

    pub anchor_selector: String,
    pub nav_selector: String,

    pub reveal_selector: String,
    pub visible_class: String,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,

    pub nav_id: String,
    pub nav_shadow_offset: f64,
    pub nav_shadow: String,

    pub section_selector: String,
    pub nav_link_selector: String,
    pub active_class: String,
    pub section_offset: f64,

    pub lazy_iframe_selector: String,
    pub lazy_root_margin: String,

    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            theme_key: "theme".to_string(),
            theme_attribute: "data-theme".to_string(),
            theme_toggle_id: "themeToggle".to_string(),
            dark_mode_query: "(prefers-color-scheme: dark)".to_string(),

            nav_toggle_id: "navToggle".to_string(),
            nav_menu_id: "navMenu".to_string(),
            open_class: "open".to_string(),

            copy_selector: ".copy-btn".to_string(),
            copy_attribute: "data-copy".to_string(),
            copied_class: "copied".to_string(),
            copy_feedback_ms: DEFAULT_COPY_FEEDBACK_MS,

            anchor_selector: "a[href^=\"#\"]".to_string(),
            nav_selector: ".nav".to_string(),

            reveal_selector: ".animate-on-scroll".to_string(),
            visible_class: "visible".to_string(),
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),

            nav_id: "nav".to_string(),
            nav_shadow_offset: DEFAULT_NAV_SHADOW_OFFSET,
            nav_shadow: "0 2px 20px rgba(0, 0, 0, 0.1)".to_string(),

            section_selector: "section[id]".to_string(),
            nav_link_selector: ".nav-menu a[href^=\"#\"]".to_string(),
            active_class: "active".to_string(),
            section_offset: DEFAULT_SECTION_OFFSET,

            lazy_iframe_selector: ".demo-content iframe".to_string(),
            lazy_root_margin: "200px".to_string(),

            log_level: DEFAULT_LOG_LEVEL.as_str().to_ascii_lowercase(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: Self = serde_json::from_str(raw)?;
        Ok(parsed.bounded())
    }

    pub fn level(&self) -> log::Level {
        match self.log_level.trim().to_ascii_lowercase().as_str() {
            "error" => log::Level::Error,
            "warn" => log::Level::Warn,
            "info" => log::Level::Info,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => DEFAULT_LOG_LEVEL,
        }
    }

    fn bounded(mut self) -> Self {
        self.copy_feedback_ms = within_u32(
            "copyFeedbackMs",
            self.copy_feedback_ms,
            DEFAULT_COPY_FEEDBACK_MS,
            COPY_FEEDBACK_MS_BOUNDS,
        );
        self.nav_shadow_offset = within_f64(
            "navShadowOffset",
            self.nav_shadow_offset,
            DEFAULT_NAV_SHADOW_OFFSET,
            NAV_SHADOW_OFFSET_BOUNDS,
        );
        self.section_offset = within_f64(
            "sectionOffset",
            self.section_offset,
            DEFAULT_SECTION_OFFSET,
            SECTION_OFFSET_BOUNDS,
        );
        self.reveal_threshold = within_f64(
            "revealThreshold",
            self.reveal_threshold,
            DEFAULT_REVEAL_THRESHOLD,
            REVEAL_THRESHOLD_BOUNDS,
        );
        self
    }
}

fn within_u32(name: &str, value: u32, default: u32, bounds: (u32, u32)) -> u32 {
    if (bounds.0..=bounds.1).contains(&value) {
        value
    } else {
        log::warn!("config {name}={value} outside {bounds:?}, using {default}");
        default
    }
}

fn within_f64(name: &str, value: f64, default: f64, bounds: (f64, f64)) -> f64 {
    if value.is_finite() && (bounds.0..=bounds.1).contains(&value) {
        value
    } else {
        log::warn!("config {name}={value} outside {bounds:?}, using {default}");
        default
    }
}
