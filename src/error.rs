use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("required element not found: {selector}")]
    MissingElement { selector: String },
    #[error("{context} failed: {message}")]
    Js { context: &'static str, message: String },
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
}

impl SiteError {
    pub fn missing(selector: &str) -> Self {
        Self::MissingElement {
            selector: selector.to_string(),
        }
    }

    pub fn js(context: &'static str, message: impl Into<String>) -> Self {
        Self::Js {
            context,
            message: message.into(),
        }
    }
}
