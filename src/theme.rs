use crate::config::SiteConfig;
use crate::dom::{Node, Storage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

/// Keeps the root theme attribute and the stored preference in step.
pub struct ThemeManager<E, S> {
    root: E,
    storage: S,
    key: String,
    attribute: String,
}

impl<E: Node, S: Storage> ThemeManager<E, S> {
    pub fn new(root: E, storage: S, config: &SiteConfig) -> Self {
        Self {
            root,
            storage,
            key: config.theme_key.clone(),
            attribute: config.theme_attribute.clone(),
        }
    }

    /// Applies the stored preference, else dark when the system asks for it.
    /// Otherwise the attribute stays unset and the stylesheet default wins.
    pub fn init(&self, system_prefers_dark: bool) -> Option<Theme> {
        let initial = self
            .stored()
            .or_else(|| system_prefers_dark.then_some(Theme::Dark));

        if let Some(theme) = initial {
            self.set_theme(theme);
        }
        initial
    }

    /// Stored strings other than `light`/`dark` read as no preference.
    pub fn stored(&self) -> Option<Theme> {
        Theme::parse(&self.storage.get(&self.key)?)
    }

    pub fn current(&self) -> Option<Theme> {
        Theme::parse(&self.root.attribute(&self.attribute)?)
    }

    pub fn set_theme(&self, theme: Theme) {
        self.root.set_attribute(&self.attribute, theme.as_str());
        self.storage.set(&self.key, theme.as_str());
        log::debug!("theme set to {}", theme.as_str());
    }

    pub fn toggle_theme(&self) -> Theme {
        let next = match self.current() {
            Some(Theme::Dark) => Theme::Light,
            _ => Theme::Dark,
        };
        self.set_theme(next);
        next
    }

    /// Follows a system color-scheme change unless the user already chose.
    pub fn on_system_change(&self, prefers_dark: bool) -> bool {
        if self.stored().is_some() {
            return false;
        }
        self.set_theme(Theme::from_system(prefers_dark));
        true
    }
}
