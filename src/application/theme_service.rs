// Theme service - Resolves and toggles the page theme
use crate::application::preference_store::PreferenceStore;
use crate::domain::theme::Theme;
use std::sync::Arc;

pub const THEME_KEY: &str = "junat-theme";

#[derive(Clone)]
pub struct ThemeService {
    store: Arc<dyn PreferenceStore>,
}

impl ThemeService {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Stored preference if valid, otherwise the client's color scheme hint
    /// (`prefers_light`), otherwise dark. Storage errors fall back silently.
    pub async fn current(&self, prefers_light: bool) -> Theme {
        if let Some(theme) = self.stored().await {
            return theme;
        }
        if prefers_light { Theme::Light } else { Theme::Dark }
    }

    /// Flips the current theme and persists the result. A failed write is
    /// logged and the flipped theme is still returned.
    pub async fn toggle(&self, prefers_light: bool) -> Theme {
        let theme = self.current(prefers_light).await.toggled();

        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()).await {
            tracing::warn!("Unable to persist theme preference: {:#}", e);
        } else {
            tracing::debug!(theme = %theme, "Theme preference saved");
        }

        theme
    }

    async fn stored(&self) -> Option<Theme> {
        match self.store.get(THEME_KEY).await {
            Ok(Some(value)) => match value.parse::<Theme>() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    tracing::debug!("Ignoring stored theme: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Unable to read theme preference: {:#}", e);
                None
            }
        }
    }
}
