use async_trait::async_trait;

use crate::domain::environment::{EnvironmentProvider, PreferenceCallback, Subscription};
use crate::domain::error::DomainError;
use crate::domain::theme::ResolvedTheme;

/// Environment with no UI host attached: no language tag, no dark-mode
/// signal, nothing to theme.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessEnvironment;

#[async_trait]
impl EnvironmentProvider for HeadlessEnvironment {
    fn current_language_tag(&self) -> Option<String> {
        None
    }

    fn prefers_dark_mode(&self) -> bool {
        false
    }

    fn on_preference_change(&self, _callback: PreferenceCallback) -> Subscription {
        Subscription::noop()
    }

    fn apply_dom_theme(&self, theme: ResolvedTheme) {
        tracing::debug!("No document to mark with theme {}", theme);
    }

    async fn request_window_theme(&self, _theme: Option<ResolvedTheme>) -> Result<(), DomainError> {
        Err(DomainError::NoNativeHost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_no_signal() {
        let env = HeadlessEnvironment;
        assert_eq!(env.current_language_tag(), None);
        assert!(!env.prefers_dark_mode());
        assert!(matches!(
            env.request_window_theme(None).await,
            Err(DomainError::NoNativeHost)
        ));
    }
}
