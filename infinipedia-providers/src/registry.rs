//! Provider selection from configuration.

use std::sync::Arc;

use infinipedia_core::ContentProvider;
use tracing::info;
use url::Url;

use crate::config::{ProviderConfig, ProviderSource};
use crate::error::ProviderBuildError;
use crate::gemini::GeminiClient;
use crate::proxy::ProxyClient;

/// Builds the provider selected by `config`, reading the API key from the
/// process environment when the settings do not carry one.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn ContentProvider>, ProviderBuildError> {
    build_provider_with(config, |name| std::env::var(name).ok())
}

/// Builds the provider selected by `config` with a custom environment lookup.
pub fn build_provider_with<F>(
    config: &ProviderConfig,
    env: F,
) -> Result<Arc<dyn ContentProvider>, ProviderBuildError>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = config.http_settings();

    match config.source {
        ProviderSource::Direct => {
            let api_key = config
                .resolve_api_key_with(env)
                .ok_or(ProviderBuildError::MissingApiKey)?;
            let mut client = GeminiClient::new(api_key, config.models.clone(), settings)?;
            if let Some(base) = config.api_base.as_deref() {
                client = client.with_api_base(base);
            }
            info!(source = "direct", model = %config.models.text, "Provider ready");
            Ok(Arc::new(client))
        }
        ProviderSource::Proxy => {
            let raw = config
                .proxy_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .ok_or(ProviderBuildError::MissingProxyUrl)?;
            let endpoint = Url::parse(raw).map_err(|e| ProviderBuildError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            })?;
            info!(source = "proxy", endpoint = %endpoint, "Provider ready");
            Ok(Arc::new(ProxyClient::new(endpoint, settings)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_without_key_fails() {
        let result = build_provider_with(&ProviderConfig::default(), |_| None);
        assert!(matches!(result, Err(ProviderBuildError::MissingApiKey)));
    }

    #[test]
    fn test_direct_with_env_key() {
        let provider = build_provider_with(&ProviderConfig::default(), |name| {
            (name == "GEMINI_API_KEY").then(|| "k".to_string())
        })
        .unwrap();
        assert_eq!(provider.id(), "gemini");
    }

    #[test]
    fn test_proxy_selection() {
        let config = ProviderConfig {
            source: ProviderSource::Proxy,
            proxy_url: Some("http://127.0.0.1:8787/api/generate".into()),
            ..Default::default()
        };
        let provider = build_provider_with(&config, |_| None).unwrap();
        assert_eq!(provider.id(), "proxy");
    }

    #[test]
    fn test_proxy_url_errors() {
        let missing = ProviderConfig {
            source: ProviderSource::Proxy,
            ..Default::default()
        };
        assert!(matches!(
            build_provider_with(&missing, |_| None),
            Err(ProviderBuildError::MissingProxyUrl)
        ));

        let invalid = ProviderConfig {
            source: ProviderSource::Proxy,
            proxy_url: Some("not a url".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_provider_with(&invalid, |_| None),
            Err(ProviderBuildError::InvalidUrl { .. })
        ));
    }
}
