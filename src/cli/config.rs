use crate::ui::HttpTasksApi;

/// Used when `TASKS_API_URL` is unset so the client can still start
pub const PLACEHOLDER_API_URL: &str = "https://placeholder.tasks.local";

/// Where the CLI sends requests and with which bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
    pub token: Option<String>,
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self::from_values(std::env::var("TASKS_API_URL").ok(), std::env::var("TASKS_TOKEN").ok())
    }

    fn from_values(api_url: Option<String>, token: Option<String>) -> Self {
        let present = |value: Option<String>| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = present(api_url).unwrap_or_else(|| {
            tracing::warn!("TASKS_API_URL is not set, using {}", PLACEHOLDER_API_URL);
            PLACEHOLDER_API_URL.to_string()
        });

        Self {
            api_url,
            token: present(token),
        }
    }

    pub fn api(&self) -> anyhow::Result<HttpTasksApi> {
        if self.token.is_none() {
            tracing::warn!("TASKS_TOKEN is not set, requests will be rejected as unauthenticated");
        }
        HttpTasksApi::new(&self.api_url, self.token.clone())
            .map_err(|e| anyhow::anyhow!("Invalid TASKS_API_URL '{}': {}", self.api_url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_placeholder_url() {
        let settings = ClientSettings::from_values(None, None);
        assert_eq!(settings.api_url, PLACEHOLDER_API_URL);
        assert_eq!(settings.token, None);

        let blank = ClientSettings::from_values(Some("  ".into()), Some("".into()));
        assert_eq!(blank.api_url, PLACEHOLDER_API_URL);
        assert_eq!(blank.token, None);
    }

    #[test]
    fn uses_configured_url_and_token() {
        let settings = ClientSettings::from_values(Some("http://localhost:9001".into()), Some("abc".into()));
        assert_eq!(settings.api_url, "http://localhost:9001");
        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert!(settings.api().is_ok());
    }
}
