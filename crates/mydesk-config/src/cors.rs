#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }

    /// `ALLOWED_ORIGINS=*` opens the API to any origin (credentials are then disabled).
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origins() {
        let config = CorsConfig::from_lookup(|_| None);
        assert_eq!(config.allowed_origins.len(), 2);
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_origins_are_trimmed_and_filtered() {
        let config = CorsConfig::from_lookup(|_| Some(" https://a.test , ,https://b.test".into()));
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn test_wildcard() {
        let config = CorsConfig::from_lookup(|_| Some("*".into()));
        assert!(config.allows_any_origin());
    }
}
