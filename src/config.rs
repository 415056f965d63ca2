use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// How long a built recommendation profile stays cached, in seconds
    #[serde(default = "default_profile_cache_ttl")]
    pub profile_cache_ttl: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_profile_cache_ttl() -> u64 {
    3600
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_when_only_key_present() {
        let vars = vec![("TMDB_API_KEY".to_string(), "abc123".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "abc123");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.profile_cache_ttl, 3600);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars: Vec<(String, String)> = vec![("PORT".to_string(), "8080".to_string())];
        let result = envy::from_iter::<_, Config>(vars);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "k".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("HOST".to_string(), "0.0.0.0".to_string()),
            ("PROFILE_CACHE_TTL".to_string(), "60".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.profile_cache_ttl, 60);
    }
}
