//! Application configuration loaded from environment variables.

use std::env;

use narrative_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub site: SiteConfig,
    pub admin: Option<AdminAccount>,
}

/// Settings the pages and cookies depend on.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Prefix prepended to gallery image references.
    pub media_url: String,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            media_url: "/media/".to_string(),
            secure_cookies: false,
        }
    }
}

/// Account created at startup when it does not exist yet.
#[derive(Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) => Some(AdminAccount { username, password }),
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            site: SiteConfig {
                media_url: env::var("MEDIA_URL")
                    .map(|url| normalize_media_url(&url))
                    .unwrap_or_else(|_| SiteConfig::default().media_url),
                secure_cookies: env::var("SESSION_COOKIE_SECURE")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
            },
            admin,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Media URLs are joined by plain concatenation, so they must end in `/`.
fn normalize_media_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url_gets_trailing_slash() {
        assert_eq!(normalize_media_url("/media"), "/media/");
        assert_eq!(normalize_media_url("https://cdn.example.com/m/"), "https://cdn.example.com/m/");
    }
}
