use crate::util::env::{get_bool_from_env_or, get_env_or, get_size_from_env_or, load_dotenv};
use anyhow::Result;

pub mod db;

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Basic app info
    pub app_name: String,

    pub static_url: String,
    pub static_path: String,

    pub http: HTTPConfig,
    pub media: MediaConfig,
    pub site: SiteConfig,
    pub db: DBConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct HTTPConfig {
    pub ip: String,
    pub port: u16,
    pub max_body_size: u64,
}

/// Where uploaded post images are stored and served from.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub base_path: String,
    pub base_url: String,
}

/// How many entries each listing block shows.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub popular_posts: i64,
    pub popular_tags: i64,
    pub fresh_posts: i64,
    pub tag_posts: i64,
}

#[derive(Debug, Clone)]
pub struct DBConfig {
    pub url: String,
    pub pool_size: u32,
    pub auto_migrate: bool,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_requests: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        let d = Self::default();
        Ok(AppConfig {
            app_name: get_env_or("APP_NAME", d.app_name)?,

            static_url: get_env_or("STATIC_URL", d.static_url)?,
            static_path: get_env_or("STATIC_PATH", d.static_path)?,

            http: HTTPConfig::from_env()?,
            media: MediaConfig::from_env()?,
            site: SiteConfig::from_env()?,
            db: DBConfig::from_env()?,
            log: LogConfig::from_env()?,
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        let site = &self.site;
        for (name, value) in [
            ("SITE_POPULAR_POSTS", site.popular_posts),
            ("SITE_POPULAR_TAGS", site.popular_tags),
            ("SITE_FRESH_POSTS", site.fresh_posts),
            ("SITE_TAG_POSTS", site.tag_posts),
        ] {
            if value < 0 {
                anyhow::bail!("{} must not be negative, got {}", name, value);
            }
        }
        if self.db.pool_size == 0 {
            anyhow::bail!("DATABASE_POOL_SIZE must be at least 1");
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            app_name: "Inkpost".to_string(),
            static_url: "/static".to_string(),
            static_path: "./static".to_string(),
            http: HTTPConfig::default(),
            media: MediaConfig::default(),
            site: SiteConfig::default(),
            db: DBConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl HTTPConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(HTTPConfig {
            ip: get_env_or("HTTP_IP", d.ip)?,
            port: get_env_or("HTTP_PORT", d.port)?,
            max_body_size: get_size_from_env_or("HTTP_MAX_BODY_SIZE", d.max_body_size)?,
        })
    }
}

impl Default for HTTPConfig {
    fn default() -> Self {
        HTTPConfig {
            ip: "127.0.0.1".to_string(),
            port: 8000,
            max_body_size: 2 * 1024 * 1024,
        }
    }
}

impl MediaConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(MediaConfig {
            base_path: get_env_or("MEDIA_PATH", d.base_path)?,
            base_url: get_env_or("MEDIA_URL", d.base_url)?,
        })
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        MediaConfig {
            base_path: "./media".to_string(),
            base_url: "/media".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(SiteConfig {
            popular_posts: get_env_or("SITE_POPULAR_POSTS", d.popular_posts)?,
            popular_tags: get_env_or("SITE_POPULAR_TAGS", d.popular_tags)?,
            fresh_posts: get_env_or("SITE_FRESH_POSTS", d.fresh_posts)?,
            tag_posts: get_env_or("SITE_TAG_POSTS", d.tag_posts)?,
        })
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            popular_posts: 5,
            popular_tags: 5,
            fresh_posts: 5,
            tag_posts: 20,
        }
    }
}

impl DBConfig {
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        Ok(DBConfig {
            url: get_env_or("DATABASE_URL", d.url)?,
            pool_size: get_env_or("DATABASE_POOL_SIZE", d.pool_size)?,
            auto_migrate: get_bool_from_env_or("DATABASE_AUTO_MIGRATE", d.auto_migrate)?,
        })
    }
}

impl Default for DBConfig {
    fn default() -> Self {
        DBConfig {
            url: "sqlite://blog.db".to_string(),
            pool_size: 5,
            auto_migrate: true,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Result<Self> {
        Ok(LogConfig {
            log_requests: get_bool_from_env_or("LOG_REQUESTS", false)?,
        })
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { log_requests: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate_config().is_ok());
        assert_eq!(config.site.tag_posts, 20);
        assert_eq!(config.media.base_url, "/media");
    }

    #[test]
    fn test_negative_limit_is_rejected() {
        let mut config = AppConfig::default();
        config.site.popular_tags = -1;
        assert!(config.validate_config().is_err());
    }
}
