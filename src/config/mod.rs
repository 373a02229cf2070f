use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub backup: BackupConfig,
    pub geoip: GeoIpConfig,
    /// Fixed destination every tracked hit is redirected to.
    pub redirect_url: String,
    /// Directory served as-is for static assets (and the admin.html source).
    pub static_dir: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Admin panel credentials. There is deliberately no fallback default:
/// shipping hardcoded credentials is a defect, so startup fails instead.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub dir: String,
    pub interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct GeoIpConfig {
    /// Lookup URL template with an `{ip}` placeholder.
    pub api_url: String,
    pub timeout_secs: u64,
}

const DEFAULT_REDIRECT_URL: &str = "https://www.instagram.com/daniel_sandoval_ch/";
const DEFAULT_GEOIP_API_URL: &str = "http://ip-api.com/json/{ip}?fields=status,country";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://clicks.db?mode=rwc".to_string());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a number")?;

        let admin_username =
            std::env::var("ADMIN_USER").context("ADMIN_USER must be set; no default is shipped")?;
        let admin_password = std::env::var("ADMIN_PASSWORD")
            .context("ADMIN_PASSWORD must be set; no default is shipped")?;

        let backup_dir = std::env::var("BACKUP_DIR").unwrap_or_else(|_| "backups".to_string());
        let backup_interval_secs = std::env::var("BACKUP_INTERVAL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .context("BACKUP_INTERVAL_SECS must be a number of seconds")?;

        let geoip_api_url =
            std::env::var("GEOIP_API_URL").unwrap_or_else(|_| DEFAULT_GEOIP_API_URL.to_string());
        let geoip_timeout_secs = std::env::var("GEOIP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("GEOIP_TIMEOUT_SECS must be a number of seconds")?;

        let redirect_url =
            std::env::var("REDIRECT_URL").unwrap_or_else(|_| DEFAULT_REDIRECT_URL.to_string());
        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            admin: AdminConfig {
                username: admin_username,
                password: admin_password,
            },
            backup: BackupConfig {
                dir: backup_dir,
                interval_secs: backup_interval_secs,
            },
            geoip: GeoIpConfig {
                api_url: geoip_api_url,
                timeout_secs: geoip_timeout_secs,
            },
            redirect_url,
            static_dir,
        })
    }
}
