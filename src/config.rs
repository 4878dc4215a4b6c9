use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cart: CartConfig,
    #[serde(default)]
    pub loyalty: LoyaltyConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub customer_token_expires_in: i64, // seconds
    pub admin_token_expires_in: i64,    // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    /// 购物车 Cookie 加密主密钥，至少 32 字节
    pub cookie_secret: String,
    #[serde(default)]
    pub secure_cookies: bool,
    #[serde(default = "default_max_cookie_bytes")]
    pub max_cookie_bytes: usize,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,
}

fn default_max_cookie_bytes() -> usize {
    4000
}

fn default_session_ttl_secs() -> i64 {
    7200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    pub daily_points: i64,
    pub streak_bonus_points: i64,
    pub streak_length: i32,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            daily_points: 10,
            streak_bonus_points: 50,
            streak_length: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: String,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "wwwroot/uploads".to_string(),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 可管理账号与角色的角色 ID
    pub super_admin_role_id: i32,
    #[serde(default)]
    pub bootstrap_email: Option<String>,
    #[serde(default)]
    pub bootstrap_password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            super_admin_role_id: 1,
            bootstrap_email: None,
            bootstrap_password: None,
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and config.toml was not found")?;

                let loyalty_defaults = LoyaltyConfig::default();
                let upload_defaults = UploadConfig::default();

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        customer_token_expires_in: get_env_parse(
                            "JWT_CUSTOMER_EXPIRES_IN",
                            2_592_000i64,
                        ),
                        admin_token_expires_in: get_env_parse("JWT_ADMIN_EXPIRES_IN", 28_800i64),
                    },
                    cart: CartConfig {
                        cookie_secret: get_env("CART_COOKIE_SECRET").unwrap_or_default(),
                        secure_cookies: get_env_parse("CART_SECURE_COOKIES", false),
                        max_cookie_bytes: get_env_parse(
                            "CART_MAX_COOKIE_BYTES",
                            default_max_cookie_bytes(),
                        ),
                        session_ttl_secs: get_env_parse(
                            "CART_SESSION_TTL_SECS",
                            default_session_ttl_secs(),
                        ),
                    },
                    loyalty: LoyaltyConfig {
                        daily_points: get_env_parse(
                            "LOYALTY_DAILY_POINTS",
                            loyalty_defaults.daily_points,
                        ),
                        streak_bonus_points: get_env_parse(
                            "LOYALTY_STREAK_BONUS_POINTS",
                            loyalty_defaults.streak_bonus_points,
                        ),
                        streak_length: get_env_parse(
                            "LOYALTY_STREAK_LENGTH",
                            loyalty_defaults.streak_length,
                        ),
                    },
                    uploads: UploadConfig {
                        dir: get_env("UPLOAD_DIR").unwrap_or(upload_defaults.dir),
                        max_bytes: get_env_parse("UPLOAD_MAX_BYTES", upload_defaults.max_bytes),
                    },
                    admin: AdminConfig {
                        super_admin_role_id: get_env_parse("ADMIN_SUPER_ROLE_ID", 1i32),
                        bootstrap_email: get_env("ADMIN_BOOTSTRAP_EMAIL"),
                        bootstrap_password: get_env("ADMIN_BOOTSTRAP_PASSWORD"),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Unable to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_CUSTOMER_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.customer_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_ADMIN_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.admin_token_expires_in = n;
        }
        if let Ok(v) = env::var("CART_COOKIE_SECRET") {
            config.cart.cookie_secret = v;
        }
        if let Ok(v) = env::var("CART_SECURE_COOKIES")
            && let Ok(b) = v.parse()
        {
            config.cart.secure_cookies = b;
        }
        if let Ok(v) = env::var("UPLOAD_DIR") {
            config.uploads.dir = v;
        }
        if let Ok(v) = env::var("ADMIN_BOOTSTRAP_EMAIL") {
            config.admin.bootstrap_email = Some(v);
        }
        if let Ok(v) = env::var("ADMIN_BOOTSTRAP_PASSWORD") {
            config.admin.bootstrap_password = Some(v);
        }

        if config.cart.cookie_secret.len() < 32 {
            return Err("cart.cookie_secret must be at least 32 bytes".into());
        }

        Ok(config)
    }
}
