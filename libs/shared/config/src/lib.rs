use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub aidbox_base_url: String,
    pub aidbox_username: String,
    pub aidbox_password: String,
    pub server_port: u16,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub slot_minutes: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            aidbox_base_url: env::var("AIDBOX_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("AIDBOX_BASE_URL not set, using default");
                    "http://localhost:8080".to_string()
                }),
            aidbox_username: env::var("AIDBOX_USERNAME")
                .unwrap_or_else(|_| {
                    warn!("AIDBOX_USERNAME not set, using empty value");
                    String::new()
                }),
            aidbox_password: env::var("AIDBOX_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("AIDBOX_PASSWORD not set, using empty value");
                    String::new()
                }),
            server_port: parse_u16_var("SERVER_PORT", 3000),
            work_start_hour: parse_u32_var("WORK_START_HOUR", 8),
            work_end_hour: parse_u32_var("WORK_END_HOUR", 18),
            slot_minutes: parse_u32_var("SLOT_MINUTES", 30),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.aidbox_base_url.is_empty()
    }
}

fn parse_u32_var(name: &str, default: u32) -> u32 {
    match env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid number, using default {}", name, default);
            default
        }),
        Err(_) => default,
    }
}

fn parse_u16_var(name: &str, default: u16) -> u16 {
    match env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid port, using default {}", name, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_port_parses_with_a_fallback() {
        env::remove_var("SERVER_PORT");
        assert_eq!(AppConfig::from_env().server_port, 3000);

        env::set_var("SERVER_PORT", "8081");
        assert_eq!(AppConfig::from_env().server_port, 8081);

        env::set_var("SERVER_PORT", "not-a-port");
        assert_eq!(AppConfig::from_env().server_port, 3000);

        env::remove_var("SERVER_PORT");
    }

    #[test]
    fn empty_base_url_is_not_configured() {
        let config = AppConfig {
            aidbox_base_url: String::new(),
            aidbox_username: String::new(),
            aidbox_password: String::new(),
            server_port: 3000,
            work_start_hour: 8,
            work_end_hour: 18,
            slot_minutes: 30,
        };
        assert!(!config.is_configured());
    }
}
