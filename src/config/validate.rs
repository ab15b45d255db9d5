use anyhow::{Result, bail};

use super::AppConfig;

const MIN_ADMIN_PASSWORD_LEN: usize = 8;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    if let Some(auth) = cfg.auth.as_ref() {
        if auth.jwt_secret.trim().is_empty() {
            errors.push("auth.jwt_secret must not be empty".to_string());
        }

        if auth.access_ttl_secs == 0 {
            errors.push("auth.access_ttl_secs must be > 0".to_string());
        }

        if auth.refresh_ttl_days <= 0 {
            errors.push("auth.refresh_ttl_days must be > 0".to_string());
        }

        if let Some(admin) = auth.admin.as_ref() {
            if admin.username.trim().is_empty() {
                errors.push("auth.admin.username must not be empty".to_string());
            }

            if admin.email.trim().is_empty() {
                errors.push("auth.admin.email must not be empty".to_string());
            }

            if admin.password.len() < MIN_ADMIN_PASSWORD_LEN {
                errors.push(format!(
                    "auth.admin.password must be at least {MIN_ADMIN_PASSWORD_LEN} characters"
                ));
            }
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
