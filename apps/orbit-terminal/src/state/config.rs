//! # Terminal Configuration
//!
//! Settings for one register: the store shown on receipts, who is selling at
//! which branch, where the database lives and how checkout behaves.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ORBIT_BRANCH_ID=branch-downtown                                    │
//! │     ORBIT_DATABASE_PATH=./orbit_dev.db                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/orbit-pos/terminal.toml (Linux)                          │
//! │     ~/Library/Application Support/com.orbit.pos/terminal.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # terminal.toml
//! [store]
//! name = "Orbit Coffee"
//! currency_symbol = "$"
//!
//! [session]
//! user_id = "u-17"
//! cashier_name = "Asha"
//! role = "pos_operator"      # admin | branch_manager | pos_operator
//! branch_id = "branch-downtown"
//!
//! [database]
//! path = "/var/lib/orbit/orbit.db"
//!
//! [checkout]
//! default_payment_method = "cash"   # cash | card
//! recheck_stock = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use orbit_core::{PaymentMethod, SessionContext, UserRole};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Printed at the top of every receipt.
    pub name: String,
    pub currency_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: "Orbit POS".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

/// Who is operating this register. Handed to the core as a [`SessionContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: String,
    pub cashier_name: String,
    pub role: UserRole,
    pub branch_id: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            user_id: "local".to_string(),
            cashier_name: "Cashier".to_string(),
            role: UserRole::PosOperator,
            branch_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `None` uses the platform data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    pub default_payment_method: PaymentMethod,

    /// Re-verify cart quantities against the catalog right before recording.
    pub recheck_stock: bool,
}

// =============================================================================
// Terminal Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl TerminalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`terminal.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }

        if self.store.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.currency_symbol must not be empty".into(),
            ));
        }

        if self.session.cashier_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "session.cashier_name must not be empty".into(),
            ));
        }

        if self.session.role != UserRole::Admin && self.session.branch_id.is_none() {
            warn!("No branch assigned; selling is disabled until session.branch_id is set");
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `ORBIT_*` overrides read through `var`.
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = var("ORBIT_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = var("ORBIT_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Some(user_id) = var("ORBIT_USER_ID") {
            self.session.user_id = user_id;
        }

        if let Some(name) = var("ORBIT_CASHIER_NAME") {
            self.session.cashier_name = name;
        }

        if let Some(role) = var("ORBIT_ROLE") {
            match role.parse() {
                Ok(parsed) => self.session.role = parsed,
                Err(_) => warn!(role = %role, "Unknown role in environment"),
            }
        }

        if let Some(branch) = var("ORBIT_BRANCH_ID") {
            debug!(branch = %branch, "Overriding branch from environment");
            self.session.branch_id = Some(branch).filter(|b| !b.trim().is_empty());
        }

        if let Some(path) = var("ORBIT_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(method) = var("ORBIT_PAYMENT_METHOD") {
            match method.parse() {
                Ok(parsed) => self.checkout.default_payment_method = parsed,
                Err(_) => warn!(method = %method, "Unknown payment method in environment"),
            }
        }

        if let Some(flag) = var("ORBIT_RECHECK_STOCK") {
            match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.checkout.recheck_stock = true,
                "0" | "false" | "no" | "off" => self.checkout.recheck_stock = false,
                _ => warn!(flag = %flag, "Unrecognized ORBIT_RECHECK_STOCK value"),
            }
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "orbit", "pos")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("terminal.toml"))
    }

    /// The configured database file, or `orbit.db` in the platform data dir.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs()
            .ok_or_else(|| ConfigError::Invalid("Could not determine app data directory".into()))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("orbit.db"))
    }

    /// The identity the core sees for this register.
    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            user_id: self.session.user_id.clone(),
            name: self.session.cashier_name.clone(),
            role: self.session.role,
            branch_id: self.session.branch_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = TerminalConfig::default();
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.session.role, UserRole::PosOperator);
        assert_eq!(config.checkout.default_payment_method, PaymentMethod::Cash);
        assert!(!config.checkout.recheck_stock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_sections() {
        let config: TerminalConfig = toml::from_str(
            r#"
            [store]
            name = "Orbit Coffee"

            [session]
            cashier_name = "Asha"
            role = "branch_manager"
            branch_id = "branch-downtown"

            [checkout]
            default_payment_method = "card"
            recheck_stock = true
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Orbit Coffee");
        // Missing keys fall back to defaults.
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.session.role, UserRole::BranchManager);
        assert_eq!(config.session.branch_id.as_deref(), Some("branch-downtown"));
        assert_eq!(config.checkout.default_payment_method, PaymentMethod::Card);
        assert!(config.checkout.recheck_stock);
        assert_eq!(config.database.path, None);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ORBIT_CASHIER_NAME", "Ravi"),
            ("ORBIT_ROLE", "admin"),
            ("ORBIT_BRANCH_ID", "branch-airport"),
            ("ORBIT_DATABASE_PATH", "/tmp/orbit.db"),
            ("ORBIT_PAYMENT_METHOD", "card"),
            ("ORBIT_RECHECK_STOCK", "yes"),
        ]
        .into_iter()
        .collect();

        let mut config = TerminalConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.session.cashier_name, "Ravi");
        assert_eq!(config.session.role, UserRole::Admin);
        assert_eq!(config.session.branch_id.as_deref(), Some("branch-airport"));
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/orbit.db"));
        assert_eq!(config.checkout.default_payment_method, PaymentMethod::Card);
        assert!(config.checkout.recheck_stock);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = TerminalConfig::default();
        config.apply_overrides(|k| match k {
            "ORBIT_ROLE" => Some("janitor".into()),
            "ORBIT_PAYMENT_METHOD" => Some("cheque".into()),
            "ORBIT_BRANCH_ID" => Some("  ".into()),
            _ => None,
        });

        assert_eq!(config.session.role, UserRole::PosOperator);
        assert_eq!(config.checkout.default_payment_method, PaymentMethod::Cash);
        assert_eq!(config.session.branch_id, None);
    }

    #[test]
    fn test_validation() {
        let mut config = TerminalConfig::default();
        config.session.cashier_name = " ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = TerminalConfig::default();
        config.store.currency_symbol.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_session_context() {
        let mut config = TerminalConfig::default();
        config.session.cashier_name = "Asha".into();
        config.session.branch_id = Some("b1".into());

        let ctx = config.session_context();
        assert_eq!(ctx.name, "Asha");
        assert_eq!(ctx.branch_id.as_deref(), Some("b1"));
    }
}
