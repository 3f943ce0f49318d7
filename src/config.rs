//! Carga y gestión de configuración de la aplicación.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Configuración completa de la aplicación.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub server_addr: String,
    pub frontend_dir: PathBuf,
    pub open_browser: bool,

    /// Snapshots iniciales opcionales (misma forma que la respuesta del servicio).
    pub categories_file: Option<PathBuf>,
    pub documents_file: Option<PathBuf>,

    pub permission_ttl_secs: u64,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_addr = var("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:3322".to_string());
        let frontend_dir =
            PathBuf::from(var("FRONTEND_DIR").unwrap_or_else(|| "frontend".to_string()));

        let open_browser = match var("OPEN_BROWSER") {
            None => true,
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => return Err(anyhow!("Valor de OPEN_BROWSER no válido: {other}")),
            },
        };

        let categories_file = var("CATEGORIES_FILE").filter(|v| !v.is_empty()).map(PathBuf::from);
        let documents_file = var("DOCUMENTS_FILE").filter(|v| !v.is_empty()).map(PathBuf::from);

        let permission_ttl_secs = match var("PERMISSION_TTL_SECS") {
            None => 300,
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("PERMISSION_TTL_SECS debe ser un entero positivo: {raw}"))?,
        };

        Ok(Self {
            server_addr,
            frontend_dir,
            open_browser,
            categories_file,
            documents_file,
            permission_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.server_addr, "127.0.0.1:3322");
        assert_eq!(cfg.frontend_dir, PathBuf::from("frontend"));
        assert!(cfg.open_browser);
        assert_eq!(cfg.categories_file, None);
        assert_eq!(cfg.permission_ttl_secs, 300);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("SERVER_ADDR", "0.0.0.0:8080"),
            ("OPEN_BROWSER", "no"),
            ("CATEGORIES_FILE", "data/categories.json"),
            ("DOCUMENTS_FILE", ""),
            ("PERMISSION_TTL_SECS", "60"),
        ])
        .unwrap();
        assert_eq!(cfg.server_addr, "0.0.0.0:8080");
        assert!(!cfg.open_browser);
        assert_eq!(cfg.categories_file, Some(PathBuf::from("data/categories.json")));
        assert_eq!(cfg.documents_file, None);
        assert_eq!(cfg.permission_ttl_secs, 60);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config(&[("PERMISSION_TTL_SECS", "cinco")]).is_err());
        assert!(config(&[("OPEN_BROWSER", "quizás")]).is_err());
    }
}
