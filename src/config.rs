// src/config.rs

use crate::api::{Backend, HttpBackend, MemoriaBackend};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const ARCHIVO_POR_DEFECTO: &str = "trivia_admin.yaml";
const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No se pudo leer {ruta}: {fuente}")]
    Lectura {
        ruta: PathBuf,
        #[source]
        fuente: std::io::Error,
    },
    #[error("Configuración YAML inválida en {ruta}: {fuente}")]
    Formato {
        ruta: PathBuf,
        #[source]
        fuente: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Modo {
    #[default]
    Http,
    /// Backend en memoria con datos de ejemplo
    Demo,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    pub api_url: String,
    pub modo: Modo,
    pub ruta_inicial: String,
    pub log_filter: String,
    pub tema_oscuro: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            modo: Modo::Http,
            ruta_inicial: "/eventos".to_string(),
            log_filter: "info".to_string(),
            tema_oscuro: false,
        }
    }
}

fn no_vacio(valor: String) -> Option<String> {
    let valor = valor.trim().to_string();
    (!valor.is_empty()).then_some(valor)
}

impl AdminConfig {
    pub fn desde_yaml(texto: &str) -> Result<Self, serde_yaml::Error> {
        if texto.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(texto)
    }

    /// Lee el archivo; si no existe se usan los valores por defecto.
    pub fn leer(ruta: &Path) -> Result<Self, ConfigError> {
        let texto = match std::fs::read_to_string(ruta) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(fuente) => {
                return Err(ConfigError::Lectura {
                    ruta: ruta.to_path_buf(),
                    fuente,
                });
            }
        };
        Self::desde_yaml(&texto).map_err(|fuente| ConfigError::Formato {
            ruta: ruta.to_path_buf(),
            fuente,
        })
    }

    /// `TRIVIA_ADMIN_API_URL` pisa la URL del archivo.
    pub fn con_overrides(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.and_then(no_vacio) {
            self.api_url = url;
        }
        self
    }

    /// Archivo (`TRIVIA_ADMIN_CONFIG` o `trivia_admin.yaml`) + variables de entorno.
    pub fn cargar() -> Result<Self, ConfigError> {
        let ruta = std::env::var("TRIVIA_ADMIN_CONFIG")
            .ok()
            .and_then(no_vacio)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(ARCHIVO_POR_DEFECTO));
        let config = Self::leer(&ruta)?;
        Ok(config.con_overrides(std::env::var("TRIVIA_ADMIN_API_URL").ok()))
    }

    pub fn crear_backend(&self) -> (Arc<dyn Backend>, String) {
        match self.modo {
            Modo::Http => (
                Arc::new(HttpBackend::new(&self.api_url)),
                self.api_url.clone(),
            ),
            Modo::Demo => (Arc::new(MemoriaBackend::demo()), "modo demo".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_parcial_completa_con_defectos() {
        let cfg = AdminConfig::desde_yaml("modo: demo\nruta_inicial: /configuracion\n").unwrap();
        assert_eq!(cfg.modo, Modo::Demo);
        assert_eq!(cfg.ruta_inicial, "/configuracion");
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.log_filter, "info");
        assert!(!cfg.tema_oscuro);
    }

    #[test]
    fn yaml_vacio_es_defecto() {
        assert_eq!(AdminConfig::desde_yaml("  \n").unwrap(), AdminConfig::default());
    }

    #[test]
    fn modo_desconocido_es_error() {
        assert!(AdminConfig::desde_yaml("modo: ftp").is_err());
    }

    #[test]
    fn archivo_inexistente_usa_defectos() {
        let cfg = AdminConfig::leer(Path::new("/no/existe/trivia_admin.yaml")).unwrap();
        assert_eq!(cfg, AdminConfig::default());
    }

    #[test]
    fn override_de_url_ignora_vacios() {
        let cfg = AdminConfig::default().con_overrides(Some("   ".into()));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        let cfg = AdminConfig::default().con_overrides(Some("http://10.0.0.2:8080/api".into()));
        assert_eq!(cfg.api_url, "http://10.0.0.2:8080/api");
    }
}
