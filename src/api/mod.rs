//! Cliente del backend REST de la trivia.
//!
//! Todas las páginas hablan con el backend a través del trait [`Backend`]; la
//! implementación real es [`HttpBackend`] y [`MemoriaBackend`] sirve para el
//! modo demo y para los tests.

use crate::model::{
    Configuracion, Dificultad, Evento, EventoDificultad, EventoDificultadList, FotoConfig,
    Pregunta, TriviaConfig,
};
use thiserror::Error;

pub mod http;
pub mod memoria;

pub use http::HttpBackend;
pub use memoria::MemoriaBackend;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error conectando con el backend: {0}")]
    Conexion(#[from] reqwest::Error),
    #[error("El backend devolvió HTTP {status}: {mensaje}")]
    Http { status: u16, mensaje: String },
    #[error("El backend rechazó la operación ({status}): {mensaje}")]
    Rechazada { status: u16, mensaje: String },
    #[error("Respuesta JSON inválida del backend: {0}")]
    Formato(#[from] serde_json::Error),
    #[error("El backend no devolvió {0}")]
    SinDatos(&'static str),
    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// Mensaje para el toast: el del servidor si lo hay, si no el genérico.
    pub fn mensaje_usuario(&self, generico: &str) -> String {
        let servidor = match self {
            ApiError::Http { mensaje, .. } | ApiError::Rechazada { mensaje, .. } => {
                Some(mensaje.as_str())
            }
            ApiError::Backend(mensaje) => Some(mensaje.as_str()),
            _ => None,
        };
        servidor
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(generico)
            .to_string()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Superficie REST que consume el panel de administración.
pub trait Backend: Send + Sync {
    // eventos
    fn listar_eventos(&self) -> ApiResult<Vec<Evento>>;
    fn obtener_evento(&self, id: u64) -> ApiResult<Evento>;
    fn crear_evento(&self, evento: &Evento) -> ApiResult<()>;
    fn actualizar_evento(&self, evento: &Evento) -> ApiResult<()>;
    fn eliminar_evento(&self, id: u64) -> ApiResult<()>;
    fn marcar_visible(&self, id: u64, visible: bool) -> ApiResult<()>;
    fn marcar_predeterminado(&self, id: u64, predeterminado: bool) -> ApiResult<()>;

    // catálogo de dificultades
    fn listar_dificultades(&self) -> ApiResult<Vec<Dificultad>>;
    fn crear_dificultad(&self, dificultad: &Dificultad) -> ApiResult<()>;
    fn actualizar_dificultad(&self, dificultad: &Dificultad) -> ApiResult<()>;
    fn eliminar_dificultad(&self, id: u64) -> ApiResult<()>;

    // niveles de un evento
    fn listar_evento_dificultades(&self, evento_id: u64) -> ApiResult<Vec<EventoDificultadList>>;
    fn crear_evento_dificultad(&self, ed: &EventoDificultad) -> ApiResult<()>;
    fn actualizar_evento_dificultad(&self, ed: &EventoDificultad) -> ApiResult<()>;
    fn eliminar_evento_dificultad(&self, id: u64) -> ApiResult<()>;

    // preguntas
    fn preguntas_de_evento_dificultad(&self, evento_dificultad_id: u64) -> ApiResult<Vec<Pregunta>>;
    fn preguntas_de_evento_completo(&self, evento_id: u64) -> ApiResult<Vec<Pregunta>>;
    fn contar_preguntas_evento(&self, evento_id: u64) -> ApiResult<u64>;
    fn crear_pregunta(&self, pregunta: &Pregunta) -> ApiResult<()>;
    fn actualizar_pregunta(&self, pregunta: &Pregunta) -> ApiResult<()>;
    fn actualizar_pregunta_completa(&self, pregunta: &Pregunta) -> ApiResult<()>;
    fn eliminar_pregunta(&self, id: u64) -> ApiResult<()>;
    /// Devuelve lo que el backend tenga en `response` (puede venir vacío).
    fn crear_preguntas_masivo(&self, preguntas: &[Pregunta]) -> ApiResult<Vec<Pregunta>>;
    fn actualizar_preguntas_masivo(&self, preguntas: &[Pregunta]) -> ApiResult<()>;

    // configuración
    fn obtener_configuracion(&self) -> ApiResult<Configuracion>;
    fn actualizar_config_foto(&self, foto: &FotoConfig) -> ApiResult<()>;
    fn actualizar_config_trivia(&self, trivia: &TriviaConfig) -> ApiResult<()>;
}
