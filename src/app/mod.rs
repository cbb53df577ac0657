use crate::api::Backend;
use crate::config::AdminConfig;
use std::sync::Arc;

// Submódulos
pub mod dialogo;
pub mod navigation;
pub mod pages;
pub mod tareas;
pub mod toasts;
pub mod validacion;

pub use dialogo::{Confirmacion, EstadoDialogo};
pub use navigation::{EstadoNavegacion, Ruta};
pub use pages::{
    ConfiguracionPage, DificultadesPage, EventoDificultadesPage, EventosPage, Pagina,
    PreguntasPage,
};
pub use tareas::{Accion, TareaEnCurso, accion};
pub use toasts::{Severidad, Toast, Toasts};
pub use validacion::ErrorValidacion;

/// Lo que una operación de página pide al shell: toasts y, a veces, navegar.
#[derive(Debug, Default)]
pub struct Efectos {
    pub avisos: Vec<Toast>,
    pub navegar: Option<(Ruta, EstadoNavegacion)>,
}

impl Efectos {
    pub fn exito(&mut self, detalle: impl Into<String>) {
        self.avisos.push(Toast::exito(detalle));
    }

    pub fn info(&mut self, resumen: &str, detalle: impl Into<String>) {
        self.avisos.push(Toast::nuevo(Severidad::Info, resumen, detalle));
    }

    pub fn aviso(&mut self, resumen: &str, detalle: impl Into<String>) {
        self.avisos.push(Toast::nuevo(Severidad::Aviso, resumen, detalle));
    }

    pub fn error(&mut self, detalle: impl Into<String>) {
        self.avisos.push(Toast::error(detalle));
    }

    pub fn navegar(&mut self, ruta: Ruta, estado: EstadoNavegacion) {
        self.navegar = Some((ruta, estado));
    }

    /// Severidades emitidas, en orden (útil en tests).
    pub fn severidades(&self) -> Vec<Severidad> {
        self.avisos.iter().map(|t| t.severidad).collect()
    }
}

pub struct AdminApp {
    pub backend: Arc<dyn Backend>,
    pub origen: String,
    pub ruta: Ruta,
    pub pagina: Pagina,
    pub toasts: Toasts,
    pub tarea: Option<TareaEnCurso>,
    pub tema_oscuro: bool,
}

impl AdminApp {
    pub fn new(backend: Arc<dyn Backend>, origen: impl Into<String>) -> Self {
        Self {
            backend,
            origen: origen.into(),
            ruta: Ruta::Eventos,
            pagina: Pagina::para(&Ruta::Eventos, EstadoNavegacion::default()),
            toasts: Toasts::default(),
            tarea: None,
            tema_oscuro: false,
        }
    }

    /// Construye la app según la configuración y abre la ruta inicial.
    pub fn desde_config(config: &AdminConfig) -> Self {
        let (backend, origen) = config.crear_backend();
        let mut app = Self::new(backend, origen);
        app.tema_oscuro = config.tema_oscuro;
        let ruta = Ruta::parse(&config.ruta_inicial).unwrap_or_else(|| {
            log::warn!("Ruta inicial desconocida: {}", config.ruta_inicial);
            Ruta::Eventos
        });
        app.navegar(ruta);
        app
    }
}
