use super::{Efectos, EstadoNavegacion, Ruta};
use crate::api::Backend;

pub mod configuracion;
pub mod dificultades;
pub mod evento_dificultades;
pub mod eventos;
pub mod preguntas;

pub use configuracion::ConfiguracionPage;
pub use dificultades::DificultadesPage;
pub use evento_dificultades::EventoDificultadesPage;
pub use eventos::EventosPage;
pub use preguntas::PreguntasPage;

/// Estado de la página abierta. Se descarta al navegar.
#[derive(Clone, Debug)]
pub enum Pagina {
    Eventos(EventosPage),
    EventoDificultades(EventoDificultadesPage),
    Preguntas(PreguntasPage),
    Dificultades(DificultadesPage),
    Configuracion(ConfiguracionPage),
}

impl Pagina {
    pub fn para(ruta: &Ruta, estado: EstadoNavegacion) -> Self {
        match ruta {
            Ruta::Eventos => Pagina::Eventos(EventosPage::default()),
            Ruta::EventoDificultades { evento_id } => {
                Pagina::EventoDificultades(
                    EventoDificultadesPage::new(*evento_id).con_navegacion(estado),
                )
            }
            Ruta::Preguntas {
                evento_id,
                evento_dificultad_id,
            } => Pagina::Preguntas(PreguntasPage::new(*evento_id, *evento_dificultad_id, estado)),
            Ruta::Dificultades => Pagina::Dificultades(DificultadesPage::default()),
            Ruta::Configuracion => Pagina::Configuracion(ConfiguracionPage::default()),
        }
    }

    pub fn cargar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        match self {
            Pagina::Eventos(p) => p.cargar(api, fx),
            Pagina::EventoDificultades(p) => p.cargar(api, fx),
            Pagina::Preguntas(p) => p.cargar(api, fx),
            Pagina::Dificultades(p) => p.cargar(api, fx),
            Pagina::Configuracion(p) => p.cargar(api, fx),
        }
    }
}
