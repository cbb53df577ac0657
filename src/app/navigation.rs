use super::*;

/// Rutas del panel (`/eventos`, `/eventos/:id/dificultades`, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ruta {
    Eventos,
    EventoDificultades {
        evento_id: u64,
    },
    Preguntas {
        evento_id: u64,
        evento_dificultad_id: u64,
    },
    Dificultades,
    Configuracion,
}

impl Ruta {
    pub fn parse(path: &str) -> Option<Ruta> {
        let partes: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|p| !p.is_empty())
            .collect();

        match partes.as_slice() {
            [] | ["eventos"] => Some(Ruta::Eventos),
            ["dificultades"] => Some(Ruta::Dificultades),
            ["configuracion"] => Some(Ruta::Configuracion),
            ["eventos", id, "dificultades"] => Some(Ruta::EventoDificultades {
                evento_id: id.parse().ok()?,
            }),
            ["eventos", id, "dificultades", ed, "preguntas"] => Some(Ruta::Preguntas {
                evento_id: id.parse().ok()?,
                evento_dificultad_id: ed.parse().ok()?,
            }),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Ruta::Eventos => "/eventos".into(),
            Ruta::Dificultades => "/dificultades".into(),
            Ruta::Configuracion => "/configuracion".into(),
            Ruta::EventoDificultades { evento_id } => format!("/eventos/{evento_id}/dificultades"),
            Ruta::Preguntas {
                evento_id,
                evento_dificultad_id,
            } => format!("/eventos/{evento_id}/dificultades/{evento_dificultad_id}/preguntas"),
        }
    }

    pub fn titulo(&self) -> &'static str {
        match self {
            Ruta::Eventos => "Eventos",
            Ruta::EventoDificultades { .. } => "Dificultades del evento",
            Ruta::Preguntas { .. } => "Preguntas",
            Ruta::Dificultades => "Dificultades",
            Ruta::Configuracion => "Configuración",
        }
    }

    /// Rutas que llevan hasta esta, de la raíz a la actual.
    pub fn migas(&self) -> Vec<Ruta> {
        match self {
            Ruta::EventoDificultades { .. } => vec![Ruta::Eventos, self.clone()],
            Ruta::Preguntas { evento_id, .. } => vec![
                Ruta::Eventos,
                Ruta::EventoDificultades {
                    evento_id: *evento_id,
                },
                self.clone(),
            ],
            _ => vec![self.clone()],
        }
    }
}

/// Datos que la página de niveles pasa a la de preguntas para no volver a pedirlos.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EstadoNavegacion {
    pub nombre_dificultad: Option<String>,
    pub nombre_evento: Option<String>,
    pub es_predeterminado: Option<bool>,
}

impl AdminApp {
    pub fn navegar(&mut self, ruta: Ruta) {
        self.navegar_con(ruta, EstadoNavegacion::default());
    }

    /// Cambia de página y lanza su carga inicial. La tarea de la página
    /// anterior se descarta: su respuesta ya no toca el estado nuevo.
    pub fn navegar_con(&mut self, ruta: Ruta, estado: EstadoNavegacion) {
        log::info!("Navegando a {}", ruta.path());
        if self.tarea.take().is_some() {
            log::debug!("Tarea anterior descartada al navegar");
        }
        self.pagina = Pagina::para(&ruta, estado);
        self.ruta = ruta;
        self.lanzar("Cargando datos...", |pagina, api, fx| pagina.cargar(api, fx));
    }

    pub fn recargar(&mut self) {
        self.lanzar("Cargando datos...", |pagina, api, fx| pagina.cargar(api, fx));
    }
}
