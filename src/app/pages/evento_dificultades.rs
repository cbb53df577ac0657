use crate::api::{ApiError, Backend};
use crate::app::{Confirmacion, Efectos, ErrorValidacion, EstadoDialogo, EstadoNavegacion, Ruta};
use crate::model::{Dificultad, Evento, EventoDificultad};
use crate::view_models::FilaNivel;

#[derive(Clone, Debug, PartialEq)]
pub struct FormNivel {
    pub id: Option<u64>,
    pub dificultad_id: Option<u64>,
    pub activo: bool,
}

impl Default for FormNivel {
    fn default() -> Self {
        Self {
            id: None,
            dificultad_id: None,
            activo: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AccionNivel {
    Guardar,
    Eliminar(FilaNivel),
}

#[derive(Clone, Debug)]
pub struct EventoDificultadesPage {
    pub evento_id: u64,
    pub evento: Option<Evento>,
    /// Lo que se sabía del evento al navegar, hasta que llega `evento`.
    pub navegacion: EstadoNavegacion,
    pub niveles: Vec<FilaNivel>,
    pub catalogo: Vec<Dificultad>,
    pub dialogo: EstadoDialogo,
    pub form: FormNivel,
    pub enviado: bool,
    pub confirmacion: Option<Confirmacion<AccionNivel>>,
}

impl EventoDificultadesPage {
    pub fn new(evento_id: u64) -> Self {
        Self {
            evento_id,
            evento: None,
            navegacion: EstadoNavegacion::default(),
            niveles: Vec::new(),
            catalogo: Vec::new(),
            dialogo: EstadoDialogo::Cerrado,
            form: FormNivel::default(),
            enviado: false,
            confirmacion: None,
        }
    }

    pub fn con_navegacion(mut self, navegacion: EstadoNavegacion) -> Self {
        self.navegacion = navegacion;
        self
    }

    pub fn es_predeterminado(&self) -> bool {
        match &self.evento {
            Some(e) => e.is_predeterminado,
            None => self.navegacion.es_predeterminado.unwrap_or(false),
        }
    }

    pub fn nombre_evento(&self) -> &str {
        match &self.evento {
            Some(e) => e.nombre.as_str(),
            None => self.navegacion.nombre_evento.as_deref().unwrap_or(""),
        }
    }

    pub fn cargar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        let evento = match api.obtener_evento(self.evento_id) {
            Ok(evento) => evento,
            Err(err) => {
                let no_existe = matches!(
                    err,
                    ApiError::SinDatos(_) | ApiError::Http { status: 404, .. }
                );
                fx.error(err.mensaje_usuario("Error al cargar el evento"));
                if no_existe {
                    log::warn!("Evento {} no encontrado, volviendo a /eventos", self.evento_id);
                    fx.navegar(Ruta::Eventos, EstadoNavegacion::default());
                }
                return;
            }
        };

        if evento.is_predeterminado {
            // sin niveles reales: una fila "Default" con el total del evento
            let cantidad = api.contar_preguntas_evento(evento.id).unwrap_or_else(|err| {
                fx.error(err.mensaje_usuario("Error al contar preguntas"));
                0
            });
            self.niveles = vec![FilaNivel::predeterminada(cantidad)];
            self.catalogo.clear();
        } else {
            match api.listar_evento_dificultades(evento.id) {
                Ok(items) => self.niveles = items.iter().map(FilaNivel::desde).collect(),
                Err(err) => fx.error(err.mensaje_usuario("Error al cargar niveles del evento")),
            }
            match api.listar_dificultades() {
                Ok(catalogo) => self.catalogo = catalogo,
                Err(err) => fx.error(err.mensaje_usuario("Error al cargar dificultades")),
            }
        }
        self.evento = Some(evento);
    }

    /// Dificultades del catálogo que aún no tiene el evento (más la que se edita).
    pub fn disponibles(&self) -> Vec<&Dificultad> {
        self.catalogo
            .iter()
            .filter(|d| {
                self.form.dificultad_id == Some(d.id)
                    || !self.niveles.iter().any(|n| n.dificultad_id == d.id)
            })
            .collect()
    }

    pub fn abrir_nuevo(&mut self) {
        self.form = FormNivel::default();
        self.enviado = false;
        self.dialogo = EstadoDialogo::Nuevo;
    }

    pub fn editar(&mut self, fila: &FilaNivel) {
        self.form = FormNivel {
            id: Some(fila.id),
            dificultad_id: Some(fila.dificultad_id),
            activo: fila.activo,
        };
        self.enviado = false;
        self.dialogo = EstadoDialogo::Editando;
    }

    pub fn cerrar_dialogo(&mut self) {
        self.dialogo = EstadoDialogo::Cerrado;
        self.enviado = false;
    }

    pub fn validar(&self) -> Result<u64, ErrorValidacion> {
        let dificultad_id = self.form.dificultad_id.ok_or(ErrorValidacion::DificultadRequerida)?;
        let repetida = self
            .niveles
            .iter()
            .any(|n| n.dificultad_id == dificultad_id && Some(n.id) != self.form.id);
        if repetida {
            let nombre = self
                .catalogo
                .iter()
                .find(|d| d.id == dificultad_id)
                .map(|d| d.nombre.clone())
                .unwrap_or_else(|| dificultad_id.to_string());
            return Err(ErrorValidacion::DificultadRepetida(nombre));
        }
        Ok(dificultad_id)
    }

    pub fn solicitar_guardado(&mut self, fx: &mut Efectos) {
        self.enviado = true;
        if let Err(err) = self.validar() {
            fx.aviso("Incompleto", err.to_string());
            return;
        }
        let mensaje = if self.form.id.is_some() {
            "¿Estás seguro de actualizar este nivel?"
        } else {
            "¿Estás seguro de asignar esta dificultad al evento?"
        };
        self.confirmacion = Some(Confirmacion::new("Confirmar", mensaje, AccionNivel::Guardar));
    }

    pub fn solicitar_eliminar(&mut self, fila: &FilaNivel) {
        if fila.es_predeterminada() {
            return;
        }
        self.confirmacion = Some(Confirmacion::new(
            "Confirmar",
            format!(
                "¿Estás seguro de quitar la dificultad \"{}\"? Se eliminarán sus {} preguntas.",
                fila.dificultad, fila.cantidad_preguntas
            ),
            AccionNivel::Eliminar(fila.clone()),
        ));
    }

    pub fn cancelar_confirmacion(&mut self) {
        self.confirmacion = None;
    }

    pub fn confirmar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        let Some(confirmacion) = self.confirmacion.take() else {
            return;
        };
        match confirmacion.accion {
            AccionNivel::Guardar => self.guardar(api, fx),
            AccionNivel::Eliminar(fila) => match api.eliminar_evento_dificultad(fila.id) {
                Ok(()) => {
                    fx.exito("Dificultad quitada del evento");
                    self.cargar(api, fx);
                }
                Err(err) => fx.error(err.mensaje_usuario("Error al eliminar el nivel")),
            },
        }
    }

    fn guardar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        let dificultad_id = match self.validar() {
            Ok(id) => id,
            Err(err) => {
                fx.aviso("Incompleto", err.to_string());
                return;
            }
        };
        let nivel = EventoDificultad {
            id: self.form.id,
            evento_id: self.evento_id,
            dificultad_id,
            is_active: self.form.activo,
        };
        let resultado = if nivel.id.is_some() {
            api.actualizar_evento_dificultad(&nivel)
        } else {
            api.crear_evento_dificultad(&nivel)
        };
        match resultado {
            Ok(()) => {
                fx.exito("Nivel guardado");
                self.dialogo = EstadoDialogo::Cerrado;
                self.form = FormNivel::default();
                self.enviado = false;
                self.cargar(api, fx);
            }
            Err(err) => fx.error(err.mensaje_usuario("Error al guardar el nivel")),
        }
    }

    pub fn gestionar_preguntas(&self, fila: &FilaNivel, fx: &mut Efectos) {
        fx.navegar(
            Ruta::Preguntas {
                evento_id: self.evento_id,
                evento_dificultad_id: fila.id,
            },
            EstadoNavegacion {
                nombre_dificultad: Some(fila.dificultad.clone()),
                nombre_evento: self.evento.as_ref().map(|e| e.nombre.clone()),
                es_predeterminado: self.evento.as_ref().map(|e| e.is_predeterminado),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoriaBackend;
    use crate::app::Severidad;

    const EVENTO_DEMO: u64 = 5;
    const PREDETERMINADO_DEMO: u64 = 12;

    fn cargada(api: &MemoriaBackend, evento_id: u64) -> EventoDificultadesPage {
        let mut p = EventoDificultadesPage::new(evento_id);
        p.cargar(api, &mut Efectos::default());
        api.limpiar_llamadas();
        p
    }

    #[test]
    fn evento_con_niveles_carga_niveles_y_catalogo() {
        let api = MemoriaBackend::demo();
        let mut p = EventoDificultadesPage::new(EVENTO_DEMO);
        let mut fx = Efectos::default();
        p.cargar(&api, &mut fx);

        assert_eq!(
            api.llamadas(),
            vec!["GET /eventos/5", "GET /evento-dificultad/5", "GET /dificultades"]
        );
        assert_eq!(p.niveles.len(), 1);
        assert_eq!(p.niveles[0].dificultad, "Fácil");
        assert_eq!(p.niveles[0].cantidad_preguntas, 1);
        assert_eq!(p.catalogo.len(), 4);
        assert!(fx.avisos.is_empty());
    }

    #[test]
    fn evento_predeterminado_muestra_fila_default() {
        let api = MemoriaBackend::demo();
        let mut p = EventoDificultadesPage::new(PREDETERMINADO_DEMO);
        p.cargar(&api, &mut Efectos::default());

        assert_eq!(api.llamadas(), vec!["GET /eventos/12", "GET /eventos/12/preguntas/count"]);
        assert_eq!(p.niveles, vec![FilaNivel::predeterminada(1)]);
        assert!(p.es_predeterminado());
    }

    #[test]
    fn fallo_parcial_muestra_lo_cargado() {
        let api = MemoriaBackend::demo();
        api.fallar_en("GET /dificultades");
        let mut p = EventoDificultadesPage::new(EVENTO_DEMO);
        let mut fx = Efectos::default();
        p.cargar(&api, &mut fx);

        assert_eq!(p.niveles.len(), 1);
        assert!(p.catalogo.is_empty());
        assert_eq!(fx.severidades(), vec![Severidad::Error]);
        assert!(fx.navegar.is_none());
    }

    #[test]
    fn evento_inexistente_navega_a_eventos() {
        let api = MemoriaBackend::demo();
        let mut p = EventoDificultadesPage::new(999);
        let mut fx = Efectos::default();
        p.cargar(&api, &mut fx);

        assert_eq!(fx.severidades(), vec![Severidad::Error]);
        assert_eq!(fx.navegar.map(|(r, _)| r), Some(Ruta::Eventos));
    }

    #[test]
    fn error_de_servidor_no_navega() {
        let api = MemoriaBackend::demo();
        api.fallar_en("GET /eventos/5");
        let mut p = EventoDificultadesPage::new(EVENTO_DEMO);
        let mut fx = Efectos::default();
        p.cargar(&api, &mut fx);
        assert!(fx.navegar.is_none());
        assert!(p.evento.is_none());
    }

    #[test]
    fn dificultad_requerida_y_repetida() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO_DEMO);
        let mut fx = Efectos::default();

        p.abrir_nuevo();
        p.solicitar_guardado(&mut fx);
        assert!(p.confirmacion.is_none());

        p.form.dificultad_id = Some(1);
        assert_eq!(
            p.validar(),
            Err(ErrorValidacion::DificultadRepetida("Fácil".into()))
        );
        p.solicitar_guardado(&mut fx);
        assert!(p.confirmacion.is_none());
        assert_eq!(fx.severidades(), vec![Severidad::Aviso, Severidad::Aviso]);
        assert!(api.llamadas().is_empty());
    }

    #[test]
    fn editar_conserva_su_propia_dificultad() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO_DEMO);
        let fila = p.niveles[0].clone();
        p.editar(&fila);
        assert_eq!(p.validar(), Ok(1));
        assert!(p.disponibles().iter().any(|d| d.id == 1));
    }

    #[test]
    fn asignar_dificultad_confirma_y_recarga() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO_DEMO);
        let mut fx = Efectos::default();

        p.abrir_nuevo();
        assert_eq!(p.disponibles().len(), 3);
        p.form.dificultad_id = Some(2);
        p.solicitar_guardado(&mut fx);
        assert!(api.llamadas().is_empty());
        p.confirmar(&api, &mut fx);

        assert_eq!(api.llamadas()[0], "POST /evento-dificultad");
        assert_eq!(p.niveles.len(), 2);
        assert_eq!(p.dialogo, EstadoDialogo::Cerrado);
    }

    #[test]
    fn quitar_nivel_recarga() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO_DEMO);
        let fila = p.niveles[0].clone();

        p.solicitar_eliminar(&fila);
        p.confirmar(&api, &mut Efectos::default());
        assert_eq!(api.llamadas()[0], format!("DELETE /evento-dificultad/{}", fila.id));
        assert!(p.niveles.is_empty());
    }

    #[test]
    fn gestionar_preguntas_lleva_nombres() {
        let api = MemoriaBackend::demo();
        let p = cargada(&api, EVENTO_DEMO);
        let mut fx = Efectos::default();
        p.gestionar_preguntas(&p.niveles[0], &mut fx);

        let (ruta, estado) = fx.navegar.unwrap();
        assert_eq!(
            ruta,
            Ruta::Preguntas {
                evento_id: EVENTO_DEMO,
                evento_dificultad_id: p.niveles[0].id
            }
        );
        assert_eq!(estado.nombre_dificultad.as_deref(), Some("Fácil"));
        assert_eq!(estado.es_predeterminado, Some(false));
    }

    #[test]
    fn titulo_disponible_antes_de_cargar() {
        let estado = EstadoNavegacion {
            nombre_evento: Some("Feria".into()),
            es_predeterminado: Some(true),
            ..EstadoNavegacion::default()
        };
        let p = EventoDificultadesPage::new(PREDETERMINADO_DEMO).con_navegacion(estado);
        assert_eq!(p.nombre_evento(), "Feria");
        assert!(p.es_predeterminado());

        let api = MemoriaBackend::demo();
        let cargada = cargada(&api, EVENTO_DEMO);
        assert!(!cargada.es_predeterminado());
        assert!(!cargada.nombre_evento().is_empty());
    }
}
