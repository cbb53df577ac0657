use crate::api::Backend;
use crate::app::{Confirmacion, Efectos, ErrorValidacion, EstadoDialogo, EstadoNavegacion, Ruta};
use crate::model::Evento;
use chrono::NaiveDate;

/// Formulario del diálogo de eventos.
#[derive(Clone, Debug, PartialEq)]
pub struct FormEvento {
    pub id: u64,
    pub nombre: String,
    pub descripcion: String,
    pub fecha: String,
    pub activo: bool,
    pub visible: bool,
    /// Lo que ve el usuario; la API guarda lo contrario (`isPredeterminado`)
    pub tiene_dificultades: bool,
}

impl Default for FormEvento {
    fn default() -> Self {
        Self {
            id: 0,
            nombre: String::new(),
            descripcion: String::new(),
            fecha: String::new(),
            activo: true,
            visible: false,
            tiene_dificultades: true,
        }
    }
}

impl FormEvento {
    pub fn desde(evento: &Evento) -> Self {
        Self {
            id: evento.id,
            nombre: evento.nombre.clone(),
            descripcion: evento.descripcion.clone().unwrap_or_default(),
            fecha: evento.fecha_corta().to_string(),
            activo: evento.is_active,
            visible: evento.is_visible,
            tiene_dificultades: !evento.is_predeterminado,
        }
    }

    pub fn validar(&self) -> Result<(), ErrorValidacion> {
        if self.nombre.trim().is_empty() {
            return Err(ErrorValidacion::NombreRequerido);
        }
        let fecha = self.fecha.trim();
        if fecha.is_empty() {
            return Err(ErrorValidacion::FechaRequerida);
        }
        NaiveDate::parse_from_str(fecha, "%Y-%m-%d")
            .map_err(|_| ErrorValidacion::FechaInvalida(fecha.to_string()))?;
        Ok(())
    }

    pub fn a_evento(&self) -> Evento {
        let descripcion = self.descripcion.trim();
        Evento {
            id: self.id,
            nombre: self.nombre.trim().to_string(),
            descripcion: (!descripcion.is_empty()).then(|| descripcion.to_string()),
            fecha: Some(self.fecha.trim().to_string()),
            is_active: self.activo,
            is_visible: self.visible,
            is_predeterminado: !self.tiene_dificultades,
            evento_dificultad: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AccionEvento {
    Eliminar(Evento),
    Visible { evento: Evento, visible: bool },
}

#[derive(Clone, Debug, Default)]
pub struct EventosPage {
    pub eventos: Vec<Evento>,
    pub dialogo: EstadoDialogo,
    pub form: FormEvento,
    pub enviado: bool,
    pub confirmacion: Option<Confirmacion<AccionEvento>>,
}

impl EventosPage {
    pub fn cargar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        match api.listar_eventos() {
            Ok(eventos) => self.eventos = eventos,
            Err(err) => fx.error(err.mensaje_usuario("Error al cargar eventos")),
        }
    }

    pub fn visible(&self) -> Option<&Evento> {
        self.eventos.iter().find(|e| e.is_visible)
    }

    pub fn abrir_nuevo(&mut self) {
        self.form = FormEvento::default();
        self.enviado = false;
        self.dialogo = EstadoDialogo::Nuevo;
    }

    pub fn editar(&mut self, evento: &Evento) {
        self.form = FormEvento::desde(evento);
        self.enviado = false;
        self.dialogo = EstadoDialogo::Editando;
    }

    pub fn cerrar_dialogo(&mut self) {
        self.dialogo = EstadoDialogo::Cerrado;
        self.enviado = false;
    }

    /// Valida el formulario; si falla avisa y no hay que llamar al backend.
    pub fn validar_formulario(&mut self, fx: &mut Efectos) -> bool {
        self.enviado = true;
        match self.form.validar() {
            Ok(()) => true,
            Err(err) => {
                fx.aviso("Incompleto", err.to_string());
                false
            }
        }
    }

    pub fn guardar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        if !self.validar_formulario(fx) {
            return;
        }

        let evento = self.form.a_evento();
        let resultado = if self.dialogo == EstadoDialogo::Editando {
            api.actualizar_evento(&evento)
        } else {
            api.crear_evento(&evento)
        };

        match resultado {
            Ok(()) => {
                log::info!("Evento guardado: {}", evento.nombre);
                fx.exito("Evento guardado");
                self.dialogo = EstadoDialogo::Cerrado;
                self.form = FormEvento::default();
                self.enviado = false;
                // recarga completa: el backend puede haber tocado otros eventos
                self.cargar(api, fx);
            }
            Err(err) => fx.error(err.mensaje_usuario("Error al guardar evento")),
        }
    }

    pub fn solicitar_eliminar(&mut self, evento: &Evento) {
        self.confirmacion = Some(Confirmacion::new(
            "Confirmar",
            format!("¿Estás seguro de eliminar el evento \"{}\"?", evento.nombre),
            AccionEvento::Eliminar(evento.clone()),
        ));
    }

    pub fn solicitar_visible(&mut self, evento: &Evento) {
        let visible = !evento.is_visible;
        let mensaje = if visible {
            format!(
                "¿Mostrar \"{}\" como evento visible? El evento visible actual dejará de serlo.",
                evento.nombre
            )
        } else {
            format!("¿Ocultar el evento \"{}\"?", evento.nombre)
        };
        self.confirmacion = Some(Confirmacion::new(
            "Confirmar visibilidad",
            mensaje,
            AccionEvento::Visible {
                evento: evento.clone(),
                visible,
            },
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
            AccionEvento::Eliminar(evento) => match api.eliminar_evento(evento.id) {
                Ok(()) => {
                    fx.exito("Evento eliminado");
                    self.cargar(api, fx);
                }
                Err(err) => fx.error(err.mensaje_usuario("Error al eliminar evento")),
            },
            AccionEvento::Visible { evento, visible } => {
                match api.marcar_visible(evento.id, visible) {
                    Ok(()) => {
                        fx.exito(if visible {
                            "Evento marcado como visible"
                        } else {
                            "Evento oculto"
                        });
                        // el backend apaga a los demás; solo se ve recargando
                        self.cargar(api, fx);
                    }
                    Err(err) => fx.error(err.mensaje_usuario("Error al cambiar la visibilidad")),
                }
            }
        }
    }

    /// Cambia entre "con dificultades" y predeterminado desde la tabla.
    pub fn alternar_predeterminado(&mut self, evento: &Evento, api: &dyn Backend, fx: &mut Efectos) {
        match api.marcar_predeterminado(evento.id, !evento.is_predeterminado) {
            Ok(()) => {
                fx.exito("Evento actualizado");
                self.cargar(api, fx);
            }
            Err(err) => fx.error(err.mensaje_usuario("Error al actualizar evento")),
        }
    }

    pub fn gestionar_dificultades(&self, evento: &Evento, fx: &mut Efectos) {
        fx.navegar(
            Ruta::EventoDificultades {
                evento_id: evento.id,
            },
            EstadoNavegacion {
                nombre_evento: Some(evento.nombre.clone()),
                es_predeterminado: Some(evento.is_predeterminado),
                ..EstadoNavegacion::default()
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoriaBackend;
    use crate::app::Severidad;

    fn pagina_cargada(api: &MemoriaBackend) -> EventosPage {
        let mut p = EventosPage::default();
        p.cargar(api, &mut Efectos::default());
        api.limpiar_llamadas();
        p
    }

    #[test]
    fn nombre_vacio_no_llama_al_backend() {
        let api = MemoriaBackend::demo();
        let mut p = pagina_cargada(&api);
        let mut fx = Efectos::default();

        p.abrir_nuevo();
        p.form.fecha = "2025-09-01".into();
        p.guardar(&api, &mut fx);

        assert!(api.llamadas().is_empty());
        assert_eq!(fx.severidades(), vec![Severidad::Aviso]);
        assert!(p.dialogo.abierto());
        assert!(p.enviado);
    }

    #[test]
    fn fecha_invalida_se_rechaza() {
        let form = FormEvento {
            nombre: "Feria".into(),
            fecha: "28/07/2025".into(),
            ..FormEvento::default()
        };
        assert_eq!(
            form.validar(),
            Err(ErrorValidacion::FechaInvalida("28/07/2025".into()))
        );
    }

    #[test]
    fn crear_evento_recarga_la_lista() {
        let api = MemoriaBackend::demo();
        let mut p = pagina_cargada(&api);
        let mut fx = Efectos::default();

        p.abrir_nuevo();
        p.form.nombre = "  Feria de Ciencias ".into();
        p.form.fecha = "2025-09-01".into();
        p.form.tiene_dificultades = false;
        p.guardar(&api, &mut fx);

        assert_eq!(api.llamadas(), vec!["POST /eventos", "GET /eventos"]);
        assert_eq!(p.dialogo, EstadoDialogo::Cerrado);
        let creado = p.eventos.iter().find(|e| e.nombre == "Feria de Ciencias").unwrap();
        assert!(creado.is_predeterminado);
        assert_eq!(fx.severidades(), vec![Severidad::Exito]);
    }

    #[test]
    fn polaridad_de_predeterminado_es_simetrica() {
        let evento = Evento {
            id: 4,
            nombre: "X".into(),
            fecha: Some("2025-01-01".into()),
            is_predeterminado: true,
            ..Evento::default()
        };
        let form = FormEvento::desde(&evento);
        assert!(!form.tiene_dificultades);
        assert!(form.a_evento().is_predeterminado);
    }

    #[test]
    fn marcar_visible_deja_un_solo_visible_tras_recargar() {
        let api = MemoriaBackend::demo();
        let mut p = pagina_cargada(&api);
        let mut fx = Efectos::default();
        let otro = p.eventos.iter().find(|e| !e.is_visible).cloned().unwrap();

        p.solicitar_visible(&otro);
        assert!(api.llamadas().is_empty());
        p.confirmar(&api, &mut fx);

        assert_eq!(
            api.llamadas(),
            vec![format!("PUT /eventos/{}/visible", otro.id), "GET /eventos".to_string()]
        );
        assert_eq!(p.eventos.iter().filter(|e| e.is_visible).count(), 1);
        assert_eq!(p.visible().map(|e| e.id), Some(otro.id));
        assert!(p.confirmacion.is_none());
    }

    #[test]
    fn eliminar_requiere_confirmacion() {
        let api = MemoriaBackend::demo();
        let mut p = pagina_cargada(&api);
        let evento = p.eventos[0].clone();

        p.solicitar_eliminar(&evento);
        p.cancelar_confirmacion();
        p.confirmar(&api, &mut Efectos::default());
        assert!(api.llamadas().is_empty());

        p.solicitar_eliminar(&evento);
        p.confirmar(&api, &mut Efectos::default());
        assert!(p.eventos.iter().all(|e| e.id != evento.id));
    }

    #[test]
    fn alternar_predeterminado_envia_el_flag_negado() {
        let api = MemoriaBackend::demo();
        let mut p = pagina_cargada(&api);
        let evento = p.eventos.iter().find(|e| !e.is_predeterminado).cloned().unwrap();

        p.alternar_predeterminado(&evento, &api, &mut Efectos::default());
        let actualizado = p.eventos.iter().find(|e| e.id == evento.id).unwrap();
        assert!(actualizado.is_predeterminado);
    }

    #[test]
    fn gestionar_dificultades_pasa_estado() {
        let p = EventosPage::default();
        let mut fx = Efectos::default();
        let evento = Evento {
            id: 12,
            nombre: "Trivia".into(),
            is_predeterminado: true,
            ..Evento::default()
        };
        p.gestionar_dificultades(&evento, &mut fx);

        let (ruta, estado) = fx.navegar.unwrap();
        assert_eq!(ruta, Ruta::EventoDificultades { evento_id: 12 });
        assert_eq!(estado.es_predeterminado, Some(true));
    }
}
