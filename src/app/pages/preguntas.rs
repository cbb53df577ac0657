use crate::api::{ApiError, Backend};
use crate::app::{Confirmacion, Efectos, ErrorValidacion, EstadoDialogo, EstadoNavegacion, Ruta};
use crate::model::{Alternativa, Pregunta, TipoPregunta, etiqueta};

/// Valida una pregunta antes de enviarla o de pasarla a la lista pendiente.
pub fn validar(pregunta: &Pregunta) -> Result<(), ErrorValidacion> {
    if pregunta.pregunta.trim().is_empty() {
        return Err(ErrorValidacion::PreguntaVacia);
    }
    if pregunta.alternativas.is_empty() {
        return Err(ErrorValidacion::SinAlternativas);
    }
    if pregunta.tipo == TipoPregunta::Alternativa {
        if let Some(vacia) = pregunta.alternativas.iter().find(|a| a.texto.trim().is_empty()) {
            return Err(ErrorValidacion::AlternativaVacia(vacia.opcion.clone()));
        }
    }
    match pregunta.alternativas.iter().filter(|a| a.respuesta_correcta).count() {
        0 => Err(ErrorValidacion::SinRespuestaCorrecta),
        1 => Ok(()),
        _ => Err(ErrorValidacion::VariasCorrectas),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AccionPregunta {
    Guardar,
    Eliminar(Pregunta),
}

#[derive(Clone, Debug)]
pub struct PreguntasPage {
    pub evento_id: u64,
    pub evento_dificultad_id: u64,
    pub navegacion: EstadoNavegacion,
    pub preguntas: Vec<Pregunta>,
    pub dialogo: EstadoDialogo,
    /// Pregunta del formulario (nueva o en edición)
    pub pregunta: Pregunta,
    /// Preguntas nuevas validadas que aún no se enviaron
    pub buffer: Vec<Pregunta>,
    pub enviado: bool,
    pub confirmacion: Option<Confirmacion<AccionPregunta>>,
}

impl PreguntasPage {
    pub fn new(evento_id: u64, evento_dificultad_id: u64, navegacion: EstadoNavegacion) -> Self {
        Self {
            evento_id,
            evento_dificultad_id,
            navegacion,
            preguntas: Vec::new(),
            dialogo: EstadoDialogo::Cerrado,
            pregunta: Pregunta::nueva(Some(evento_dificultad_id)),
            buffer: Vec::new(),
            enviado: false,
            confirmacion: None,
        }
    }

    pub fn es_predeterminado(&self) -> bool {
        self.navegacion.es_predeterminado.unwrap_or(false)
    }

    pub fn titulo(&self) -> String {
        let evento = self.navegacion.nombre_evento.as_deref().unwrap_or("Evento");
        match self.navegacion.nombre_dificultad.as_deref() {
            Some(dificultad) => format!("{evento} · {dificultad}"),
            None => evento.to_string(),
        }
    }

    pub fn volver(&self, fx: &mut Efectos) {
        fx.navegar(
            Ruta::EventoDificultades {
                evento_id: self.evento_id,
            },
            EstadoNavegacion::default(),
        );
    }

    pub fn cargar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        // entrada directa por URL: no hay estado de navegación
        if self.navegacion.es_predeterminado.is_none() {
            match api.obtener_evento(self.evento_id) {
                Ok(evento) => {
                    self.navegacion.es_predeterminado = Some(evento.is_predeterminado);
                    self.navegacion.nombre_evento.get_or_insert(evento.nombre);
                }
                Err(err) => {
                    fx.error(err.mensaje_usuario("Error al cargar el evento"));
                    if matches!(err, ApiError::SinDatos(_) | ApiError::Http { status: 404, .. }) {
                        fx.navegar(Ruta::Eventos, EstadoNavegacion::default());
                    }
                    return;
                }
            }
        }

        let resultado = if self.es_predeterminado() {
            api.preguntas_de_evento_completo(self.evento_id)
        } else {
            api.preguntas_de_evento_dificultad(self.evento_dificultad_id)
        };
        match resultado {
            Ok(preguntas) => self.preguntas = preguntas,
            Err(err) => fx.error(err.mensaje_usuario("Error al cargar datos")),
        }
    }

    fn vacia(&self) -> Pregunta {
        self.vincular(Pregunta::nueva(None))
    }

    /// Asocia la pregunta al evento (predeterminado) o al nivel.
    pub fn vincular(&self, mut pregunta: Pregunta) -> Pregunta {
        if self.es_predeterminado() {
            pregunta.evento_id = Some(self.evento_id);
            pregunta.evento_dificultad_id = None;
        } else {
            pregunta.evento_id = None;
            pregunta.evento_dificultad_id = Some(self.evento_dificultad_id);
        }
        pregunta
    }

    pub fn abrir_nueva(&mut self) {
        self.pregunta = self.vacia();
        self.buffer.clear();
        self.enviado = false;
        self.dialogo = EstadoDialogo::Nuevo;
    }

    pub fn editar(&mut self, pregunta: &Pregunta) {
        self.pregunta = pregunta.clone();
        self.buffer.clear();
        self.enviado = false;
        self.dialogo = EstadoDialogo::Editando;
    }

    pub fn cerrar_dialogo(&mut self) {
        self.dialogo = EstadoDialogo::Cerrado;
        self.enviado = false;
    }

    pub fn cambiar_tipo(&mut self, tipo: TipoPregunta) {
        self.pregunta.tipo = tipo;
        self.pregunta.alternativas = Alternativa::plantilla(tipo, self.pregunta.id);
    }

    pub fn agregar_alternativa(&mut self) {
        if self.pregunta.tipo == TipoPregunta::VerdaderoFalso {
            return;
        }
        let idx = self.pregunta.alternativas.len();
        self.pregunta
            .alternativas
            .push(Alternativa::vacia(idx, self.pregunta.id));
    }

    pub fn quitar_alternativa(&mut self, idx: usize) {
        if self.pregunta.tipo == TipoPregunta::VerdaderoFalso || idx >= self.pregunta.alternativas.len() {
            return;
        }
        self.pregunta.alternativas.remove(idx);
        for (i, alt) in self.pregunta.alternativas.iter_mut().enumerate() {
            alt.opcion = etiqueta(i).to_string();
        }
    }

    pub fn marcar_correcta(&mut self, idx: usize) {
        for (i, alt) in self.pregunta.alternativas.iter_mut().enumerate() {
            alt.respuesta_correcta = i == idx;
        }
    }

    pub fn validar(&self) -> Result<(), ErrorValidacion> {
        validar(&self.pregunta)
    }

    pub fn agregar_a_buffer(&mut self, fx: &mut Efectos) {
        self.enviado = true;
        match self.validar() {
            Ok(()) => {
                let vacia = self.vacia();
                let actual = std::mem::replace(&mut self.pregunta, vacia);
                self.buffer.push(self.vincular(actual));
                self.enviado = false;
                fx.info("Agregada", "Pregunta agregada a la lista para guardar");
            }
            Err(err) => fx.aviso("Incompleto", err.to_string()),
        }
    }

    pub fn quitar_de_buffer(&mut self, idx: usize) {
        if idx < self.buffer.len() {
            self.buffer.remove(idx);
        }
    }

    /// Devuelve una pendiente al formulario; si el formulario tenía una
    /// pregunta válida, esa pasa antes a la lista.
    pub fn editar_desde_buffer(&mut self, idx: usize, fx: &mut Efectos) {
        if idx >= self.buffer.len() {
            return;
        }
        let pregunta = self.buffer.remove(idx);
        if self.validar().is_ok() {
            self.agregar_a_buffer(fx);
        }
        self.pregunta = pregunta;
    }

    pub fn solicitar_guardado(&mut self, fx: &mut Efectos) {
        self.enviado = true;
        let actual_valida = self.validar().is_ok();
        let actual_vacia = self.pregunta.pregunta.trim().is_empty();
        if !actual_valida && !actual_vacia {
            fx.aviso(
                "Atención",
                "La pregunta actual está incompleta. Complétela o bórrela antes de guardar.",
            );
            return;
        }
        if !actual_valida && self.buffer.is_empty() {
            return;
        }

        self.confirmacion = Some(if self.pregunta.es_nueva() {
            let total = self.buffer.len() + usize::from(actual_valida);
            Confirmacion::new(
                "Confirmar Creación Masiva",
                format!("¿Estás seguro de crear {total} preguntas?"),
                AccionPregunta::Guardar,
            )
        } else {
            Confirmacion::new(
                "Confirmar Edición",
                "¿Estás seguro de actualizar esta pregunta?",
                AccionPregunta::Guardar,
            )
        });
    }

    pub fn solicitar_eliminar(&mut self, pregunta: &Pregunta) {
        self.confirmacion = Some(Confirmacion::new(
            "Confirmar Eliminación",
            "¿Estás seguro de eliminar esta pregunta?",
            AccionPregunta::Eliminar(pregunta.clone()),
        ));
    }

    pub fn cancelar_confirmacion(&mut self) {
        self.confirmacion = None;
    }

    pub fn mensaje_confirmacion(&self) -> &'static str {
        match &self.confirmacion {
            Some(Confirmacion {
                accion: AccionPregunta::Eliminar(_),
                ..
            }) => "Eliminando pregunta...",
            _ if !self.pregunta.es_nueva() => "Actualizando pregunta...",
            _ => "Guardando preguntas...",
        }
    }

    pub fn confirmar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        let Some(confirmacion) = self.confirmacion.take() else {
            return;
        };
        match confirmacion.accion {
            AccionPregunta::Guardar => self.guardar(api, fx),
            AccionPregunta::Eliminar(pregunta) => match api.eliminar_pregunta(pregunta.id) {
                Ok(()) => {
                    self.preguntas.retain(|p| p.id != pregunta.id);
                    fx.exito("Pregunta eliminada");
                }
                Err(err) => fx.error(err.mensaje_usuario("Error al eliminar pregunta")),
            },
        }
    }

    fn guardar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        let es_edicion = !self.pregunta.es_nueva();
        let resultado = if es_edicion {
            let pregunta = self.vincular(self.pregunta.clone());
            api.actualizar_pregunta_completa(&pregunta).map(|()| {
                if let Some(actual) = self.preguntas.iter_mut().find(|p| p.id == pregunta.id) {
                    *actual = pregunta;
                }
            })
        } else {
            let mut lote: Vec<Pregunta> = self.buffer.clone();
            if self.validar().is_ok() {
                lote.push(self.pregunta.clone());
            }
            let lote: Vec<Pregunta> = lote.into_iter().map(|p| self.vincular(p)).collect();
            log::info!("Creando {} preguntas en el nivel {}", lote.len(), self.evento_dificultad_id);
            api.crear_preguntas_masivo(&lote).map(|creadas| {
                self.preguntas.extend(creadas);
            })
        };

        match resultado {
            Ok(()) => {
                fx.exito(if es_edicion {
                    "Pregunta actualizada"
                } else {
                    "Preguntas creadas"
                });
                // el backend puede no devolver lo creado: se recarga siempre
                self.cargar(api, fx);
                self.dialogo = EstadoDialogo::Cerrado;
                self.pregunta = self.vacia();
                self.buffer.clear();
                self.enviado = false;
            }
            Err(err) => fx.error(err.mensaje_usuario("Error al guardar preguntas")),
        }
    }

    /// Activa o desactiva todas las preguntas listadas en una sola llamada.
    pub fn alternar_activas(&mut self, activo: bool, api: &dyn Backend, fx: &mut Efectos) {
        if self.preguntas.is_empty() {
            return;
        }
        let lote: Vec<Pregunta> = self
            .preguntas
            .iter()
            .map(|p| Pregunta {
                is_active: activo,
                ..p.clone()
            })
            .collect();
        match api.actualizar_preguntas_masivo(&lote) {
            Ok(()) => {
                fx.exito(if activo {
                    "Preguntas activadas"
                } else {
                    "Preguntas desactivadas"
                });
                self.cargar(api, fx);
            }
            Err(err) => fx.error(err.mensaje_usuario("Error al actualizar preguntas")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoriaBackend;
    use crate::app::Severidad;

    const EVENTO: u64 = 5;
    const NIVEL: u64 = 6;
    const PREDETERMINADO: u64 = 12;

    fn con_nivel() -> EstadoNavegacion {
        EstadoNavegacion {
            nombre_dificultad: Some("Fácil".into()),
            nombre_evento: Some("Concurso".into()),
            es_predeterminado: Some(false),
        }
    }

    fn cargada(api: &MemoriaBackend, evento: u64, nivel: u64, nav: EstadoNavegacion) -> PreguntasPage {
        let mut p = PreguntasPage::new(evento, nivel, nav);
        p.cargar(api, &mut Efectos::default());
        api.limpiar_llamadas();
        p
    }

    fn completar(p: &mut PreguntasPage, enunciado: &str) {
        p.pregunta.pregunta = enunciado.into();
        for (i, alt) in p.pregunta.alternativas.iter_mut().enumerate() {
            alt.texto = format!("opción {i}");
        }
        p.marcar_correcta(0);
    }

    #[test]
    fn nivel_usa_el_endpoint_por_nivel() {
        let api = MemoriaBackend::demo();
        let mut p = PreguntasPage::new(EVENTO, NIVEL, con_nivel());
        p.cargar(&api, &mut Efectos::default());
        assert_eq!(api.llamadas(), vec!["GET /evento-dificultad/6/preguntas"]);
        assert_eq!(p.preguntas.len(), 1);
        assert_eq!(p.titulo(), "Concurso · Fácil");
    }

    #[test]
    fn sin_estado_consulta_el_evento() {
        let api = MemoriaBackend::demo();
        let mut p = PreguntasPage::new(PREDETERMINADO, 0, EstadoNavegacion::default());
        p.cargar(&api, &mut Efectos::default());
        assert_eq!(
            api.llamadas(),
            vec!["GET /eventos/12", "GET /eventos/12/preguntas-completo"]
        );
        assert!(p.es_predeterminado());
        assert_eq!(p.preguntas.len(), 1);
        assert_eq!(p.titulo(), "Trivia rápida");
    }

    #[test]
    fn validacion_de_preguntas() {
        let mut p = PreguntasPage::new(EVENTO, NIVEL, con_nivel());
        assert_eq!(p.validar(), Err(ErrorValidacion::PreguntaVacia));
        p.pregunta.pregunta = "¿?".into();
        assert_eq!(p.validar(), Err(ErrorValidacion::AlternativaVacia("A".into())));
        completar(&mut p, "¿?");
        assert_eq!(p.validar(), Ok(()));
        p.pregunta.alternativas[1].respuesta_correcta = true;
        assert_eq!(p.validar(), Err(ErrorValidacion::VariasCorrectas));
        p.pregunta.alternativas.clear();
        assert_eq!(p.validar(), Err(ErrorValidacion::SinAlternativas));
    }

    #[test]
    fn verdadero_falso_tiene_plantilla_fija() {
        let mut p = PreguntasPage::new(EVENTO, NIVEL, con_nivel());
        p.cambiar_tipo(TipoPregunta::VerdaderoFalso);
        p.agregar_alternativa();
        p.quitar_alternativa(0);
        let textos: Vec<_> = p.pregunta.alternativas.iter().map(|a| a.texto.as_str()).collect();
        assert_eq!(textos, vec!["Verdadero", "Falso"]);
        assert_eq!(p.pregunta.correcta().map(|a| a.opcion.as_str()), Some("A"));
    }

    #[test]
    fn volver_a_alternativa_deja_cuatro_incorrectas() {
        let mut p = PreguntasPage::new(EVENTO, NIVEL, con_nivel());
        p.cambiar_tipo(TipoPregunta::VerdaderoFalso);
        p.cambiar_tipo(TipoPregunta::Alternativa);
        let alts: Vec<_> = p
            .pregunta
            .alternativas
            .iter()
            .map(|a| (a.opcion.as_str(), a.respuesta_correcta))
            .collect();
        assert_eq!(alts, vec![("A", false), ("B", false), ("C", false), ("D", false)]);
        assert!(p.pregunta.correcta().is_none());
    }

    #[test]
    fn alternativas_se_reetiquetan() {
        let mut p = PreguntasPage::new(EVENTO, NIVEL, con_nivel());
        p.agregar_alternativa();
        p.agregar_alternativa();
        p.agregar_alternativa();
        let opciones: Vec<_> = p.pregunta.alternativas.iter().map(|a| a.opcion.clone()).collect();
        assert_eq!(opciones, vec!["A", "B", "C", "D", "E", "F", "?"]);

        p.quitar_alternativa(0);
        let opciones: Vec<_> = p.pregunta.alternativas.iter().map(|a| a.opcion.clone()).collect();
        assert_eq!(opciones, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn marcar_correcta_es_exclusiva() {
        let mut p = PreguntasPage::new(EVENTO, NIVEL, con_nivel());
        p.marcar_correcta(1);
        p.marcar_correcta(3);
        let correctas: Vec<_> = p
            .pregunta
            .alternativas
            .iter()
            .filter(|a| a.respuesta_correcta)
            .map(|a| a.opcion.as_str())
            .collect();
        assert_eq!(correctas, vec!["D"]);
    }

    #[test]
    fn buffer_y_creacion_masiva_en_una_llamada() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO, NIVEL, con_nivel());
        let mut fx = Efectos::default();

        p.abrir_nueva();
        completar(&mut p, "Primera");
        p.agregar_a_buffer(&mut fx);
        completar(&mut p, "Segunda");
        p.agregar_a_buffer(&mut fx);
        completar(&mut p, "Tercera");
        assert_eq!(p.buffer.len(), 2);
        assert_eq!(fx.severidades(), vec![Severidad::Info, Severidad::Info]);

        p.solicitar_guardado(&mut fx);
        let confirmacion = p.confirmacion.clone().unwrap();
        assert_eq!(confirmacion.titulo, "Confirmar Creación Masiva");
        assert_eq!(confirmacion.mensaje, "¿Estás seguro de crear 3 preguntas?");
        assert!(api.llamadas().is_empty());

        p.confirmar(&api, &mut fx);
        assert_eq!(
            api.llamadas(),
            vec!["POST /preguntas/create/masivo [3]", "GET /evento-dificultad/6/preguntas"]
        );
        assert_eq!(p.preguntas.len(), 4);
        assert!(p.buffer.is_empty());
        assert_eq!(p.dialogo, EstadoDialogo::Cerrado);
        assert!(
            api.preguntas()
                .iter()
                .filter(|q| q.pregunta == "Segunda")
                .all(|q| q.evento_dificultad_id == Some(NIVEL))
        );
    }

    #[test]
    fn pregunta_incompleta_bloquea_el_guardado() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO, NIVEL, con_nivel());
        let mut fx = Efectos::default();

        p.abrir_nueva();
        completar(&mut p, "Lista");
        p.agregar_a_buffer(&mut fx);
        p.pregunta.pregunta = "A medias".into();
        p.solicitar_guardado(&mut fx);

        assert!(p.confirmacion.is_none());
        assert_eq!(fx.avisos.last().map(|t| t.resumen.as_str()), Some("Atención"));
        assert!(api.llamadas().is_empty());
    }

    #[test]
    fn nada_que_guardar_no_hace_nada() {
        let mut p = PreguntasPage::new(EVENTO, NIVEL, con_nivel());
        let mut fx = Efectos::default();
        p.abrir_nueva();
        p.solicitar_guardado(&mut fx);
        assert!(p.confirmacion.is_none());
        assert!(fx.avisos.is_empty());
    }

    #[test]
    fn editar_desde_buffer_guarda_la_actual() {
        let mut p = PreguntasPage::new(EVENTO, NIVEL, con_nivel());
        let mut fx = Efectos::default();
        p.abrir_nueva();
        completar(&mut p, "Uno");
        p.agregar_a_buffer(&mut fx);
        completar(&mut p, "Dos");

        p.editar_desde_buffer(0, &mut fx);
        assert_eq!(p.pregunta.pregunta, "Uno");
        let pendientes: Vec<_> = p.buffer.iter().map(|q| q.pregunta.as_str()).collect();
        assert_eq!(pendientes, vec!["Dos"]);
    }

    #[test]
    fn edicion_usa_el_endpoint_completo() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO, NIVEL, con_nivel());
        let mut fx = Efectos::default();
        let original = p.preguntas[0].clone();

        p.editar(&original);
        p.pregunta.pregunta = "¿Capital del Perú?".into();
        p.solicitar_guardado(&mut fx);
        assert_eq!(p.confirmacion.as_ref().map(|c| c.titulo.as_str()), Some("Confirmar Edición"));
        p.confirmar(&api, &mut fx);

        assert_eq!(api.llamadas()[0], format!("PUT /preguntas/{}/completo", original.id));
        assert_eq!(p.preguntas[0].pregunta, "¿Capital del Perú?");
        assert_eq!(fx.severidades(), vec![Severidad::Exito]);
    }

    #[test]
    fn evento_predeterminado_vincula_por_evento() {
        let api = MemoriaBackend::demo();
        let nav = EstadoNavegacion {
            es_predeterminado: Some(true),
            ..EstadoNavegacion::default()
        };
        let mut p = cargada(&api, PREDETERMINADO, 0, nav);
        let mut fx = Efectos::default();

        p.abrir_nueva();
        completar(&mut p, "Nueva rápida");
        p.solicitar_guardado(&mut fx);
        p.confirmar(&api, &mut fx);

        let creada = api
            .preguntas()
            .into_iter()
            .find(|q| q.pregunta == "Nueva rápida")
            .unwrap();
        assert_eq!(creada.evento_id, Some(PREDETERMINADO));
        assert_eq!(creada.evento_dificultad_id, None);
        assert_eq!(p.preguntas.len(), 2);
    }

    #[test]
    fn error_al_guardar_conserva_el_buffer() {
        let api = MemoriaBackend::demo();
        api.fallar_en("POST /preguntas/create/masivo");
        let mut p = cargada(&api, EVENTO, NIVEL, con_nivel());
        let mut fx = Efectos::default();

        p.abrir_nueva();
        completar(&mut p, "Una");
        p.agregar_a_buffer(&mut fx);
        p.solicitar_guardado(&mut fx);
        p.confirmar(&api, &mut fx);

        assert_eq!(p.buffer.len(), 1);
        assert!(p.dialogo.abierto());
        assert_eq!(fx.severidades().last(), Some(&Severidad::Error));
    }

    #[test]
    fn eliminar_filtra_localmente() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO, NIVEL, con_nivel());
        let pregunta = p.preguntas[0].clone();

        p.solicitar_eliminar(&pregunta);
        assert_eq!(p.mensaje_confirmacion(), "Eliminando pregunta...");
        p.confirmar(&api, &mut Efectos::default());
        assert_eq!(api.llamadas(), vec![format!("DELETE /preguntas/{}", pregunta.id)]);
        assert!(p.preguntas.is_empty());
    }

    #[test]
    fn alternar_activas_en_lote() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api, EVENTO, NIVEL, con_nivel());

        p.alternar_activas(false, &api, &mut Efectos::default());
        assert_eq!(
            api.llamadas(),
            vec!["PUT /preguntas/update/masivo [1]", "GET /evento-dificultad/6/preguntas"]
        );
        assert!(p.preguntas.iter().all(|q| !q.is_active));
    }
}
