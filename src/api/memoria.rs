use super::{ApiError, ApiResult, Backend};
use crate::model::{
    Alternativa, Configuracion, Dificultad, Evento, EventoDificultad, EventoDificultadList,
    FotoConfig, Pregunta, TipoPregunta, TriviaConfig,
};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Estado {
    eventos: Vec<Evento>,
    dificultades: Vec<Dificultad>,
    niveles: Vec<EventoDificultad>,
    preguntas: Vec<Pregunta>,
    configuracion: Configuracion,
    siguiente_id: u64,
    llamadas: Vec<String>,
    fallos: Vec<String>,
}

impl Estado {
    fn nuevo_id(&mut self) -> u64 {
        self.siguiente_id += 1;
        self.siguiente_id
    }

    fn insertar_pregunta(&mut self, pregunta: &Pregunta) -> Pregunta {
        let mut p = pregunta.clone();
        p.id = self.nuevo_id();
        for alt in &mut p.alternativas {
            alt.id = self.nuevo_id();
            alt.pregunta_id = p.id;
        }
        self.preguntas.push(p.clone());
        p
    }

    fn reemplazar_pregunta(&mut self, pregunta: &Pregunta) -> ApiResult<()> {
        let actual = self
            .preguntas
            .iter_mut()
            .find(|p| p.id == pregunta.id)
            .ok_or_else(|| no_encontrado("Pregunta no encontrada"))?;
        *actual = pregunta.clone();
        Ok(())
    }
}

fn no_encontrado(mensaje: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        mensaje: mensaje.to_string(),
    }
}

fn conflicto(mensaje: &str) -> ApiError {
    ApiError::Http {
        status: 409,
        mensaje: mensaje.to_string(),
    }
}

/// Backend en memoria con las mismas reglas que aplica el servidor real
/// (un solo evento visible, borrado en cascada, dificultades en uso).
#[derive(Default)]
pub struct MemoriaBackend {
    estado: Mutex<Estado>,
}

impl MemoriaBackend {
    pub fn vacio() -> Self {
        Self::default()
    }

    /// Datos de ejemplo para el modo demo.
    pub fn demo() -> Self {
        let backend = Self::vacio();
        {
            let mut st = backend.estado();
            for nombre in ["Fácil", "Medio", "Difícil", "Experto"] {
                let id = st.nuevo_id();
                st.dificultades.push(Dificultad {
                    id,
                    nombre: nombre.into(),
                    is_active: true,
                });
            }

            let evento_id = st.nuevo_id();
            st.eventos.push(Evento {
                id: evento_id,
                nombre: "Concurso de Conocimientos Generales".into(),
                descripcion: Some("Evento principal por Fiestas Patrias".into()),
                fecha: Some("2025-07-28".into()),
                is_active: true,
                is_visible: true,
                ..Evento::default()
            });
            let nivel_id = st.nuevo_id();
            st.niveles.push(EventoDificultad {
                id: Some(nivel_id),
                evento_id,
                dificultad_id: 1,
                is_active: true,
            });
            let mut alternativas = Alternativa::plantilla(TipoPregunta::Alternativa, 0);
            for (alt, texto) in alternativas
                .iter_mut()
                .zip(["Cusco", "Arequipa", "Lima", "Trujillo"])
            {
                alt.texto = texto.into();
                alt.respuesta_correcta = texto == "Lima";
            }
            st.insertar_pregunta(&Pregunta {
                pregunta: "¿Cuál es la capital del Perú?".into(),
                alternativas,
                ..Pregunta::nueva(Some(nivel_id))
            });

            let rapida_id = st.nuevo_id();
            st.eventos.push(Evento {
                id: rapida_id,
                nombre: "Trivia rápida".into(),
                fecha: Some("2025-08-15".into()),
                is_active: true,
                is_predeterminado: true,
                ..Evento::default()
            });
            st.insertar_pregunta(&Pregunta {
                evento_id: Some(rapida_id),
                tipo: TipoPregunta::VerdaderoFalso,
                pregunta: "El Amazonas es el río más caudaloso del mundo".into(),
                alternativas: Alternativa::plantilla(TipoPregunta::VerdaderoFalso, 0),
                ..Pregunta::nueva(None)
            });

            st.configuracion.preguntas_por_ronda = Some(5);
            st.configuracion.preguntas_para_ganar = Some(3);
        }
        backend
    }

    fn estado(&self) -> MutexGuard<'_, Estado> {
        self.estado.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn registrar(&self, llamada: String) -> ApiResult<MutexGuard<'_, Estado>> {
        let mut st = self.estado();
        let falla = st.fallos.iter().any(|f| llamada.starts_with(f.as_str()));
        st.llamadas.push(llamada);
        if falla {
            return Err(ApiError::Http {
                status: 500,
                mensaje: String::new(),
            });
        }
        Ok(st)
    }

    /// Hace fallar toda llamada cuyo `METODO /ruta` empiece por `prefijo`.
    pub fn fallar_en(&self, prefijo: &str) {
        self.estado().fallos.push(prefijo.to_string());
    }

    /// Llamadas recibidas, en orden (`"GET /eventos"`, ...).
    pub fn llamadas(&self) -> Vec<String> {
        self.estado().llamadas.clone()
    }

    pub fn limpiar_llamadas(&self) {
        self.estado().llamadas.clear();
    }
}

impl Backend for MemoriaBackend {
    fn listar_eventos(&self) -> ApiResult<Vec<Evento>> {
        Ok(self.registrar("GET /eventos".into())?.eventos.clone())
    }

    fn obtener_evento(&self, id: u64) -> ApiResult<Evento> {
        let st = self.registrar(format!("GET /eventos/{id}"))?;
        st.eventos
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| no_encontrado("Evento no encontrado"))
    }

    fn crear_evento(&self, evento: &Evento) -> ApiResult<()> {
        let mut st = self.registrar("POST /eventos".into())?;
        let id = st.nuevo_id();
        if evento.is_visible {
            st.eventos.iter_mut().for_each(|e| e.is_visible = false);
        }
        st.eventos.push(Evento {
            id,
            ..evento.clone()
        });
        Ok(())
    }

    fn actualizar_evento(&self, evento: &Evento) -> ApiResult<()> {
        let mut st = self.registrar(format!("PUT /eventos/{}", evento.id))?;
        if evento.is_visible {
            st.eventos
                .iter_mut()
                .filter(|e| e.id != evento.id)
                .for_each(|e| e.is_visible = false);
        }
        let actual = st
            .eventos
            .iter_mut()
            .find(|e| e.id == evento.id)
            .ok_or_else(|| no_encontrado("Evento no encontrado"))?;
        *actual = evento.clone();
        Ok(())
    }

    fn eliminar_evento(&self, id: u64) -> ApiResult<()> {
        let mut st = self.registrar(format!("DELETE /eventos/{id}"))?;
        if !st.eventos.iter().any(|e| e.id == id) {
            return Err(no_encontrado("Evento no encontrado"));
        }
        let niveles: Vec<u64> = st
            .niveles
            .iter()
            .filter(|n| n.evento_id == id)
            .filter_map(|n| n.id)
            .collect();
        st.eventos.retain(|e| e.id != id);
        st.niveles.retain(|n| n.evento_id != id);
        st.preguntas.retain(|p| {
            p.evento_id != Some(id)
                && !p
                    .evento_dificultad_id
                    .is_some_and(|ed| niveles.contains(&ed))
        });
        Ok(())
    }

    fn marcar_visible(&self, id: u64, visible: bool) -> ApiResult<()> {
        let mut st = self.registrar(format!("PUT /eventos/{id}/visible"))?;
        if !st.eventos.iter().any(|e| e.id == id) {
            return Err(no_encontrado("Evento no encontrado"));
        }
        for e in &mut st.eventos {
            if e.id == id {
                e.is_visible = visible;
            } else if visible {
                e.is_visible = false;
            }
        }
        Ok(())
    }

    fn marcar_predeterminado(&self, id: u64, predeterminado: bool) -> ApiResult<()> {
        let mut st = self.registrar(format!("PUT /eventos/{id}/predeterminado"))?;
        let evento = st
            .eventos
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| no_encontrado("Evento no encontrado"))?;
        evento.is_predeterminado = predeterminado;
        Ok(())
    }

    fn listar_dificultades(&self) -> ApiResult<Vec<Dificultad>> {
        Ok(self.registrar("GET /dificultades".into())?.dificultades.clone())
    }

    fn crear_dificultad(&self, dificultad: &Dificultad) -> ApiResult<()> {
        let mut st = self.registrar("POST /dificultades".into())?;
        let id = st.nuevo_id();
        st.dificultades.push(Dificultad {
            id,
            ..dificultad.clone()
        });
        Ok(())
    }

    fn actualizar_dificultad(&self, dificultad: &Dificultad) -> ApiResult<()> {
        let mut st = self.registrar(format!("PUT /dificultades/{}", dificultad.id))?;
        let actual = st
            .dificultades
            .iter_mut()
            .find(|d| d.id == dificultad.id)
            .ok_or_else(|| no_encontrado("Dificultad no encontrada"))?;
        *actual = dificultad.clone();
        Ok(())
    }

    fn eliminar_dificultad(&self, id: u64) -> ApiResult<()> {
        let mut st = self.registrar(format!("DELETE /dificultades/{id}"))?;
        if st.niveles.iter().any(|n| n.dificultad_id == id) {
            return Err(conflicto("La dificultad está asignada a un evento"));
        }
        st.dificultades.retain(|d| d.id != id);
        Ok(())
    }

    fn listar_evento_dificultades(&self, evento_id: u64) -> ApiResult<Vec<EventoDificultadList>> {
        let st = self.registrar(format!("GET /evento-dificultad/{evento_id}"))?;
        let evento = st
            .eventos
            .iter()
            .find(|e| e.id == evento_id)
            .cloned()
            .unwrap_or_default();
        Ok(st
            .niveles
            .iter()
            .filter(|n| n.evento_id == evento_id)
            .filter_map(|n| {
                let id = n.id?;
                let dificultad = st
                    .dificultades
                    .iter()
                    .find(|d| d.id == n.dificultad_id)
                    .cloned()
                    .unwrap_or_default();
                let cantidad_preguntas = st
                    .preguntas
                    .iter()
                    .filter(|p| p.evento_dificultad_id == Some(id))
                    .count() as u64;
                Some(EventoDificultadList {
                    id,
                    evento: evento.clone(),
                    dificultad,
                    cantidad_preguntas,
                    is_active: n.is_active,
                })
            })
            .collect())
    }

    fn crear_evento_dificultad(&self, ed: &EventoDificultad) -> ApiResult<()> {
        let mut st = self.registrar("POST /evento-dificultad".into())?;
        if st
            .niveles
            .iter()
            .any(|n| n.evento_id == ed.evento_id && n.dificultad_id == ed.dificultad_id)
        {
            return Err(conflicto("La dificultad ya está asignada a este evento"));
        }
        let id = st.nuevo_id();
        st.niveles.push(EventoDificultad {
            id: Some(id),
            ..ed.clone()
        });
        Ok(())
    }

    fn actualizar_evento_dificultad(&self, ed: &EventoDificultad) -> ApiResult<()> {
        let id = ed.id.ok_or(ApiError::SinDatos("el id del nivel"))?;
        let mut st = self.registrar(format!("PUT /evento-dificultad/{id}"))?;
        let actual = st
            .niveles
            .iter_mut()
            .find(|n| n.id == Some(id))
            .ok_or_else(|| no_encontrado("Nivel no encontrado"))?;
        *actual = ed.clone();
        Ok(())
    }

    fn eliminar_evento_dificultad(&self, id: u64) -> ApiResult<()> {
        let mut st = self.registrar(format!("DELETE /evento-dificultad/{id}"))?;
        st.niveles.retain(|n| n.id != Some(id));
        st.preguntas.retain(|p| p.evento_dificultad_id != Some(id));
        Ok(())
    }

    fn preguntas_de_evento_dificultad(&self, evento_dificultad_id: u64) -> ApiResult<Vec<Pregunta>> {
        let st = self.registrar(format!("GET /evento-dificultad/{evento_dificultad_id}/preguntas"))?;
        Ok(st
            .preguntas
            .iter()
            .filter(|p| p.evento_dificultad_id == Some(evento_dificultad_id))
            .cloned()
            .collect())
    }

    fn preguntas_de_evento_completo(&self, evento_id: u64) -> ApiResult<Vec<Pregunta>> {
        let st = self.registrar(format!("GET /eventos/{evento_id}/preguntas-completo"))?;
        Ok(st
            .preguntas
            .iter()
            .filter(|p| p.evento_id == Some(evento_id))
            .cloned()
            .collect())
    }

    fn contar_preguntas_evento(&self, evento_id: u64) -> ApiResult<u64> {
        let st = self.registrar(format!("GET /eventos/{evento_id}/preguntas/count"))?;
        Ok(st
            .preguntas
            .iter()
            .filter(|p| p.evento_id == Some(evento_id))
            .count() as u64)
    }

    fn crear_pregunta(&self, pregunta: &Pregunta) -> ApiResult<()> {
        self.registrar("POST /preguntas".into())?
            .insertar_pregunta(pregunta);
        Ok(())
    }

    fn actualizar_pregunta(&self, pregunta: &Pregunta) -> ApiResult<()> {
        self.registrar(format!("PUT /preguntas/{}", pregunta.id))?
            .reemplazar_pregunta(pregunta)
    }

    fn actualizar_pregunta_completa(&self, pregunta: &Pregunta) -> ApiResult<()> {
        self.registrar(format!("PUT /preguntas/{}/completo", pregunta.id))?
            .reemplazar_pregunta(pregunta)
    }

    fn eliminar_pregunta(&self, id: u64) -> ApiResult<()> {
        let mut st = self.registrar(format!("DELETE /preguntas/{id}"))?;
        st.preguntas.retain(|p| p.id != id);
        Ok(())
    }

    fn crear_preguntas_masivo(&self, preguntas: &[Pregunta]) -> ApiResult<Vec<Pregunta>> {
        let mut st = self.registrar(format!("POST /preguntas/create/masivo [{}]", preguntas.len()))?;
        Ok(preguntas.iter().map(|p| st.insertar_pregunta(p)).collect())
    }

    fn actualizar_preguntas_masivo(&self, preguntas: &[Pregunta]) -> ApiResult<()> {
        let mut st = self.registrar(format!("PUT /preguntas/update/masivo [{}]", preguntas.len()))?;
        preguntas.iter().try_for_each(|p| st.reemplazar_pregunta(p))
    }

    fn obtener_configuracion(&self) -> ApiResult<Configuracion> {
        Ok(self.registrar("GET /configuracion".into())?.configuracion.clone())
    }

    fn actualizar_config_foto(&self, foto: &FotoConfig) -> ApiResult<()> {
        let mut st = self.registrar("PUT /configuracion/foto".into())?;
        st.configuracion.is_active = foto.is_active;
        st.configuracion.is_active_impresora = foto.is_active_impresora;
        Ok(())
    }

    fn actualizar_config_trivia(&self, trivia: &TriviaConfig) -> ApiResult<()> {
        let mut st = self.registrar("PUT /configuracion/trivia".into())?;
        let cfg = &mut st.configuracion;
        cfg.text_color_pregunta = Some(trivia.text_color_pregunta.clone());
        cfg.text_color_alternativa = Some(trivia.text_color_alternativa.clone());
        cfg.color_boton_alternativa = Some(trivia.color_boton_alternativa.clone());
        cfg.color_letra_alternativa = Some(trivia.color_letra_alternativa.clone());
        cfg.color_numeracion = Some(trivia.color_numeracion.clone());
        cfg.preguntas_por_ronda = trivia.preguntas_por_ronda;
        cfg.preguntas_para_ganar = trivia.preguntas_para_ganar;
        Ok(())
    }
}

#[cfg(test)]
impl MemoriaBackend {
    pub(crate) fn agregar_evento(&self, evento: Evento) -> u64 {
        let mut st = self.estado();
        let id = st.nuevo_id();
        st.eventos.push(Evento { id, ..evento });
        id
    }

    pub(crate) fn preguntas(&self) -> Vec<Pregunta> {
        self.estado().preguntas.clone()
    }

    pub(crate) fn agregar_dificultad(&self, nombre: &str) -> u64 {
        let mut st = self.estado();
        let id = st.nuevo_id();
        st.dificultades.push(Dificultad {
            id,
            nombre: nombre.into(),
            is_active: true,
        });
        id
    }

    pub(crate) fn agregar_nivel(&self, evento_id: u64, dificultad_id: u64) -> u64 {
        let mut st = self.estado();
        let id = st.nuevo_id();
        st.niveles.push(EventoDificultad {
            id: Some(id),
            evento_id,
            dificultad_id,
            is_active: true,
        });
        id
    }

    pub(crate) fn agregar_pregunta(&self, pregunta: &Pregunta) -> Pregunta {
        self.estado().insertar_pregunta(pregunta)
    }
}
