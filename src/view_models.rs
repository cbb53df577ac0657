// src/view_models.rs

use crate::model::{Evento, EventoDificultadList, Pregunta};

/// Fila de la tabla de niveles de un evento.
#[derive(Clone, Debug, PartialEq)]
pub struct FilaNivel {
    pub id: u64,          // 0 = nivel implícito de un evento predeterminado
    pub dificultad_id: u64,
    pub dificultad: String,
    pub cantidad_preguntas: u64,
    pub activo: bool,
}

impl FilaNivel {
    pub fn desde(item: &EventoDificultadList) -> Self {
        Self {
            id: item.id,
            dificultad_id: item.dificultad.id,
            dificultad: item.dificultad.nombre.clone(),
            cantidad_preguntas: item.cantidad_preguntas,
            activo: item.is_active,
        }
    }

    pub fn predeterminada(cantidad_preguntas: u64) -> Self {
        Self {
            id: 0,
            dificultad_id: 0,
            dificultad: "Default".to_string(),
            cantidad_preguntas,
            activo: true,
        }
    }

    pub fn es_predeterminada(&self) -> bool {
        self.id == 0
    }

    pub fn label(&self) -> String {
        match self.cantidad_preguntas {
            0 => format!("{} (sin preguntas)", self.dificultad),
            1 => format!("{} (1 pregunta)", self.dificultad),
            n => format!("{} ({n} preguntas)", self.dificultad),
        }
    }
}

/// Fila de la tabla de eventos.
#[derive(Clone, Debug)]
pub struct FilaEvento {
    pub id: u64,
    pub nombre: String,
    pub fecha: String,
    pub activo: bool,
    pub visible: bool,
    pub predeterminado: bool,
}

impl FilaEvento {
    pub fn desde(evento: &Evento) -> Self {
        Self {
            id: evento.id,
            nombre: evento.nombre.clone(),
            fecha: evento.fecha_corta().to_string(),
            activo: evento.is_active,
            visible: evento.is_visible,
            predeterminado: evento.is_predeterminado,
        }
    }

    pub fn estado(&self) -> &'static str {
        if self.activo { "Activo" } else { "Inactivo" }
    }

    pub fn modo(&self) -> &'static str {
        if self.predeterminado {
            "Predeterminado"
        } else {
            "Con dificultades"
        }
    }
}

/// Resumen de una pregunta para tablas y para la lista pendiente.
#[derive(Clone, Debug)]
pub struct FilaPregunta {
    pub numero: usize, // 1-based
    pub enunciado: String,
    pub tipo: &'static str,
    pub alternativas: usize,
    pub correcta: Option<String>,
    pub activa: bool,
}

impl FilaPregunta {
    pub fn desde(idx: usize, pregunta: &Pregunta) -> Self {
        Self {
            numero: idx + 1,
            enunciado: pregunta.pregunta.clone(),
            tipo: pregunta.tipo.label(),
            alternativas: pregunta.alternativas.len(),
            correcta: pregunta
                .correcta()
                .map(|a| format!("{}) {}", a.opcion, a.texto)),
            activa: pregunta.is_active,
        }
    }

    /// Enunciado recortado para celdas estrechas.
    pub fn resumen(&self, max: usize) -> String {
        if self.enunciado.chars().count() <= max {
            self.enunciado.clone()
        } else {
            let corto: String = self.enunciado.chars().take(max.saturating_sub(1)).collect();
            format!("{corto}…")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alternativa, Dificultad, TipoPregunta};

    #[test]
    fn fila_nivel_desde_listado() {
        let item = EventoDificultadList {
            id: 6,
            dificultad: Dificultad {
                id: 2,
                nombre: "Medio".into(),
                is_active: true,
            },
            cantidad_preguntas: 3,
            is_active: false,
            ..EventoDificultadList::default()
        };
        let fila = FilaNivel::desde(&item);
        assert_eq!(fila.dificultad_id, 2);
        assert!(!fila.activo);
        assert!(!fila.es_predeterminada());
        assert_eq!(fila.label(), "Medio (3 preguntas)");
    }

    #[test]
    fn fila_predeterminada() {
        let fila = FilaNivel::predeterminada(1);
        assert!(fila.es_predeterminada());
        assert_eq!(fila.label(), "Default (1 pregunta)");
    }

    #[test]
    fn fila_pregunta_muestra_la_correcta() {
        let pregunta = Pregunta {
            tipo: TipoPregunta::VerdaderoFalso,
            pregunta: "El sol es una estrella".into(),
            alternativas: Alternativa::plantilla(TipoPregunta::VerdaderoFalso, 0),
            ..Pregunta::nueva(None)
        };
        let fila = FilaPregunta::desde(0, &pregunta);
        assert_eq!(fila.numero, 1);
        assert_eq!(fila.correcta.as_deref(), Some("A) Verdadero"));
        assert_eq!(fila.resumen(7), "El sol…");
        assert_eq!(fila.resumen(100), "El sol es una estrella");
    }
}
