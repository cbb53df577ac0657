use egui::Color32;
use serde::{Deserialize, Deserializer, Serialize};

/// Color que usa el backend cuando la configuración no trae uno.
pub const COLOR_POR_DEFECTO: &str = "#2A64E1";

/// Letras de las alternativas, en orden.
pub const ETIQUETAS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

pub fn etiqueta(idx: usize) -> &'static str {
    ETIQUETAS.get(idx).copied().unwrap_or("?")
}

/// Sobre común de todas las respuestas del backend
#[derive(Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: String,
    pub response: Option<T>,
}

/// El backend devuelve los flags como `true`, `1`, `"1"` o `null` según el endpoint.
pub fn bool_flexible<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Bool(bool),
        Entero(i64),
        Decimal(f64),
        Texto(String),
    }

    Ok(match Option::<Flexible>::deserialize(deserializer)? {
        None => false,
        Some(Flexible::Bool(b)) => b,
        Some(Flexible::Entero(n)) => n != 0,
        Some(Flexible::Decimal(n)) => n != 0.0,
        Some(Flexible::Texto(s)) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
    })
}

fn activo_por_defecto() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Evento {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,
    #[serde(
        rename = "isActive",
        default = "activo_por_defecto",
        deserialize_with = "bool_flexible"
    )]
    pub is_active: bool,
    #[serde(rename = "isVisible", default, deserialize_with = "bool_flexible")]
    pub is_visible: bool,
    // Sin niveles de dificultad: un único nivel implícito "Default"
    #[serde(
        rename = "isPredeterminado",
        default,
        deserialize_with = "bool_flexible"
    )]
    pub is_predeterminado: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evento_dificultad: Vec<EventoDificultad>,
}

impl Evento {
    /// Fecha recortada a `YYYY-MM-DD` (el backend a veces manda ISO completo)
    pub fn fecha_corta(&self) -> &str {
        match self.fecha.as_deref() {
            Some(f) if f.len() >= 10 && f.is_char_boundary(10) => &f[..10],
            Some(f) => f,
            None => "",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Dificultad {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub nombre: String,
    #[serde(
        rename = "isActive",
        default = "activo_por_defecto",
        deserialize_with = "bool_flexible"
    )]
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EventoDificultad {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub evento_id: u64,
    pub dificultad_id: u64,
    #[serde(
        rename = "isActive",
        default = "activo_por_defecto",
        deserialize_with = "bool_flexible"
    )]
    pub is_active: bool,
}

/// Proyección de lectura para la tabla de niveles de un evento.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EventoDificultadList {
    pub id: u64,
    #[serde(default)]
    pub evento: Evento,
    #[serde(default)]
    pub dificultad: Dificultad,
    #[serde(default)]
    pub cantidad_preguntas: u64,
    #[serde(
        rename = "isActive",
        default = "activo_por_defecto",
        deserialize_with = "bool_flexible"
    )]
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipoPregunta {
    #[default]
    #[serde(rename = "alternativa")]
    Alternativa,
    #[serde(rename = "vf")]
    VerdaderoFalso,
}

impl TipoPregunta {
    pub fn label(&self) -> &'static str {
        match self {
            TipoPregunta::Alternativa => "Alternativa Múltiple",
            TipoPregunta::VerdaderoFalso => "Verdadero/Falso",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Alternativa {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub pregunta_id: u64,
    #[serde(default)]
    pub opcion: String,
    #[serde(default)]
    pub texto: String,
    #[serde(default, deserialize_with = "bool_flexible")]
    pub respuesta_correcta: bool,
    #[serde(
        rename = "isActive",
        default = "activo_por_defecto",
        deserialize_with = "bool_flexible"
    )]
    pub is_active: bool,
}

impl Alternativa {
    pub fn vacia(idx: usize, pregunta_id: u64) -> Self {
        Self {
            id: 0,
            pregunta_id,
            opcion: etiqueta(idx).to_string(),
            texto: String::new(),
            respuesta_correcta: false,
            is_active: true,
        }
    }

    /// Plantilla fija de alternativas para un tipo de pregunta
    pub fn plantilla(tipo: TipoPregunta, pregunta_id: u64) -> Vec<Alternativa> {
        match tipo {
            TipoPregunta::VerdaderoFalso => vec![
                Alternativa {
                    texto: "Verdadero".into(),
                    respuesta_correcta: true,
                    ..Alternativa::vacia(0, pregunta_id)
                },
                Alternativa {
                    texto: "Falso".into(),
                    ..Alternativa::vacia(1, pregunta_id)
                },
            ],
            TipoPregunta::Alternativa => (0..4).map(|i| Alternativa::vacia(i, pregunta_id)).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Pregunta {
    #[serde(default)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evento_dificultad_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evento_id: Option<u64>,
    #[serde(default)]
    pub tipo: TipoPregunta,
    #[serde(default)]
    pub pregunta: String,
    #[serde(
        rename = "isActive",
        default = "activo_por_defecto",
        deserialize_with = "bool_flexible"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub alternativas: Vec<Alternativa>,
}

impl Pregunta {
    /// Pregunta vacía de alternativa múltiple (A-D en blanco)
    pub fn nueva(evento_dificultad_id: Option<u64>) -> Self {
        Self {
            id: 0,
            evento_dificultad_id,
            evento_id: None,
            tipo: TipoPregunta::Alternativa,
            pregunta: String::new(),
            is_active: true,
            alternativas: Alternativa::plantilla(TipoPregunta::Alternativa, 0),
        }
    }

    pub fn es_nueva(&self) -> bool {
        self.id == 0
    }

    pub fn correcta(&self) -> Option<&Alternativa> {
        self.alternativas.iter().find(|a| a.respuesta_correcta)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Configuracion {
    #[serde(default)]
    pub id: u64,
    #[serde(
        rename = "isActive",
        default = "activo_por_defecto",
        deserialize_with = "bool_flexible"
    )]
    pub is_active: bool,
    #[serde(
        rename = "isActiveImpresora",
        default,
        deserialize_with = "bool_flexible"
    )]
    pub is_active_impresora: bool,
    #[serde(default)]
    pub text_color_pregunta: Option<String>,
    #[serde(default)]
    pub text_color_alternativa: Option<String>,
    #[serde(default)]
    pub color_boton_alternativa: Option<String>,
    #[serde(default)]
    pub color_letra_alternativa: Option<String>,
    #[serde(default)]
    pub color_numeracion: Option<String>,
    #[serde(default)]
    pub preguntas_por_ronda: Option<u32>,
    #[serde(default)]
    pub preguntas_para_ganar: Option<u32>,
}

impl Default for Configuracion {
    fn default() -> Self {
        Self {
            id: 1,
            is_active: true,
            is_active_impresora: true,
            text_color_pregunta: Some(COLOR_POR_DEFECTO.into()),
            text_color_alternativa: Some(COLOR_POR_DEFECTO.into()),
            color_boton_alternativa: Some(COLOR_POR_DEFECTO.into()),
            color_letra_alternativa: Some(COLOR_POR_DEFECTO.into()),
            color_numeracion: Some(COLOR_POR_DEFECTO.into()),
            preguntas_por_ronda: None,
            preguntas_para_ganar: None,
        }
    }
}

/// `#RRGGBB` en mayúsculas, sin alfa.
pub fn hex_desde_color(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

/// Lleva `#rgb`, `#rrggbb` y similares a `#RRGGBB`; `None` si no es un color.
pub fn normalizar_color(hex: &str) -> Option<String> {
    Color32::from_hex(hex.trim()).ok().map(hex_desde_color)
}

fn color_o_defecto(c: &Option<String>) -> String {
    c.as_deref()
        .and_then(normalizar_color)
        .unwrap_or_else(|| COLOR_POR_DEFECTO.to_string())
}

impl Configuracion {
    pub fn foto(&self) -> FotoConfig {
        FotoConfig {
            is_active_impresora: self.is_active_impresora,
            is_active: self.is_active,
        }
    }

    pub fn trivia(&self) -> TriviaConfig {
        TriviaConfig {
            text_color_pregunta: color_o_defecto(&self.text_color_pregunta),
            text_color_alternativa: color_o_defecto(&self.text_color_alternativa),
            color_boton_alternativa: color_o_defecto(&self.color_boton_alternativa),
            color_letra_alternativa: color_o_defecto(&self.color_letra_alternativa),
            color_numeracion: color_o_defecto(&self.color_numeracion),
            preguntas_por_ronda: self.preguntas_por_ronda,
            preguntas_para_ganar: self.preguntas_para_ganar,
        }
    }
}

/// Grupo "foto/impresora" de la configuración (`PUT /configuracion/foto`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FotoConfig {
    #[serde(rename = "isActiveImpresora")]
    pub is_active_impresora: bool,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

/// Grupo "apariencia de la trivia" (`PUT /configuracion/trivia`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TriviaConfig {
    pub text_color_pregunta: String,
    pub text_color_alternativa: String,
    pub color_boton_alternativa: String,
    pub color_letra_alternativa: String,
    pub color_numeracion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preguntas_por_ronda: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preguntas_para_ganar: Option<u32>,
}
