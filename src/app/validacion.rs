use thiserror::Error;

/// Errores de formulario: bloquean el envío y nunca llegan al backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorValidacion {
    #[error("El nombre es obligatorio.")]
    NombreRequerido,
    #[error("La fecha es obligatoria.")]
    FechaRequerida,
    #[error("Fecha inválida \"{0}\" (use AAAA-MM-DD).")]
    FechaInvalida(String),
    #[error("Seleccione una dificultad.")]
    DificultadRequerida,
    #[error("La dificultad {0} ya está asignada a este evento.")]
    DificultadRepetida(String),
    #[error("Escriba el enunciado de la pregunta.")]
    PreguntaVacia,
    #[error("La pregunta necesita al menos una alternativa.")]
    SinAlternativas,
    #[error("La alternativa {0} no tiene texto.")]
    AlternativaVacia(String),
    #[error("Seleccione una respuesta correcta.")]
    SinRespuestaCorrecta,
    #[error("Solo puede haber una respuesta correcta.")]
    VariasCorrectas,
    #[error("Las preguntas para ganar ({ganar}) no pueden superar las preguntas por ronda ({ronda}).")]
    UmbralInvalido { ganar: u32, ronda: u32 },
    #[error("Las preguntas por ronda y para ganar deben ser mayores que cero.")]
    UmbralCero,
}
