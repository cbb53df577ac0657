pub mod configuracion;
pub mod dificultades;
pub mod evento_dificultades;
pub mod eventos;
pub mod preguntas;
