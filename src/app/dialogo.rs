/// Estado de un diálogo de formulario.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EstadoDialogo {
    #[default]
    Cerrado,
    Nuevo,
    Editando,
}

impl EstadoDialogo {
    pub fn abierto(&self) -> bool {
        !matches!(self, EstadoDialogo::Cerrado)
    }

    pub fn titulo(&self, que: &str) -> String {
        match self {
            EstadoDialogo::Editando => format!("Editar {que}"),
            _ => format!("Nuevo {que}"),
        }
    }
}

/// Acción que espera el "Sí" del usuario.
#[derive(Clone, Debug, PartialEq)]
pub struct Confirmacion<A> {
    pub titulo: String,
    pub mensaje: String,
    pub accion: A,
}

impl<A> Confirmacion<A> {
    pub fn new(titulo: &str, mensaje: impl Into<String>, accion: A) -> Self {
        Self {
            titulo: titulo.to_string(),
            mensaje: mensaje.into(),
            accion,
        }
    }
}
