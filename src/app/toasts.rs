use std::time::{Duration, Instant};

pub const VIDA_POR_DEFECTO: Duration = Duration::from_secs(3);
const VIDA_ERROR: Duration = Duration::from_secs(6);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severidad {
    Exito,
    Info,
    Aviso,
    Error,
}

/// Notificación pasajera (esquina inferior derecha).
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub severidad: Severidad,
    pub resumen: String,
    pub detalle: String,
    pub vida: Duration,
}

impl Toast {
    pub fn nuevo(severidad: Severidad, resumen: &str, detalle: impl Into<String>) -> Self {
        let vida = match severidad {
            Severidad::Error => VIDA_ERROR,
            _ => VIDA_POR_DEFECTO,
        };
        Self {
            severidad,
            resumen: resumen.to_string(),
            detalle: detalle.into(),
            vida,
        }
    }

    pub fn exito(detalle: impl Into<String>) -> Self {
        Self::nuevo(Severidad::Exito, "Exitoso", detalle)
    }

    pub fn error(detalle: impl Into<String>) -> Self {
        Self::nuevo(Severidad::Error, "Error", detalle)
    }
}

/// Cola de toasts visibles, cada uno con su instante de alta.
#[derive(Default)]
pub struct Toasts {
    activos: Vec<(Toast, Instant)>,
}

impl Toasts {
    pub fn push(&mut self, toast: Toast) {
        match toast.severidad {
            Severidad::Error => log::warn!("{}: {}", toast.resumen, toast.detalle),
            _ => log::debug!("{}: {}", toast.resumen, toast.detalle),
        }
        self.activos.push((toast, Instant::now()));
    }

    /// Quita los que ya cumplieron su vida.
    pub fn purgar(&mut self, ahora: Instant) {
        self.activos
            .retain(|(t, alta)| ahora.saturating_duration_since(*alta) < t.vida);
    }

    pub fn cerrar(&mut self, idx: usize) {
        if idx < self.activos.len() {
            self.activos.remove(idx);
        }
    }

    pub fn visibles(&self) -> impl Iterator<Item = &Toast> {
        self.activos.iter().map(|(t, _)| t)
    }

    pub fn is_empty(&self) -> bool {
        self.activos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purgar_respeta_la_vida_de_cada_toast() {
        let mut toasts = Toasts::default();
        toasts.push(Toast::exito("guardado"));
        toasts.push(Toast::error("falló"));

        let despues = Instant::now() + Duration::from_secs(4);
        toasts.purgar(despues);

        let quedan: Vec<&str> = toasts.visibles().map(|t| t.detalle.as_str()).collect();
        assert_eq!(quedan, vec!["falló"]);

        toasts.cerrar(0);
        assert!(toasts.is_empty());
    }
}
