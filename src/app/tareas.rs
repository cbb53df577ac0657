use super::*;
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Operación contra el backend que corre fuera del hilo de la UI.
pub type Accion<P> = Box<dyn FnOnce(&mut P, &dyn Backend, &mut Efectos) + Send>;

/// Empaqueta una operación de página para lanzarla después con [`AdminApp::lanzar_en`].
pub fn accion<P, F>(f: F) -> Accion<P>
where
    F: FnOnce(&mut P, &dyn Backend, &mut Efectos) + Send + 'static,
{
    Box::new(f)
}

/// Tarea en vuelo: trabaja sobre una copia de la página y la devuelve al terminar.
pub struct TareaEnCurso {
    pub mensaje: String,
    rx: Receiver<(Pagina, Efectos)>,
}

/// Acceso tipado a la página concreta dentro de [`Pagina`].
pub trait ComoPagina: Sized {
    fn desde(pagina: &mut Pagina) -> Option<&mut Self>;
}

macro_rules! como_pagina {
    ($tipo:ty, $variante:ident) => {
        impl ComoPagina for $tipo {
            fn desde(pagina: &mut Pagina) -> Option<&mut Self> {
                match pagina {
                    Pagina::$variante(p) => Some(p),
                    _ => None,
                }
            }
        }
    };
}

como_pagina!(EventosPage, Eventos);
como_pagina!(EventoDificultadesPage, EventoDificultades);
como_pagina!(PreguntasPage, Preguntas);
como_pagina!(DificultadesPage, Dificultades);
como_pagina!(ConfiguracionPage, Configuracion);

impl AdminApp {
    pub fn cargando(&self) -> bool {
        self.tarea.is_some()
    }

    pub fn mensaje_carga(&self) -> Option<&str> {
        self.tarea.as_ref().map(|t| t.mensaje.as_str())
    }

    /// Lanza `accion` en un hilo aparte. Solo hay una tarea a la vez.
    pub fn lanzar<F>(&mut self, mensaje: &str, accion: F)
    where
        F: FnOnce(&mut Pagina, &dyn Backend, &mut Efectos) + Send + 'static,
    {
        if self.tarea.is_some() {
            log::warn!("Ya hay una operación en curso; se ignora \"{mensaje}\"");
            return;
        }

        let mut pagina = self.pagina.clone();
        let backend = Arc::clone(&self.backend);
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let mut fx = Efectos::default();
            accion(&mut pagina, backend.as_ref(), &mut fx);
            let _ = tx.send((pagina, fx));
        });

        self.tarea = Some(TareaEnCurso {
            mensaje: mensaje.to_string(),
            rx,
        });
    }

    pub fn lanzar_en<P, F>(&mut self, mensaje: &str, accion: F)
    where
        P: ComoPagina,
        F: FnOnce(&mut P, &dyn Backend, &mut Efectos) + Send + 'static,
    {
        self.lanzar(mensaje, move |pagina, api, fx| {
            if let Some(p) = P::desde(pagina) {
                accion(p, api, fx);
            }
        });
    }

    /// Revisa si la tarea terminó. Devuelve `true` cuando cambió algo.
    pub fn sondear_tarea(&mut self) -> bool {
        let Some(tarea) = &self.tarea else {
            return false;
        };

        match tarea.rx.try_recv() {
            Ok((pagina, fx)) => {
                self.tarea = None;
                self.pagina = pagina;
                self.aplicar(fx);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                // el hilo murió sin responder; la bandera de carga se limpia igual
                log::error!("La tarea \"{}\" terminó sin respuesta", tarea.mensaje);
                self.tarea = None;
                self.toasts
                    .push(Toast::error("Ocurrió un error inesperado al procesar la operación"));
                true
            }
        }
    }

    /// Aplica los efectos de una operación: toasts y navegación.
    pub fn aplicar(&mut self, fx: Efectos) {
        let Efectos { avisos, navegar } = fx;
        for aviso in avisos {
            self.toasts.push(aviso);
        }
        if let Some((ruta, estado)) = navegar {
            self.navegar_con(ruta, estado);
        }
    }
}
