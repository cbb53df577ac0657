use crate::api::Backend;
use crate::app::{Confirmacion, Efectos, ErrorValidacion, EstadoDialogo};
use crate::model::Dificultad;

#[derive(Clone, Debug, Default)]
pub struct DificultadesPage {
    pub dificultades: Vec<Dificultad>,
    pub dialogo: EstadoDialogo,
    pub form: Dificultad,
    pub enviado: bool,
    pub confirmacion: Option<Confirmacion<Dificultad>>,
}

impl DificultadesPage {
    pub fn cargar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        match api.listar_dificultades() {
            Ok(lista) => self.dificultades = lista,
            Err(err) => fx.error(err.mensaje_usuario("Error al cargar dificultades")),
        }
    }

    pub fn abrir_nueva(&mut self) {
        self.form = Dificultad {
            is_active: true,
            ..Dificultad::default()
        };
        self.enviado = false;
        self.dialogo = EstadoDialogo::Nuevo;
    }

    pub fn editar(&mut self, dificultad: &Dificultad) {
        self.form = dificultad.clone();
        self.enviado = false;
        self.dialogo = EstadoDialogo::Editando;
    }

    pub fn cerrar_dialogo(&mut self) {
        self.dialogo = EstadoDialogo::Cerrado;
        self.enviado = false;
    }

    pub fn guardar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        self.enviado = true;
        let nombre = self.form.nombre.trim().to_string();
        if nombre.is_empty() {
            fx.aviso("Incompleto", ErrorValidacion::NombreRequerido.to_string());
            return;
        }
        let dificultad = Dificultad {
            nombre,
            ..self.form.clone()
        };
        let resultado = if self.dialogo == EstadoDialogo::Editando {
            api.actualizar_dificultad(&dificultad)
        } else {
            api.crear_dificultad(&dificultad)
        };
        match resultado {
            Ok(()) => {
                fx.exito("Dificultad guardada");
                self.cerrar_dialogo();
                self.cargar(api, fx);
            }
            Err(err) => fx.error(err.mensaje_usuario("Error al guardar dificultad")),
        }
    }

    pub fn solicitar_eliminar(&mut self, dificultad: &Dificultad) {
        self.confirmacion = Some(Confirmacion::new(
            "Confirmar",
            format!("¿Estás seguro de eliminar la dificultad \"{}\"?", dificultad.nombre),
            dificultad.clone(),
        ));
    }

    pub fn cancelar_confirmacion(&mut self) {
        self.confirmacion = None;
    }

    pub fn confirmar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        let Some(Confirmacion { accion: dificultad, .. }) = self.confirmacion.take() else {
            return;
        };
        match api.eliminar_dificultad(dificultad.id) {
            Ok(()) => {
                self.dificultades.retain(|d| d.id != dificultad.id);
                fx.exito("Dificultad eliminada");
            }
            Err(err) => {
                log::warn!("No se pudo eliminar la dificultad {}: {err}", dificultad.id);
                fx.error(err.mensaje_usuario("Error al eliminar dificultad"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoriaBackend;
    use crate::app::Severidad;

    fn cargada(api: &MemoriaBackend) -> DificultadesPage {
        let mut p = DificultadesPage::default();
        p.cargar(api, &mut Efectos::default());
        api.limpiar_llamadas();
        p
    }

    #[test]
    fn crear_requiere_nombre() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api);
        let mut fx = Efectos::default();

        p.abrir_nueva();
        p.form.nombre = "   ".into();
        p.guardar(&api, &mut fx);
        assert!(api.llamadas().is_empty());
        assert_eq!(fx.severidades(), vec![Severidad::Aviso]);

        p.form.nombre = " Leyenda ".into();
        p.guardar(&api, &mut fx);
        assert_eq!(api.llamadas(), vec!["POST /dificultades", "GET /dificultades"]);
        assert!(p.dificultades.iter().any(|d| d.nombre == "Leyenda"));
        assert!(!p.dialogo.abierto());
    }

    #[test]
    fn renombrar_dificultad() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api);
        let medio = p.dificultades[1].clone();

        p.editar(&medio);
        p.form.nombre = "Intermedio".into();
        p.guardar(&api, &mut Efectos::default());
        assert_eq!(api.llamadas()[0], format!("PUT /dificultades/{}", medio.id));
        assert_eq!(p.dificultades[1].nombre, "Intermedio");
    }

    #[test]
    fn borrado_rechazado_conserva_la_lista() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api);
        let mut fx = Efectos::default();
        // "Fácil" está asignada al evento de ejemplo
        let facil = p.dificultades[0].clone();

        p.solicitar_eliminar(&facil);
        p.confirmar(&api, &mut fx);

        assert_eq!(p.dificultades.len(), 4);
        assert_eq!(fx.avisos.len(), 1);
        assert_eq!(fx.avisos[0].severidad, Severidad::Error);
        assert_eq!(fx.avisos[0].detalle, "La dificultad está asignada a un evento");
    }

    #[test]
    fn borrado_libre() {
        let api = MemoriaBackend::demo();
        let mut p = cargada(&api);
        let experto = p.dificultades[3].clone();

        p.solicitar_eliminar(&experto);
        p.confirmar(&api, &mut Efectos::default());
        assert_eq!(p.dificultades.len(), 3);
        assert!(p.confirmacion.is_none());
    }
}
