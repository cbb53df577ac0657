use crate::api::{ApiError, ApiResult, Backend};
use crate::app::{Efectos, ErrorValidacion};
use crate::model::Configuracion;

#[derive(Clone, Debug, Default)]
pub struct ConfiguracionPage {
    pub config: Configuracion,
    pub cargada: bool,
}

/// Umbrales de la ronda: ambos > 0 y ganar ≤ ronda cuando están definidos.
pub fn validar_umbrales(config: &Configuracion) -> Result<(), ErrorValidacion> {
    let (ronda, ganar) = (config.preguntas_por_ronda, config.preguntas_para_ganar);
    if ronda == Some(0) || ganar == Some(0) {
        return Err(ErrorValidacion::UmbralCero);
    }
    match (ronda, ganar) {
        (Some(ronda), Some(ganar)) if ganar > ronda => {
            Err(ErrorValidacion::UmbralInvalido { ganar, ronda })
        }
        _ => Ok(()),
    }
}

impl ConfiguracionPage {
    pub fn cargar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        match api.obtener_configuracion() {
            Ok(config) => {
                // colores a #RRGGBB; vacíos o inválidos al valor por defecto
                let trivia = config.trivia();
                self.config = Configuracion {
                    text_color_pregunta: Some(trivia.text_color_pregunta),
                    text_color_alternativa: Some(trivia.text_color_alternativa),
                    color_boton_alternativa: Some(trivia.color_boton_alternativa),
                    color_letra_alternativa: Some(trivia.color_letra_alternativa),
                    color_numeracion: Some(trivia.color_numeracion),
                    ..config
                };
                self.cargada = true;
            }
            Err(err) => fx.error(err.mensaje_usuario("Error al cargar la configuración")),
        }
    }

    pub fn validar(&self) -> Result<(), ErrorValidacion> {
        validar_umbrales(&self.config)
    }

    /// Envía los dos grupos a la vez; solo es éxito si ambos lo son.
    pub fn guardar(&mut self, api: &dyn Backend, fx: &mut Efectos) {
        if let Err(err) = self.validar() {
            fx.aviso("Atención", err.to_string());
            return;
        }

        let foto = self.config.foto();
        let trivia = self.config.trivia();
        let (r_foto, r_trivia): (ApiResult<()>, ApiResult<()>) = std::thread::scope(|s| {
            let h_foto = s.spawn(|| api.actualizar_config_foto(&foto));
            let r_trivia = api.actualizar_config_trivia(&trivia);
            let r_foto = h_foto.join().unwrap_or_else(|_| {
                Err(ApiError::Backend(
                    "La actualización de foto terminó inesperadamente".into(),
                ))
            });
            (r_foto, r_trivia)
        });

        match r_foto.and(r_trivia) {
            Ok(()) => fx.exito("Configuración actualizada correctamente"),
            Err(err) => {
                log::error!("Error al guardar configuración: {err}");
                fx.error(err.mensaje_usuario("Ocurrió un error al guardar la configuración"));
            }
        }
    }
}
