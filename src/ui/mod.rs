mod helpers;
pub mod layout;
pub mod views;

use crate::app::{AdminApp, Pagina};
use eframe::{App, Frame};
use egui::Context;
use layout::{bottom_panel, overlay_carga, side_panel, toasts_area, top_panel};
use std::time::{Duration, Instant};

impl App for AdminApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // respuesta del hilo de trabajo, si llegó
        if self.sondear_tarea() {
            ctx.request_repaint();
        }
        self.toasts.purgar(Instant::now());

        top_panel(self, ctx);
        side_panel(self, ctx);
        // PANEL INFERIOR TEMA OSCURO O CLARO
        bottom_panel(self, ctx);

        // Dispatch por página a las funciones de views/
        match self.pagina {
            Pagina::Eventos(_) => views::eventos::ui_eventos(self, ctx),
            Pagina::EventoDificultades(_) => {
                views::evento_dificultades::ui_evento_dificultades(self, ctx)
            }
            Pagina::Preguntas(_) => views::preguntas::ui_preguntas(self, ctx),
            Pagina::Dificultades(_) => views::dificultades::ui_dificultades(self, ctx),
            Pagina::Configuracion(_) => views::configuracion::ui_configuracion(self, ctx),
        }

        overlay_carga(self, ctx);
        toasts_area(self, ctx);

        if self.cargando() || !self.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
