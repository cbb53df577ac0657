use crate::app::{AdminApp, ConfiguracionPage, Pagina, accion};
use crate::model::COLOR_POR_DEFECTO;
use crate::ui::helpers::{boton, color_desde_hex, editar_color, editar_umbral};
use crate::ui::layout::simple_panel;
use egui::{Color32, Context, Frame, Grid, RichText};

pub fn ui_configuracion(app: &mut AdminApp, ctx: &Context) {
    let cargando = app.cargando();
    let mut guardar = false;
    let Pagina::Configuracion(page) = &mut app.pagina else {
        return;
    };

    simple_panel(ctx, 760.0, egui::Margin::symmetric(16, 12), |ui| {
        ui.heading("Configuración");
        ui.separator();
        if !page.cargada {
            if !cargando {
                ui.label("No se pudo cargar la configuración. Use ⟳ Recargar.");
            }
            return;
        }

        ui.add_enabled_ui(!cargando, |ui| {
            ui.strong("Foto e impresora");
            Grid::new("config_foto").num_columns(2).spacing([16.0, 8.0]).show(ui, |ui| {
                ui.label("Toma de foto activa");
                ui.checkbox(&mut page.config.is_active, "");
                ui.end_row();
                ui.label("Impresora activa");
                ui.checkbox(&mut page.config.is_active_impresora, "");
                ui.end_row();
            });

            ui.add_space(12.0);
            ui.strong("Apariencia de la trivia");
            Grid::new("config_trivia").num_columns(2).spacing([16.0, 8.0]).show(ui, |ui| {
                let cfg = &mut page.config;
                for (label, valor) in [
                    ("Texto de la pregunta", &mut cfg.text_color_pregunta),
                    ("Texto de las alternativas", &mut cfg.text_color_alternativa),
                    ("Botón de alternativa", &mut cfg.color_boton_alternativa),
                    ("Letra de alternativa", &mut cfg.color_letra_alternativa),
                    ("Numeración", &mut cfg.color_numeracion),
                ] {
                    ui.label(label);
                    ui.horizontal(|ui| {
                        editar_color(ui, valor);
                    });
                    ui.end_row();
                }

                ui.label("Preguntas por ronda");
                ui.horizontal(|ui| editar_umbral(ui, &mut cfg.preguntas_por_ronda));
                ui.end_row();
                ui.label("Preguntas para ganar");
                ui.horizontal(|ui| editar_umbral(ui, &mut cfg.preguntas_para_ganar));
                ui.end_row();
            });

            if let Err(err) = page.validar() {
                ui.colored_label(Color32::from_rgb(190, 40, 40), err.to_string());
            }

            ui.add_space(12.0);
            vista_previa(ui, page);

            ui.add_space(12.0);
            guardar = boton(ui, "💾 Guardar configuración", !cargando);
        });
    });

    if guardar {
        app.lanzar_en::<ConfiguracionPage, _>(
            "Guardando configuración...",
            accion(|p: &mut ConfiguracionPage, api, fx| p.guardar(api, fx)),
        );
    }
}

/// Muestra una pregunta de ejemplo con los colores elegidos.
fn vista_previa(ui: &mut egui::Ui, page: &ConfiguracionPage) {
    let color = |c: &Option<String>| color_desde_hex(c.as_deref().unwrap_or(COLOR_POR_DEFECTO));
    let cfg = &page.config;

    ui.strong("Vista previa");
    Frame::default()
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("1.").strong().color(color(&cfg.color_numeracion)));
                ui.label(
                    RichText::new("¿Cuál es la capital del Perú?")
                        .size(16.0)
                        .color(color(&cfg.text_color_pregunta)),
                );
            });
            ui.add_space(6.0);
            for (letra, texto) in [("A", "Cusco"), ("B", "Lima")] {
                ui.horizontal(|ui| {
                    Frame::default()
                        .fill(color(&cfg.color_boton_alternativa))
                        .inner_margin(egui::Margin::symmetric(8, 4))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(letra)
                                    .strong()
                                    .color(color(&cfg.color_letra_alternativa)),
                            );
                        });
                    ui.label(RichText::new(texto).color(color(&cfg.text_color_alternativa)));
                });
            }
        });
}
