use crate::app::{Accion, AdminApp, DificultadesPage, Pagina, accion};
use crate::ui::helpers::{boton, boton_peligro, error_formulario, etiqueta_estado};
use crate::ui::layout::{confirmacion, simple_panel};
use egui::{Align, Align2, Context, Grid, Layout, ScrollArea, TextEdit};

pub fn ui_dificultades(app: &mut AdminApp, ctx: &Context) {
    let cargando = app.cargando();
    let mut pendiente: Option<(&'static str, Accion<DificultadesPage>)> = None;
    let Pagina::Dificultades(page) = &mut app.pagina else {
        return;
    };

    simple_panel(ctx, 700.0, egui::Margin::symmetric(16, 12), |ui| {
        ui.horizontal(|ui| {
            ui.heading("Dificultades");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if boton(ui, "➕ Nueva", !cargando) {
                    page.abrir_nueva();
                }
            });
        });
        ui.separator();

        let dificultades = page.dificultades.clone();
        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            Grid::new("tabla_dificultades")
                .striped(true)
                .num_columns(3)
                .spacing([24.0, 8.0])
                .show(ui, |ui| {
                    ui.strong("Nombre");
                    ui.strong("Estado");
                    ui.strong("Acciones");
                    ui.end_row();

                    for dificultad in &dificultades {
                        ui.label(dificultad.nombre.as_str());
                        etiqueta_estado(ui, dificultad.is_active);
                        ui.horizontal(|ui| {
                            if boton(ui, "✏", !cargando) {
                                page.editar(dificultad);
                            }
                            if boton_peligro(ui, "🗑", !cargando) {
                                page.solicitar_eliminar(dificultad);
                            }
                        });
                        ui.end_row();
                    }
                });
        });
    });

    if page.dialogo.abierto() {
        let mut cerrar = false;
        let mut guardar = false;
        egui::Window::new(page.dialogo.titulo("Dificultad"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(!cargando, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Nombre *");
                        ui.add(TextEdit::singleline(&mut page.form.nombre).desired_width(220.0));
                    });
                    ui.checkbox(&mut page.form.is_active, "Activa");
                    let falta_nombre = page.form.nombre.trim().is_empty();
                    error_formulario(
                        ui,
                        page.enviado,
                        falta_nombre.then(|| "El nombre es obligatorio.".to_string()),
                    );
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        cerrar = ui.button("Cancelar").clicked();
                        guardar = ui.button("💾 Guardar").clicked();
                    });
                });
            });

        if cerrar {
            page.cerrar_dialogo();
        } else if guardar {
            pendiente = Some((
                "Guardando dificultad...",
                accion(|p: &mut DificultadesPage, api, fx| p.guardar(api, fx)),
            ));
        }
    }

    if let Some(conf) = &page.confirmacion {
        match confirmacion(ctx, conf, !cargando) {
            Some(true) => {
                pendiente = Some((
                    "Eliminando dificultad...",
                    accion(|p: &mut DificultadesPage, api, fx| p.confirmar(api, fx)),
                ));
            }
            Some(false) => page.cancelar_confirmacion(),
            None => {}
        }
    }

    if let Some((mensaje, op)) = pendiente {
        app.lanzar_en::<DificultadesPage, _>(mensaje, op);
    }
}
