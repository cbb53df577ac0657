use crate::app::{Accion, AdminApp, Efectos, EventosPage, Pagina, accion};
use crate::ui::helpers::{boton, boton_peligro, error_formulario, etiqueta_estado};
use crate::ui::layout::{confirmacion, simple_panel};
use crate::view_models::FilaEvento;
use egui::{Align, Align2, Context, Grid, Layout, ScrollArea, TextEdit};

pub fn ui_eventos(app: &mut AdminApp, ctx: &Context) {
    let cargando = app.cargando();
    let mut fx = Efectos::default();
    let mut pendiente: Option<(&'static str, Accion<EventosPage>)> = None;
    let Pagina::Eventos(page) = &mut app.pagina else {
        return;
    };

    simple_panel(ctx, 1100.0, egui::Margin::symmetric(16, 12), |ui| {
        ui.horizontal(|ui| {
            ui.heading("Eventos");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if boton(ui, "➕ Nuevo evento", !cargando) {
                    page.abrir_nuevo();
                }
            });
        });
        match page.visible() {
            Some(ev) => ui.label(format!("👁 Evento visible: {}", ev.nombre)),
            None => ui.weak("Ningún evento visible"),
        };
        ui.separator();

        if page.eventos.is_empty() {
            if !cargando {
                ui.label("No hay eventos registrados.");
            }
            return;
        }

        let eventos = page.eventos.clone();
        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            Grid::new("tabla_eventos")
                .striped(true)
                .num_columns(6)
                .spacing([16.0, 8.0])
                .show(ui, |ui| {
                    for titulo in ["Nombre", "Fecha", "Estado", "Visible", "Modo", "Acciones"] {
                        ui.strong(titulo);
                    }
                    ui.end_row();

                    for evento in eventos {
                        let fila = FilaEvento::desde(&evento);
                        ui.label(&fila.nombre);
                        ui.label(&fila.fecha);
                        etiqueta_estado(ui, fila.activo);

                        let texto_visible = if fila.visible { "👁 Sí" } else { "—" };
                        if ui
                            .add_enabled(!cargando, egui::Button::new(texto_visible))
                            .on_hover_text("Cambiar visibilidad")
                            .clicked()
                        {
                            page.solicitar_visible(&evento);
                        }

                        if ui
                            .add_enabled(!cargando, egui::Button::new(fila.modo()))
                            .on_hover_text("Alternar entre predeterminado y con dificultades")
                            .clicked()
                        {
                            let ev = evento.clone();
                            pendiente = Some((
                                "Actualizando evento...",
                                accion(move |p: &mut EventosPage, api, fx| {
                                    p.alternar_predeterminado(&ev, api, fx)
                                }),
                            ));
                        }

                        ui.horizontal(|ui| {
                            if boton(ui, "📶 Dificultades", !cargando) {
                                page.gestionar_dificultades(&evento, &mut fx);
                            }
                            if boton(ui, "✏", !cargando) {
                                page.editar(&evento);
                            }
                            if boton_peligro(ui, "🗑", !cargando) {
                                page.solicitar_eliminar(&evento);
                            }
                        });
                        ui.end_row();
                    }
                });
        });
    });

    if page.dialogo.abierto() {
        let mut guardar = false;
        let mut cerrar = false;
        egui::Window::new(page.dialogo.titulo("Evento"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(!cargando, |ui| {
                    Grid::new("form_evento")
                        .num_columns(2)
                        .spacing([12.0, 8.0])
                        .show(ui, |ui| {
                            ui.label("Nombre *");
                            ui.add(TextEdit::singleline(&mut page.form.nombre).desired_width(280.0));
                            ui.end_row();

                            ui.label("Descripción");
                            ui.add(
                                TextEdit::multiline(&mut page.form.descripcion)
                                    .desired_rows(3)
                                    .desired_width(280.0),
                            );
                            ui.end_row();

                            ui.label("Fecha *");
                            ui.add(
                                TextEdit::singleline(&mut page.form.fecha)
                                    .hint_text("AAAA-MM-DD")
                                    .desired_width(120.0),
                            );
                            ui.end_row();

                            ui.label("Activo");
                            ui.checkbox(&mut page.form.activo, "");
                            ui.end_row();

                            ui.label("Visible");
                            ui.checkbox(&mut page.form.visible, "");
                            ui.end_row();

                            ui.label("Tiene dificultades");
                            ui.checkbox(&mut page.form.tiene_dificultades, "")
                                .on_hover_text("Sin dificultades el evento usa un único nivel predeterminado");
                            ui.end_row();
                        });

                    error_formulario(ui, page.enviado, page.form.validar().err().map(|e| e.to_string()));
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        cerrar = ui.button("Cancelar").clicked();
                        guardar = ui.button("💾 Guardar").clicked();
                    });
                });
            });

        if cerrar {
            page.cerrar_dialogo();
        } else if guardar && page.validar_formulario(&mut fx) {
            pendiente = Some((
                "Guardando evento...",
                accion(|p: &mut EventosPage, api, fx| p.guardar(api, fx)),
            ));
        }
    }

    if let Some(conf) = &page.confirmacion {
        match confirmacion(ctx, conf, !cargando) {
            Some(true) => {
                pendiente = Some((
                    "Procesando...",
                    accion(|p: &mut EventosPage, api, fx| p.confirmar(api, fx)),
                ));
            }
            Some(false) => page.cancelar_confirmacion(),
            None => {}
        }
    }

    app.aplicar(fx);
    if let Some((mensaje, op)) = pendiente {
        app.lanzar_en::<EventosPage, _>(mensaje, op);
    }
}
