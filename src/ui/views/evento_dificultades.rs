use crate::app::{
    Accion, AdminApp, Efectos, EstadoNavegacion, EventoDificultadesPage, Pagina, Ruta, accion,
};
use crate::ui::helpers::{boton, boton_peligro, error_formulario, etiqueta_estado};
use crate::ui::layout::{confirmacion, simple_panel};
use egui::{Align, Align2, ComboBox, Context, Grid, Layout, ScrollArea};

pub fn ui_evento_dificultades(app: &mut AdminApp, ctx: &Context) {
    let cargando = app.cargando();
    let mut fx = Efectos::default();
    let mut pendiente: Option<(&'static str, Accion<EventoDificultadesPage>)> = None;
    let Pagina::EventoDificultades(page) = &mut app.pagina else {
        return;
    };

    simple_panel(ctx, 900.0, egui::Margin::symmetric(16, 12), |ui| {
        ui.horizontal(|ui| {
            if boton(ui, "⬅ Eventos", true) {
                fx.navegar(Ruta::Eventos, EstadoNavegacion::default());
            }
            ui.heading(format!("Dificultades · {}", page.nombre_evento()));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if !page.es_predeterminado() && boton(ui, "➕ Asignar dificultad", !cargando) {
                    page.abrir_nuevo();
                }
            });
        });
        if page.es_predeterminado() {
            ui.weak("Evento predeterminado: todas sus preguntas están en un único nivel.");
        }
        ui.separator();

        if page.niveles.is_empty() {
            if !cargando && page.evento.is_some() {
                ui.label("Este evento aún no tiene dificultades asignadas.");
            }
            return;
        }

        let niveles = page.niveles.clone();
        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            Grid::new("tabla_niveles")
                .striped(true)
                .num_columns(4)
                .spacing([16.0, 8.0])
                .show(ui, |ui| {
                    for titulo in ["Dificultad", "Preguntas", "Estado", "Acciones"] {
                        ui.strong(titulo);
                    }
                    ui.end_row();

                    for fila in niveles {
                        ui.label(&fila.dificultad);
                        ui.label(fila.cantidad_preguntas.to_string());
                        etiqueta_estado(ui, fila.activo);
                        ui.horizontal(|ui| {
                            if boton(ui, "❓ Preguntas", !cargando) {
                                page.gestionar_preguntas(&fila, &mut fx);
                            }
                            if !fila.es_predeterminada() {
                                if boton(ui, "✏", !cargando) {
                                    page.editar(&fila);
                                }
                                if boton_peligro(ui, "🗑", !cargando) {
                                    page.solicitar_eliminar(&fila);
                                }
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
        let opciones: Vec<(u64, String)> = page
            .disponibles()
            .into_iter()
            .map(|d| (d.id, d.nombre.clone()))
            .collect();

        egui::Window::new(page.dialogo.titulo("Dificultad del evento"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(!cargando, |ui| {
                    Grid::new("form_nivel")
                        .num_columns(2)
                        .spacing([12.0, 8.0])
                        .show(ui, |ui| {
                            ui.label("Dificultad *");
                            let seleccion = page
                                .form
                                .dificultad_id
                                .and_then(|id| opciones.iter().find(|(i, _)| *i == id))
                                .map(|(_, n)| n.clone())
                                .unwrap_or_else(|| "Seleccione...".to_string());
                            ComboBox::from_id_salt("combo_dificultad")
                                .selected_text(seleccion)
                                .width(220.0)
                                .show_ui(ui, |ui| {
                                    for (id, nombre) in &opciones {
                                        ui.selectable_value(&mut page.form.dificultad_id, Some(*id), nombre);
                                    }
                                });
                            ui.end_row();

                            ui.label("Activo");
                            ui.checkbox(&mut page.form.activo, "");
                            ui.end_row();
                        });

                    error_formulario(ui, page.enviado, page.validar().err().map(|e| e.to_string()));
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
            page.solicitar_guardado(&mut fx);
        }
    }

    if let Some(conf) = &page.confirmacion {
        match confirmacion(ctx, conf, !cargando) {
            Some(true) => {
                pendiente = Some((
                    "Guardando...",
                    accion(|p: &mut EventoDificultadesPage, api, fx| p.confirmar(api, fx)),
                ));
            }
            Some(false) => page.cancelar_confirmacion(),
            None => {}
        }
    }

    app.aplicar(fx);
    if let Some((mensaje, op)) = pendiente {
        app.lanzar_en::<EventoDificultadesPage, _>(mensaje, op);
    }
}
