use crate::app::{Accion, AdminApp, Efectos, Pagina, PreguntasPage, accion};
use crate::model::TipoPregunta;
use crate::ui::helpers::{boton, boton_peligro, error_formulario, etiqueta_estado};
use crate::ui::layout::{confirmacion, simple_panel};
use crate::view_models::FilaPregunta;
use egui::{Align, Align2, ComboBox, Context, Grid, Layout, ScrollArea, TextEdit, Ui};

pub fn ui_preguntas(app: &mut AdminApp, ctx: &Context) {
    let cargando = app.cargando();
    let mut fx = Efectos::default();
    let mut pendiente: Option<(&'static str, Accion<PreguntasPage>)> = None;
    let Pagina::Preguntas(page) = &mut app.pagina else {
        return;
    };

    simple_panel(ctx, 1100.0, egui::Margin::symmetric(16, 12), |ui| {
        ui.horizontal(|ui| {
            if boton(ui, "⬅ Dificultades", true) {
                page.volver(&mut fx);
            }
            ui.heading(format!("Preguntas · {}", page.titulo()));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if boton(ui, "➕ Nueva pregunta", !cargando) {
                    page.abrir_nueva();
                }
                let hay = !page.preguntas.is_empty();
                if boton(ui, "Desactivar todas", !cargando && hay) {
                    pendiente = Some((
                        "Actualizando preguntas...",
                        accion(|p: &mut PreguntasPage, api, fx| p.alternar_activas(false, api, fx)),
                    ));
                }
                if boton(ui, "Activar todas", !cargando && hay) {
                    pendiente = Some((
                        "Actualizando preguntas...",
                        accion(|p: &mut PreguntasPage, api, fx| p.alternar_activas(true, api, fx)),
                    ));
                }
            });
        });
        ui.label(format!("{} preguntas", page.preguntas.len()));
        ui.separator();

        if page.preguntas.is_empty() {
            if !cargando {
                ui.label("Aún no hay preguntas en este nivel.");
            }
            return;
        }

        let preguntas = page.preguntas.clone();
        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            Grid::new("tabla_preguntas")
                .striped(true)
                .num_columns(6)
                .spacing([16.0, 8.0])
                .show(ui, |ui| {
                    for titulo in ["#", "Pregunta", "Tipo", "Respuesta", "Estado", "Acciones"] {
                        ui.strong(titulo);
                    }
                    ui.end_row();

                    for (idx, pregunta) in preguntas.iter().enumerate() {
                        let fila = FilaPregunta::desde(idx, pregunta);
                        ui.label(fila.numero.to_string());
                        ui.label(fila.resumen(60)).on_hover_text(fila.enunciado.as_str());
                        ui.label(fila.tipo);
                        ui.label(fila.correcta.as_deref().unwrap_or("—"));
                        etiqueta_estado(ui, fila.activa);
                        ui.horizontal(|ui| {
                            if boton(ui, "✏", !cargando) {
                                page.editar(pregunta);
                            }
                            if boton_peligro(ui, "🗑", !cargando) {
                                page.solicitar_eliminar(pregunta);
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
        egui::Window::new(page.dialogo.titulo("Pregunta"))
            .collapsible(false)
            .resizable(true)
            .default_width(640.0)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(!cargando, |ui| {
                    formulario_pregunta(ui, page, &mut fx);

                    if page.pregunta.es_nueva() {
                        ui.separator();
                        lista_pendiente(ui, page, &mut fx);
                    }

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
                    page.mensaje_confirmacion(),
                    accion(|p: &mut PreguntasPage, api, fx| p.confirmar(api, fx)),
                ));
            }
            Some(false) => page.cancelar_confirmacion(),
            None => {}
        }
    }

    app.aplicar(fx);
    if let Some((mensaje, op)) = pendiente {
        app.lanzar_en::<PreguntasPage, _>(mensaje, op);
    }
}

fn formulario_pregunta(ui: &mut Ui, page: &mut PreguntasPage, fx: &mut Efectos) {
    let mut tipo = page.pregunta.tipo;
    ui.horizontal(|ui| {
        ui.label("Tipo");
        ComboBox::from_id_salt("combo_tipo")
            .selected_text(tipo.label())
            .show_ui(ui, |ui| {
                for t in [TipoPregunta::Alternativa, TipoPregunta::VerdaderoFalso] {
                    ui.selectable_value(&mut tipo, t, t.label());
                }
            });
        ui.checkbox(&mut page.pregunta.is_active, "Activa");
    });
    if tipo != page.pregunta.tipo {
        page.cambiar_tipo(tipo);
    }

    ui.label("Pregunta *");
    ui.add(
        TextEdit::multiline(&mut page.pregunta.pregunta)
            .desired_rows(2)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(6.0);

    let es_vf = page.pregunta.tipo == TipoPregunta::VerdaderoFalso;
    let mut marcar = None;
    let mut quitar = None;
    ui.label("Alternativas (marque la correcta)");
    for (idx, alt) in page.pregunta.alternativas.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            if ui.radio(alt.respuesta_correcta, "").clicked() {
                marcar = Some(idx);
            }
            ui.strong(alt.opcion.as_str());
            ui.add_enabled(
                !es_vf,
                TextEdit::singleline(&mut alt.texto).desired_width(420.0),
            );
            if !es_vf && ui.small_button("✖").on_hover_text("Quitar alternativa").clicked() {
                quitar = Some(idx);
            }
        });
    }
    if let Some(idx) = marcar {
        page.marcar_correcta(idx);
    }
    if let Some(idx) = quitar {
        page.quitar_alternativa(idx);
    }
    if !es_vf && ui.button("➕ Alternativa").clicked() {
        page.agregar_alternativa();
    }

    error_formulario(ui, page.enviado, page.validar().err().map(|e| e.to_string()));

    if page.pregunta.es_nueva() && ui.button("📥 Agregar a la lista").clicked() {
        page.agregar_a_buffer(fx);
    }
}

fn lista_pendiente(ui: &mut Ui, page: &mut PreguntasPage, fx: &mut Efectos) {
    ui.label(format!("Pendientes de guardar: {}", page.buffer.len()));
    let mut editar = None;
    let mut quitar = None;
    ScrollArea::vertical()
        .id_salt("pendientes")
        .max_height(160.0)
        .show(ui, |ui| {
            for (idx, pregunta) in page.buffer.iter().enumerate() {
                let fila = FilaPregunta::desde(idx, pregunta);
                ui.horizontal(|ui| {
                    ui.label(format!("{}. {}", fila.numero, fila.resumen(50)));
                    if ui.small_button("✏").clicked() {
                        editar = Some(idx);
                    }
                    if ui.small_button("🗑").clicked() {
                        quitar = Some(idx);
                    }
                });
            }
        });
    if let Some(idx) = editar {
        page.editar_desde_buffer(idx, fx);
    } else if let Some(idx) = quitar {
        page.quitar_de_buffer(idx);
    }
}
