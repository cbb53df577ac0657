use crate::app::{AdminApp, Confirmacion, Ruta, Severidad};
use egui::{Align, Align2, CentralPanel, Color32, Context, Frame, Layout, RichText, Ui, Visuals};

/// Migas de pan y botón de recarga.
pub fn top_panel(app: &mut AdminApp, ctx: &Context) {
    let mut destino = None;
    let mut recargar = false;

    egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            let migas = app.ruta.migas();
            let ultima = migas.len().saturating_sub(1);
            for (i, ruta) in migas.into_iter().enumerate() {
                if i > 0 {
                    ui.label("›");
                }
                if i == ultima {
                    ui.label(RichText::new(ruta.titulo()).strong());
                } else if ui.link(ruta.titulo()).clicked() {
                    destino = Some(ruta);
                }
            }
            ui.weak(app.ruta.path());

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui
                    .add_enabled(!app.cargando(), egui::Button::new("⟳ Recargar"))
                    .clicked()
                {
                    recargar = true;
                }
            });
        });
    });

    if let Some(ruta) = destino {
        app.navegar(ruta);
    } else if recargar {
        app.recargar();
    }
}

/// Menú lateral con las tres secciones principales.
pub fn side_panel(app: &mut AdminApp, ctx: &Context) {
    let mut destino = None;

    egui::SidePanel::left("nav_panel")
        .resizable(false)
        .exact_width(180.0)
        .show(ctx, |ui| {
            ui.add_space(12.0);
            ui.heading("Trivia Admin");
            ui.add_space(16.0);

            let actual = app.ruta.migas().first().cloned().unwrap_or(Ruta::Eventos);
            for (ruta, icono) in [
                (Ruta::Eventos, "📅"),
                (Ruta::Dificultades, "📶"),
                (Ruta::Configuracion, "⚙"),
            ] {
                let texto = format!("{icono} {}", ruta.titulo());
                if ui.selectable_label(actual == ruta, texto).clicked() && app.ruta != ruta {
                    destino = Some(ruta);
                }
                ui.add_space(4.0);
            }
        });

    if let Some(ruta) = destino {
        app.navegar(ruta);
    }
}

pub fn bottom_panel(app: &mut AdminApp, ctx: &Context) {
    egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.weak(format!("Backend: {}", app.origen));

            // ----------- BOTONES DE TEMA -----------
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("🌙 Modo oscuro").clicked() {
                    app.tema_oscuro = true;
                    ctx.set_visuals(Visuals::dark());
                }
                if ui.button("☀Modo claro").clicked() {
                    app.tema_oscuro = false;
                    ctx.set_visuals(Visuals::light());
                }
            });
        });
    });
}

/// Panel central con ancho máximo y marco, como contenedor de cada vista.
pub fn simple_panel(
    ctx: &Context,
    max_width: f32,
    margin: egui::Margin,
    inner: impl FnOnce(&mut Ui),
) {
    CentralPanel::default().show(ctx, |ui| {
        let w = ui.available_width().min(max_width);
        Frame::default()
            .fill(ui.visuals().window_fill())
            .inner_margin(margin)
            .show(ui, |ui| {
                ui.set_width(w);
                inner(ui);
            });
    });
}

/// Ventana modal de confirmación. `Some(true)` = aceptar, `Some(false)` = cancelar.
pub fn confirmacion<A>(ctx: &Context, conf: &Confirmacion<A>, habilitado: bool) -> Option<bool> {
    let mut respuesta = None;
    egui::Window::new(conf.titulo.as_str())
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("⚠ {}", conf.mensaje));
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(habilitado, egui::Button::new("Sí")).clicked() {
                    respuesta = Some(true);
                }
                if ui.add_enabled(habilitado, egui::Button::new("No")).clicked() {
                    respuesta = Some(false);
                }
            });
        });
    respuesta
}

/// Spinner con el mensaje de la tarea en curso.
pub fn overlay_carga(app: &AdminApp, ctx: &Context) {
    let Some(mensaje) = app.mensaje_carga() else {
        return;
    };
    egui::Area::new(egui::Id::new("overlay_carga"))
        .anchor(Align2::CENTER_TOP, [0.0, 48.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label(mensaje);
                });
            });
        });
}

fn color_severidad(severidad: Severidad) -> Color32 {
    match severidad {
        Severidad::Exito => Color32::from_rgb(34, 139, 34),
        Severidad::Info => Color32::from_rgb(30, 110, 200),
        Severidad::Aviso => Color32::from_rgb(200, 140, 0),
        Severidad::Error => Color32::from_rgb(190, 40, 40),
    }
}

/// Toasts apilados en la esquina inferior derecha.
pub fn toasts_area(app: &mut AdminApp, ctx: &Context) {
    if app.toasts.is_empty() {
        return;
    }
    let mut cerrar = None;

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(Align2::RIGHT_BOTTOM, [-12.0, -40.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(320.0);
            for (idx, toast) in app.toasts.visibles().enumerate() {
                Frame::default()
                    .fill(color_severidad(toast.severidad))
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::same(10))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(&toast.resumen).strong().color(Color32::WHITE));
                                ui.label(RichText::new(&toast.detalle).color(Color32::WHITE));
                            });
                            if ui.small_button("✖").clicked() {
                                cerrar = Some(idx);
                            }
                        });
                    });
                ui.add_space(6.0);
            }
        });

    if let Some(idx) = cerrar {
        app.toasts.cerrar(idx);
    }
}
