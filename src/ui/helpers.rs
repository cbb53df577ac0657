// src/ui/helpers.rs
use crate::model::{COLOR_POR_DEFECTO, hex_desde_color};
use egui::{Button, Color32, RichText, Ui, Vec2};

pub const BOTON_H: f32 = 28.0;

pub fn boton(ui: &mut Ui, label: &str, enabled: bool) -> bool {
    ui.add_enabled(enabled, Button::new(label).min_size(Vec2::new(0.0, BOTON_H)))
        .clicked()
}

/// Botón rojo para acciones destructivas.
pub fn boton_peligro(ui: &mut Ui, label: &str, enabled: bool) -> bool {
    let btn = Button::new(RichText::new(label).color(Color32::WHITE))
        .fill(Color32::DARK_RED)
        .min_size(Vec2::new(0.0, BOTON_H));
    ui.add_enabled(enabled, btn).clicked()
}

/// Etiqueta verde/gris de estado.
pub fn etiqueta_estado(ui: &mut Ui, activo: bool) {
    if activo {
        ui.colored_label(Color32::from_rgb(34, 139, 34), "Activo");
    } else {
        ui.colored_label(Color32::GRAY, "Inactivo");
    }
}

/// Mensaje de validación bajo un formulario ya enviado.
pub fn error_formulario(ui: &mut Ui, enviado: bool, error: Option<String>) {
    if let (true, Some(mensaje)) = (enviado, error) {
        ui.colored_label(Color32::from_rgb(190, 40, 40), mensaje);
    }
}

pub fn color_desde_hex(hex: &str) -> Color32 {
    Color32::from_hex(hex.trim())
        .or_else(|_| Color32::from_hex(COLOR_POR_DEFECTO))
        .unwrap_or(Color32::from_rgb(0x2A, 0x64, 0xE1))
}

/// Selector de color sobre un hex opcional. Devuelve `true` si cambió.
pub fn editar_color(ui: &mut Ui, valor: &mut Option<String>) -> bool {
    let mut color = color_desde_hex(valor.as_deref().unwrap_or(COLOR_POR_DEFECTO));
    let cambio = ui.color_edit_button_srgba(&mut color).changed();
    if cambio {
        *valor = Some(hex_desde_color(color));
    }
    ui.monospace(valor.as_deref().unwrap_or(COLOR_POR_DEFECTO));
    cambio
}

/// Número opcional: casilla para definirlo y arrastre para el valor.
pub fn editar_umbral(ui: &mut Ui, valor: &mut Option<u32>) {
    let mut definido = valor.is_some();
    if ui.checkbox(&mut definido, "").changed() {
        *valor = definido.then_some(1);
    }
    if let Some(n) = valor.as_mut() {
        ui.add(egui::DragValue::new(n).range(1..=100));
    } else {
        ui.weak("sin definir");
    }
}
