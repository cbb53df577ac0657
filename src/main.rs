use trivia_admin::AdminApp;
use trivia_admin::config::AdminConfig;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let (config, error_config) = match AdminConfig::cargar() {
        Ok(config) => (config, None),
        Err(err) => (AdminConfig::default(), Some(err)),
    };

    // RUST_LOG manda sobre el filtro del archivo
    let filtro = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filtro).init();

    if let Some(err) = error_config {
        log::error!("{err}; se usan valores por defecto");
    }
    log::info!("Iniciando panel contra {} ({:?})", config.api_url, config.modo);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Trivia Admin",
        options,
        Box::new(move |cc| {
            let app = AdminApp::desde_config(&config);
            cc.egui_ctx.set_visuals(if app.tema_oscuro {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Ok(Box::new(app))
        }),
    )
}
