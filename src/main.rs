use eframe::egui;
use route_mapper::gui::frontend::RouteApp;
use route_mapper::persistence::settings::AppSettings;

fn main() -> eframe::Result {
    env_logger::init();
    let settings = AppSettings::load().unwrap_or_else(|e| {
        log::warn!("could not load settings, using defaults: {}", e);
        AppSettings::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            // Keep enough canvas visible to place nodes on small screens
            .with_min_inner_size([480.0, 320.0])
            .with_resizable(true),
        ..Default::default()
    };
    eframe::run_native(
        "Route-Mapper",
        options,
        Box::new(move |_cc| Ok(Box::new(RouteApp::new(settings)) as Box<dyn eframe::App>)),
    )
}
