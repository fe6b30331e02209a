mod app;
mod files;
mod preview;
mod upload;
mod utils;

use app::WeddingUploader;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 700.0])
            .with_min_inner_size([420.0, 520.0])
            // Needed for drop support on Windows.
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Hochzeits-Upload",
        options,
        Box::new(|cc| Box::new(WeddingUploader::new(cc))),
    )
}
