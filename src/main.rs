mod app;

use gtk4::{glib, prelude::*};
use libadwaita as adw;

fn main() -> glib::ExitCode {
    env_logger::init();

    let app = adw::Application::builder()
        .application_id("com.textcompare.TextCompare")
        .build();

    app.connect_activate(|application| {
        // Re-activation (e.g. launching a second instance) reuses the window.
        if let Some(window) = application.active_window() {
            window.present();
            return;
        }
        if let Err(err) = app::build_ui(application) {
            log::error!("Failed to start UI: {err:?}");
            application.quit();
        }
    });

    app.run()
}
