use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use gtk4::gio;
use gtk4::glib::Propagation;
use gtk4::prelude::*;
use gtk4::{self as gtk};
use libadwaita as adw;
use webkit6::prelude::*;

use textcompare::content;
use textcompare::paths::AppPaths;
use textcompare::settings::Settings;
use textcompare::state_store::{Bounds, GeometryEvent, GeometrySource, WindowStateStore};

use super::menu;

const WINDOW_TITLE: &str = "TextCompare - Text Diff Tool";

fn page_uri(page: &Path) -> String {
    gio::File::for_path(page).uri().to_string()
}

pub fn build_ui(application: &adw::Application) -> Result<()> {
    let paths = AppPaths::initialize()?;
    let settings = Settings::load_or_init(&paths);
    let store = WindowStateStore::from_paths(&paths);
    let window_state = store.load();

    let web_settings = webkit6::Settings::new();
    web_settings.set_enable_developer_extras(settings.developer_extras);
    let web_view = webkit6::WebView::builder().settings(&web_settings).build();
    web_view.set_hexpand(true);
    web_view.set_vexpand(true);

    let menu_bar = gtk::PopoverMenuBar::from_model(Some(&menu::build_menu_model()));
    let header = adw::HeaderBar::builder()
        .title_widget(&gtk::Label::new(Some("TextCompare")))
        .build();

    let chrome = gtk::Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .build();
    chrome.append(&header);
    chrome.append(&menu_bar);
    chrome.append(&web_view);

    let window = adw::ApplicationWindow::builder()
        .application(application)
        .title(WINDOW_TITLE)
        .default_width(window_state.width)
        .default_height(window_state.height)
        .content(&chrome)
        .build();
    window.set_size_request(settings.min_width, settings.min_height);

    // GTK4 leaves placement to the compositor.
    if let (Some(x), Some(y)) = (window_state.x, window_state.y) {
        log::debug!("Not applying saved window position {x},{y}");
    }
    if window_state.is_maximized {
        window.maximize();
    }

    let state = Rc::new(AppState {
        application: application.clone(),
        window: window.clone(),
        web_view,
        store,
        settings,
        content_ready: Cell::new(false),
        inspector_open: Cell::new(false),
    });

    menu::install_actions(&state);
    state.hook_geometry_signals();

    window.present();
    state.load_content();
    Ok(())
}

/// Handle shared by the window's signal handlers.
pub(super) struct AppState {
    pub(super) application: adw::Application,
    pub(super) window: adw::ApplicationWindow,
    pub(super) web_view: webkit6::WebView,
    pub(super) store: WindowStateStore,
    pub(super) settings: Settings,
    pub(super) content_ready: Cell<bool>,
    pub(super) inspector_open: Cell<bool>,
}

impl GeometrySource for AppState {
    fn bounds(&self) -> Bounds {
        // default-width/height track the unmaximized size; there is no
        // screen position to report.
        let (width, height) = self.window.default_size();
        Bounds {
            x: None,
            y: None,
            width,
            height,
        }
    }

    fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }
}

impl AppState {
    fn hook_geometry_signals(self: &Rc<Self>) {
        {
            let state = Rc::clone(self);
            self.window.connect_default_width_notify(move |_| {
                state.store.record(GeometryEvent::Resized, &*state);
            });
        }
        {
            let state = Rc::clone(self);
            self.window.connect_default_height_notify(move |_| {
                state.store.record(GeometryEvent::Resized, &*state);
            });
        }
        {
            let state = Rc::clone(self);
            self.window.connect_maximized_notify(move |_| {
                state.store.record(GeometryEvent::MaximizedChanged, &*state);
            });
        }
        {
            let state = Rc::clone(self);
            self.window.connect_close_request(move |_| {
                state.store.record(GeometryEvent::Closing, &*state);
                Propagation::Proceed
            });
        }
    }

    fn load_content(self: &Rc<Self>) {
        let page = match content::locate_page(&self.settings) {
            Ok(page) => page,
            Err(err) => {
                log::error!("Failed to load index.html: {err}");
                self.present_load_error();
                return;
            }
        };

        {
            let state = Rc::clone(self);
            self.web_view.connect_load_failed(move |_, _, uri, err| {
                log::error!("Failed to load {uri}: {err}");
                if !state.content_ready.get() {
                    state.present_load_error();
                }
                false
            });
        }
        {
            let state = Rc::clone(self);
            self.web_view.connect_load_changed(move |_, event| {
                if event == webkit6::LoadEvent::Finished {
                    state.content_ready.set(true);
                }
            });
        }

        let uri = page_uri(&page);
        log::info!("Loading {uri}");
        self.web_view.load_uri(&uri);
    }

    /// The shell is useless without its page: tell the user, then exit.
    fn present_load_error(&self) {
        let dialog = gtk::MessageDialog::builder()
            .transient_for(&self.window)
            .modal(true)
            .message_type(gtk::MessageType::Error)
            .buttons(gtk::ButtonsType::Ok)
            .text("Load Error")
            .secondary_text("Failed to load the application. Please reinstall.")
            .build();
        let application = self.application.clone();
        dialog.connect_response(move |dialog, _| {
            dialog.close();
            application.quit();
        });
        dialog.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_uri_escapes_spaces() {
        assert_eq!(
            page_uri(Path::new("/opt/Text Compare/index.html")),
            "file:///opt/Text%20Compare/index.html"
        );
    }

    #[test]
    fn test_relative_page_uri_has_no_host() {
        let uri = page_uri(Path::new("relative/index.html"));
        assert!(uri.starts_with("file:///"), "{uri}");
        assert!(uri.ends_with("/relative/index.html"), "{uri}");
    }
}
