use std::rc::Rc;

use gtk4::gio;
use gtk4::prelude::*;
use webkit6::prelude::*;

use super::window::AppState;

const ZOOM_STEP: f64 = 1.1;
const ZOOM_MIN: f64 = 0.25;
const ZOOM_MAX: f64 = 5.0;

fn section(items: &[(&str, &str)]) -> gio::Menu {
    let section = gio::Menu::new();
    for &(label, action) in items {
        section.append(Some(label), Some(action));
    }
    section
}

fn submenu(sections: &[gio::Menu]) -> gio::Menu {
    let menu = gio::Menu::new();
    for section in sections {
        menu.append_section(None, section);
    }
    menu
}

pub(super) fn build_menu_model() -> gio::Menu {
    let file = submenu(&[section(&[("_Quit", "app.quit")])]);
    let edit = submenu(&[
        section(&[("_Undo", "win.undo"), ("_Redo", "win.redo")]),
        section(&[
            ("Cu_t", "win.cut"),
            ("_Copy", "win.copy"),
            ("_Paste", "win.paste"),
            ("Select _All", "win.select-all"),
        ]),
    ]);
    let view = submenu(&[
        section(&[
            ("_Reload", "win.reload"),
            ("_Force Reload", "win.force-reload"),
            ("Toggle _Developer Tools", "win.toggle-devtools"),
        ]),
        section(&[
            ("_Actual Size", "win.reset-zoom"),
            ("Zoom _In", "win.zoom-in"),
            ("Zoom _Out", "win.zoom-out"),
        ]),
        section(&[("Toggle _Full Screen", "win.toggle-fullscreen")]),
    ]);
    let window = submenu(&[section(&[
        ("_Minimize", "win.minimize"),
        ("_Close", "win.close"),
    ])]);
    let help = submenu(&[section(&[("_About TextCompare", "win.about")])]);

    let menu = gio::Menu::new();
    menu.append_submenu(Some("_File"), &file);
    menu.append_submenu(Some("_Edit"), &edit);
    menu.append_submenu(Some("_View"), &view);
    menu.append_submenu(Some("_Window"), &window);
    menu.append_submenu(Some("_Help"), &help);
    menu
}

const ACCELS: &[(&str, &[&str])] = &[
    ("app.quit", &["<Control>q"]),
    ("win.undo", &["<Control>z"]),
    ("win.redo", &["<Control><Shift>z"]),
    ("win.cut", &["<Control>x"]),
    ("win.copy", &["<Control>c"]),
    ("win.paste", &["<Control>v"]),
    ("win.select-all", &["<Control>a"]),
    ("win.reload", &["<Control>r"]),
    ("win.force-reload", &["<Control><Shift>r"]),
    ("win.toggle-devtools", &["<Control><Shift>i"]),
    ("win.reset-zoom", &["<Control>0"]),
    ("win.zoom-in", &["<Control>plus", "<Control>equal"]),
    ("win.zoom-out", &["<Control>minus"]),
    ("win.toggle-fullscreen", &["F11"]),
    ("win.minimize", &["<Control>m"]),
    ("win.close", &["<Control>w"]),
];

fn add_window_action(state: &Rc<AppState>, name: &str, activate: impl Fn(&AppState) + 'static) {
    let action = gio::SimpleAction::new(name, None);
    let state_ref = Rc::clone(state);
    action.connect_activate(move |_, _| activate(&state_ref));
    state.window.add_action(&action);
}

pub(super) fn install_actions(state: &Rc<AppState>) {
    {
        let quit = gio::SimpleAction::new("quit", None);
        let application = state.application.clone();
        // Closing the windows runs their close handlers, so the final
        // geometry is saved before the application exits.
        quit.connect_activate(move |_, _| {
            for window in application.windows() {
                window.close();
            }
        });
        state.application.add_action(&quit);
    }

    for (name, command) in [
        ("undo", "Undo"),
        ("redo", "Redo"),
        ("cut", "Cut"),
        ("copy", "Copy"),
        ("paste", "Paste"),
        ("select-all", "SelectAll"),
    ] {
        add_window_action(state, name, move |st| {
            st.web_view.execute_editing_command(command);
        });
    }

    add_window_action(state, "reload", |st| st.web_view.reload());
    add_window_action(state, "force-reload", |st| st.web_view.reload_bypass_cache());
    add_window_action(state, "toggle-devtools", |st| st.toggle_inspector());
    add_window_action(state, "reset-zoom", |st| st.web_view.set_zoom_level(1.0));
    add_window_action(state, "zoom-in", |st| st.zoom_by(ZOOM_STEP));
    add_window_action(state, "zoom-out", |st| st.zoom_by(1.0 / ZOOM_STEP));
    add_window_action(state, "toggle-fullscreen", |st| {
        if st.window.is_fullscreen() {
            st.window.unfullscreen();
        } else {
            st.window.fullscreen();
        }
    });
    add_window_action(state, "minimize", |st| st.window.minimize());
    add_window_action(state, "close", |st| st.window.close());
    add_window_action(state, "about", |st| st.open_about_page());

    for (action, accels) in ACCELS {
        state.application.set_accels_for_action(action, accels);
    }
}

impl AppState {
    fn zoom_by(&self, factor: f64) {
        let level = (self.web_view.zoom_level() * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        self.web_view.set_zoom_level(level);
    }

    fn toggle_inspector(&self) {
        if !self.settings.developer_extras {
            log::info!("Developer tools are disabled in settings");
            return;
        }
        let inspector: Option<webkit6::WebInspector> = self.web_view.inspector().into();
        let Some(inspector) = inspector else {
            return;
        };
        if self.inspector_open.get() {
            inspector.close();
            self.inspector_open.set(false);
        } else {
            inspector.show();
            self.inspector_open.set(true);
        }
    }

    fn open_about_page(&self) {
        let url = &self.settings.about_url;
        if let Err(err) = gio::AppInfo::launch_default_for_uri(url, None::<&gio::AppLaunchContext>) {
            log::warn!("Failed to open {url}: {err}");
        }
    }
}
