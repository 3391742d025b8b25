pub mod menu;
pub mod window;

pub use window::build_ui;
