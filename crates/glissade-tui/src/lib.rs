pub mod app;
pub mod event;
pub mod input;
pub mod keymap;
pub mod pane;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use keymap::Keymap;
pub use pane::TextPane;
