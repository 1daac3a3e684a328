pub mod human;
pub mod menu;

pub use human::{HumanMode, Screen};
pub use menu::{MenuCommand, MenuField, MenuState};
