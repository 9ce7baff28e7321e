// src/sheet/mod.rs
pub mod loader;
pub mod table;

pub use loader::{SheetLocation, SheetRef};
