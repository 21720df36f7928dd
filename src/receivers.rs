//! Receivers for the bundled commands: a counter, a text editor and a dimmable light.

pub mod counter;
pub mod light;
pub mod text_editor;
