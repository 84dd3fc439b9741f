pub mod persist;
pub mod settings;
pub mod text_format;
