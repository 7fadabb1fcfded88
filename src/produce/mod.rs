pub mod producer;
pub mod settings;
