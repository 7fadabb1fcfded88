pub mod compiler;
pub mod timeline;
