mod chain;
mod engine;
mod loader;
mod module;
mod namespace;
mod record;

pub use engine::ImportSystem;
pub use loader::ModuleLoader;
pub use module::{Module, DUNDER_NAME, DUNDER_PACKAGE};
pub use namespace::Namespace;
pub use record::ModuleRecord;
