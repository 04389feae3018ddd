mod error;
mod module_name;
mod origin;
mod value;

pub use error::{ImportError, ImportErrorKind, ImportResult};
pub use module_name::ModuleName;
pub use origin::{ImportOrigin, ModuleOrigin};
pub use value::Value;
