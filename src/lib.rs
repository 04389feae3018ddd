//! Deferred-by-default module imports for a Python-like runtime.
//!
//! With the global switch on, a top-level `import foo` no longer executes
//! `foo`: it installs an opaque placeholder into the importing module's
//! namespace, and `foo`'s body runs the first time any code actually looks
//! at the binding. Execution happens at most once per module process-wide,
//! failures are captured and replayed at the point of use with the original
//! statement's file/line attached, and true import cycles are reported with
//! the full resolution chain instead of deadlocking.
//!
//! Imports that cannot be safely deferred stay eager: anything inside a
//! function, class, try, or with suite; star imports; dynamic imports by
//! name string; and any module matching a registered eager override.
//!
//! The parser/compiler that recognizes import statements and the
//! finder/loader that executes module files are external; they talk to this
//! crate through [`classifier::ImportStmt`] and [`runtime::ModuleLoader`].

pub mod classifier;
pub mod config;
pub mod domain;
pub mod runtime;

#[cfg(test)]
pub(crate) mod test_utils;

pub use classifier::{
    classify, Binding, BindingTarget, Disposition, EagerOverrideRegistry, FromImportNames,
    ImportStmt, ImportTarget, ImportedName, LexicalContext,
};
pub use config::{ImportConfig, LAZY_IMPORTS_ENV};
pub use domain::{
    ImportError, ImportErrorKind, ImportOrigin, ImportResult, ModuleName, ModuleOrigin, Value,
};
pub use runtime::{ImportSystem, Module, ModuleLoader, ModuleRecord, Namespace};
