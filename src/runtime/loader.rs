use crate::{
    domain::{ImportResult, ModuleName},
    runtime::{ImportSystem, Module},
};

/// The external finder/loader pipeline, as seen from the resolution engine.
///
/// Given a canonical module name, an implementation locates the module,
/// executes its body, and returns the finished module object, or fails with
/// `ModuleNotFound`/`ModuleBody`. Search paths, compilation, and execution
/// all live behind this boundary.
///
/// The engine passes itself in so the executing module body can perform its
/// own imports (which is how import cycles become observable).
pub trait ModuleLoader: Send + Sync {
    fn load(&self, system: &ImportSystem, name: &ModuleName) -> ImportResult<Module>;
}
