use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    domain::{ImportResult, ModuleName, ModuleOrigin, Value},
    runtime::{ImportSystem, Namespace},
};

pub const DUNDER_NAME: &str = "__name__";
pub const DUNDER_PACKAGE: &str = "__package__";

/// An executed module object: identity plus its namespace.
///
/// The namespace is shared so the module body (running inside the loader)
/// and readers elsewhere observe the same storage.
#[derive(Debug)]
pub struct Module {
    name: ModuleName,
    origin: ModuleOrigin,
    namespace: Arc<Namespace>,
}

impl Module {
    pub fn new(name: ModuleName, origin: ModuleOrigin) -> Self {
        let namespace = Arc::new(Namespace::new());
        init_namespace(&namespace, &name);

        Self {
            name,
            origin,
            namespace,
        }
    }

    pub fn new_file_backed(name: ModuleName, path: PathBuf) -> Self {
        Self::new(name, ModuleOrigin::File(path))
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn origin(&self) -> &ModuleOrigin {
        &self.origin
    }

    pub fn path(&self) -> PathBuf {
        self.origin.path()
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    /// Member read, routed through the namespace choke point so a lazily
    /// bound member resolves transitively.
    pub fn get(&self, system: &ImportSystem, name: &str) -> ImportResult<Option<Value>> {
        self.namespace.load(system, name)
    }

    pub fn set(&self, name: &str, value: Value) {
        self.namespace.store(name, value);
    }

    pub fn dir(&self) -> Vec<String> {
        self.namespace.symbols()
    }
}

fn init_namespace(namespace: &Namespace, module: &ModuleName) {
    namespace.store(DUNDER_NAME, Value::Str(module.as_str()));

    let package = match module.parent() {
        Some(parent) => Value::Str(parent.as_str()),
        None => Value::None,
    };
    namespace.store(DUNDER_PACKAGE, package);
}
