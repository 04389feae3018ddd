use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::{
    classifier::{FromImportNames, ImportStmt, ImportTarget, ImportedName},
    config::ImportConfig,
    domain::{ImportError, ImportOrigin, ImportResult, ModuleName, ModuleOrigin},
    runtime::{ImportSystem, Module, ModuleLoader},
};

type ModuleScript = Arc<dyn Fn(&ImportSystem, &Module) -> ImportResult<()> + Send + Sync>;

/// A `ModuleLoader` whose module bodies are Rust closures, so tests can
/// observe side effects, inject failures, and count executions.
#[derive(Default)]
pub(crate) struct ScriptedLoader {
    scripts: Mutex<FxHashMap<ModuleName, ModuleScript>>,
    executions: Mutex<FxHashMap<ModuleName, usize>>,
}

impl ScriptedLoader {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers the body for a module name. Loading an unregistered name
    /// fails with `ModuleNotFound`, like a module missing from the search
    /// path.
    pub(crate) fn script<F>(&self, name: &str, body: F)
    where
        F: Fn(&ImportSystem, &Module) -> ImportResult<()> + Send + Sync + 'static,
    {
        self.scripts
            .lock()
            .insert(ModuleName::from_dotted(name), Arc::new(body));
    }

    /// How many times the execution entry point ran for `name`.
    pub(crate) fn executions(&self, name: &str) -> usize {
        self.executions
            .lock()
            .get(&ModuleName::from_dotted(name))
            .copied()
            .unwrap_or(0)
    }
}

impl ModuleLoader for ScriptedLoader {
    fn load(&self, system: &ImportSystem, name: &ModuleName) -> ImportResult<Module> {
        *self.executions.lock().entry(name.clone()).or_insert(0) += 1;

        let script = self
            .scripts
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| ImportError::module_not_found(name.clone()))?;

        let module = Module::new(name.clone(), ModuleOrigin::Synthetic);
        script(system, &module)?;
        Ok(module)
    }
}

pub(crate) fn lazy_system(loader: &Arc<ScriptedLoader>) -> ImportSystem {
    ImportSystem::new(ImportConfig::enabled(), loader.clone())
}

pub(crate) fn eager_system(loader: &Arc<ScriptedLoader>) -> ImportSystem {
    ImportSystem::new(ImportConfig::disabled(), loader.clone())
}

pub(crate) fn test_origin(stmt: &str) -> ImportOrigin {
    ImportOrigin::new("<test>", 1, stmt)
}

/// `import module`
pub(crate) fn import_stmt(module: &str) -> ImportStmt {
    ImportStmt::Import {
        targets: vec![ImportTarget {
            module: ModuleName::from_dotted(module),
            alias: None,
        }],
        origin: test_origin(&format!("import {module}")),
    }
}

/// `import module as alias`
pub(crate) fn import_as_stmt(module: &str, alias: &str) -> ImportStmt {
    ImportStmt::Import {
        targets: vec![ImportTarget {
            module: ModuleName::from_dotted(module),
            alias: Some(alias.to_string()),
        }],
        origin: test_origin(&format!("import {module} as {alias}")),
    }
}

/// `from module import a, b, ...`
pub(crate) fn from_import_stmt(module: &str, names: &[&str]) -> ImportStmt {
    ImportStmt::FromImport {
        module: ModuleName::from_dotted(module),
        names: FromImportNames::Names(names.iter().map(|n| ImportedName::plain(n)).collect()),
        origin: test_origin(&format!("from {module} import {}", names.join(", "))),
    }
}

/// `from module import *`
pub(crate) fn star_import_stmt(module: &str) -> ImportStmt {
    ImportStmt::FromImport {
        module: ModuleName::from_dotted(module),
        names: FromImportNames::Star,
        origin: test_origin(&format!("from {module} import *")),
    }
}
