use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::{
    domain::{ImportError, ImportOrigin, ModuleName},
    runtime::Module,
};

/// The process-wide source of truth for one module's load state.
///
/// Exactly one record exists per canonical module name; it is created on
/// first reference (eager or lazy) and lives until process teardown. State
/// transitions are monotonic: Unresolved -> Resolving -> {Resolved, Failed}.
#[derive(Debug)]
pub struct ModuleRecord {
    name: ModuleName,
    /// The import statement that first referenced this module; attached to
    /// any failure captured while resolving it.
    origin: ImportOrigin,
    pub(crate) state: Mutex<RecordState>,
    /// Signaled on every transition out of Resolving.
    pub(crate) settled: Condvar,
}

#[derive(Debug)]
pub(crate) enum RecordState {
    Unresolved,
    Resolving,
    Resolved(Arc<Module>),
    Failed(ImportError),
}

impl RecordState {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Resolving => "resolving",
            Self::Resolved(_) => "resolved",
            Self::Failed(_) => "failed",
        }
    }
}

impl ModuleRecord {
    pub(crate) fn new(name: ModuleName, origin: ImportOrigin) -> Self {
        Self {
            name,
            origin,
            state: Mutex::new(RecordState::Unresolved),
            settled: Condvar::new(),
        }
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn origin(&self) -> &ImportOrigin {
        &self.origin
    }

    /// The module object, if resolution has already completed successfully.
    /// Never blocks; use the engine's `resolve` to force resolution.
    pub fn resolved(&self) -> Option<Arc<Module>> {
        match &*self.state.lock() {
            RecordState::Resolved(module) => Some(module.clone()),
            _ => None,
        }
    }

    pub fn state_label(&self) -> &'static str {
        self.state.lock().label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModuleOrigin;

    fn record() -> ModuleRecord {
        ModuleRecord::new(
            ModuleName::from_dotted("foo"),
            ImportOrigin::new("m.py", 1, "import foo"),
        )
    }

    #[test]
    fn new_record_is_unresolved() {
        let record = record();
        assert_eq!(record.state_label(), "unresolved");
        assert!(record.resolved().is_none());
    }

    #[test]
    fn resolved_returns_the_module_object() {
        let record = record();
        let module = Arc::new(Module::new(
            ModuleName::from_dotted("foo"),
            ModuleOrigin::Synthetic,
        ));
        *record.state.lock() = RecordState::Resolved(module.clone());

        assert!(Arc::ptr_eq(&record.resolved().unwrap(), &module));
        assert_eq!(record.state_label(), "resolved");
    }
}
