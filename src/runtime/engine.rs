use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    classifier::{
        classify, Binding, BindingTarget, Disposition, EagerOverrideRegistry, ImportStmt,
        LexicalContext,
    },
    config::ImportConfig,
    domain::{ImportError, ImportOrigin, ImportResult, ModuleName, Value},
    runtime::{
        chain,
        namespace::Placeholder,
        record::{ModuleRecord, RecordState},
        Module, ModuleLoader, Namespace,
    },
};

/// The resolution engine and the process-wide import state: the module
/// record table, the loader, the eager-override registry, and the enable
/// switch. The only writer of module records.
pub struct ImportSystem {
    records: DashMap<ModuleName, Arc<ModuleRecord>>,
    loader: Arc<dyn ModuleLoader>,
    overrides: EagerOverrideRegistry,
    config: ImportConfig,
}

impl ImportSystem {
    pub fn new(config: ImportConfig, loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            records: DashMap::new(),
            loader,
            overrides: EagerOverrideRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn overrides(&self) -> &EagerOverrideRegistry {
        &self.overrides
    }

    /// Marks module-name patterns as always-eager. Effective for imports
    /// classified after this call; placeholders already installed are not
    /// revisited.
    pub fn register_eager<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.overrides.register(patterns);
    }

    /// The entry point the compiler calls for each import statement:
    /// classifies it and installs one binding per introduced name into
    /// `namespace`. Eager bindings resolve here; lazy bindings install
    /// placeholders and cannot fail.
    pub fn execute_import(
        &self,
        namespace: &Namespace,
        stmt: &ImportStmt,
        ctx: LexicalContext,
    ) -> ImportResult<()> {
        let bindings = classify(stmt, ctx, &self.overrides, self.config.lazy_imports());
        for binding in bindings {
            self.bind(namespace, &binding)?;
        }
        Ok(())
    }

    fn bind(&self, namespace: &Namespace, binding: &Binding) -> ImportResult<()> {
        match binding.disposition() {
            Disposition::Lazy => {
                let record = self.get_or_create_record(binding.target().module(), binding.origin());
                namespace.install_placeholder(
                    binding.name(),
                    Placeholder {
                        target: binding.target().clone(),
                        origin: binding.origin().clone(),
                        record,
                    },
                );
                Ok(())
            }
            Disposition::Eager => match binding.target() {
                BindingTarget::Star(module) => self.bind_star(namespace, module, binding.origin()),
                target => {
                    let value = self.resolve_target(target, binding.origin())?;
                    namespace.store(binding.name(), value);
                    Ok(())
                }
            },
        }
    }

    /// `from module import *`: executes the module and copies every public
    /// member into `namespace`, each routed through the choke-point accessor.
    fn bind_star(
        &self,
        namespace: &Namespace,
        module: &ModuleName,
        origin: &ImportOrigin,
    ) -> ImportResult<()> {
        let module_obj = self.resolve_chain(module, origin)?;
        for (name, value) in module_obj.namespace().snapshot(self)? {
            if !name.starts_with('_') {
                namespace.store(&name, value);
            }
        }
        Ok(())
    }

    /// Programmatic, string-driven import. Always eager: goes straight to
    /// resolution with no binding or placeholder involvement.
    pub fn import_by_name(&self, name: &str) -> ImportResult<Value> {
        let name = ModuleName::from_dotted(name);
        let origin = ImportOrigin::dynamic(&name);
        let module = self.resolve_chain(&name, &origin)?;
        Ok(Value::Module(module))
    }

    /// Returns the unique record for `name`, creating it Unresolved if
    /// absent. Creation is atomic with respect to lookup: concurrent callers
    /// get the same record.
    pub fn get_or_create_record(
        &self,
        name: &ModuleName,
        origin: &ImportOrigin,
    ) -> Arc<ModuleRecord> {
        self.records
            .entry(name.clone())
            .or_insert_with(|| Arc::new(ModuleRecord::new(name.clone(), origin.clone())))
            .value()
            .clone()
    }

    /// The record for `name`, if any import has referenced it yet.
    pub fn record(&self, name: &ModuleName) -> Option<Arc<ModuleRecord>> {
        self.records.get(name).map(|r| r.value().clone())
    }

    pub(crate) fn resolve_placeholder(&self, placeholder: &Placeholder) -> ImportResult<Value> {
        self.resolve_target(&placeholder.target, &placeholder.origin)
    }

    fn resolve_target(&self, target: &BindingTarget, origin: &ImportOrigin) -> ImportResult<Value> {
        match target {
            BindingTarget::ModuleRoot(name) => {
                self.resolve_chain(name, origin)?;
                let root = self.resolve(&self.get_or_create_record(&name.root(), origin))?;
                Ok(Value::Module(root))
            }
            BindingTarget::ModuleLeaf(name) | BindingTarget::Star(name) => {
                Ok(Value::Module(self.resolve_chain(name, origin)?))
            }
            BindingTarget::Member { module, member } => {
                let module_obj = self.resolve_chain(module, origin)?;
                // Same specialized lookup: a member that is itself lazily
                // bound resolves transitively.
                match module_obj.get(self, member)? {
                    Some(value) => Ok(value),
                    None => Err(ImportError::member_not_found(module.clone(), member)
                        .with_origin(origin.clone())),
                }
            }
        }
    }

    /// Executes every ancestor package of `name`, parents first, then `name`
    /// itself; returns the leaf module object.
    fn resolve_chain(&self, name: &ModuleName, origin: &ImportOrigin) -> ImportResult<Arc<Module>> {
        for ancestor in name.parents().rev() {
            self.resolve(&self.get_or_create_record(&ancestor, origin))?;
        }
        self.resolve(&self.get_or_create_record(name, origin))
    }

    /// Forces a record to a settled state and returns its module object.
    ///
    /// Module body execution happens at most once process-wide: a Resolved
    /// record returns its module, a Failed record replays its captured
    /// failure, a record being resolved by another thread is waited on, and
    /// a record being resolved by *this* thread of control is a true cycle.
    pub fn resolve(&self, record: &Arc<ModuleRecord>) -> ImportResult<Arc<Module>> {
        let mut state = record.state.lock();
        loop {
            match &*state {
                RecordState::Resolved(module) => {
                    tracing::trace!(module = %record.name(), "resolve hit cached module");
                    return Ok(module.clone());
                }
                RecordState::Failed(error) => {
                    tracing::trace!(module = %record.name(), "replaying cached import failure");
                    return Err(error.clone());
                }
                RecordState::Resolving => {
                    if chain::contains(record.name()) {
                        let mut cycle = chain::snapshot();
                        cycle.push(record.name().clone());
                        return Err(ImportError::circular(cycle)
                            .with_origin(record.origin().clone()));
                    }
                    // Another thread is executing this module; block until
                    // it settles, then re-dispatch.
                    record.settled.wait(&mut state);
                }
                RecordState::Unresolved => break,
            }
        }

        *state = RecordState::Resolving;
        drop(state);

        tracing::debug!(module = %record.name(), "executing module body");
        let result = {
            let _guard = chain::ChainGuard::push(record.name());
            self.loader.load(self, record.name())
        };

        let mut state = record.state.lock();
        let outcome = match result {
            Ok(module) => {
                let module = Arc::new(module);
                *state = RecordState::Resolved(module.clone());
                tracing::debug!(module = %record.name(), "module resolved");
                Ok(module)
            }
            Err(error) => {
                let error = error.with_origin(record.origin().clone());
                *state = RecordState::Failed(error.clone());
                tracing::debug!(module = %record.name(), %error, "module failed to resolve");
                Err(error)
            }
        };
        record.settled.notify_all();
        drop(state);
        outcome
    }
}
