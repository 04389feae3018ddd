use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{
    classifier::BindingTarget,
    domain::{ImportOrigin, ImportResult, Value},
    runtime::{ImportSystem, ModuleRecord},
};

/// The stand-in stored for a lazy binding until its value is first observed.
/// Crate-private by design: no public read path of a `Namespace` can ever
/// return one.
#[derive(Debug, Clone)]
pub(crate) struct Placeholder {
    pub(crate) target: BindingTarget,
    pub(crate) origin: ImportOrigin,
    pub(crate) record: Arc<ModuleRecord>,
}

#[derive(Debug, Clone)]
enum Slot {
    Value(Value),
    Placeholder(Placeholder),
}

#[derive(Debug, Default)]
struct Slots {
    index: FxHashMap<String, usize>,
    entries: Vec<(String, Slot)>,
}

impl Slots {
    fn get(&self, name: &str) -> Option<&Slot> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    fn put(&mut self, name: &str, slot: Slot) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = slot,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), slot));
            }
        }
    }
}

/// Module-level variable storage: an insertion-ordered mapping from name to
/// value.
///
/// Every read passes through the single choke-point accessor [`Namespace::load`].
/// A namespace that has never held a placeholder stays on the default fast
/// path; the first placeholder installed sets a sticky flag that activates
/// the specialized path for this namespace only.
#[derive(Debug, Default)]
pub struct Namespace {
    slots: RwLock<Slots>,
    /// Set the first time a placeholder is inserted; never cleared. False
    /// guarantees every slot holds a plain value.
    may_contain_placeholders: AtomicBool,
    /// Counts entries into the specialized (slot-inspecting) path. The fast
    /// path never bumps this.
    placeholder_checks: AtomicU64,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single choke-point read accessor.
    ///
    /// If the slot holds a placeholder, resolution is triggered through the
    /// engine and the resolved value is written back into the slot before
    /// being returned. A concurrent reader that raced us to the write-back
    /// observes the already-stored value; the module record's state machine
    /// guarantees both readers see the same one.
    pub fn load(&self, system: &ImportSystem, name: &str) -> ImportResult<Option<Value>> {
        let placeholder = {
            let slots = self.slots.read();
            if !self.may_contain_placeholders.load(Ordering::Relaxed) {
                return Ok(slots.get(name).map(|slot| match slot {
                    Slot::Value(value) => value.clone(),
                    Slot::Placeholder(_) => {
                        unreachable!("placeholder present with flag unset")
                    }
                }));
            }

            self.placeholder_checks.fetch_add(1, Ordering::Relaxed);
            match slots.get(name) {
                None => return Ok(None),
                Some(Slot::Value(value)) => return Ok(Some(value.clone())),
                Some(Slot::Placeholder(placeholder)) => placeholder.clone(),
            }
        };

        // Resolve outside any namespace lock: module execution may write
        // into this namespace or read other namespaces.
        let value = system.resolve_placeholder(&placeholder)?;

        let mut slots = self.slots.write();
        // Another reader may have resolved and stored first; its value wins.
        if let Some(Slot::Value(existing)) = slots.get(name) {
            return Ok(Some(existing.clone()));
        }
        slots.put(name, Slot::Value(value.clone()));
        Ok(Some(value))
    }

    /// Ordinary write. Overwrites any slot, placeholder included, without
    /// triggering resolution.
    pub fn store(&self, name: &str, value: Value) {
        self.slots.write().put(name, Slot::Value(value));
    }

    /// Removes a binding, resolving it first so a raw placeholder never
    /// crosses the namespace boundary.
    pub fn remove(&self, system: &ImportSystem, name: &str) -> ImportResult<Option<Value>> {
        let value = self.load(system, name)?;
        if value.is_some() {
            let mut slots = self.slots.write();
            if let Some(i) = slots.index.remove(name) {
                slots.entries.remove(i);
                for index in slots.index.values_mut() {
                    if *index > i {
                        *index -= 1;
                    }
                }
            }
        }
        Ok(value)
    }

    pub(crate) fn install_placeholder(&self, name: &str, placeholder: Placeholder) {
        let mut slots = self.slots.write();
        // Flag before the slot becomes visible; both happen under the write
        // lock, so any reader acquiring the read lock sees them together.
        self.may_contain_placeholders.store(true, Ordering::Relaxed);
        slots.put(name, Slot::Placeholder(placeholder));
    }

    /// All names bound in this namespace, in insertion order. Names alone
    /// never require resolution.
    pub fn symbols(&self) -> Vec<String> {
        self.slots
            .read()
            .entries
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// A bulk view of the namespace contents, in insertion order. Every
    /// yielded value is routed through [`Namespace::load`], so enumeration
    /// can trigger resolution but can never expose a placeholder.
    pub fn snapshot(&self, system: &ImportSystem) -> ImportResult<Vec<(String, Value)>> {
        let names = self.symbols();
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            // A concurrent remove can drop a name between the two steps;
            // skip it rather than invent a value.
            if let Some(value) = self.load(system, &name)? {
                out.push((name, value));
            }
        }
        Ok(out)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.read().get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn may_contain_placeholders(&self) -> bool {
        self.may_contain_placeholders.load(Ordering::Relaxed)
    }

    /// How many reads have entered the specialized slot-inspecting path.
    /// Stays at zero for any namespace that never held a placeholder.
    pub fn placeholder_checks(&self) -> u64 {
        self.placeholder_checks.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classifier::LexicalContext,
        config::ImportConfig,
        test_utils::{import_stmt, lazy_system, ScriptedLoader},
    };

    fn bare_system() -> ImportSystem {
        ImportSystem::new(ImportConfig::disabled(), ScriptedLoader::new())
    }

    fn install_lazy(system: &ImportSystem, ns: &Namespace, module: &str) {
        system
            .execute_import(ns, &import_stmt(module), LexicalContext::ModuleBody)
            .expect("lazy binding installation cannot fail");
    }

    #[test]
    fn store_and_load_round_trip() {
        let system = bare_system();
        let ns = Namespace::new();
        ns.store("x", Value::Integer(5));

        assert_eq!(ns.load(&system, "x").unwrap(), Some(Value::Integer(5)));
        assert_eq!(ns.load(&system, "missing").unwrap(), None);
    }

    #[test]
    fn symbols_preserve_insertion_order() {
        let ns = Namespace::new();
        ns.store("b", Value::None);
        ns.store("a", Value::None);
        ns.store("c", Value::None);
        ns.store("a", Value::Integer(1));

        assert_eq!(ns.symbols(), vec!["b", "a", "c"]);
    }

    #[test]
    fn fast_path_never_counts_inspections() {
        let system = bare_system();
        let ns = Namespace::new();
        ns.store("x", Value::Integer(1));

        for _ in 0..100 {
            ns.load(&system, "x").unwrap();
        }

        assert!(!ns.may_contain_placeholders());
        assert_eq!(ns.placeholder_checks(), 0);
    }

    #[test]
    fn placeholder_flag_is_sticky_and_scoped_to_one_namespace() {
        let loader = ScriptedLoader::new();
        loader.script("foo", |_, _| Ok(()));
        let system = lazy_system(&loader);

        let lazy_ns = Namespace::new();
        install_lazy(&system, &lazy_ns, "foo");
        assert!(lazy_ns.may_contain_placeholders());

        // Resolution does not clear the flag.
        lazy_ns.load(&system, "foo").unwrap();
        assert!(lazy_ns.may_contain_placeholders());

        let other = Namespace::new();
        other.store("x", Value::None);
        other.load(&system, "x").unwrap();
        assert_eq!(other.placeholder_checks(), 0);
    }

    #[test]
    fn remove_resolves_before_removing() {
        let loader = ScriptedLoader::new();
        loader.script("foo", |_, module| {
            module.set("x", Value::Integer(1));
            Ok(())
        });
        let system = lazy_system(&loader);

        let ns = Namespace::new();
        install_lazy(&system, &ns, "foo");

        let removed = ns.remove(&system, "foo").unwrap().unwrap();
        assert!(matches!(removed, Value::Module(_)));
        assert_eq!(loader.executions("foo"), 1);
        assert!(!ns.contains("foo"));
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let system = bare_system();
        let ns = Namespace::new();
        ns.store("a", Value::Integer(1));
        ns.store("b", Value::Integer(2));
        ns.store("c", Value::Integer(3));

        ns.remove(&system, "a").unwrap();

        assert_eq!(ns.symbols(), vec!["b", "c"]);
        assert_eq!(ns.load(&system, "c").unwrap(), Some(Value::Integer(3)));
    }
}
