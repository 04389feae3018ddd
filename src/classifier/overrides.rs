use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use crate::domain::ModuleName;

/// Process-wide set of module-name patterns that must always be imported
/// eagerly, regardless of the global switch.
///
/// Consulted once per binding at classification time; registering a pattern
/// after a placeholder has already been installed has no retroactive effect.
#[derive(Debug, Default)]
pub struct EagerOverrideRegistry {
    patterns: RwLock<FxHashSet<ModuleName>>,
}

impl EagerOverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds patterns to the set. Union semantics: re-registering an existing
    /// pattern is a no-op.
    pub fn register<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = self.patterns.write();
        for pattern in patterns {
            let pattern = ModuleName::from_dotted(pattern.as_ref());
            if set.insert(pattern.clone()) {
                tracing::debug!(pattern = %pattern, "registered eager override");
            }
        }
    }

    /// Whether `name` matches any registered pattern. A pattern matches the
    /// module it names and everything beneath it ("foo" covers "foo.bar").
    pub fn matches(&self, name: &ModuleName) -> bool {
        self.patterns
            .read()
            .iter()
            .any(|pattern| name.starts_with(pattern))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }
}
