//! Decides, per name introduced by an import statement, whether the binding
//! is installed eagerly (module executes at the statement) or lazily (a
//! placeholder is installed and the module executes on first use).

mod overrides;

pub use overrides::EagerOverrideRegistry;

use crate::domain::{ImportOrigin, ModuleName};

/// The lexical position of an import statement, as reported by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalContext {
    /// Directly in a module body, outside any suite that handles failures.
    ModuleBody,
    Function,
    Class,
    /// Inside a try/except/finally suite, at any nesting depth.
    TryBlock,
    /// Inside a with suite, at any nesting depth.
    WithBlock,
}

impl LexicalContext {
    pub fn is_module_body(&self) -> bool {
        matches!(self, Self::ModuleBody)
    }
}

/// One import statement, as emitted by the (external) parser/compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportStmt {
    /// `import a.b.c [as x]`, possibly several targets per statement.
    Import {
        targets: Vec<ImportTarget>,
        origin: ImportOrigin,
    },
    /// `from a.b import x [as y], ...` or `from a.b import *`.
    FromImport {
        module: ModuleName,
        names: FromImportNames,
        origin: ImportOrigin,
    },
}

impl ImportStmt {
    pub fn origin(&self) -> &ImportOrigin {
        match self {
            Self::Import { origin, .. } => origin,
            Self::FromImport { origin, .. } => origin,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportTarget {
    pub module: ModuleName,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromImportNames {
    Star,
    Names(Vec<ImportedName>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedName {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportedName {
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
        }
    }

    pub fn aliased(name: &str, alias: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        }
    }

    fn bound_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Eager,
    Lazy,
}

/// What a binding resolves to once its module record is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingTarget {
    /// `import a.b.c`: execute the whole chain, bind the root package `a`.
    ModuleRoot(ModuleName),
    /// `import a.b.c as x`: execute the whole chain, bind the leaf `a.b.c`.
    ModuleLeaf(ModuleName),
    /// `from a.b import x`: bind member `x` of module `a.b`.
    Member { module: ModuleName, member: String },
    /// `from a.b import *`: copy every public member of `a.b`.
    Star(ModuleName),
}

impl BindingTarget {
    /// The module whose record anchors resolution of this target.
    pub fn module(&self) -> &ModuleName {
        match self {
            Self::ModuleRoot(m) | Self::ModuleLeaf(m) | Self::Star(m) => m,
            Self::Member { module, .. } => module,
        }
    }
}

/// The classifier's decision record for one imported name. Immutable once
/// created.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    name: String,
    target: BindingTarget,
    origin: ImportOrigin,
    disposition: Disposition,
}

impl Binding {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &BindingTarget {
        &self.target
    }

    pub fn origin(&self) -> &ImportOrigin {
        &self.origin
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn is_lazy(&self) -> bool {
        self.disposition == Disposition::Lazy
    }
}

/// Produces one `Binding` per name the statement introduces.
///
/// Rules, in order: a non-module-body context forces eager (including
/// try/with suites, so failures surface where handling was written); a star
/// import forces eager (the bound names are unknowable without executing the
/// module); an override-registry match forces eager; the global switch being
/// off forces eager; everything else is lazy.
pub fn classify(
    stmt: &ImportStmt,
    ctx: LexicalContext,
    overrides: &EagerOverrideRegistry,
    lazy_imports: bool,
) -> Vec<Binding> {
    let bindings = match stmt {
        ImportStmt::Import { targets, origin } => targets
            .iter()
            .map(|target| {
                let (name, binding_target) = match &target.alias {
                    Some(alias) => (alias.clone(), BindingTarget::ModuleLeaf(target.module.clone())),
                    None => (
                        target.module.head().to_string(),
                        BindingTarget::ModuleRoot(target.module.clone()),
                    ),
                };
                let disposition = disposition_for(&target.module, ctx, false, overrides, lazy_imports);
                Binding {
                    name,
                    target: binding_target,
                    origin: origin.clone(),
                    disposition,
                }
            })
            .collect(),
        ImportStmt::FromImport {
            module,
            names,
            origin,
        } => match names {
            FromImportNames::Star => vec![Binding {
                name: "*".to_string(),
                target: BindingTarget::Star(module.clone()),
                origin: origin.clone(),
                disposition: disposition_for(module, ctx, true, overrides, lazy_imports),
            }],
            FromImportNames::Names(names) => names
                .iter()
                .map(|imported| Binding {
                    name: imported.bound_name().to_string(),
                    target: BindingTarget::Member {
                        module: module.clone(),
                        member: imported.name.clone(),
                    },
                    origin: origin.clone(),
                    disposition: disposition_for(module, ctx, false, overrides, lazy_imports),
                })
                .collect(),
        },
    };

    for binding in &bindings {
        tracing::debug!(
            name = binding.name,
            module = %binding.target.module(),
            disposition = ?binding.disposition,
            "classified import binding"
        );
    }

    bindings
}

fn disposition_for(
    module: &ModuleName,
    ctx: LexicalContext,
    star: bool,
    overrides: &EagerOverrideRegistry,
    lazy_imports: bool,
) -> Disposition {
    if !ctx.is_module_body() {
        return Disposition::Eager;
    }
    if star {
        return Disposition::Eager;
    }
    if overrides.matches(module) {
        return Disposition::Eager;
    }
    if !lazy_imports {
        return Disposition::Eager;
    }
    Disposition::Lazy
}
