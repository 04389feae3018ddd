use std::fmt::{Display, Error, Formatter};

use thiserror::Error;

use crate::domain::{ImportOrigin, ModuleName};

pub type ImportResult<T> = Result<T, ImportError>;

/// The failure taxonomy of the import subsystem.
///
/// Everything here is `Clone + PartialEq`: a module that fails to load is
/// cached as a Failed record and the same error value is replayed verbatim
/// on every later reference, never re-derived.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportErrorKind {
    #[error("no module named '{0}'")]
    ModuleNotFound(ModuleName),

    #[error("cannot import name '{member}' from '{module}'")]
    MemberNotFound { module: ModuleName, member: String },

    #[error("circular lazy import: {}", display_chain(.0))]
    CircularImport(Vec<ModuleName>),

    #[error("error while executing module '{module}': {message}")]
    ModuleBody { module: ModuleName, message: String },
}

fn display_chain(chain: &[ModuleName]) -> String {
    chain
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// An import failure plus the origin of the statement that deferred it.
///
/// The origin is optional only because dynamic imports and loader-internal
/// failures have no originating statement; every failure surfaced through a
/// placeholder carries one.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportError {
    kind: ImportErrorKind,
    origin: Option<ImportOrigin>,
}

impl ImportError {
    pub fn new(kind: ImportErrorKind) -> Self {
        Self { kind, origin: None }
    }

    pub fn module_not_found(name: ModuleName) -> Self {
        Self::new(ImportErrorKind::ModuleNotFound(name))
    }

    pub fn member_not_found(module: ModuleName, member: impl Into<String>) -> Self {
        Self::new(ImportErrorKind::MemberNotFound {
            module,
            member: member.into(),
        })
    }

    pub fn circular(chain: Vec<ModuleName>) -> Self {
        Self::new(ImportErrorKind::CircularImport(chain))
    }

    pub fn module_body(module: ModuleName, message: impl Into<String>) -> Self {
        Self::new(ImportErrorKind::ModuleBody {
            module,
            message: message.into(),
        })
    }

    /// Attaches an origin if the error does not already carry one. A failure
    /// propagating out of a nested import keeps its own, deeper origin.
    pub fn with_origin(mut self, origin: ImportOrigin) -> Self {
        self.origin.get_or_insert(origin);
        self
    }

    pub fn kind(&self) -> &ImportErrorKind {
        &self.kind
    }

    pub fn origin(&self) -> Option<&ImportOrigin> {
        self.origin.as_ref()
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.kind)?;
        if let Some(origin) = &self.origin {
            write!(f, "\n  deferred from {origin}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ImportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_origin_names_the_statement() {
        let err = ImportError::module_not_found(ModuleName::from_dotted("foo"))
            .with_origin(ImportOrigin::new("m.py", 1, "import foo"));

        assert_eq!(
            err.to_string(),
            "no module named 'foo'\n  deferred from m.py:1 (`import foo`)"
        );
    }

    #[test]
    fn with_origin_keeps_the_first_origin() {
        let inner = ImportOrigin::new("inner.py", 2, "import b");
        let outer = ImportOrigin::new("outer.py", 9, "import a");

        let err = ImportError::module_not_found(ModuleName::from_dotted("b"))
            .with_origin(inner.clone())
            .with_origin(outer);

        assert_eq!(err.origin(), Some(&inner));
    }

    #[test]
    fn circular_display_names_the_whole_chain() {
        let err = ImportError::circular(vec![
            ModuleName::from_dotted("a"),
            ModuleName::from_dotted("b"),
            ModuleName::from_dotted("a"),
        ]);

        assert_eq!(err.to_string(), "circular lazy import: a -> b -> a");
    }

    #[test]
    fn replayed_errors_compare_equal() {
        let make = || {
            ImportError::module_body(ModuleName::from_dotted("foo"), "boom")
                .with_origin(ImportOrigin::new("m.py", 4, "import foo"))
        };
        assert_eq!(make(), make().clone());
    }
}
