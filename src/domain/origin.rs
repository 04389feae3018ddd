use std::fmt::{Display, Error, Formatter};
use std::path::{Path, PathBuf};

use crate::domain::ModuleName;

/// Where a module object came from, for diagnostics and `__file__`-style
/// introspection.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ModuleOrigin {
    File(PathBuf),
    Builtin,
    Synthetic,
}

impl ModuleOrigin {
    pub fn path(&self) -> PathBuf {
        match self {
            ModuleOrigin::File(p) => p.to_path_buf(),
            ModuleOrigin::Builtin => PathBuf::from("<builtin>"),
            ModuleOrigin::Synthetic => PathBuf::from("<synthetic>"),
        }
    }
}

/// The site of the import statement that created a binding: file, line, and
/// the verbatim statement text.
///
/// A deferred import can fail long after its statement executed, so every
/// placeholder and every captured failure carries one of these back to the
/// point the programmer actually wrote.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ImportOrigin {
    file: PathBuf,
    line: usize,
    stmt: String,
}

impl ImportOrigin {
    pub fn new<P>(file: P, line: usize, stmt: &str) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            file: file.as_ref().to_path_buf(),
            line,
            stmt: stmt.to_string(),
        }
    }

    /// Origin for a programmatic, string-driven import. There is no source
    /// statement, so we synthesize one.
    pub fn dynamic(name: &ModuleName) -> Self {
        Self::new("<dynamic>", 0, &format!("import {name}"))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn statement(&self) -> &str {
        &self.stmt
    }
}

impl Display for ImportOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}:{} (`{}`)", self.file.display(), self.line, self.stmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_file_line_and_statement() {
        let origin = ImportOrigin::new("app/main.py", 3, "import foo");
        assert_eq!(origin.to_string(), "app/main.py:3 (`import foo`)");
    }

    #[test]
    fn dynamic_origin_synthesizes_a_statement() {
        let origin = ImportOrigin::dynamic(&ModuleName::from_dotted("pkg.mod"));
        assert_eq!(origin.statement(), "import pkg.mod");
        assert_eq!(origin.line(), 0);
    }
}
