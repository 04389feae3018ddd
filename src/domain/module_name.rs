use std::fmt::{Display, Error, Formatter};

/// A resolved, absolute module name used at runtime.
/// Always valid, never relative, never empty. Built by the import machinery
/// from dotted statement paths or supplied directly by an embedder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(Vec<String>);

impl ModuleName {
    pub fn new(segments: Vec<String>) -> Self {
        assert!(!segments.is_empty());
        Self(segments)
    }

    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        Self::new(segments.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn from_dotted(s: &str) -> Self {
        let segments = s.split('.').map(|s| s.to_string()).collect();
        Self::new(segments)
    }

    pub fn as_str(&self) -> String {
        self.0.join(".")
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn head(&self) -> &str {
        self.0
            .first()
            .map(|s| s.as_str())
            .expect("Invalid ModuleName")
    }

    pub fn tail(&self) -> &str {
        self.0
            .last()
            .map(|s| s.as_str())
            .expect("Invalid ModuleName")
    }

    /// The single-segment name of the top-level package this module lives in.
    /// For a top-level module, this is the module itself.
    pub fn root(&self) -> ModuleName {
        ModuleName::from_segments(&[self.head()])
    }

    pub fn parent(&self) -> Option<ModuleName> {
        self.strip_last(1)
    }

    /// Removes `n` segments from the end of the module name.
    ///
    /// This operation is structural, not semantic: it represents walking upward in the module
    /// hierarchy.
    ///
    /// Returns `None` if removing `n` segments would underflow or erase the module name entirely.
    pub fn strip_last(&self, n: usize) -> Option<ModuleName> {
        if n >= self.0.len() {
            return None;
        }

        let new_len = self.0.len() - n;
        Some(ModuleName(self.0[..new_len].to_vec()))
    }

    /// Iterate from the full module name upward through its parents,
    /// excluding the full name itself.
    ///
    /// Example:
    ///   "a.b.c" -> yields ["a.b", "a"]
    pub fn parents(&self) -> impl DoubleEndedIterator<Item = ModuleName> + '_ {
        (1..self.0.len()).filter_map(move |n| self.strip_last(n))
    }

    /// Whether `prefix` names this module or one of its ancestor packages.
    ///
    /// The match is at segment boundaries: "foo" covers "foo" and "foo.bar"
    /// but never "foobar".
    pub fn starts_with(&self, prefix: &ModuleName) -> bool {
        prefix.0.len() <= self.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

impl From<&ModuleName> for String {
    fn from(value: &ModuleName) -> Self {
        value.to_string()
    }
}
