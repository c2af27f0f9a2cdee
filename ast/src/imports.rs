use std::collections::BTreeMap;
use std::fmt;

use crate::node::{walk, Node, Origin};

/// Key of an import group: a third-party package, or the placeholder for
/// symbols exported by other generated modules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportSource {
    Package(String),
    Lookup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDetail {
    /// `.proto` path defining the symbol; set for `Lookup` entries only.
    pub origin_file: Option<String>,
}

/// Symbols referenced by an expression tree, grouped by where they come from.
///
/// Derived by walking declarations, never edited by hand. Both levels are
/// ordered maps so iteration is already sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    entries: BTreeMap<ImportSource, BTreeMap<String, ImportDetail>>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every non-local `Call` reachable from `node`.
    pub fn collect(node: &Node) -> Self {
        let mut imports = ImportMap::new();
        walk(node, &mut |n: &Node| {
            if let Node::Call(call) = n {
                match &call.origin {
                    Origin::Local => {}
                    Origin::Package(pkg) => {
                        imports.insert(ImportSource::Package(pkg.clone()), &call.name, ImportDetail::default());
                    }
                    Origin::Lookup { file } => {
                        imports.insert(
                            ImportSource::Lookup,
                            &call.name,
                            ImportDetail { origin_file: Some(file.clone()) },
                        );
                    }
                }
            }
        });
        imports
    }

    pub fn insert(&mut self, source: ImportSource, name: &str, detail: ImportDetail) {
        self.entries.entry(source).or_default().insert(name.to_string(), detail);
    }

    /// Key-wise union. On a repeated `(source, name)` pair the later detail
    /// wins; within one run both sides always agree.
    pub fn merge(&mut self, other: ImportMap) {
        for (source, names) in other.entries {
            self.entries.entry(source).or_default().extend(names);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    pub fn get(&self, source: &ImportSource) -> Option<&BTreeMap<String, ImportDetail>> {
        self.entries.get(source)
    }

    /// Third-party packages in name order, each with its sorted symbol names.
    pub fn packages(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.entries.iter().filter_map(|(source, names)| match source {
            ImportSource::Package(pkg) if !names.is_empty() => {
                Some((pkg.as_str(), names.keys().map(String::as_str).collect()))
            }
            _ => None,
        })
    }

    /// Symbols owned by other generated modules, with the file defining each.
    pub fn lookups(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .get(&ImportSource::Lookup)
            .into_iter()
            .flat_map(|names| names.iter().map(|(name, detail)| (name.as_str(), detail.origin_file.as_deref())))
    }
}

/// `import { a, b } from 'module';`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: String,
    pub names:  Vec<String>,
}

impl Import {
    /// Names are sorted and de-duplicated on construction.
    pub fn new<S: Into<String>>(module: &str, names: impl IntoIterator<Item = S>) -> Self {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Import { module: module.to_string(), names }
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import {{ {} }} from '{}';", self.names.join(", "), self.module)
    }
}
