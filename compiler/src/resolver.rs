use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;
use valibot_gen_ast::{File, Import};

use crate::{error::ValibotError, utils::import_specifier};

/// Exported symbol name → `.proto` paths whose generated module exports it.
///
/// Built once every file of the run has been synthesized, then only read.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    symbols: BTreeMap<String, BTreeSet<String>>,
}

impl SymbolRegistry {
    pub fn build(files: &[File]) -> Self {
        let mut symbols: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for file in files {
            for name in file.exported_names() {
                symbols.entry(name.to_string()).or_default().insert(file.path.clone());
            }
        }
        SymbolRegistry { symbols }
    }

    /// File owning `symbol`. When the reference names its defining file, that
    /// file must be among the owners.
    pub fn owner(&self, symbol: &str, origin_file: Option<&str>) -> Option<&str> {
        let owners = self.symbols.get(symbol)?;
        match origin_file {
            Some(origin) => owners.get(origin).map(String::as_str),
            None => owners.iter().next().map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Import statements for `file`: third-party packages first (by package
/// name), then other generated modules (by module specifier). References to
/// symbols of `file` itself produce no import; importing a name `file`
/// already declares is an error.
pub fn resolve_imports(file: &File, registry: &SymbolRegistry) -> Result<Vec<Import>, ValibotError> {
    let imports = file.imports();

    let mut statements: Vec<Import> = imports
        .packages()
        .map(|(pkg, names)| Import::new(pkg, names))
        .collect();

    let mut cross_file: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (symbol, origin) in imports.lookups() {
        let owner = registry
            .owner(symbol, origin)
            .ok_or_else(|| ValibotError::UnresolvedReference {
                symbol: symbol.to_string(),
                file:   file.path.clone(),
            })?;

        if owner == file.path {
            continue;
        }
        // Same-named messages from different packages would collide in one module.
        if file.exported_names().any(|name| name == symbol) {
            return Err(ValibotError::ShadowedReference {
                symbol: symbol.to_string(),
                file:   file.path.clone(),
                owner:  owner.to_string(),
            });
        }

        let module = import_specifier(&file.path, owner);
        trace!(file = %file.path, symbol, module = %module, "resolved cross-file reference");
        cross_file.entry(module).or_default().push(symbol);
    }

    statements.extend(
        cross_file
            .into_iter()
            .map(|(module, names)| Import::new(&module, names)),
    );

    Ok(statements)
}

/// Full text of the module generated for `file`.
pub fn render_file(file: &File, registry: &SymbolRegistry) -> Result<String, ValibotError> {
    let imports = resolve_imports(file, registry)?;

    let mut out = String::new();
    out.push_str("// Code generated by protoc-gen-valibot. DO NOT EDIT.\n");
    out.push_str(&format!("// source: {}\n\n", file.path));
    // Keep formatters and linters away from generated code.
    out.push_str("// eslint-disable\n");
    out.push_str("// biome-ignore-all format lint: generated code\n\n");

    if !imports.is_empty() {
        for import in &imports {
            out.push_str(&import.to_string());
            out.push('\n');
        }
        out.push('\n');
    }

    let body: Vec<String> = file.declarations.iter().map(|d| d.serialize()).collect();
    if !body.is_empty() {
        out.push_str(&body.join("\n\n"));
        out.push('\n');
    }

    Ok(out)
}
