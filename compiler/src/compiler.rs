use serde::Serialize;
use tracing::debug;
use valibot_gen_ast::File;

use crate::{
    constraints::ConstraintResolver,
    error::ValibotError,
    gen_valibot::Synthesizer,
    options::GenerateOptions,
    resolver::{render_file, SymbolRegistry},
    types::ProtoFile,
    utils::generated_file_name,
};

/// One output module, ready to be written by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub name:    String,
    pub content: String,
}

/// Synthesize every file of the batch. No file is rendered here: the symbol
/// registry can only be built once this has succeeded for all of them.
pub fn synthesize_files<R: ConstraintResolver + ?Sized>(
    files: &[ProtoFile],
    options: &GenerateOptions,
    constraints: &R,
) -> Result<Vec<File>, ValibotError> {
    let synthesizer = Synthesizer::new(options, constraints);
    files.iter().map(|file| synthesizer.synthesize_file(file)).collect()
}

/// Compile a batch of `.proto` files into valibot modules.
///
/// Runs in two phases: synthesize all files, then resolve and render all
/// files against the registry of every exported symbol. Any error aborts
/// the whole batch; nothing is returned for the files that did succeed.
pub fn compile_files<R: ConstraintResolver + ?Sized>(
    files: &[ProtoFile],
    options: &GenerateOptions,
    constraints: &R,
) -> Result<Vec<GeneratedFile>, ValibotError> {
    let modules = synthesize_files(files, options, constraints)?;

    let registry = SymbolRegistry::build(&modules);
    debug!(files = modules.len(), symbols = registry.len(), "built symbol registry");

    modules
        .iter()
        .map(|module| {
            Ok(GeneratedFile {
                name:    generated_file_name(&module.path),
                content: render_file(module, &registry)?,
            })
        })
        .collect()
}
