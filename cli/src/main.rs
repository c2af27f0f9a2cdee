use clap::{Parser, Subcommand};
use prost::Message;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use valibot_gen_compiler::error::ValibotError;
use valibot_gen_compiler::reflect::{decode_pool, default_targets, load_files};
use valibot_gen_compiler::{compile_files, plugin, GenerateOptions, GeneratedFile, ProtovalidateResolver};

#[derive(Parser)]
#[command(name = "protoc-gen-valibot")]
#[command(
    about = "Generate valibot schemas from protobuf messages. Without a subcommand, runs as a protoc/buf plugin on stdin/stdout",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate `.valibot.ts` modules from a serialized `FileDescriptorSet`
    Generate {
        /// Input descriptor set (`buf build -o` / `protoc --include_imports --include_source_info -o`)
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Suffix appended to every exported schema name
        #[arg(long, default_value = "Schema")]
        schema_suffix: String,

        /// `.proto` paths to generate (defaults to every non-support file in the set)
        #[arg(short, long = "file")]
        files: Vec<String>,
    },

    /// Print the loaded descriptor model as JSON
    Describe {
        /// Input descriptor set
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// `.proto` paths to describe (defaults to every non-support file in the set)
        #[arg(short, long = "file")]
        files: Vec<String>,
    },
}

fn main() -> Result<(), ValibotError> {
    // stdout carries the plugin protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        None => {
            let mut input = Vec::new();
            io::stdin().read_to_end(&mut input)?;
            let response = plugin::handle(&input);
            io::stdout().write_all(&response.encode_to_vec())?;
            Ok(())
        }

        Some(Commands::Generate { descriptor_set, out, schema_suffix, files }) => {
            let options = GenerateOptions::with_schema_suffix(schema_suffix)?;
            let pool = decode_pool(&fs::read(descriptor_set)?)?;
            let targets = if files.is_empty() { default_targets(&pool) } else { files.clone() };

            let protos = load_files(&pool, &targets)?;
            let generated = compile_files(&protos, &options, &ProtovalidateResolver)?;
            write_outputs(out, &generated)?;
            info!(files = generated.len(), out = %out.display(), "wrote generated modules");

            for file in &generated {
                println!("Generated {}", out.join(&file.name).display());
            }
            Ok(())
        }

        Some(Commands::Describe { descriptor_set, files }) => {
            let pool = decode_pool(&fs::read(descriptor_set)?)?;
            let targets = if files.is_empty() { default_targets(&pool) } else { files.clone() };

            let protos = load_files(&pool, &targets)?;
            println!("{}", serde_json::to_string_pretty(&protos)?);
            Ok(())
        }
    }
}

/// Write every generated module under `out_dir`, creating directories as
/// needed. Modules are staged next to their targets first and only moved
/// into place once all of them were written.
fn write_outputs(out_dir: &Path, files: &[GeneratedFile]) -> Result<(), ValibotError> {
    let mut staged = Vec::with_capacity(files.len());
    for file in files {
        match stage_output(out_dir, file) {
            Ok(paths) => staged.push(paths),
            Err(err) => {
                for (tmp, _) in &staged {
                    let _ = fs::remove_file(tmp);
                }
                return Err(err);
            }
        }
    }

    for (tmp, path) in staged {
        fs::rename(&tmp, &path)?;
    }
    Ok(())
}

/// Write `file` to a temporary sibling of its target; returns (temporary, target).
fn stage_output(out_dir: &Path, file: &GeneratedFile) -> Result<(PathBuf, PathBuf), ValibotError> {
    let path = out_dir.join(&file.name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("ts.tmp");
    if let Err(err) = fs::write(&tmp, &file.content) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok((tmp, path))
}
