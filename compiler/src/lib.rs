//! valibot-gen-compiler
//!
//! This crate implements:
//!  1) A descriptor model for `.proto` files (`types`) and its loader from a
//!     `prost_reflect::DescriptorPool` (`reflect`),
//!  2) Constraint resolution from protovalidate rules (`constraints`),
//!  3) Schema synthesis, one valibot expression per message (`gen_valibot`),
//!  4) Cross-file symbol resolution and module rendering (`resolver`),
//!  5) The two-phase batch pipeline (`compile_files`) and the protoc plugin
//!     protocol (`plugin`),
//!  6) Error types (`ValibotError`) and plugin options (`GenerateOptions`).

pub mod error;
pub mod types;
pub mod utils;
pub mod options;
pub mod constraints;
pub mod valibot;
pub mod gen_valibot;
pub mod resolver;
pub mod compiler;
pub mod reflect;
pub mod plugin;

pub use compiler::{compile_files, synthesize_files, GeneratedFile};
pub use constraints::{ConstraintResolver, ProtovalidateResolver};
pub use error::ValibotError;
pub use gen_valibot::Synthesizer;
pub use options::GenerateOptions;
pub use resolver::{render_file, SymbolRegistry};
