//! protoc plugin protocol: `CodeGeneratorRequest` in, `CodeGeneratorResponse` out.

use prost::Message;
use prost_types::compiler::{code_generator_response, CodeGeneratorResponse};
use tracing::{error, info};

use crate::{
    compiler::{compile_files, GeneratedFile},
    constraints::ProtovalidateResolver,
    error::ValibotError,
    options::GenerateOptions,
    reflect::{decode_pool, load_files},
};

/// `CodeGeneratorRequest` with the descriptors left as raw bytes, so their
/// option extensions can be decoded against the full pool later.
#[derive(Clone, PartialEq, Message)]
pub struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    pub proto_file: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct RawFileDescriptorSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub file: Vec<Vec<u8>>,
}

/// Generate every requested file. All or nothing.
pub fn generate(request: &RawCodeGeneratorRequest) -> Result<Vec<GeneratedFile>, ValibotError> {
    let options = GenerateOptions::from_parameter(request.parameter.as_deref().unwrap_or(""))?;

    let set = RawFileDescriptorSet { file: request.proto_file.clone() };
    let pool = decode_pool(&set.encode_to_vec())?;

    let files = load_files(&pool, &request.file_to_generate)?;
    compile_files(&files, &options, &ProtovalidateResolver)
}

/// Decode a request and build the response. Failures are reported through
/// the response's `error` field with no files attached.
pub fn handle(input: &[u8]) -> CodeGeneratorResponse {
    let result = RawCodeGeneratorRequest::decode(input)
        .map_err(ValibotError::from)
        .and_then(|request| generate(&request));

    match result {
        Ok(files) => {
            info!(files = files.len(), "generated valibot modules");
            CodeGeneratorResponse {
                supported_features: Some(code_generator_response::Feature::Proto3Optional as u64),
                file: files
                    .into_iter()
                    .map(|file| code_generator_response::File {
                        name:    Some(file.name),
                        content: Some(file.content),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }
        }
        Err(err) => {
            error!(error = %err, "generation failed");
            CodeGeneratorResponse {
                error: Some(err.to_string()),
                supported_features: Some(code_generator_response::Feature::Proto3Optional as u64),
                ..Default::default()
            }
        }
    }
}
