//! Builds the descriptor model from a `prost_reflect::DescriptorPool`.
//!
//! The pool must be decoded from raw `FileDescriptorProto` bytes: the
//! protovalidate rules live in option extensions, which only survive when the
//! options are decoded against a pool that knows `buf/validate/validate.proto`.

use std::collections::HashMap;

use prost_reflect::{
    DescriptorPool, DynamicMessage, ExtensionDescriptor, FieldDescriptor, FileDescriptor, Kind,
    MessageDescriptor, OneofDescriptor, Value,
};
use tracing::debug;

use crate::{
    error::ValibotError,
    types::{
        Cardinality, FieldConstraints, FieldKind, MapEntry, MessageRef, OneofConstraints, ProtoField,
        ProtoFile, ProtoMessage, ProtoOneof,
    },
};

pub const FIELD_RULES_EXTENSION: &str = "buf.validate.field";
pub const ONEOF_RULES_EXTENSION: &str = "buf.validate.oneof";

// Field numbers in FileDescriptorProto / DescriptorProto, used for
// SourceCodeInfo paths.
const FILE_MESSAGE_TYPE: i32 = 4;
const MESSAGE_NESTED_TYPE: i32 = 3;

/// Files that only exist to support generation and never get a module.
const SUPPORT_PREFIXES: [&str; 2] = ["google/protobuf/", "buf/validate/"];

/// Decode a serialized `FileDescriptorSet`.
pub fn decode_pool(bytes: &[u8]) -> Result<DescriptorPool, ValibotError> {
    Ok(DescriptorPool::decode(bytes)?)
}

/// Every file of the pool except well-known and protovalidate support files,
/// in pool order.
pub fn default_targets(pool: &DescriptorPool) -> Vec<String> {
    pool.files()
        .map(|file| file.name().to_string())
        .filter(|name| !SUPPORT_PREFIXES.iter().any(|prefix| name.starts_with(prefix)))
        .collect()
}

/// Load the named files from the pool.
pub fn load_files(pool: &DescriptorPool, paths: &[String]) -> Result<Vec<ProtoFile>, ValibotError> {
    let loader = Loader::new(pool);
    paths
        .iter()
        .map(|path| {
            let file = pool
                .get_file_by_name(path)
                .ok_or_else(|| ValibotError::UnknownFile(path.clone()))?;
            Ok(loader.load_file(&file))
        })
        .collect()
}

struct Loader {
    field_rules: Option<ExtensionDescriptor>,
    oneof_rules: Option<ExtensionDescriptor>,
}

impl Loader {
    fn new(pool: &DescriptorPool) -> Self {
        Loader {
            field_rules: pool.get_extension_by_name(FIELD_RULES_EXTENSION),
            oneof_rules: pool.get_extension_by_name(ONEOF_RULES_EXTENSION),
        }
    }

    fn load_file(&self, file: &FileDescriptor) -> ProtoFile {
        let comments = leading_comments(file);

        let mut messages = Vec::new();
        for (index, message) in file.messages().enumerate() {
            let path = vec![FILE_MESSAGE_TYPE, index as i32];
            self.load_message(&message, path, &comments, &mut messages);
        }

        debug!(file = file.name(), messages = messages.len(), "loaded descriptors");
        ProtoFile {
            path:    file.name().to_string(),
            package: file.package_name().to_string(),
            messages,
        }
    }

    /// Push `message` and its nested messages (map entries excluded).
    fn load_message(
        &self,
        message: &MessageDescriptor,
        path: Vec<i32>,
        comments: &HashMap<Vec<i32>, String>,
        out: &mut Vec<ProtoMessage>,
    ) {
        if message.is_map_entry() {
            return;
        }

        let oneofs = message
            .oneofs()
            .filter(|oneof| !is_synthetic_oneof(oneof))
            .map(|oneof| self.load_oneof(&oneof))
            .collect();

        out.push(ProtoMessage {
            name:      message_ref(message).name,
            full_name: message.full_name().to_string(),
            comment:   comments.get(&path).cloned(),
            fields:    message.fields().map(|field| self.load_field(&field)).collect(),
            oneofs,
        });

        for (index, nested) in message.child_messages().enumerate() {
            let mut nested_path = path.clone();
            nested_path.extend([MESSAGE_NESTED_TYPE, index as i32]);
            self.load_message(&nested, nested_path, comments, out);
        }
    }

    fn load_field(&self, field: &FieldDescriptor) -> ProtoField {
        let cardinality = match field.kind() {
            Kind::Message(entry) if field.is_map() => Cardinality::Map(Box::new(MapEntry {
                key:   field_kind(&entry.map_entry_key_field()),
                value: field_kind(&entry.map_entry_value_field()),
            })),
            _ if field.is_list() => Cardinality::List,
            _ => Cardinality::Single,
        };

        ProtoField {
            name:        field.name().to_string(),
            json_name:   field.json_name().to_string(),
            number:      field.number(),
            kind:        field_kind(field),
            cardinality,
            // Synthetic oneofs back proto3 `optional`; those fields are plain fields here.
            oneof:       field
                .containing_oneof()
                .filter(|oneof| !is_synthetic_oneof(oneof))
                .map(|oneof| oneof.name().to_string()),
            constraints: FieldConstraints {
                required: rules_required(&field.options(), self.field_rules.as_ref()),
            },
        }
    }

    fn load_oneof(&self, oneof: &OneofDescriptor) -> ProtoOneof {
        ProtoOneof {
            name:        oneof.name().to_string(),
            constraints: OneofConstraints {
                required: rules_required(&oneof.options(), self.oneof_rules.as_ref()),
            },
        }
    }
}

fn field_kind(field: &FieldDescriptor) -> FieldKind {
    match field.kind() {
        Kind::Double   => FieldKind::Double,
        Kind::Float    => FieldKind::Float,
        Kind::Int32    => FieldKind::Int32,
        Kind::Int64    => FieldKind::Int64,
        Kind::Uint32   => FieldKind::Uint32,
        Kind::Uint64   => FieldKind::Uint64,
        Kind::Sint32   => FieldKind::Sint32,
        Kind::Sint64   => FieldKind::Sint64,
        Kind::Fixed32  => FieldKind::Fixed32,
        Kind::Fixed64  => FieldKind::Fixed64,
        Kind::Sfixed32 => FieldKind::Sfixed32,
        Kind::Sfixed64 => FieldKind::Sfixed64,
        Kind::Bool     => FieldKind::Bool,
        Kind::String   => FieldKind::String,
        Kind::Bytes    => FieldKind::Bytes,
        Kind::Enum(e)  => FieldKind::Enum(e.full_name().to_string()),
        Kind::Message(m) => FieldKind::Message(message_ref(&m)),
    }
}

/// A oneof generated by protoc for a proto3 `optional` field: its single
/// member carries `proto3_optional`.
fn is_synthetic_oneof(oneof: &OneofDescriptor) -> bool {
    match oneof.fields().collect::<Vec<_>>().as_slice() {
        [only] => only.field_descriptor_proto().proto3_optional(),
        _ => false,
    }
}

fn message_ref(message: &MessageDescriptor) -> MessageRef {
    let mut target = MessageRef::new(
        message.full_name(),
        message.package_name(),
        message.parent_file().name(),
    );
    target.is_map_entry = message.is_map_entry();
    target
}

/// `required` of the rules message stored under `extension`, if any.
fn rules_required(options: &DynamicMessage, extension: Option<&ExtensionDescriptor>) -> bool {
    let Some(extension) = extension else {
        return false;
    };
    if !options.has_extension(extension) {
        return false;
    }

    match options.get_extension(extension).as_ref() {
        Value::Message(rules) => rules
            .get_field_by_name("required")
            .and_then(|value| value.as_bool())
            .unwrap_or(false),
        _ => false,
    }
}

/// SourceCodeInfo path → leading comment.
fn leading_comments(file: &FileDescriptor) -> HashMap<Vec<i32>, String> {
    file.file_descriptor_proto()
        .source_code_info
        .iter()
        .flat_map(|info| info.location.iter())
        .filter_map(|location| {
            location
                .leading_comments
                .as_ref()
                .map(|comment| (location.path.clone(), comment.clone()))
        })
        .collect()
}
