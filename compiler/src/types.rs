use serde::Serialize;

/// Read-only view of one `.proto` file, as consumed by the synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtoFile {
    pub path:     String,
    pub package:  String,
    pub messages: Vec<ProtoMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtoMessage {
    /// Package-relative name, nested levels joined with `_`.
    pub name:      String,
    pub full_name: String,
    pub comment:   Option<String>,
    pub fields:    Vec<ProtoField>,
    pub oneofs:    Vec<ProtoOneof>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtoField {
    pub name:        String,
    pub json_name:   String,
    pub number:      u32,
    pub kind:        FieldKind,
    pub cardinality: Cardinality,
    /// Name of the (non-synthetic) oneof this field belongs to.
    pub oneof:       Option<String>,
    pub constraints: FieldConstraints,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtoOneof {
    pub name:        String,
    pub constraints: OneofConstraints,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cardinality {
    Single,
    List,
    Map(Box<MapEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
    pub key:   FieldKind,
    pub value: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    Enum(String),
    Message(MessageRef),
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldKind::Double
                | FieldKind::Float
                | FieldKind::Int32
                | FieldKind::Int64
                | FieldKind::Uint32
                | FieldKind::Uint64
                | FieldKind::Sint32
                | FieldKind::Sint64
                | FieldKind::Fixed32
                | FieldKind::Fixed64
                | FieldKind::Sfixed32
                | FieldKind::Sfixed64
        )
    }

    /// The `.proto` spelling of this kind.
    pub fn name(&self) -> &str {
        match self {
            FieldKind::Double   => "double",
            FieldKind::Float    => "float",
            FieldKind::Int32    => "int32",
            FieldKind::Int64    => "int64",
            FieldKind::Uint32   => "uint32",
            FieldKind::Uint64   => "uint64",
            FieldKind::Sint32   => "sint32",
            FieldKind::Sint64   => "sint64",
            FieldKind::Fixed32  => "fixed32",
            FieldKind::Fixed64  => "fixed64",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Bool     => "bool",
            FieldKind::String   => "string",
            FieldKind::Bytes    => "bytes",
            FieldKind::Enum(name) => name.as_str(),
            FieldKind::Message(msg) => msg.full_name.as_str(),
        }
    }
}

/// A message-typed field's target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRef {
    /// Package-relative name, nested levels joined with `_`.
    pub name:         String,
    pub full_name:    String,
    pub package:      String,
    /// Path of the `.proto` file defining the message.
    pub file:         String,
    pub is_map_entry: bool,
}

impl MessageRef {
    pub fn new(full_name: &str, package: &str, file: &str) -> Self {
        let prefix = format!("{}.", package);
        let relative = if package.is_empty() {
            full_name
        } else {
            full_name.strip_prefix(&prefix).unwrap_or(full_name)
        };
        MessageRef {
            name:         relative.replace('.', "_"),
            full_name:    full_name.to_string(),
            package:      package.to_string(),
            file:         file.to_string(),
            is_map_entry: false,
        }
    }
}

/// Validation rules captured from the field's options.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldConstraints {
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OneofConstraints {
    pub required: bool,
}

impl ProtoField {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        ProtoField {
            name:        name.to_string(),
            json_name:   name.to_string(),
            number:      0,
            kind,
            cardinality: Cardinality::Single,
            oneof:       None,
            constraints: FieldConstraints::default(),
        }
    }

    pub fn list(mut self) -> Self {
        self.cardinality = Cardinality::List;
        self
    }

    pub fn map(mut self, key: FieldKind, value: FieldKind) -> Self {
        self.cardinality = Cardinality::Map(Box::new(MapEntry { key, value }));
        self
    }

    pub fn required(mut self) -> Self {
        self.constraints.required = true;
        self
    }

    pub fn in_oneof(mut self, oneof: &str) -> Self {
        self.oneof = Some(oneof.to_string());
        self
    }
}

impl ProtoOneof {
    pub fn new(name: &str, required: bool) -> Self {
        ProtoOneof { name: name.to_string(), constraints: OneofConstraints { required } }
    }
}
