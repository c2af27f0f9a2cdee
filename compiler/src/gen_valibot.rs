use tracing::{debug, warn};
use valibot_gen_ast::{Declaration, File, Node, Origin};

use crate::{
    constraints::ConstraintResolver,
    error::ValibotError,
    options::GenerateOptions,
    types::{Cardinality, FieldKind, ProtoField, ProtoFile, ProtoMessage},
    utils::{quote, WELL_KNOWN_PACKAGE},
    valibot,
};

/// Translates message descriptors into valibot schema expressions.
pub struct Synthesizer<'a, R: ConstraintResolver + ?Sized> {
    options:     &'a GenerateOptions,
    constraints: &'a R,
}

impl<'a, R: ConstraintResolver + ?Sized> Synthesizer<'a, R> {
    pub fn new(options: &'a GenerateOptions, constraints: &'a R) -> Self {
        Synthesizer { options, constraints }
    }

    /// One declaration per message, ordered by message name.
    pub fn synthesize_file(&self, file: &ProtoFile) -> Result<File, ValibotError> {
        let mut messages: Vec<&ProtoMessage> = file.messages.iter().collect();
        messages.sort_by(|a, b| a.name.cmp(&b.name));

        if messages.is_empty() {
            warn!(file = %file.path, "no messages to generate");
        }

        let mut declarations = Vec::with_capacity(messages.len());
        for message in messages {
            let name = self.export_name(&message.name);
            let body = self.synthesize_message(message)?;
            debug!(file = %file.path, message = %message.full_name, export = %name, "synthesized message");
            declarations.push(Declaration::new(&name, body).with_comment(message.comment.clone()));
        }

        Ok(File::new(&file.path, declarations))
    }

    /// `intersect([object(required), partial(object(optional)), ...oneofs])`
    pub fn synthesize_message(&self, message: &ProtoMessage) -> Result<Node, ValibotError> {
        let mut required = Vec::new();
        let mut optional = Vec::new();
        for field in message.fields.iter().filter(|f| f.oneof.is_none()) {
            let entry = (field.json_name.clone(), self.synthesize_field(field)?);
            if self.constraints.is_field_required(field) {
                required.push(entry);
            } else {
                optional.push(entry);
            }
        }

        let mut parts = vec![
            valibot::object(required),
            valibot::partial(valibot::object(optional)),
        ];

        for oneof in &message.oneofs {
            let mut members = Vec::new();
            for field in message.fields.iter().filter(|f| f.oneof.as_deref() == Some(oneof.name.as_str())) {
                members.push((field.json_name.clone(), self.synthesize_field(field)?));
            }

            if members.is_empty() {
                debug!(message = %message.full_name, oneof = %oneof.name, "skipping oneof without fields");
                continue;
            }

            if self.constraints.is_oneof_required(oneof) {
                // Exactly one member must be present: one single-field shape per member.
                let mut shapes: Vec<Node> = members
                    .into_iter()
                    .map(|member| valibot::object(vec![member]))
                    .collect();
                if shapes.len() == 1 {
                    parts.extend(shapes.pop());
                } else {
                    parts.push(valibot::union(shapes));
                }
            } else {
                parts.push(valibot::partial(valibot::object(members)));
            }
        }

        Ok(valibot::intersect(parts))
    }

    pub fn synthesize_field(&self, field: &ProtoField) -> Result<Node, ValibotError> {
        let required = self.constraints.is_field_required(field);

        match &field.cardinality {
            // A required repeated field must not be empty.
            Cardinality::List => {
                let item = self.synthesize_kind(&field.kind, false);
                if required {
                    Ok(valibot::pipe(valibot::array(item), vec![valibot::min_length(1)]))
                } else {
                    Ok(valibot::array(item))
                }
            }
            Cardinality::Map(entry) => {
                let key = match &entry.key {
                    FieldKind::String => valibot::string(),
                    FieldKind::Bool => valibot::boolean(),
                    kind if kind.is_numeric() => valibot::number(),
                    kind => {
                        return Err(ValibotError::UnsupportedMapKey {
                            field: quote(&field.name),
                            kind:  quote(kind.name()),
                        })
                    }
                };
                Ok(valibot::record(key, self.synthesize_kind(&entry.value, false)))
            }
            Cardinality::Single => Ok(self.synthesize_kind(&field.kind, required)),
        }
    }

    /// Schema for a single value of `kind`. Kinds without a dedicated rule
    /// fall back to `any()`.
    fn synthesize_kind(&self, kind: &FieldKind, required: bool) -> Node {
        match kind {
            FieldKind::String if required => {
                valibot::pipe(valibot::string(), vec![valibot::min_length(1)])
            }
            FieldKind::String => valibot::string(),
            FieldKind::Bool => valibot::boolean(),
            kind if kind.is_numeric() => valibot::number(),
            FieldKind::Message(target) if target.is_map_entry => valibot::any(),
            FieldKind::Message(target) if target.package == WELL_KNOWN_PACKAGE => valibot::any(),
            FieldKind::Message(target) => {
                Node::call(&self.export_name(&target.name), Origin::lookup(&target.file), vec![])
            }
            _ => valibot::any(),
        }
    }

    fn export_name(&self, message_name: &str) -> String {
        format!("{}{}", message_name, self.options.schema_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ProtovalidateResolver;

    fn synth_field(field: ProtoField) -> String {
        let options = GenerateOptions::default();
        Synthesizer::new(&options, &ProtovalidateResolver)
            .synthesize_field(&field)
            .unwrap()
            .serialize()
    }

    #[test]
    fn strings() {
        assert_eq!(synth_field(ProtoField::new("a", FieldKind::String)), "string()");
        assert_eq!(
            synth_field(ProtoField::new("a", FieldKind::String).required()),
            "pipe(string(), minLength(1))"
        );
    }

    #[test]
    fn scalars() {
        assert_eq!(synth_field(ProtoField::new("a", FieldKind::Bool).required()), "boolean()");
        for kind in [FieldKind::Int32, FieldKind::Uint64, FieldKind::Sfixed32, FieldKind::Double] {
            assert_eq!(synth_field(ProtoField::new("a", kind)), "number()");
        }
        assert_eq!(synth_field(ProtoField::new("a", FieldKind::Bytes)), "any()");
        assert_eq!(synth_field(ProtoField::new("a", FieldKind::Enum("pkg.Color".into()))), "any()");
    }

    #[test]
    fn lists_only_apply_required_to_the_array() {
        assert_eq!(
            synth_field(ProtoField::new("a", FieldKind::String).list().required()),
            "pipe(array(string()), minLength(1))"
        );
        assert_eq!(synth_field(ProtoField::new("a", FieldKind::String).list()), "array(string())");
    }
}
