use crate::types::{ProtoField, ProtoOneof};

/// Answers whether a field or oneof group must be present.
pub trait ConstraintResolver {
    fn is_field_required(&self, field: &ProtoField) -> bool;
    fn is_oneof_required(&self, oneof: &ProtoOneof) -> bool;
}

/// Reads the `required` member of the `buf.validate.field` and
/// `buf.validate.oneof` option extensions, as captured when the descriptors
/// were loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtovalidateResolver;

impl ConstraintResolver for ProtovalidateResolver {
    fn is_field_required(&self, field: &ProtoField) -> bool {
        field.constraints.required
    }

    fn is_oneof_required(&self, oneof: &ProtoOneof) -> bool {
        oneof.constraints.required
    }
}
