/// Primitive shape a field value must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty string
    Text,
    /// Non-empty string shaped like `local@domain.tld`
    Email,
    /// Non-empty string of digits, optionally prefixed with `+`, spaces and dashes allowed
    Phone,
    /// Integer in `1..=i32::MAX`, given as a JSON number or a decimal string
    PositiveInt,
}

/// Constraints for a single field of a request payload
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_len: Option<usize>,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true, max_len: None }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, max_len: None }
    }

    pub const fn max(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }
}

/// Ordered set of field rules. Fields not listed are dropped during validation.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [FieldRule]) -> Self {
        Self { name, fields }
    }
}
