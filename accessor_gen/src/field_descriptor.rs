use crate::gen_error::{GenError, GenResult};
use crate::semantic_type::{internal_name, SemanticType};

/// jls 3.9, plus the literals that cannot be identifiers either
const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "_", "true", "false", "null",
];

/// One field the host asks an accessor for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// dotted, fully qualified
    pub owner_type_name: String,
    pub field_name: String,
    pub semantic_type: SemanticType,
}

impl FieldDescriptor {
    pub fn new(
        owner_type_name: impl Into<String>,
        field_name: impl Into<String>,
        semantic_type: SemanticType,
    ) -> FieldDescriptor {
        FieldDescriptor {
            owner_type_name: owner_type_name.into(),
            field_name: field_name.into(),
            semantic_type,
        }
    }

    /// Checks the field name and the owner name. The field type is checked when
    /// its descriptor is computed.
    pub fn validate(&self) -> GenResult<()> {
        if !is_java_identifier(&self.field_name) {
            return Err(GenError::InvalidFieldName(self.field_name.clone()));
        }
        internal_name(&self.owner_type_name).map(|_| ())
    }
}

pub fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$');
    starts_well
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}
