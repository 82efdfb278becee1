use crate::field_descriptor::FieldDescriptor;
use crate::gen_error::GenResult;
use crate::semantic_type::{descriptor_of, internal_name, SemanticType};

/// Appended to the owner's name to form the generated class name. Downstream
/// tooling locates generated classes by it, so it must not change.
pub const GENERATED_CLASS_SUFFIX: &str = "gen";
pub const ACCESSOR_PREFIX: &str = "get";

/// Everything the emitter needs for one field, derived from a [`FieldDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClassSpec {
    /// slash separated
    pub internal_name: String,
    pub accessor_method_name: String,
    pub return_type: SemanticType,
    pub owner_internal_name: String,
    pub field_name: String,
}

impl GeneratedClassSpec {
    pub fn from_field(field: &FieldDescriptor) -> GenResult<GeneratedClassSpec> {
        field.validate()?;
        let owner_internal_name = internal_name(&field.owner_type_name)?;
        Ok(GeneratedClassSpec {
            internal_name: format!("{owner_internal_name}{GENERATED_CLASS_SUFFIX}"),
            accessor_method_name: accessor_method_name(&field.field_name),
            return_type: field.semantic_type.clone(),
            owner_internal_name,
            field_name: field.field_name.clone(),
        })
    }

    pub fn field_descriptor(&self) -> GenResult<String> {
        descriptor_of(&self.return_type)
    }

    pub fn method_descriptor(&self) -> GenResult<String> {
        Ok(format!("(){}", self.field_descriptor()?))
    }
}

/// `com.example.Person` -> `com/example/Persongen`
pub fn generated_class_name(owner_type_name: &str) -> GenResult<String> {
    Ok(internal_name(owner_type_name)? + GENERATED_CLASS_SUFFIX)
}

pub fn accessor_method_name(field_name: &str) -> String {
    format!("{ACCESSOR_PREFIX}{}", capitalize(field_name))
}

/// Upper-cases the first character only; the rest is kept as written.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
