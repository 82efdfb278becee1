use crate::field_descriptor::FieldDescriptor;
use crate::semantic_type::SemanticType;
use indexmap::IndexMap;

/// A field as declared inside an annotated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredField {
    pub name: String,
    pub semantic_type: SemanticType,
}

impl DeclaredField {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> DeclaredField {
        DeclaredField {
            name: name.into(),
            semantic_type,
        }
    }
}

/// Something the host found annotated: a whole class asks for an accessor per
/// declared field, a single field asks for its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatedElement {
    Class {
        qualified_name: String,
        fields: Vec<DeclaredField>,
    },
    Field(FieldDescriptor),
}

/// Turns annotated elements into the flat list a batch consumes.
///
/// A field reached both through its class and on its own is listed once, at its
/// first position; the generated class name would collide otherwise.
pub fn flatten(elements: impl IntoIterator<Item = AnnotatedElement>) -> Vec<FieldDescriptor> {
    let mut flat: IndexMap<(String, String), FieldDescriptor> = IndexMap::new();
    let mut push = |field: FieldDescriptor| {
        flat.entry((field.owner_type_name.clone(), field.field_name.clone()))
            .or_insert(field);
    };
    for element in elements {
        match element {
            AnnotatedElement::Class {
                qualified_name,
                fields,
            } => {
                for declared in fields {
                    push(FieldDescriptor::new(
                        qualified_name.clone(),
                        declared.name,
                        declared.semantic_type,
                    ));
                }
            }
            AnnotatedElement::Field(field) => push(field),
        }
    }
    flat.into_values().collect()
}
