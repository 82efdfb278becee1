use crate::gen_error::{GenError, GenResult};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// jvms 4.4.1: an array type descriptor is only valid up to 255 dimensions
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum PrimitiveKind {
    Int32,
    Bool,
    Char16,
    Int8,
    Int16,
    Int64,
    Float32,
    Float64,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Int32,
        PrimitiveKind::Bool,
        PrimitiveKind::Char16,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int64,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
    ];

    /// https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.3.2
    pub fn descriptor(&self) -> char {
        match self {
            PrimitiveKind::Int32 => 'I',
            PrimitiveKind::Bool => 'Z',
            PrimitiveKind::Char16 => 'C',
            PrimitiveKind::Int8 => 'B',
            PrimitiveKind::Int16 => 'S',
            PrimitiveKind::Int64 => 'J',
            PrimitiveKind::Float32 => 'F',
            PrimitiveKind::Float64 => 'D',
        }
    }

    pub fn java_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Char16 => "char",
            PrimitiveKind::Int8 => "byte",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::Float32 => "float",
            PrimitiveKind::Float64 => "double",
        }
    }

    pub fn from_java_name(name: &str) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.java_name() == name)
    }
}

/// Type of a field as the host compiler reports it.
///
/// `Unsupported` carries the host's kinds that have no field descriptor at all
/// (`void`, unresolved or error types); mapping one of them is the failure the
/// descriptor mapper has to detect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Primitive(PrimitiveKind),
    ArrayOf(Box<SemanticType>),
    Reference(String),
    Unsupported(String),
}

impl SemanticType {
    pub fn array_of(component: SemanticType) -> SemanticType {
        SemanticType::ArrayOf(Box::new(component))
    }

    pub fn reference(qualified_name: impl Into<String>) -> SemanticType {
        SemanticType::Reference(qualified_name.into())
    }

    pub fn descriptor(&self) -> GenResult<String> {
        descriptor_of(self)
    }
}

/// Maps a semantic type to its field descriptor, e.g. `long[][]` to `[[J`.
pub fn descriptor_of(semantic_type: &SemanticType) -> GenResult<String> {
    let mut descriptor = String::new();
    write_descriptor(semantic_type, 0, &mut descriptor)?;
    Ok(descriptor)
}

fn write_descriptor(
    semantic_type: &SemanticType,
    dimensions: usize,
    descriptor: &mut String,
) -> GenResult<()> {
    match semantic_type {
        SemanticType::Primitive(kind) => descriptor.push(kind.descriptor()),
        SemanticType::ArrayOf(component) => {
            if dimensions == MAX_ARRAY_DIMENSIONS {
                return Err(GenError::UnsupportedTypeKind(format!(
                    "array with more than {MAX_ARRAY_DIMENSIONS} dimensions"
                )));
            }
            descriptor.push('[');
            write_descriptor(component, dimensions + 1, descriptor)?;
        }
        SemanticType::Reference(qualified_name) => {
            descriptor.push('L');
            descriptor.push_str(&internal_name(qualified_name)?);
            descriptor.push(';');
        }
        SemanticType::Unsupported(kind) => {
            return Err(GenError::UnsupportedTypeKind(kind.clone()));
        }
    }
    Ok(())
}

/// `com.example.Foo` -> `com/example/Foo`.
///
/// Names that would not survive as a binary class name (empty segments, or the
/// `;` `[` `/` characters that the descriptor grammar reserves) are rejected.
pub fn internal_name(qualified_name: &str) -> GenResult<String> {
    let well_formed = qualified_name.split('.').all(|segment| {
        !segment.is_empty() && !segment.contains(|c: char| matches!(c, ';' | '[' | '/'))
    });
    if !well_formed {
        return Err(GenError::UnsupportedTypeKind(format!(
            "invalid qualified name `{qualified_name}`"
        )));
    }
    Ok(qualified_name.replace('.', "/"))
}

/// Java source spelling: `int`, `boolean[]`, `java.lang.String`,
/// `java.util.List<java.lang.String>` (type arguments are erased). `void` parses
/// but has no descriptor.
impl FromStr for SemanticType {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut base = s.trim();
        let mut dimensions = 0;
        while let Some(component) = base.strip_suffix("[]") {
            base = component.trim_end();
            dimensions += 1;
        }
        if base.ends_with('>') {
            base = base
                .split_once('<')
                .map(|(raw, _)| raw.trim_end())
                .unwrap_or(base);
        }

        let mut semantic_type = if let Some(kind) = PrimitiveKind::from_java_name(base) {
            SemanticType::Primitive(kind)
        } else if base == "void" {
            SemanticType::Unsupported("void".to_string())
        } else if !base.is_empty() && base.split('.').all(is_identifier_like) {
            SemanticType::Reference(base.to_string())
        } else {
            return Err(GenError::UnsupportedTypeKind(format!(
                "cannot parse type `{s}`"
            )));
        };
        for _ in 0..dimensions {
            semantic_type = SemanticType::array_of(semantic_type);
        }
        Ok(semantic_type)
    }
}

fn is_identifier_like(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl Display for SemanticType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticType::Primitive(kind) => write!(f, "{}", kind.java_name()),
            SemanticType::ArrayOf(component) => write!(f, "{component}[]"),
            SemanticType::Reference(name) => write!(f, "{name}"),
            SemanticType::Unsupported(kind) => write!(f, "<{kind}>"),
        }
    }
}
