use crate::field_descriptor::is_java_identifier;
use crate::gen_error::{GenError, GenResult};
use crate::generated_class_spec::{accessor_method_name, GeneratedClassSpec};
use crate::semantic_type::MAX_ARRAY_DIMENSIONS;
use class_file::attribute_info::CodeAttribute;
use class_file::class_file::{ClassAccessFlags, ClassFile};
use class_file::class_file_version::ClassFileVersion;
use class_file::class_file_writer::write_buffer;
use class_file::instruction::Instruction;
use class_file::member_info::MethodAccessFlags;
use log::debug;

pub const OBJECT_CLASS: &str = "java/lang/Object";

/// Complete image of one compiled class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBlob(Vec<u8>);

impl ClassBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ClassBlob {
    fn from(bytes: Vec<u8>) -> ClassBlob {
        ClassBlob(bytes)
    }
}

impl AsRef<[u8]> for ClassBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// 返回值在操作数栈上的分类。long/double 占两个槽位，其余占一个
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Int,
    Long,
    Float,
    Double,
    Reference,
}

impl ValueKind {
    /// Classifies a whole field descriptor, rejecting anything malformed.
    fn of_descriptor(field_descriptor: &str) -> GenResult<ValueKind> {
        let malformed = || {
            GenError::UnsupportedTypeKind(format!("malformed field descriptor `{field_descriptor}`"))
        };
        let element = field_descriptor.trim_start_matches('[');
        let dimensions = field_descriptor.len() - element.len();
        if dimensions > MAX_ARRAY_DIMENSIONS {
            return Err(malformed());
        }
        let element_kind = match element {
            "I" | "Z" | "C" | "B" | "S" => ValueKind::Int,
            "J" => ValueKind::Long,
            "F" => ValueKind::Float,
            "D" => ValueKind::Double,
            _ => {
                let class_name = element
                    .strip_prefix('L')
                    .and_then(|rest| rest.strip_suffix(';'))
                    .ok_or_else(malformed)?;
                if !is_internal_name(class_name) {
                    return Err(malformed());
                }
                ValueKind::Reference
            }
        };
        Ok(if dimensions > 0 {
            ValueKind::Reference
        } else {
            element_kind
        })
    }

    fn return_instruction(&self) -> Instruction {
        match self {
            ValueKind::Int => Instruction::Ireturn,
            ValueKind::Long => Instruction::Lreturn,
            ValueKind::Float => Instruction::Freturn,
            ValueKind::Double => Instruction::Dreturn,
            ValueKind::Reference => Instruction::Areturn,
        }
    }

    fn stack_slots(&self) -> u16 {
        match self {
            ValueKind::Long | ValueKind::Double => 2,
            _ => 1,
        }
    }
}

/// jvms 4.2.1: slash separated, no empty segment, no `.` `;` `[`
fn is_internal_name(name: &str) -> bool {
    name.split('/').all(|segment| {
        !segment.is_empty() && !segment.contains(|c: char| matches!(c, '.' | ';' | '['))
    })
}

fn check_internal_name(name: &str) -> GenResult<()> {
    if is_internal_name(name) {
        Ok(())
    } else {
        Err(GenError::UnsupportedTypeKind(format!(
            "malformed internal class name `{name}`"
        )))
    }
}

/// Builds accessor classes. Holds nothing but the class file version, so one
/// emitter can be shared by every worker of a batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassBlobEmitter {
    version: ClassFileVersion,
}

impl ClassBlobEmitter {
    pub fn new(version: ClassFileVersion) -> ClassBlobEmitter {
        ClassBlobEmitter { version }
    }

    pub fn version(&self) -> ClassFileVersion {
        self.version
    }

    /// ```java
    /// public class <generated_internal_name> {
    ///     public <T> get<Field>() { return this.<field_name>; }
    /// }
    /// ```
    /// where the field is read from `owner_internal_name`.
    pub fn emit(
        &self,
        owner_internal_name: &str,
        generated_internal_name: &str,
        field_name: &str,
        field_descriptor: &str,
    ) -> GenResult<ClassBlob> {
        self.emit_accessor(
            owner_internal_name,
            generated_internal_name,
            field_name,
            field_descriptor,
            &accessor_method_name(field_name),
        )
    }

    pub fn emit_spec(&self, spec: &GeneratedClassSpec) -> GenResult<ClassBlob> {
        self.emit_accessor(
            &spec.owner_internal_name,
            &spec.internal_name,
            &spec.field_name,
            &spec.field_descriptor()?,
            &spec.accessor_method_name,
        )
    }

    fn emit_accessor(
        &self,
        owner_internal_name: &str,
        generated_internal_name: &str,
        field_name: &str,
        field_descriptor: &str,
        accessor_name: &str,
    ) -> GenResult<ClassBlob> {
        if !is_java_identifier(field_name) {
            return Err(GenError::InvalidFieldName(field_name.to_string()));
        }
        check_internal_name(owner_internal_name)?;
        check_internal_name(generated_internal_name)?;
        let value_kind = ValueKind::of_descriptor(field_descriptor)?;

        let mut class = ClassFile::new(
            self.version,
            ClassAccessFlags::PUBLIC,
            generated_internal_name,
            Some(OBJECT_CLASS),
        )?;
        let field_ref = class.constant_pool.intern_field_ref(
            owner_internal_name,
            field_name,
            field_descriptor,
        )?;
        // 只有 this 一个局部变量
        let code = CodeAttribute::new(
            value_kind.stack_slots(),
            1,
            &[
                Instruction::Aload0,
                Instruction::Getfield(field_ref),
                value_kind.return_instruction(),
            ],
        );
        class.add_method(
            MethodAccessFlags::PUBLIC,
            accessor_name,
            &format!("(){field_descriptor}"),
            Some(code),
        )?;

        let bytes = write_buffer(&class)?;
        debug!(
            "emitted {} ({} bytes): {}{} reads {}.{}",
            generated_internal_name,
            bytes.len(),
            accessor_name,
            field_descriptor,
            owner_internal_name,
            field_name
        );
        Ok(ClassBlob(bytes))
    }
}
