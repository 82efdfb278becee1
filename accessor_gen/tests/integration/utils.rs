use accessor_gen::class_blob_emitter::ClassBlob;
use class_file::attribute_info::CodeAttribute;
use class_file::class_file::ClassFile;
use class_file::class_file_reader::read_buffer;
use class_file::instruction::{read_instructions, Instruction};
use class_file::member_info::MethodInfo;

/// The single accessor of a generated class, decoded.
pub struct Accessor {
    pub class: ClassFile,
    pub method: MethodInfo,
    pub code: CodeAttribute,
    pub instructions: Vec<Instruction>,
}

pub fn read_accessor(blob: &ClassBlob) -> Accessor {
    let class = read_buffer(blob.as_bytes()).unwrap();
    assert_eq!(1, class.method_info.len(), "exactly one method expected");
    let method = class.method_info[0].clone();
    let code = class.method_code(&method).unwrap().unwrap();
    let instructions = read_instructions(&code.code).unwrap();
    Accessor {
        class,
        method,
        code,
        instructions,
    }
}

impl Accessor {
    /// (owner, name, descriptor) of the field read by the getfield
    pub fn field_read(&self) -> (String, String, String) {
        match self.instructions[1] {
            Instruction::Getfield(index) => self.class.constant_pool.get_field_ref(&index).unwrap(),
            other => panic!("expected getfield, got {other}"),
        }
    }
}
