use class_file::attribute_info::CodeAttribute;
use class_file::class_file::{ClassAccessFlags, ClassFile};
use class_file::class_file_version::ClassFileVersion;
use class_file::instruction::Instruction;
use class_file::member_info::MethodAccessFlags;

/// A class with one `public int getValue()` reading `Holder.value`.
pub fn value_getter_class() -> ClassFile {
    let mut class = ClassFile::new(
        ClassFileVersion::Jdk8,
        ClassAccessFlags::PUBLIC,
        "demo/ValueGetter",
        Some("java/lang/Object"),
    )
    .unwrap();
    let field = class
        .constant_pool
        .intern_field_ref("demo/Holder", "value", "I")
        .unwrap();
    let code = CodeAttribute::new(
        1,
        1,
        &[
            Instruction::Aload0,
            Instruction::Getfield(field),
            Instruction::Ireturn,
        ],
    );
    class
        .add_method(MethodAccessFlags::PUBLIC, "getValue", "()I", Some(code))
        .unwrap();
    class
}
