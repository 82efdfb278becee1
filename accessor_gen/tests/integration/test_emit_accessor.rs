use crate::utils::read_accessor;
use accessor_gen::class_blob_emitter::ClassBlobEmitter;
use accessor_gen::field_descriptor::FieldDescriptor;
use accessor_gen::generated_class_spec::GeneratedClassSpec;
use accessor_gen::semantic_type::{PrimitiveKind, SemanticType};
use class_file::class_file::ClassAccessFlags;
use class_file::class_file_version::ClassFileVersion;
use class_file::instruction::Instruction;
use class_file::member_info::MethodAccessFlags;
use pretty_assertions::assert_eq;

fn person_age() -> FieldDescriptor {
    FieldDescriptor::new(
        "com.example.Person",
        "age",
        SemanticType::Primitive(PrimitiveKind::Int32),
    )
}

fn emit(field: &FieldDescriptor) -> accessor_gen::class_blob_emitter::ClassBlob {
    let spec = GeneratedClassSpec::from_field(field).unwrap();
    ClassBlobEmitter::default().emit_spec(&spec).unwrap()
}

fn utf8(bytes: &mut Vec<u8>, value: &str) {
    bytes.push(0x01);
    bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
    bytes.extend_from_slice(value.as_bytes());
}

#[test]
fn test_person_age_exact_bytes() {
    let mut expected = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34, 0x00, 0x0E];
    utf8(&mut expected, "com/example/Persongen"); // #1
    expected.extend_from_slice(&[0x07, 0x00, 0x01]); // #2
    utf8(&mut expected, "java/lang/Object"); // #3
    expected.extend_from_slice(&[0x07, 0x00, 0x03]); // #4
    utf8(&mut expected, "com/example/Person"); // #5
    expected.extend_from_slice(&[0x07, 0x00, 0x05]); // #6
    utf8(&mut expected, "age"); // #7
    utf8(&mut expected, "I"); // #8
    expected.extend_from_slice(&[0x0C, 0x00, 0x07, 0x00, 0x08]); // #9
    expected.extend_from_slice(&[0x09, 0x00, 0x06, 0x00, 0x09]); // #10
    utf8(&mut expected, "getAge"); // #11
    utf8(&mut expected, "()I"); // #12
    utf8(&mut expected, "Code"); // #13
    // public, this #2, super #4, no interfaces, no fields, one method
    expected.extend_from_slice(&[0x00, 0x01, 0x00, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]);
    expected.extend_from_slice(&[0x00, 0x01]);
    // public getAge ()I, one attribute: Code, 17 bytes
    expected.extend_from_slice(&[0x00, 0x01, 0x00, 0x0B, 0x00, 0x0C, 0x00, 0x01]);
    expected.extend_from_slice(&[0x00, 0x0D, 0x00, 0x00, 0x00, 0x11]);
    expected.extend_from_slice(&[0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x05]);
    expected.extend_from_slice(&[0x2A, 0xB4, 0x00, 0x0A, 0xAC]);
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    // no class attributes
    expected.extend_from_slice(&[0x00, 0x00]);

    assert_eq!(expected, emit(&person_age()).into_bytes());
}

#[test]
fn test_emission_is_deterministic() {
    let field = FieldDescriptor::new(
        "com.example.Order",
        "lines",
        SemanticType::array_of(SemanticType::reference("com.example.Line")),
    );
    assert_eq!(emit(&field), emit(&field));
}

#[test]
fn test_class_structure() {
    let accessor = read_accessor(&emit(&person_age()));
    let class = &accessor.class;
    assert_eq!(ClassFileVersion::Jdk8, class.version);
    assert_eq!(ClassAccessFlags::PUBLIC, class.access_flags);
    assert_eq!("com/example/Persongen", class.this_class_name);
    assert_eq!(Some("java/lang/Object"), class.super_class_name.as_deref());
    assert!(class.interface_names.is_empty());
    assert!(class.field_info.is_empty());
    assert!(class.attribute_info.is_empty());

    assert_eq!(MethodAccessFlags::PUBLIC, accessor.method.access_flags);
    assert_eq!("getAge", accessor.method.name);
    assert_eq!("()I", accessor.method.descriptor);
    assert_eq!(
        (
            "com/example/Person".to_string(),
            "age".to_string(),
            "I".to_string()
        ),
        accessor.field_read()
    );
}

#[test]
fn test_return_instruction_and_stack_per_type() {
    let cases = [
        ("int", "I", Instruction::Ireturn, 1),
        ("boolean", "Z", Instruction::Ireturn, 1),
        ("char", "C", Instruction::Ireturn, 1),
        ("byte", "B", Instruction::Ireturn, 1),
        ("short", "S", Instruction::Ireturn, 1),
        ("long", "J", Instruction::Lreturn, 2),
        ("float", "F", Instruction::Freturn, 1),
        ("double", "D", Instruction::Dreturn, 2),
        ("java.lang.String", "Ljava/lang/String;", Instruction::Areturn, 1),
        ("long[]", "[J", Instruction::Areturn, 1),
        ("int[][]", "[[I", Instruction::Areturn, 1),
    ];
    for (java_type, descriptor, return_instruction, max_stack) in cases {
        let field = FieldDescriptor::new("demo.Holder", "value", java_type.parse().unwrap());
        let accessor = read_accessor(&emit(&field));
        assert_eq!(format!("(){descriptor}"), accessor.method.descriptor, "{java_type}");
        assert_eq!(
            vec![
                Instruction::Aload0,
                accessor.instructions[1],
                return_instruction
            ],
            accessor.instructions,
            "{java_type}"
        );
        assert_eq!(descriptor, accessor.field_read().2, "{java_type}");
        assert_eq!(max_stack, accessor.code.max_stack, "{java_type}");
        assert_eq!(1, accessor.code.max_locals, "{java_type}");
        assert!(accessor.code.exception_table.is_empty());
    }
}

#[test]
fn test_single_letter_and_mixed_case_names() {
    let id = FieldDescriptor::new(
        "com.example.Person",
        "id",
        SemanticType::Primitive(PrimitiveKind::Int64),
    );
    let accessor = read_accessor(&emit(&id));
    assert_eq!("getId", accessor.method.name);
    assert_eq!("()J", accessor.method.descriptor);

    let url = FieldDescriptor::new("web.Page", "uRL", SemanticType::reference("java.net.URL"));
    assert_eq!("getURL", read_accessor(&emit(&url)).method.name);
}

#[test]
fn test_raw_emit_matches_spec_path() {
    let from_spec = emit(&person_age());
    let raw = ClassBlobEmitter::default()
        .emit("com/example/Person", "com/example/Persongen", "age", "I")
        .unwrap();
    assert_eq!(from_spec, raw);
}

#[test]
fn test_configured_version_is_written() {
    let spec = GeneratedClassSpec::from_field(&person_age()).unwrap();
    let blob = ClassBlobEmitter::new(ClassFileVersion::Jdk17)
        .emit_spec(&spec)
        .unwrap();
    assert_eq!(&[0x00, 0x00, 0x00, 0x3D], &blob.as_bytes()[4..8]);
    assert_eq!(ClassFileVersion::Jdk17, read_accessor(&blob).class.version);
}
