use crate::utils::value_getter_class;
use class_file::class_file::{ClassAccessFlags, ClassFile};
use class_file::class_file_error::ClassFileError;
use class_file::class_file_reader::read_buffer;
use class_file::class_file_version::ClassFileVersion;
use class_file::class_file_writer::write_buffer;
use class_file::instruction::{read_instructions, Instruction};
use class_file::member_info::MethodAccessFlags;
use pretty_assertions::assert_eq;

#[test]
fn test_write_empty_class() {
    let class = ClassFile::new(
        ClassFileVersion::Jdk8,
        ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        "Empty",
        Some("java/lang/Object"),
    )
    .unwrap();
    let bytes = write_buffer(&class).unwrap();

    let mut expected = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34, 0x00, 0x05];
    expected.extend_from_slice(&[0x01, 0x00, 0x05]);
    expected.extend_from_slice(b"Empty");
    expected.extend_from_slice(&[0x07, 0x00, 0x01]);
    expected.extend_from_slice(&[0x01, 0x00, 0x10]);
    expected.extend_from_slice(b"java/lang/Object");
    expected.extend_from_slice(&[0x07, 0x00, 0x03]);
    // access, this, super
    expected.extend_from_slice(&[0x00, 0x21, 0x00, 0x02, 0x00, 0x04]);
    // interfaces, fields, methods, attributes
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(expected, bytes);
}

#[test]
fn test_read_written_class() {
    let bytes = write_buffer(&value_getter_class()).unwrap();
    let class = read_buffer(&bytes).unwrap();

    assert_eq!(class.version, ClassFileVersion::Jdk8);
    assert_eq!(class.access_flags, ClassAccessFlags::PUBLIC);
    assert_eq!(class.this_class_name, "demo/ValueGetter");
    assert_eq!(class.super_class_name.as_deref(), Some("java/lang/Object"));
    assert!(class.interface_names.is_empty());
    assert!(class.field_info.is_empty());
    assert_eq!(class.method_info.len(), 1);

    let method = class.find_method("getValue", "()I").unwrap();
    assert_eq!(method.access_flags, MethodAccessFlags::PUBLIC);
    let code = class.method_code(method).unwrap().unwrap();
    assert_eq!((code.max_stack, code.max_locals), (1, 1));
    let instructions = read_instructions(&code.code).unwrap();
    let Instruction::Getfield(field) = instructions[1] else {
        panic!("expected getfield, got {}", instructions[1]);
    };
    assert_eq!(
        (
            "demo/Holder".to_string(),
            "value".to_string(),
            "I".to_string()
        ),
        class.constant_pool.get_field_ref(&field).unwrap()
    );
    assert_eq!(instructions[2], Instruction::Ireturn);
}

#[test]
fn test_writing_is_deterministic() {
    assert_eq!(
        write_buffer(&value_getter_class()).unwrap(),
        write_buffer(&value_getter_class()).unwrap()
    );
}

#[test]
fn test_unknown_names_are_not_written() {
    let mut class = value_getter_class();
    class.interface_names.push("java/io/Serializable".to_string());
    assert!(matches!(
        write_buffer(&class),
        Err(ClassFileError::InvalidClassData(_))
    ));

    class.interface_names.clear();
    class.constant_pool.intern_class("java/io/Serializable").unwrap();
    class.interface_names.push("java/io/Serializable".to_string());
    let read = read_buffer(&write_buffer(&class).unwrap()).unwrap();
    assert_eq!(read.interface_names, vec!["java/io/Serializable".to_string()]);
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut bytes = write_buffer(&value_getter_class()).unwrap();
    bytes.push(0);
    assert!(matches!(
        read_buffer(&bytes),
        Err(ClassFileError::InvalidClassData(_))
    ));
}

#[test]
fn test_minor_version_survives_read_and_write() {
    let mut bytes = write_buffer(&value_getter_class()).unwrap();
    // 52.3
    bytes[4..6].copy_from_slice(&[0x00, 0x03]);
    let class = read_buffer(&bytes).unwrap();
    assert_eq!(class.version, ClassFileVersion::Jdk8);
    assert_eq!(class.minor_version, 3);
    assert_eq!(bytes, write_buffer(&class).unwrap());

    let fresh = ClassFile::new(
        ClassFileVersion::Jdk1_1,
        ClassAccessFlags::PUBLIC,
        "Old",
        None,
    )
    .unwrap();
    assert_eq!(fresh.minor_version, 3);
    assert_eq!(&[0x00, 0x03, 0x00, 0x2D], &write_buffer(&fresh).unwrap()[4..8]);
}
