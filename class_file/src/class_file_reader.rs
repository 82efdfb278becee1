use crate::attribute_info::AttributeInfo;
use crate::cesu8_byte_buffer::ByteBuffer;
use crate::class_file::{ClassAccessFlags, ClassFile};
use crate::class_file_error::{ClassFileError, Result};
use crate::class_file_version::ClassFileVersion;
use crate::constant_pool::ConstantPool;
use crate::member_info::{FieldInfo, MethodInfo};

pub const MAGIC: u32 = 0xCAFEBABE;

/// Reads a class from a byte slice.
/// ClassFile {
///     u4             magic;
///     u2             minor_version;
///     u2             major_version;
///     u2             constant_pool_count;
///     cp_info        constant_pool[constant_pool_count-1];
///     u2             access_flags;
///     u2             this_class;
///     u2             super_class;
///     u2             interfaces_count;
///     u2             interfaces[interfaces_count];
///     u2             fields_count;
///     field_info     fields[fields_count];
///     u2             methods_count;
///     method_info    methods[methods_count];
///     u2             attributes_count;
///     attribute_info attributes[attributes_count];
/// }
///
pub fn read_buffer(buf: &[u8]) -> Result<ClassFile> {
    let mut buffer = ByteBuffer::new(buf);
    check_magic_number(&mut buffer)?;
    let (version, minor_version) = read_version(&mut buffer)?;
    let constant_pool = ConstantPool::read_from(&mut buffer)?;
    let access_flags = read_access_flag(&mut buffer)?;
    let this_class_name = constant_pool.get_class_name(&buffer.read_u16()?)?;
    let super_class_name = constant_pool.try_get_class_name(&buffer.read_u16()?);

    let interface_names = read_interfaces(&mut buffer, &constant_pool)?;
    let field_info = FieldInfo::read_all(&mut buffer, &constant_pool)?;
    let method_info = MethodInfo::read_all(&mut buffer, &constant_pool)?;
    let attribute_info = AttributeInfo::read_all(&mut buffer, &constant_pool)?;
    //此时应该读取完所有数据
    if buffer.has_more_data() {
        return Err(ClassFileError::InvalidClassData(format!(
            "trailing bytes after offset {}",
            buffer.position()
        )));
    }
    Ok(ClassFile {
        version,
        minor_version,
        constant_pool,
        access_flags,
        this_class_name,
        super_class_name,
        interface_names,
        field_info,
        method_info,
        attribute_info,
    })
}

fn check_magic_number(buffer: &mut ByteBuffer) -> Result<()> {
    match buffer.read_u32()? {
        MAGIC => Ok(()),
        n => Err(ClassFileError::InvalidClassData(format!(
            "invalid magic number: {n:#x}"
        ))),
    }
}

fn read_version(buffer: &mut ByteBuffer) -> Result<(ClassFileVersion, u16)> {
    let minor_version = buffer.read_u16()?;
    let major_version = buffer.read_u16()?;
    let version = ClassFileVersion::new(major_version, minor_version)?;
    Ok((version, minor_version))
}

fn read_access_flag(buffer: &mut ByteBuffer) -> Result<ClassAccessFlags> {
    let access_flag = buffer.read_u16()?;
    ClassAccessFlags::from_bits(access_flag).ok_or_else(|| {
        ClassFileError::InvalidClassData(format!("invalid class flags: {access_flag}"))
    })
}

fn read_interfaces(buffer: &mut ByteBuffer, cp: &ConstantPool) -> Result<Vec<String>> {
    let interfaces_count = buffer.read_u16()? as usize;
    (0..interfaces_count)
        .map(|_| cp.get_class_name(&buffer.read_u16()?))
        .collect()
}
