use crate::attribute_info::{count_u16, AttributeInfo};
use crate::cesu8_byte_buffer::ByteWriter;
use crate::class_file::ClassFile;
use crate::class_file_error::Result;
use crate::class_file_reader::MAGIC;
use crate::member_info::{FieldInfo, MethodInfo};

/// Serializes a class, mirroring [`crate::class_file_reader::read_buffer`].
///
/// Every name must already be in `class.constant_pool`. A class put together with
/// [`ClassFile::new`] and [`ClassFile::add_method`] satisfies that; anything else
/// fails with `InvalidClassData` instead of writing a dangling index. The image is
/// assembled in memory, so callers never observe a partially written class.
pub fn write_buffer(class: &ClassFile) -> Result<Vec<u8>> {
    let cp = &class.constant_pool;
    let mut writer = ByteWriter::new();
    writer.write_u32(MAGIC);
    writer.write_u16(class.minor_version);
    writer.write_u16(class.version.major());
    cp.write_to(&mut writer)?;
    writer.write_u16(class.access_flags.bits());
    writer.write_u16(cp.class_index(&class.this_class_name)?);
    let super_class = match &class.super_class_name {
        Some(name) => cp.class_index(name)?,
        // 只有 java/lang/Object 没有父类
        None => 0,
    };
    writer.write_u16(super_class);

    writer.write_u16(count_u16("interfaces", class.interface_names.len())?);
    for interface in &class.interface_names {
        writer.write_u16(cp.class_index(interface)?);
    }
    FieldInfo::write_all(&class.field_info, cp, &mut writer)?;
    MethodInfo::write_all(&class.method_info, cp, &mut writer)?;
    AttributeInfo::write_all(&class.attribute_info, cp, &mut writer)?;
    Ok(writer.into_bytes())
}
