use crate::attribute_info::{count_u16, AttributeInfo, AttributeType};
use crate::cesu8_byte_buffer::{ByteBuffer, ByteWriter};
use crate::class_file_error::{ClassFileError, Result};
use crate::constant_pool::ConstantPool;
use bitflags::{bitflags, Flags};

bitflags! {
    /// ## Field flags
    /// [jvms refer](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.5)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FieldAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    /// ## Method flags
    /// [jvms refer](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.6)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MethodAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

/// 字段和方法在 class 文件中的结构完全一致，只有访问标志的取值不同
/// ``` c
/// field_info / method_info {
///     u2             access_flags;
///     u2             name_index;
///     u2             descriptor_index;
///     u2             attributes_count;
///     attribute_info attributes[attributes_count];
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo<F> {
    pub access_flags: F,
    pub name: String,
    pub descriptor: String,
    pub attributes: Vec<AttributeInfo>,
}

pub type FieldInfo = MemberInfo<FieldAccessFlags>;
pub type MethodInfo = MemberInfo<MethodAccessFlags>;

impl<F: Flags<Bits = u16> + Copy> MemberInfo<F> {
    pub fn read_from(buffer: &mut ByteBuffer, cp: &ConstantPool) -> Result<MemberInfo<F>> {
        let access_flag = buffer.read_u16()?;
        let access_flags = F::from_bits(access_flag).ok_or_else(|| {
            ClassFileError::InvalidClassData(format!("invalid member flags: {access_flag:#06x}"))
        })?;
        let name = cp.get_string(&buffer.read_u16()?)?;
        let descriptor = cp.get_string(&buffer.read_u16()?)?;
        let attributes = AttributeInfo::read_all(buffer, cp)?;
        Ok(MemberInfo {
            access_flags,
            name,
            descriptor,
            attributes,
        })
    }

    /// Name, descriptor and attribute names must already be interned in `cp`.
    pub fn write_to(&self, cp: &ConstantPool, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u16(self.access_flags.bits());
        writer.write_u16(cp.utf8_index(&self.name)?);
        writer.write_u16(cp.utf8_index(&self.descriptor)?);
        AttributeInfo::write_all(&self.attributes, cp, writer)
    }

    pub fn read_all(buffer: &mut ByteBuffer, cp: &ConstantPool) -> Result<Vec<MemberInfo<F>>> {
        let count = buffer.read_u16()? as usize;
        (0..count).map(|_| MemberInfo::read_from(buffer, cp)).collect()
    }

    pub fn write_all(
        members: &[MemberInfo<F>],
        cp: &ConstantPool,
        writer: &mut ByteWriter,
    ) -> Result<()> {
        writer.write_u16(count_u16("members", members.len())?);
        for member in members {
            member.write_to(cp, writer)?;
        }
        Ok(())
    }

    pub fn find_attribute(&self, name: &AttributeType) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|attr| attr.name == *name)
    }
}
