use crate::cesu8_byte_buffer::{ByteBuffer, ByteWriter};
use crate::class_file_error::{ClassFileError, Result};
use crate::constant_pool::ConstantPool;
use crate::instruction::Instruction;

/// 属性名称。只区分了用得到的几种，其余的保留原始名称
/// [jvms-4.7](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    Code,
    ConstantValue,
    Exceptions,
    SourceFile,
    LineNumberTable,
    LocalVariableTable,
    StackMapTable,
    Signature,
    Other(String),
}

impl AttributeType {
    pub fn by_name(name: &str) -> AttributeType {
        match name {
            "Code" => AttributeType::Code,
            "ConstantValue" => AttributeType::ConstantValue,
            "Exceptions" => AttributeType::Exceptions,
            "SourceFile" => AttributeType::SourceFile,
            "LineNumberTable" => AttributeType::LineNumberTable,
            "LocalVariableTable" => AttributeType::LocalVariableTable,
            "StackMapTable" => AttributeType::StackMapTable,
            "Signature" => AttributeType::Signature,
            other => AttributeType::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AttributeType::Code => "Code",
            AttributeType::ConstantValue => "ConstantValue",
            AttributeType::Exceptions => "Exceptions",
            AttributeType::SourceFile => "SourceFile",
            AttributeType::LineNumberTable => "LineNumberTable",
            AttributeType::LocalVariableTable => "LocalVariableTable",
            AttributeType::StackMapTable => "StackMapTable",
            AttributeType::Signature => "Signature",
            AttributeType::Other(name) => name,
        }
    }
}

/// ## 属性信息
/// 属性可以出现在，字段、方法，类中，是重要的扩展机制
/// ```c
/// attribute_info {
///     u2 attribute_name_index;
///     u4 attribute_length;
///     u1 info[attribute_length];
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub name: AttributeType,
    pub info: Vec<u8>,
}

impl AttributeInfo {
    pub fn read_from(buffer: &mut ByteBuffer, cp: &ConstantPool) -> Result<AttributeInfo> {
        let attribute_name_index = buffer.read_u16()?;
        let name = AttributeType::by_name(&cp.get_string(&attribute_name_index)?);
        let attribute_length = buffer.read_u32()? as usize;
        let bytes = buffer.read_bytes(attribute_length)?;
        Ok(AttributeInfo {
            name,
            info: Vec::from(bytes),
        })
    }

    /// The attribute name must already be interned in `cp`.
    pub fn write_to(&self, cp: &ConstantPool, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u16(cp.utf8_index(self.name.name())?);
        writer.write_u32_prefixed("attribute", &self.info)
    }

    pub fn read_all(buffer: &mut ByteBuffer, cp: &ConstantPool) -> Result<Vec<AttributeInfo>> {
        let attribute_count = buffer.read_u16()? as usize;
        (0..attribute_count)
            .map(|_| AttributeInfo::read_from(buffer, cp))
            .collect()
    }

    pub fn write_all(
        attributes: &[AttributeInfo],
        cp: &ConstantPool,
        writer: &mut ByteWriter,
    ) -> Result<()> {
        writer.write_u16(count_u16("attributes", attributes.len())?);
        for attribute in attributes {
            attribute.write_to(cp, writer)?;
        }
        Ok(())
    }
}

pub(crate) fn count_u16(what: &'static str, count: usize) -> Result<u16> {
    u16::try_from(count).map_err(|_| ClassFileError::TooLong(what, count))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

/// ```c
/// Code_attribute {
///     u2 attribute_name_index;
///     u4 attribute_length;
///
///     u2 max_stack;
///     u2 max_locals;
///     u4 code_length;
///     u1 code[code_length];
///     u2 exception_table_length;
///     {   u2 start_pc;
///         u2 end_pc;
///         u2 handler_pc;
///         u2 catch_type;
///     } exception_table[exception_table_length];
///     u2 attributes_count;
///     attribute_info attributes[attributes_count];
/// }
/// ```
/// 这里的结构只对应 info 部分，名称和长度由 [`AttributeInfo`] 负责
#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Vec<AttributeInfo>,
}

impl CodeAttribute {
    /// Straight-line code with no handlers and no nested attributes.
    pub fn new(max_stack: u16, max_locals: u16, instructions: &[Instruction]) -> CodeAttribute {
        let mut writer = ByteWriter::new();
        for instruction in instructions {
            instruction.write_to(&mut writer);
        }
        CodeAttribute {
            max_stack,
            max_locals,
            code: writer.into_bytes(),
            exception_table: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn read_from_bytes(info: &[u8], cp: &ConstantPool) -> Result<CodeAttribute> {
        let mut buffer = ByteBuffer::new(info);
        let max_stack = buffer.read_u16()?;
        let max_locals = buffer.read_u16()?;
        let code_length = buffer.read_u32()? as usize;
        let code = Vec::from(buffer.read_bytes(code_length)?);
        let exception_table_length = buffer.read_u16()?;
        let mut exception_table = Vec::with_capacity(exception_table_length as usize);
        for _ in 0..exception_table_length {
            exception_table.push(ExceptionTableEntry {
                start_pc: buffer.read_u16()?,
                end_pc: buffer.read_u16()?,
                handler_pc: buffer.read_u16()?,
                catch_type: buffer.read_u16()?,
            });
        }
        let attributes = AttributeInfo::read_all(&mut buffer, cp)?;
        if buffer.has_more_data() {
            return Err(ClassFileError::InvalidClassData(
                "trailing bytes in Code attribute".to_string(),
            ));
        }
        Ok(CodeAttribute {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes,
        })
    }

    pub fn to_bytes(&self, cp: &ConstantPool) -> Result<Vec<u8>> {
        // code_length 虽然是 u4，但是 jvms 要求必须小于 65536
        if self.code.is_empty() || self.code.len() > u16::MAX as usize {
            return Err(ClassFileError::InvalidCode(format!(
                "code length {} out of range",
                self.code.len()
            )));
        }
        let mut writer = ByteWriter::new();
        writer.write_u16(self.max_stack);
        writer.write_u16(self.max_locals);
        writer.write_u32_prefixed("code", &self.code)?;
        writer.write_u16(count_u16("exception table", self.exception_table.len())?);
        for entry in &self.exception_table {
            writer.write_u16(entry.start_pc);
            writer.write_u16(entry.end_pc);
            writer.write_u16(entry.handler_pc);
            writer.write_u16(entry.catch_type);
        }
        AttributeInfo::write_all(&self.attributes, cp, &mut writer)?;
        Ok(writer.into_bytes())
    }
}
