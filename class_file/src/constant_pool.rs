use crate::cesu8_byte_buffer::{ByteBuffer, ByteWriter};
use crate::class_file_error::{ClassFileError, Result};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

pub type ConstantPoolIndex = u16;

/// `constant_pool_count` is a u2 and index 0 is never used
const MAX_SLOTS: usize = u16::MAX as usize - 1;

//https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolEntry {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    ClassReference(ConstantPoolIndex),
    StringReference(ConstantPoolIndex),
    FieldReference(ConstantPoolIndex, ConstantPoolIndex),
    MethodReference(ConstantPoolIndex, ConstantPoolIndex),
    InterfaceMethodReference(ConstantPoolIndex, ConstantPoolIndex),
    NameAndTypeDescriptor(ConstantPoolIndex, ConstantPoolIndex),
    MethodHandle(u8, ConstantPoolIndex),
    MethodType(ConstantPoolIndex),
    Dynamic(u16, ConstantPoolIndex),
    InvokeDynamic(u16, ConstantPoolIndex),
    Module(ConstantPoolIndex),
    Package(ConstantPoolIndex),
}

/// https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4
/// ```c
/// cp_info {
///     u1 tag;
///     u1 info[];
/// }
/// ```
/// tag 确定了字段类型，依据类型读取后续的信息。后续信息是个不定长的信息。
impl ConstantPoolEntry {
    pub fn tag(&self) -> u8 {
        match self {
            ConstantPoolEntry::Utf8(_) => 1,
            ConstantPoolEntry::Integer(_) => 3,
            ConstantPoolEntry::Float(_) => 4,
            ConstantPoolEntry::Long(_) => 5,
            ConstantPoolEntry::Double(_) => 6,
            ConstantPoolEntry::ClassReference(_) => 7,
            ConstantPoolEntry::StringReference(_) => 8,
            ConstantPoolEntry::FieldReference(_, _) => 9,
            ConstantPoolEntry::MethodReference(_, _) => 10,
            ConstantPoolEntry::InterfaceMethodReference(_, _) => 11,
            ConstantPoolEntry::NameAndTypeDescriptor(_, _) => 12,
            ConstantPoolEntry::MethodHandle(_, _) => 15,
            ConstantPoolEntry::MethodType(_) => 16,
            ConstantPoolEntry::Dynamic(_, _) => 17,
            ConstantPoolEntry::InvokeDynamic(_, _) => 18,
            ConstantPoolEntry::Module(_) => 19,
            ConstantPoolEntry::Package(_) => 20,
        }
    }

    pub fn read_from_bytes(buffer: &mut ByteBuffer) -> Result<ConstantPoolEntry> {
        let tag = buffer.read_u8()?;
        match tag {
            1 => {
                let len = buffer.read_u16()? as usize;
                buffer.read_utf8(len).map(ConstantPoolEntry::Utf8)
            }
            3 => buffer.read_i32().map(ConstantPoolEntry::Integer),
            4 => buffer.read_f32().map(ConstantPoolEntry::Float),
            5 => buffer.read_i64().map(ConstantPoolEntry::Long),
            6 => buffer.read_f64().map(ConstantPoolEntry::Double),
            7 => buffer.read_u16().map(ConstantPoolEntry::ClassReference),
            8 => buffer.read_u16().map(ConstantPoolEntry::StringReference),
            9 => buffer
                .read_2_u16()
                .map(|(f1, f2)| ConstantPoolEntry::FieldReference(f1, f2)),
            10 => buffer
                .read_2_u16()
                .map(|(f1, f2)| ConstantPoolEntry::MethodReference(f1, f2)),
            11 => buffer
                .read_2_u16()
                .map(|(f1, f2)| ConstantPoolEntry::InterfaceMethodReference(f1, f2)),
            12 => buffer
                .read_2_u16()
                .map(|(f1, f2)| ConstantPoolEntry::NameAndTypeDescriptor(f1, f2)),
            15 => buffer
                .read_u8_u16()
                .map(|(f1, f2)| ConstantPoolEntry::MethodHandle(f1, f2)),
            16 => buffer.read_u16().map(ConstantPoolEntry::MethodType),
            17 => buffer
                .read_2_u16()
                .map(|(f1, f2)| ConstantPoolEntry::Dynamic(f1, f2)),
            18 => buffer
                .read_2_u16()
                .map(|(f1, f2)| ConstantPoolEntry::InvokeDynamic(f1, f2)),
            19 => buffer.read_u16().map(ConstantPoolEntry::Module),
            20 => buffer.read_u16().map(ConstantPoolEntry::Package),
            t => Err(ClassFileError::ConstantPoolTagNotSupport(t)),
        }
    }

    pub fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u8(self.tag());
        match self {
            ConstantPoolEntry::Utf8(value) => writer.write_utf8(value)?,
            ConstantPoolEntry::Integer(n) => writer.write_i32(*n),
            ConstantPoolEntry::Float(n) => writer.write_f32(*n),
            ConstantPoolEntry::Long(n) => writer.write_i64(*n),
            ConstantPoolEntry::Double(n) => writer.write_f64(*n),
            ConstantPoolEntry::ClassReference(i)
            | ConstantPoolEntry::StringReference(i)
            | ConstantPoolEntry::MethodType(i)
            | ConstantPoolEntry::Module(i)
            | ConstantPoolEntry::Package(i) => writer.write_u16(*i),
            ConstantPoolEntry::FieldReference(i, j)
            | ConstantPoolEntry::MethodReference(i, j)
            | ConstantPoolEntry::InterfaceMethodReference(i, j)
            | ConstantPoolEntry::NameAndTypeDescriptor(i, j)
            | ConstantPoolEntry::Dynamic(i, j)
            | ConstantPoolEntry::InvokeDynamic(i, j) => {
                writer.write_u16(*i);
                writer.write_u16(*j);
            }
            ConstantPoolEntry::MethodHandle(kind, i) => {
                writer.write_u8(*kind);
                writer.write_u16(*i);
            }
        }
        Ok(())
    }

    /// long 和 double 占用两个槽位
    fn slots(&self) -> usize {
        match self {
            ConstantPoolEntry::Long(_) | ConstantPoolEntry::Double(_) => 2,
            _ => 1,
        }
    }

    /// Encoded form doubles as the dedup key; floats compare by bit pattern.
    fn key(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

//面向32位计算机设计的。所以double和long会占用两个槽位，使用空占位符占位，
#[derive(Debug)]
pub enum ConstantPoolPhysicalEntry {
    Entry(ConstantPoolEntry),
    PlaceHolder,
}

/// Implementation of the constant pool of a java class.
/// Note that constants are 1-based in java.
///
/// [`ConstantPool::add`] appends unconditionally, which is what the reader needs.
/// The `intern_*` family reuses an existing identical entry, so that a class built
/// through it has the same pool layout every time it is built from the same calls.
#[derive(Debug, Default)]
pub struct ConstantPool {
    entries: Vec<ConstantPoolPhysicalEntry>,
    interned: HashMap<Vec<u8>, ConstantPoolIndex>,
}

impl ConstantPool {
    pub fn new() -> ConstantPool {
        ConstantPool::default()
    }

    /// Number of slots in use, placeholders included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, entry: ConstantPoolEntry) -> Result<ConstantPoolIndex> {
        let slots = self.entries.len() + entry.slots();
        if slots > MAX_SLOTS {
            return Err(ClassFileError::ConstantPoolOverflow(slots));
        }
        let index = (self.entries.len() + 1) as ConstantPoolIndex;
        self.interned.entry(entry.key()?).or_insert(index);
        let take_two_slots = entry.slots() == 2;
        self.entries.push(ConstantPoolPhysicalEntry::Entry(entry));
        if take_two_slots {
            self.entries.push(ConstantPoolPhysicalEntry::PlaceHolder);
        }
        Ok(index)
    }

    pub fn intern(&mut self, entry: ConstantPoolEntry) -> Result<ConstantPoolIndex> {
        match self.interned.get(&entry.key()?) {
            Some(index) => Ok(*index),
            None => self.add(entry),
        }
    }

    pub fn intern_utf8(&mut self, value: &str) -> Result<ConstantPoolIndex> {
        self.intern(ConstantPoolEntry::Utf8(value.to_string()))
    }

    pub fn intern_class(&mut self, internal_name: &str) -> Result<ConstantPoolIndex> {
        let name_index = self.intern_utf8(internal_name)?;
        self.intern(ConstantPoolEntry::ClassReference(name_index))
    }

    pub fn intern_name_and_type(
        &mut self,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantPoolIndex> {
        let name_index = self.intern_utf8(name)?;
        let descriptor_index = self.intern_utf8(descriptor)?;
        self.intern(ConstantPoolEntry::NameAndTypeDescriptor(
            name_index,
            descriptor_index,
        ))
    }

    pub fn intern_field_ref(
        &mut self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantPoolIndex> {
        let class_index = self.intern_class(owner)?;
        let name_and_type_index = self.intern_name_and_type(name, descriptor)?;
        self.intern(ConstantPoolEntry::FieldReference(
            class_index,
            name_and_type_index,
        ))
    }

    /// Index of an entry that must already be present.
    pub fn index_of(&self, entry: &ConstantPoolEntry) -> Result<ConstantPoolIndex> {
        self.interned
            .get(&entry.key()?)
            .copied()
            .ok_or_else(|| ClassFileError::InvalidClassData(format!("not in constant pool: {entry:?}")))
    }

    pub fn utf8_index(&self, value: &str) -> Result<ConstantPoolIndex> {
        self.index_of(&ConstantPoolEntry::Utf8(value.to_string()))
    }

    pub fn class_index(&self, internal_name: &str) -> Result<ConstantPoolIndex> {
        let name_index = self.utf8_index(internal_name)?;
        self.index_of(&ConstantPoolEntry::ClassReference(name_index))
    }

    pub fn get_string(&self, offset: &ConstantPoolIndex) -> Result<String> {
        if let ConstantPoolEntry::Utf8(value) = self.get(offset)? {
            Ok(value.clone())
        } else {
            Err(ClassFileError::InvalidClassData(format!(
                "Should be utf8 String at {offset}"
            )))
        }
    }

    pub fn try_get_class_name(&self, offset: &ConstantPoolIndex) -> Option<String> {
        self.get_class_name(offset).ok()
    }

    pub fn get_class_name(&self, offset: &ConstantPoolIndex) -> Result<String> {
        if let ConstantPoolEntry::ClassReference(value) = self.get(offset)? {
            self.get_string(value)
        } else {
            Err(ClassFileError::InvalidClassData(format!(
                "Should be class reference at {offset}"
            )))
        }
    }

    /// Resolves a Fieldref into `(owner, name, descriptor)`.
    pub fn get_field_ref(&self, offset: &ConstantPoolIndex) -> Result<(String, String, String)> {
        let ConstantPoolEntry::FieldReference(class_index, name_and_type_index) =
            self.get(offset)?
        else {
            return Err(ClassFileError::InvalidClassData(format!(
                "Should be field reference at {offset}"
            )));
        };
        let owner = self.get_class_name(class_index)?;
        let ConstantPoolEntry::NameAndTypeDescriptor(name_index, descriptor_index) =
            self.get(name_and_type_index)?
        else {
            return Err(ClassFileError::InvalidClassData(format!(
                "Should be name and type at {name_and_type_index}"
            )));
        };
        Ok((
            owner,
            self.get_string(name_index)?,
            self.get_string(descriptor_index)?,
        ))
    }

    pub fn get(&self, offset: &ConstantPoolIndex) -> Result<&ConstantPoolEntry> {
        self.try_get(offset)
            .ok_or(ClassFileError::InvalidConstantPoolIndexError(*offset))
    }

    pub fn try_get(&self, offset: &ConstantPoolIndex) -> Option<&ConstantPoolEntry> {
        if *offset == 0 {
            return None;
        }
        match self.entries.get((offset - 1) as usize)? {
            ConstantPoolPhysicalEntry::Entry(e) => Some(e),
            ConstantPoolPhysicalEntry::PlaceHolder => None,
        }
    }

    /// Writes `constant_pool_count` followed by every entry, placeholders skipped.
    pub fn write_to(&self, writer: &mut ByteWriter) -> Result<()> {
        writer.write_u16((self.entries.len() + 1) as u16);
        for entry in &self.entries {
            if let ConstantPoolPhysicalEntry::Entry(e) = entry {
                e.write_to(writer)?;
            }
        }
        Ok(())
    }

    pub fn read_from(buffer: &mut ByteBuffer) -> Result<ConstantPool> {
        let mut constant_pool = ConstantPool::new();
        let constant_pool_count = buffer.read_u16()? as usize;
        if constant_pool_count == 0 {
            return Err(ClassFileError::InvalidClassData(
                "constant_pool_count must be at least 1".to_string(),
            ));
        }
        while constant_pool.len() < constant_pool_count - 1 {
            constant_pool.add(ConstantPoolEntry::read_from_bytes(buffer)?)?;
        }
        Ok(constant_pool)
    }

    pub fn fmt_entry(&self, offset: &ConstantPoolIndex) -> Result<String> {
        let text = match self.get(offset)? {
            ConstantPoolEntry::Utf8(s) => format!("String: \"{s}\""),
            ConstantPoolEntry::Integer(n) => format!("Integer: {n}"),
            ConstantPoolEntry::Float(n) => format!("Float: {n}"),
            ConstantPoolEntry::Long(n) => format!("Long: {n}"),
            ConstantPoolEntry::Double(n) => format!("Double: {n}"),
            ConstantPoolEntry::ClassReference(n) => {
                format!("ClassReference: {} => ({})", n, self.fmt_entry(n)?)
            }
            ConstantPoolEntry::StringReference(n) => {
                format!("StringReference: {} => ({})", n, self.fmt_entry(n)?)
            }
            ConstantPoolEntry::MethodType(n) => {
                format!("MethodType: {} => ({})", n, self.fmt_entry(n)?)
            }
            ConstantPoolEntry::Module(n) => format!("Module: {} => ({})", n, self.fmt_entry(n)?),
            ConstantPoolEntry::Package(n) => {
                format!("Package: {} => ({})", n, self.fmt_entry(n)?)
            }
            ConstantPoolEntry::FieldReference(i, j) => self.fmt_pair("FieldReference", i, j)?,
            ConstantPoolEntry::MethodReference(i, j) => self.fmt_pair("MethodReference", i, j)?,
            ConstantPoolEntry::InterfaceMethodReference(i, j) => {
                self.fmt_pair("InterfaceMethodReference", i, j)?
            }
            ConstantPoolEntry::NameAndTypeDescriptor(i, j) => {
                self.fmt_pair("NameAndTypeDescriptor", i, j)?
            }
            ConstantPoolEntry::MethodHandle(kind, j) => {
                format!("MethodHandle: {}, {} => ({})", kind, j, self.fmt_entry(j)?)
            }
            ConstantPoolEntry::Dynamic(bootstrap, j) => {
                format!("Dynamic: #{}, {} => ({})", bootstrap, j, self.fmt_entry(j)?)
            }
            ConstantPoolEntry::InvokeDynamic(bootstrap, j) => {
                format!("InvokeDynamic: #{}, {} => ({})", bootstrap, j, self.fmt_entry(j)?)
            }
        };
        Ok(text)
    }

    fn fmt_pair(&self, label: &str, i: &ConstantPoolIndex, j: &ConstantPoolIndex) -> Result<String> {
        Ok(format!(
            "{}: {}, {} => ({}), ({})",
            label,
            i,
            j,
            self.fmt_entry(i)?,
            self.fmt_entry(j)?
        ))
    }
}

impl Display for ConstantPool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constant pool: (size: {})", self.entries.len())?;
        for (raw_idx, entry) in self.entries.iter().enumerate() {
            if let ConstantPoolPhysicalEntry::PlaceHolder = entry {
                continue;
            }
            let index = (raw_idx + 1) as u16;
            let entry_text = self.fmt_entry(&index).map_err(|_| std::fmt::Error)?;
            writeln!(f, "    {}, {}", index, entry_text)?;
        }
        Ok(())
    }
}
