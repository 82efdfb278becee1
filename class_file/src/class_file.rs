use crate::attribute_info::{AttributeInfo, AttributeType, CodeAttribute};
use crate::class_file_error::Result;
use crate::class_file_version::ClassFileVersion;
use crate::constant_pool::ConstantPool;
use crate::member_info::{FieldInfo, MethodAccessFlags, MethodInfo};
use bitflags::bitflags;
use std::fmt::{Display, Formatter};

bitflags! {
    /// Class flags
    /// https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.1-200-E.1
    ///
    /// | Flag Name |	Value |	Interpretation |
    /// | -----     |-----    | ------------------|
    /// |ACC_PUBLIC	|0x0001   |	Declared public; may be accessed from outside its package.|
    /// |ACC_FINAL	| 0x0010  | Declared final; no subclasses allowed.|
    /// |ACC_SUPER	| 0x0020	|Treat superclass methods specially when invoked by the invokespecial instruction.|
    /// |ACC_INTERFACE|	0x0200	|Is an interface, not a class.|
    /// |ACC_ABSTRACT	|0x0400	|Declared abstract; must not be instantiated.|
    /// |ACC_SYNTHETIC	|0x1000	|Declared synthetic; not present in the source code.|
    /// |ACC_ANNOTATION	|0x2000	|Declared as an annotation interface.|
    /// |ACC_ENUM	|0x4000	|Declared as an enum class.|
    /// |ACC_MODULE  |0x8000|	Is a module, not a class or interface.|
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

/// In-memory class file. Names are kept resolved; every name the members and
/// attributes refer to lives in `constant_pool` as well, which is what the writer
/// resolves indexes against.
#[derive(Debug)]
pub struct ClassFile {
    pub version: ClassFileVersion,
    /// as read; preview classes carry 65535 here
    pub minor_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: ClassAccessFlags,
    //常量池中数据，对应的是classInfo中只有名称常量是有用的。直接取出来
    pub this_class_name: String,
    pub super_class_name: Option<String>,
    pub interface_names: Vec<String>,

    pub field_info: Vec<FieldInfo>,
    pub method_info: Vec<MethodInfo>,
    pub attribute_info: Vec<AttributeInfo>,
}

impl ClassFile {
    /// Starts an empty class; the pool opens with this class then the superclass.
    pub fn new(
        version: ClassFileVersion,
        access_flags: ClassAccessFlags,
        this_class_name: &str,
        super_class_name: Option<&str>,
    ) -> Result<ClassFile> {
        let mut constant_pool = ConstantPool::new();
        constant_pool.intern_class(this_class_name)?;
        if let Some(super_class) = super_class_name {
            constant_pool.intern_class(super_class)?;
        }
        Ok(ClassFile {
            version,
            minor_version: version.minor(),
            constant_pool,
            access_flags,
            this_class_name: this_class_name.to_string(),
            super_class_name: super_class_name.map(str::to_string),
            interface_names: Vec::new(),
            field_info: Vec::new(),
            method_info: Vec::new(),
            attribute_info: Vec::new(),
        })
    }

    /// Declares a method. Code that refers to the pool has to be built against
    /// `self.constant_pool` before it is handed in here.
    pub fn add_method(
        &mut self,
        access_flags: MethodAccessFlags,
        name: &str,
        descriptor: &str,
        code: Option<CodeAttribute>,
    ) -> Result<()> {
        self.constant_pool.intern_utf8(name)?;
        self.constant_pool.intern_utf8(descriptor)?;
        let mut attributes = Vec::new();
        if let Some(code) = code {
            self.constant_pool.intern_utf8(AttributeType::Code.name())?;
            attributes.push(AttributeInfo {
                name: AttributeType::Code,
                info: code.to_bytes(&self.constant_pool)?,
            });
        }
        self.method_info.push(MethodInfo {
            access_flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            attributes,
        });
        Ok(())
    }

    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MethodInfo> {
        self.method_info
            .iter()
            .find(|method| method.name == name && method.descriptor == descriptor)
    }

    pub fn method_code(&self, method: &MethodInfo) -> Option<Result<CodeAttribute>> {
        method
            .find_attribute(&AttributeType::Code)
            .map(|attr| CodeAttribute::read_from_bytes(&attr.info, &self.constant_pool))
    }
}

impl Display for ClassFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Class {}", self.this_class_name)?;
        if let Some(super_class) = &self.super_class_name {
            write!(f, "(extends {})", super_class)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "version: {} ({}.{})",
            self.version,
            self.version.major(),
            self.minor_version
        )?;
        for method in &self.method_info {
            writeln!(f, "method: {}{}", method.name, method.descriptor)?;
        }
        write!(f, "{}", self.constant_pool)?;
        Ok(())
    }
}
