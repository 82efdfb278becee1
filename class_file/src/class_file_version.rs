use crate::class_file_error::{ClassFileError, Result};

/// Discriminant is the major version written in the class file.
/// https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.1-200-B.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
#[repr(u16)]
pub enum ClassFileVersion {
    Jdk1_1 = 45,
    Jdk1_2 = 46,
    Jdk1_3 = 47,
    Jdk1_4 = 48,
    Jdk5 = 49,
    Jdk6 = 50,
    Jdk7 = 51,
    #[default]
    Jdk8 = 52,
    Jdk9 = 53,
    Jdk10 = 54,
    Jdk11 = 55,
    Jdk12 = 56,
    Jdk13 = 57,
    Jdk14 = 58,
    Jdk15 = 59,
    Jdk16 = 60,
    Jdk17 = 61,
    Jdk18 = 62,
    Jdk19 = 63,
    Jdk20 = 64,
    Jdk21 = 65,
}

const KNOWN_VERSIONS: [ClassFileVersion; 21] = [
    ClassFileVersion::Jdk1_1,
    ClassFileVersion::Jdk1_2,
    ClassFileVersion::Jdk1_3,
    ClassFileVersion::Jdk1_4,
    ClassFileVersion::Jdk5,
    ClassFileVersion::Jdk6,
    ClassFileVersion::Jdk7,
    ClassFileVersion::Jdk8,
    ClassFileVersion::Jdk9,
    ClassFileVersion::Jdk10,
    ClassFileVersion::Jdk11,
    ClassFileVersion::Jdk12,
    ClassFileVersion::Jdk13,
    ClassFileVersion::Jdk14,
    ClassFileVersion::Jdk15,
    ClassFileVersion::Jdk16,
    ClassFileVersion::Jdk17,
    ClassFileVersion::Jdk18,
    ClassFileVersion::Jdk19,
    ClassFileVersion::Jdk20,
    ClassFileVersion::Jdk21,
];

impl ClassFileVersion {
    pub fn major(&self) -> u16 {
        *self as u16
    }

    /// javac 1.1 wrote 45.3, every later release writes a zero minor
    pub fn minor(&self) -> u16 {
        match self {
            ClassFileVersion::Jdk1_1 => 3,
            _ => 0,
        }
    }

    /// Looks up the release by major version. The minor version only shows up in
    /// the error; [`crate::class_file::ClassFile::minor_version`] keeps it.
    pub fn new(major: u16, minor: u16) -> Result<ClassFileVersion> {
        KNOWN_VERSIONS
            .iter()
            .copied()
            .find(|version| version.major() == major)
            .ok_or(ClassFileError::UnsupportedVersion(major, minor))
    }

    pub fn from_major(major: u16) -> Result<ClassFileVersion> {
        ClassFileVersion::new(major, 0)
    }
}
