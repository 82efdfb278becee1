use thiserror::Error;

/// Models the possible errors returned when reading or writing a .class file
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClassFileError {
    #[error("invalid class data: {0}")]
    InvalidClassData(String),
    #[error("unsupported class file version {0}.{1}")]
    UnsupportedVersion(u16, u16),

    #[error("constant pool tag not support: {0}")]
    ConstantPoolTagNotSupport(u8),
    #[error("invalid const pool index {0}")]
    InvalidConstantPoolIndexError(u16),
    #[error("constant pool overflow: {0} slots")]
    ConstantPoolOverflow(usize),

    #[error("unexpected end of data")]
    UnexpectedEndOfData,
    #[error("invalid cesu8 string")]
    InvalidCesu8String,
    #[error("utf8 constant too long: {0} bytes")]
    Utf8TooLong(usize),
    #[error("{0} too long: {1} bytes")]
    TooLong(&'static str, usize),

    #[error("invalid code : {0}")]
    InvalidCode(String),
}

pub type Result<T> = std::result::Result<T, ClassFileError>;
