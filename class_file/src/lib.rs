pub mod attribute_info;
pub mod cesu8_byte_buffer;
pub mod class_file;
pub mod class_file_error;
pub mod class_file_reader;
pub mod class_file_version;
pub mod class_file_writer;
pub mod constant_pool;
pub mod instruction;
pub mod member_info;
