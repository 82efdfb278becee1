pub mod class_blob_emitter;
pub mod class_sink;
pub mod discovery;
pub mod field_descriptor;
pub mod gen_error;
pub mod generated_class_spec;
pub mod processor;
pub mod semantic_type;
