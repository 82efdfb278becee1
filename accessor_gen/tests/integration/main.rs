mod test_batch;
mod test_emit_accessor;
mod utils;
