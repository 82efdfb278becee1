mod test_write_class;
mod utils;
