pub mod transform_buffer;
pub mod transforms_file;
