pub mod camera_source;
pub mod ffplay_sink;
pub mod image_file_source;
pub mod image_file_writer;
