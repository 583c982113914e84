pub mod image_file_visualizer;
pub mod json_lines_frame_source;
pub mod json_lines_sink;
