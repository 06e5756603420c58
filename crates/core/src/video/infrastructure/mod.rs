pub mod ffmpeg_file_source;
pub mod image_directory_sink;
pub mod image_file_source;
pub mod mat_conversion;
pub mod opencv_camera_source;
pub mod window_sink;
