pub mod opencv_overlay_renderer;
