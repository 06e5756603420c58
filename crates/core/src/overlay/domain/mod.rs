pub mod overlay_item;
pub mod overlay_renderer;
