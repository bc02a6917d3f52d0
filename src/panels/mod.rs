mod canvas_panel;
mod inspector_panel;

pub use canvas_panel::canvas_panel;
pub use inspector_panel::inspector_panel;
