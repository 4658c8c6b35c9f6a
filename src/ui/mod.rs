/// Widgets that render the view-model
pub mod grid;
