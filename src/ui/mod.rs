/// Presentation layer: egui panels, charts and the data table.
pub mod charts;
pub mod panels;
pub mod table;
