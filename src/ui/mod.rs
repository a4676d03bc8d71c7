pub mod charts;
pub mod dashboard;
pub mod format;
pub mod panels;
pub mod table;
