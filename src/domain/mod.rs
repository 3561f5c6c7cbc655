// Domain layer - Chart data model, marks and error taxonomy
pub mod error;
pub mod mark;
pub mod metric;
pub mod observation;
pub mod scale;
