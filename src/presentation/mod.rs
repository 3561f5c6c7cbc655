// Presentation layer - SVG rendering and the host page
pub mod page;
pub mod svg;
