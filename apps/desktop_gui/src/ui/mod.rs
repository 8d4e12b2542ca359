//! UI layer for the studio app: views, shared widgets, and theming.

pub mod landing;
pub mod studio;
pub mod theme;
pub mod widgets;
