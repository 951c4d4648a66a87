pub mod bounds;
pub mod catalog;
pub mod data;
pub mod json;
pub mod lookup;
pub mod render;
