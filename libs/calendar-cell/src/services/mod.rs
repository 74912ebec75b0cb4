pub mod indicator;
pub mod picker;
pub mod resolver;
pub mod week;
