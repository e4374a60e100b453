pub mod borrow;
pub mod commands;
pub mod errors;
pub mod fines;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
