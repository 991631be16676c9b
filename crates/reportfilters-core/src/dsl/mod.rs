pub mod defaults;
pub mod prepare;
pub mod validate;
pub mod value;
