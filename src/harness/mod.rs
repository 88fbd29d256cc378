pub mod core;
pub mod validate;


pub use self::core::*;
pub use self::validate::*;
