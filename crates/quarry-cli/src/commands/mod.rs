//! Command implementations.

pub mod config;
pub mod expand;
pub mod terms;
pub mod verify;

pub use self::config::execute_config;
pub use self::expand::execute_expand;
pub use self::terms::execute_terms;
pub use self::verify::execute_verify;
