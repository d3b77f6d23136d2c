pub mod definition;
pub mod error;
pub mod image;
pub mod mac;
pub mod machine;
pub mod registry;
pub mod runner;

pub use advmac;
