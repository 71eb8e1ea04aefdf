pub mod client_ip;
pub mod honeypot;
pub mod parser;
pub mod pipeline;
pub mod validator;

pub use validator::{validate, validate_strict, ValidationError};
