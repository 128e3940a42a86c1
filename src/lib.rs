pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod filters;
mod lexer;
mod parser;
mod render;
pub mod serializer;
pub mod template;
pub mod value;

pub use engine::Engine;
pub use error::Error;
pub use filters::FilterRegistry;
pub use template::{Template, compile};
pub use value::Value;

pub type Result<T> = std::result::Result<T, Error>;
