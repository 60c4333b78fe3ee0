pub mod toml_loader;

pub use toml_loader::{load_question_batch, parse_question_batch};
