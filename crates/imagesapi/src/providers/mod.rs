pub mod openai;

pub use openai::OpenAiImages;
