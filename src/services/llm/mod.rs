pub mod client;

pub use client::LlmService;
