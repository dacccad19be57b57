pub mod client;

pub use client::{TelegramNotifier, DEFAULT_API_URL};
