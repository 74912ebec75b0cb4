pub mod client;

pub use client::AidboxClient;
