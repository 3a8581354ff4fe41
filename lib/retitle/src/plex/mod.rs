mod client;
mod models;

pub use client::{PlexClient, PlexClientBuilder, RetryPolicy};
