// src/integrations/youtube/mod.rs

pub mod client;

pub use client::{canonical_watch_url, YouTubeClient};
