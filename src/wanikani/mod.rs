//! WaniKani API v2

pub mod client;

pub use client::{WaniKaniClient, WaniKaniConfig, WANIKANI_API_URL};
