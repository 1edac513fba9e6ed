//! HTTP client layer — `StorefrontHttp`.

pub mod client;

pub use client::StorefrontHttp;
