// src/core/mod.rs

pub mod html;
pub mod imaging;
pub mod net;
pub mod sanitize;

pub use net::{Fetcher, WebFetcher};
