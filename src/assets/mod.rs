//! Assets Module
//!
//! Preloading of external images with in-flight load coalescing.

mod loader;
mod preloader;

pub use loader::{AssetLoader, HttpAssetLoader};
pub use preloader::AssetPreloader;
