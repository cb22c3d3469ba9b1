//! Pairing code rendering.

pub mod qr;

pub use qr::QrSvgRenderer;
