//! Canvas 2D rendering module

pub mod canvas;

pub use canvas::CanvasRenderer;
