mod canvas;
mod raster;
mod renderer;
mod text;
mod transform;

pub use canvas::{
    stop, Canvas, ColorStop, Gradient, GradientShape, Rgba, Stroke, TextAlign, SURFACE_BACKDROP,
};
pub use raster::PixelCanvas;
pub use renderer::Renderer;
pub use transform::Viewport;
