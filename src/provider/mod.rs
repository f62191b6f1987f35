pub mod location;
pub mod renderer;
