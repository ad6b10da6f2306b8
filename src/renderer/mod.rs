//! Rendering interface
//!
//! The game does not own a graphics backend. Each frame it flattens the
//! state into `DrawCommand`s and hands them to whatever `Renderer` the host
//! provides.

pub mod sprites;

pub use sprites::{DrawCommand, Effect, Sequence, draw_list};

use crate::sim::GameState;

/// Host drawing backend
pub trait Renderer {
    fn begin_frame(&mut self) {}
    fn draw(&mut self, command: &DrawCommand);
    fn end_frame(&mut self) {}
}

/// Draw one full frame of `state`
pub fn render(state: &GameState, renderer: &mut dyn Renderer) {
    renderer.begin_frame();
    for command in draw_list(state) {
        renderer.draw(&command);
    }
    renderer.end_frame();
}
