pub mod handler;

pub use handler::{FormEdit, InputContext, InputHandler, KeyAction};
