//! Character session
//!
//! [`CharacterController`] owns everything one on-screen avatar needs: the
//! loaded VRM, its mixer, the motion currently playing, and the idle
//! expression cycle. Hosts drive it with [`CharacterController::update`] once
//! per frame and read back [`CharacterState`] and [`CameraPose`].

pub mod command;
pub mod controller;
pub mod state;

pub use command::CharacterCommand;
pub use controller::CharacterController;
pub use state::{CameraPose, CharacterState, ExpressionState};
