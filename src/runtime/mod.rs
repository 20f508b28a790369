/// The scene renderer and its Running/Stopped state machine.
pub mod renderer;
/// Host frame scheduling.
pub mod scheduler;
