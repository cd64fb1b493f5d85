mod engine;
mod phase;

pub use engine::{RunState, TimerEngine, TimerState};
pub use phase::{advance_phase, Phase, PhaseAdvance};
