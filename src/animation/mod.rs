//! Time-driven animation state.

/// [`AnimationState`](state::AnimationState) and the cycle constants.
pub mod state;
