//! Platform abstraction layer
//!
//! The browser build drives the game from `requestAnimationFrame`, listens
//! for keys and taps, and defers the game-over notice with a timer. Native
//! builds only get the input bindings.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::DinoRunner;

/// Pointer events that trigger a jump on the canvas
pub const JUMP_POINTER_EVENTS: [&str; 2] = ["touchstart", "click"];

/// `KeyboardEvent.code` values bound to jump
pub fn is_jump_key(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp")
}
