//! Entity Component System module
//!
//! Agents live in a plain hecs world; these are the components shared by
//! the AI and the integrator.

mod components;

pub use components::{Name, Transform, Velocity};
