//! Crate-level tests exercising the readers together.

mod behaviour;
mod unit;
