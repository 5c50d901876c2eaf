#[macro_use]
mod macros;

mod finite;
pub mod percent;
pub mod power;
mod zero;

pub use self::{finite::Finite, zero::Zero};
