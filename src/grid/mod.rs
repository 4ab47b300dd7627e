//! Grid geometry: cells, actions, observations and the per-episode layout.

mod error;
mod layout;
mod types;

pub use error::{Entity, LayoutError};
pub use layout::Layout;
pub use types::{Action, Cell, Observation};

pub(crate) use layout::place_random;
