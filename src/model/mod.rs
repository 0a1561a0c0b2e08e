mod event;
mod game;
mod lineup;
mod record;
mod season;
mod stats;

pub use event::*;
pub use game::*;
pub use lineup::*;
pub use record::*;
pub use season::*;
pub use stats::*;
