pub mod clock;
pub mod config;
pub mod constants;
pub mod counter;
pub mod effects;
pub mod likes;
pub mod store;
pub mod tilt;
pub mod typewriter;

pub use clock::*;
pub use config::*;
pub use constants::*;
pub use counter::*;
pub use effects::*;
pub use likes::*;
pub use store::*;
pub use tilt::*;
pub use typewriter::*;
