pub mod channel;
pub mod programme;
pub mod time;
pub mod window;

pub use channel::*;
pub use programme::*;
pub use time::*;
pub use window::*;
