pub mod logging;
pub mod progress;
pub mod utils;

pub use logging::*;
pub use progress::{create_spinner, slow_down};
pub use utils::*;
