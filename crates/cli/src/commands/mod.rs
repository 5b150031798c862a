pub mod deployments;
pub mod interface;
pub mod project;
pub mod util;

pub use deployments::*;
pub use interface::*;
pub use project::*;
pub use util::*;
