pub mod clock;
pub mod evaluator;
pub mod resolver;
pub mod rng;
pub mod system_info;

pub use clock::{Clock, FixedClock, SystemClock};
pub use evaluator::render;
pub use resolver::TemplateContext;
pub use rng::{FixedRng, Rng, SystemRng};
pub use system_info::SystemInfo;
