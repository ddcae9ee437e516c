pub mod body;
pub mod capture;
pub mod compiled;
pub mod eval;
pub mod operator;
pub mod select;

pub use capture::execute_captures;
pub use compiled::{
    compile, compile_condition, BodySelector, CompiledBodyCondition, CompiledBodyMatcher,
    CompiledCondition, CompiledRequestMatcher, PathSegment,
};
pub use eval::{evaluate, MatchOutcome};
pub use select::{select_best, Candidate};
