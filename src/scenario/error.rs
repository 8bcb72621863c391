use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("breakpoints must be strictly ascending ({previous} is followed by {next})")]
    UnorderedBreakpoints { previous: u32, next: u32 },

    #[error("breakpoint {0}% is outside 1..=100")]
    BreakpointOutOfRange(u32),

    #[error("no precomputed statistics for the {0}% breakpoint")]
    MissingBreakpoint(u32),
}
