pub mod resolution_flow;

pub use resolution_flow::ResolutionFlow;
