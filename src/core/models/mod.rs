pub mod cost;
pub mod invocation;
