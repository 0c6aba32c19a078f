pub mod block;
pub mod span;
