//! Built-in [`Transformer`](crate::Transformer) implementations.

mod date_time;

pub use date_time::DateTimeTransformer;
