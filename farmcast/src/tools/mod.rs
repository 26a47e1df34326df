pub mod cleanup;
pub mod get;
pub mod help;
pub mod invalidate;
pub mod stats;
