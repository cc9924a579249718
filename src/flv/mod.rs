// FLV container utilities

mod tag;

pub use tag::*;
