//! Client-side error handling

mod conversions;

pub use conversions::TransportError;
