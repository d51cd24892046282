//! Tax computation: GST breakdown and amount in words

pub mod gst;
pub mod words;

pub use gst::*;
pub use words::*;
