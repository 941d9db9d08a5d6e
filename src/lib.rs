//! Protocol decoder for the TM1637 7-segment LED driver.
//!
//! Sits on top of a two-wire bus decoder that has already split the
//! capture into start/stop conditions and bytes with per-bit timing.
//! [`Decoder`] interprets those bytes as the chip's commands and
//! reconstructs the text shown on the display.

pub mod annotation;
pub mod bitfield;
pub mod command;
pub mod config;
pub mod decoder;
pub mod event;
pub mod font;
pub mod helper_methods;

pub use annotation::{Annotation, AnnotationSink, Category, Row};
pub use config::{DecimalPointStyle, Options};
pub use decoder::{Decoder, State, Transmission};
pub use event::{BitSample, Event, TimedEvent};
