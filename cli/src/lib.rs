//! Request surface for Flowscope: text input parsing and command-line options

pub mod input;
pub mod options;
