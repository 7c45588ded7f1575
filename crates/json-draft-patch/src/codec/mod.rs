//! Patch record codecs.

pub mod json;
