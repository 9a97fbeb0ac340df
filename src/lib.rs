// This is free and unencumbered software released into the public domain.

//! Camera preview control: preview sizing, sensor/screen rotation
//! compensation, and a surface-driven camera session.

extern crate alloc;

pub mod cli;
pub mod shared;
