extern crate num_cpus;
extern crate thiserror;

#[macro_use]
extern crate log;

pub mod bbox;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod ray;
pub mod scene;
pub mod triangle;
