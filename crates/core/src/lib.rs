//! Domain types and pure logic for the Houme image composition service.
//!
//! Nothing in this crate performs I/O: area categories, prompt
//! composition, request mapping, image header probing and score math.

pub mod area;
pub mod error;
pub mod image;
pub mod prompt;
pub mod request;
pub mod scoring;
pub mod types;
