//! Application layer orchestrating domain logic and infrastructure.

pub mod document;
pub mod mappers;
pub mod pipeline;
