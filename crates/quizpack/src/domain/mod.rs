//! Domain layer: input records, the H5P target schema, and error types.

pub mod errors;
pub mod h5p;
pub mod model;
