// private sub-module defined in other files
mod buffer_vector;
mod clip;
mod dissolve;
mod spatial_join;
mod symmetrical_difference;

// exports identifiers from private sub-modules in the current module namespace
pub use self::buffer_vector::{buffer_vector, BufferVector, DissolveOption};
pub use self::clip::{clip, Clip};
pub use self::dissolve::{dissolve, Dissolve};
pub use self::spatial_join::{spatial_join, JoinOperation, SpatialJoin};
pub use self::symmetrical_difference::{
    symmetrical_difference, SymmetricalDifference, DEFAULT_XY_TOLERANCE,
};
