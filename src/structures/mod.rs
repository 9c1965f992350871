// private sub-module defined in other files
mod point2d;
mod rectangle_with_data;

// exports identifiers from private sub-modules in the current module namespace
pub use self::point2d::Point2D;
pub use self::rectangle_with_data::{
    build_envelope_index, candidates, geometry_envelope, RectangleWithData,
};
