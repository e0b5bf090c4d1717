//! Read-only queries over a finished skeleton: roof faces and inward
//! offset paths.

pub mod face;
pub mod offset;
pub mod stitch;

pub use face::Face;
pub use offset::Segment2;
pub use stitch::Polyline;
