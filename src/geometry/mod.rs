pub mod hit_testing;

pub use hit_testing::{HitTarget, distance_to_segment, find_snap_corner, hit_test};
