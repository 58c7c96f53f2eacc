pub mod hit_testing;

pub use hit_testing::{distance_to_line_segment, snap_price, vertical_distance};
