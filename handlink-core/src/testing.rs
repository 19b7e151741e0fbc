//! Synthetic hands for unit tests

use crate::landmarks::{joints, Landmarks, Point, LANDMARK_COUNT};

/// Palm length (wrist to middle MCP) of the synthetic hand
pub const PALM: f32 = 100.0;

/// Proximal segment length (MCP to PIP) of every synthetic finger
pub const SEGMENT: f32 = 40.0;

/// Upright hand whose distance ratios are set directly
///
/// `thumb_ratio` is tip-to-index-MCP over palm length; `finger_ratios` are
/// tip-to-MCP over segment length for index, middle, ring and pinky.
pub fn synthetic_hand(thumb_ratio: f32, finger_ratios: [f32; 4]) -> Landmarks {
    let mut points = [Point::default(); LANDMARK_COUNT];
    points[joints::WRIST] = Point::new(0.0, 0.0, 0.0);

    let fingers = [
        (joints::INDEX_MCP, joints::INDEX_PIP, joints::INDEX_TIP, -30.0),
        (joints::MIDDLE_MCP, joints::MIDDLE_PIP, joints::MIDDLE_TIP, 0.0),
        (joints::RING_MCP, joints::RING_PIP, joints::RING_TIP, 20.0),
        (joints::PINKY_MCP, joints::PINKY_PIP, joints::PINKY_TIP, 40.0),
    ];
    for ((mcp, pip, tip, x), ratio) in fingers.into_iter().zip(finger_ratios) {
        points[mcp] = Point::new(x, -PALM, 0.0);
        points[pip] = Point::new(x, -PALM - SEGMENT, 0.0);
        points[tip] = Point::new(x, -PALM - SEGMENT * ratio, 0.0);
    }

    let index_mcp = points[joints::INDEX_MCP];
    points[joints::THUMB_TIP] = Point::new(index_mcp.x - PALM * thumb_ratio, index_mcp.y, 0.0);

    Landmarks::new(points)
}

/// Hand open wide enough to saturate the default windows at curl 0
pub fn open_hand() -> Landmarks {
    synthetic_hand(1.0, [4.0; 4])
}

/// Fist closed enough to saturate the default windows at curl 1
pub fn fist() -> Landmarks {
    synthetic_hand(0.2, [1.0; 4])
}
