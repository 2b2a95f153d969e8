//! Static scene geometry derived from the window size
//!
//! The layout is treated as configuration: it is rebuilt on resize and never
//! mutated by a tick.

use serde::Serialize;

use super::types::{
    Direction, PathSide, CROSSING_WAIT_SPREAD, STOP_LINE_DISTANCE_BEFORE_CROSSING,
    ZEBRA_CROSSING_WIDTH,
};

/// Height of each footpath band
const FOOTPATH_HEIGHT: f32 = 30.0;

/// Offset of the crossing centre to the right of the signal post
const CROSSING_OFFSET_FROM_SIGNAL: f32 = 15.0;

/// The painted pedestrian strip and the stop lines guarding it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrossingCorridor {
    /// Centre line pedestrians walk along
    pub center_x: f32,
    pub width: f32,
    /// Left edge of the strip (first reached by forward traffic)
    pub front_edge: f32,
    /// Right edge of the strip (first reached by backward traffic)
    pub back_edge: f32,
    /// Stop line for forward traffic
    pub stop_line_forward: f32,
    /// Stop line for backward traffic
    pub stop_line_backward: f32,
}

impl CrossingCorridor {
    pub fn new(center_x: f32, width: f32) -> Self {
        let front_edge = center_x - width / 2.0;
        let back_edge = center_x + width / 2.0;
        Self {
            center_x,
            width,
            front_edge,
            back_edge,
            stop_line_forward: front_edge - STOP_LINE_DISTANCE_BEFORE_CROSSING,
            stop_line_backward: back_edge + STOP_LINE_DISTANCE_BEFORE_CROSSING,
        }
    }

    /// Stop line binding for traffic travelling in `direction`
    pub fn stop_line(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Forward => self.stop_line_forward,
            Direction::Backward => self.stop_line_backward,
        }
    }

    /// Does a body spanning `[left, left + width]` overlap the strip
    pub fn overlaps(&self, left: f32, width: f32) -> bool {
        left < self.back_edge && left + width > self.front_edge
    }

    /// Half-width of the band waiting pedestrians are scattered across
    pub fn wait_spread(&self) -> f32 {
        self.width * CROSSING_WAIT_SPREAD
    }
}

/// All geometry the simulation reads
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneLayout {
    pub width: f32,
    pub height: f32,
    pub road_top_y: f32,
    pub road_bottom_y: f32,
    /// Walking level on the upper footpath
    pub upper_sidewalk_y: f32,
    /// Walking level on the lower footpath
    pub lower_sidewalk_y: f32,
    /// Lane used by forward traffic
    pub lane_forward_y: f32,
    /// Lane used by backward traffic
    pub lane_backward_y: f32,
    pub traffic_light_x: f32,
    pub corridor: CrossingCorridor,
    pub bird_base_y: f32,
    pub cloud_base_y: f32,
}

impl SceneLayout {
    pub fn from_window(width: f32, height: f32) -> Self {
        let height = height.max(1.0);
        let road_top_y = height * 0.30;
        let road_bottom_y = height * 0.15;
        let road_span = road_top_y - road_bottom_y;
        let traffic_light_x = width * 0.4;

        Self {
            width,
            height,
            road_top_y,
            road_bottom_y,
            upper_sidewalk_y: road_top_y + FOOTPATH_HEIGHT * 0.6,
            lower_sidewalk_y: FOOTPATH_HEIGHT * 0.4,
            lane_forward_y: road_bottom_y + road_span * 0.3,
            lane_backward_y: road_bottom_y + road_span * 0.7,
            traffic_light_x,
            corridor: CrossingCorridor::new(
                traffic_light_x + CROSSING_OFFSET_FROM_SIGNAL,
                ZEBRA_CROSSING_WIDTH,
            ),
            bird_base_y: height * 0.8,
            cloud_base_y: height * 0.75,
        }
    }

    pub fn sidewalk_y(&self, side: PathSide) -> f32 {
        match side {
            PathSide::Upper => self.upper_sidewalk_y,
            PathSide::Lower => self.lower_sidewalk_y,
        }
    }

    pub fn lane_y(&self, direction: Direction) -> f32 {
        match direction {
            Direction::Forward => self.lane_forward_y,
            Direction::Backward => self.lane_backward_y,
        }
    }
}
