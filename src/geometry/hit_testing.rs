use crate::plan::{Corner, FloorPlan, Point};

/// Drawn radius of a corner handle, in surface pixels.
pub const CORNER_RADIUS: f32 = 6.0;
/// Drawn radius of the corner a wall chain is currently extending from.
pub const ACTIVE_CORNER_RADIUS: f32 = 10.0;
/// Corner handles also count their outline when picked.
pub const CORNER_HIT_RADIUS: f32 = CORNER_RADIUS + 2.0;
/// Walls are easier to pick than they are thick.
pub const WALL_HIT_WIDTH: f32 = 20.0;

/// What a pointer landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Corner(String),
    Wall(String),
    Empty,
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// The corner closest to `pos` that lies strictly within `radius`.
///
/// Ties keep whichever corner was seen first.
pub fn find_snap_corner(plan: &FloorPlan, pos: Point, radius: f32) -> Option<&Corner> {
    let mut best: Option<(&Corner, f32)> = None;
    for corner in plan.corners.values() {
        let distance = pos.distance(corner.position());
        if distance >= radius {
            continue;
        }
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((corner, distance));
        }
    }
    best.map(|(corner, _)| corner)
}

/// Pick the element under `pos`. Corners are drawn above walls and win.
pub fn hit_test(plan: &FloorPlan, pos: Point) -> HitTarget {
    if let Some(corner) = find_snap_corner(plan, pos, CORNER_HIT_RADIUS) {
        return HitTarget::Corner(corner.id.clone());
    }

    let mut best: Option<(&str, f32)> = None;
    for wall in plan.walls.values() {
        // Walls with a missing endpoint are not drawn and cannot be picked.
        let Some((start, end)) = plan.wall_endpoints(wall) else {
            continue;
        };
        let reach = (plan.wall_stroke_width(wall).max(WALL_HIT_WIDTH)) / 2.0;
        let distance = distance_to_segment(pos, start.position(), end.position());
        if distance <= reach && best.is_none_or(|(_, d)| distance < d) {
            best = Some((wall.id.as_str(), distance));
        }
    }

    match best {
        Some((wall_id, _)) => HitTarget::Wall(wall_id.to_owned()),
        None => HitTarget::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 0.001);
        assert!((distance_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 0.001);
        assert!((distance_to_segment(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_snap_prefers_nearest_corner() {
        let mut plan = FloorPlan::default_template();
        plan.corners.insert("near".into(), Corner::new("near", Point::new(105.0, 100.0)));

        let snapped = find_snap_corner(&plan, Point::new(108.0, 100.0), 20.0).unwrap();
        assert_eq!(snapped.id, "near");
        assert!(find_snap_corner(&plan, Point::new(250.0, 250.0), 20.0).is_none());
    }

    #[test]
    fn test_snap_radius_is_exclusive() {
        let plan = FloorPlan::default_template();
        assert!(find_snap_corner(&plan, Point::new(120.0, 100.0), 20.0).is_none());
        assert!(find_snap_corner(&plan, Point::new(119.0, 100.0), 20.0).is_some());
    }

    #[test]
    fn test_hit_test_targets() {
        let plan = FloorPlan::default_template();
        assert_eq!(hit_test(&plan, Point::new(101.0, 99.0)), HitTarget::Corner("c1".into()));
        assert_eq!(hit_test(&plan, Point::new(250.0, 104.0)), HitTarget::Wall("w1".into()));
        assert_eq!(hit_test(&plan, Point::new(250.0, 250.0)), HitTarget::Empty);
    }
}
