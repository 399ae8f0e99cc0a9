//! Integer line-of-sight between grid tiles.

use glam::IVec2;

/// Walks the Bresenham line from `from` to `to` and returns false as soon as an
/// intermediate tile is opaque. Both endpoints are exempt from the check.
pub fn line_of_sight(from: IVec2, to: IVec2, is_opaque: impl Fn(IVec2) -> bool) -> bool {
    let delta = (to - from).abs();
    let step = IVec2::new((to.x - from.x).signum(), (to.y - from.y).signum());

    let mut current = from;
    let mut err = delta.x - delta.y;

    while current != to {
        let e2 = 2 * err;
        if e2 > -delta.y {
            err -= delta.y;
            current.x += step.x;
        }
        if e2 < delta.x {
            err += delta.x;
            current.y += step.y;
        }

        if current != to && is_opaque(current) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at(wall: IVec2) -> impl Fn(IVec2) -> bool {
        move |tile| tile == wall
    }

    #[test]
    fn test_same_tile_is_visible() {
        assert!(line_of_sight(IVec2::new(2, 2), IVec2::new(2, 2), |_| true));
    }

    #[test]
    fn test_endpoints_are_exempt() {
        let from = IVec2::new(0, 0);
        let to = IVec2::new(3, 0);
        assert!(line_of_sight(from, to, wall_at(from)));
        assert!(line_of_sight(from, to, wall_at(to)));
    }

    #[test]
    fn test_wall_between_blocks() {
        assert!(!line_of_sight(IVec2::new(0, 0), IVec2::new(4, 0), wall_at(IVec2::new(2, 0))));
        assert!(!line_of_sight(IVec2::new(0, 0), IVec2::new(0, 4), wall_at(IVec2::new(0, 3))));
        assert!(!line_of_sight(IVec2::new(0, 0), IVec2::new(3, 3), wall_at(IVec2::new(1, 1))));
    }

    #[test]
    fn test_symmetric_for_straight_lines() {
        let wall = wall_at(IVec2::new(5, 1));
        assert!(line_of_sight(IVec2::new(1, 1), IVec2::new(4, 1), &wall));
        assert!(line_of_sight(IVec2::new(4, 1), IVec2::new(1, 1), &wall));
    }
}
