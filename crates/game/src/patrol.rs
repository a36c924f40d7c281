//! Waypoint routes walked back and forth by patrolling agents.

use engine_core::Vec3;

/// One stop on a patrol route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec3,
    /// Sweep the view left or right here instead of just waiting.
    pub is_search_point: bool,
    /// Sweep toward positive yaw (counter-clockwise from above).
    pub pivot_left: bool,
    /// Sweep amplitude in degrees.
    pub pivot_range: f32,
}

impl Waypoint {
    /// A plain stop where the agent waits.
    pub fn stop(position: Vec3) -> Self {
        Self {
            position,
            is_search_point: false,
            pivot_left: true,
            pivot_range: 60.0,
        }
    }

    /// A stop where the agent sweeps its view.
    pub fn search(position: Vec3, pivot_left: bool, pivot_range: f32) -> Self {
        Self {
            position,
            is_search_point: true,
            pivot_left,
            pivot_range,
        }
    }
}

/// Ordered waypoints traversed 0, 1, .., n-1, n-2, .., 0, 1, ..
#[derive(Debug, Clone, Default)]
pub struct PatrolRoute {
    points: Vec<Waypoint>,
    index: usize,
    forward: bool,
}

impl PatrolRoute {
    pub fn new(points: Vec<Waypoint>) -> Self {
        Self {
            points,
            index: 0,
            forward: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_moving_forward(&self) -> bool {
        self.forward
    }

    /// Waypoint currently being approached.
    pub fn current(&self) -> Option<&Waypoint> {
        self.points.get(self.index)
    }

    /// Step to the next index, reflecting at both ends.
    pub fn advance(&mut self) {
        let len = self.points.len();
        if len == 0 {
            return;
        }

        let mut next = self.index as isize;
        if self.forward {
            next += 1;
            if next >= len as isize {
                next = len as isize - 2;
                self.forward = false;
            }
        } else {
            next -= 1;
            if next < 0 {
                next = 1;
                self.forward = true;
            }
        }
        self.index = next.clamp(0, len as isize - 1) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(len: usize) -> PatrolRoute {
        PatrolRoute::new(
            (0..len)
                .map(|i| Waypoint::stop(Vec3::new(i as f32, 0.0, 0.0)))
                .collect(),
        )
    }

    fn visits(len: usize, steps: usize) -> Vec<usize> {
        let mut r = route(len);
        let mut out = vec![r.index()];
        for _ in 0..steps {
            r.advance();
            out.push(r.index());
        }
        out
    }

    #[test]
    fn ping_pong_reverses_at_both_ends() {
        assert_eq!(visits(4, 8), vec![0, 1, 2, 3, 2, 1, 0, 1, 2]);
        assert_eq!(visits(2, 4), vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn indices_stay_in_range() {
        for len in 2..9 {
            for i in visits(len, 50) {
                assert!(i < len, "index {i} out of range for len {len}");
            }
        }
    }

    #[test]
    fn direction_flips_only_at_endpoints() {
        let mut r = route(5);
        let mut last = r.index();
        for _ in 0..40 {
            let was_forward = r.is_moving_forward();
            r.advance();
            if r.is_moving_forward() != was_forward {
                assert!(last == 4 || last == 0, "flipped after index {last}");
            }
            last = r.index();
        }
    }

    #[test]
    fn degenerate_routes_do_not_panic() {
        let mut empty = route(0);
        empty.advance();
        assert!(empty.current().is_none());

        let mut single = route(1);
        for _ in 0..5 {
            single.advance();
            assert_eq!(single.index(), 0);
        }
    }
}
