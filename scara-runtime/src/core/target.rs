use crate::math::Point;

/// Requested end effector position in the world frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Target {
    /// The point in the plane.
    pub point: Point,
}

impl Target {
    /// Construct a new target.
    pub fn new(point: Point) -> Self {
        Self { point }
    }

    /// Construct a new target from coordinates.
    pub fn from_point(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
        }
    }

    /// Express the target relative to `origin`.
    pub fn relative_to(&self, origin: &Point) -> Point {
        Point::from(self.point - origin)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Target ({:.2}, {:.2})", self.point.x, self.point.y)
    }
}

impl std::str::FromStr for Target {
    type Err = String;

    /// Parse a target from `X,Y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;

        let x = x
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid X coordinate: {}", e))?;
        let y = y
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid Y coordinate: {}", e))?;

        Ok(Self::from_point(x, y))
    }
}
