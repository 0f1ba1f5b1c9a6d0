use crate::entities::Bounds;

/// Strict AABB overlap.  Boxes that only share an edge do not collide.
pub fn intersects(a: &Bounds, b: &Bounds) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}
