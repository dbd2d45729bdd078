/// Solve `a*t^2 + b*t + c = 0` for real roots.
///
/// Returns `None` when the discriminant is negative, otherwise the roots
/// ordered smaller-first. Uses the numerically stable form that branches
/// on the sign of `b`, avoiding the catastrophic cancellation of the
/// naive `(-b ± sqrt(disc)) / 2a`.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    if discriminant == 0.0 {
        let root = -0.5 * b / a;
        return Some((root, root));
    }

    let q = if b > 0.0 {
        -0.5 * (b + discriminant.sqrt())
    } else {
        -0.5 * (b - discriminant.sqrt())
    };
    let r0 = q / a;
    let r1 = c / q;
    Some(if r0 <= r1 { (r0, r1) } else { (r1, r0) })
}
