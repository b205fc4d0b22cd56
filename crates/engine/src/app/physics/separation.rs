use crate::app::Vec2;

use super::body::Body;

/// Slack allowed when deciding which face a body entered through.
pub(crate) const OVERLAP_BIAS: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Pushes overlapping bodies apart and flags the touching faces.
/// Returns `true` when the pair collided this step.
pub(crate) fn separate(a: &mut Body, b: &mut Body) -> bool {
    if a.is_immovable() && b.is_immovable() {
        return false;
    }
    let Some(depth) = a.bounds().overlap(&b.bounds()) else {
        return false;
    };

    match entry_axis(a, b, depth) {
        Axis::Y => separate_y(a, b, depth.y),
        Axis::X => separate_x(a, b, depth.x),
    }
    true
}

fn entry_axis(a: &Body, b: &Body, depth: Vec2) -> Axis {
    let a_prev = a.previous_bounds();
    let b_prev = b.previous_bounds();
    let entered_vertically = a_prev.bottom <= b_prev.top + OVERLAP_BIAS
        || a_prev.top >= b_prev.bottom - OVERLAP_BIAS;
    let entered_horizontally = a_prev.right <= b_prev.left + OVERLAP_BIAS
        || a_prev.left >= b_prev.right - OVERLAP_BIAS;

    match (entered_vertically, entered_horizontally) {
        (true, false) => Axis::Y,
        (false, true) => Axis::X,
        _ if depth.y <= depth.x => Axis::Y,
        _ => Axis::X,
    }
}

fn separate_y(a: &mut Body, b: &mut Body, depth: f32) {
    let a_above = a.position().y <= b.position().y;
    let push = if a_above { -depth } else { depth };

    match (a.is_immovable(), b.is_immovable()) {
        (false, true) => {
            a.shift(0.0, push);
            a.velocity.y = reflect_into(a.velocity.y, push, a.bounce().y);
        }
        (true, false) => {
            b.shift(0.0, -push);
            b.velocity.y = reflect_into(b.velocity.y, -push, b.bounce().y);
        }
        _ => {
            a.shift(0.0, push * 0.5);
            b.shift(0.0, -push * 0.5);
            let (va, vb) = exchange(a.velocity.y, b.velocity.y, a.bounce().y, b.bounce().y);
            a.velocity.y = va;
            b.velocity.y = vb;
        }
    }

    if a_above {
        a.touching.down = true;
        b.touching.up = true;
    } else {
        a.touching.up = true;
        b.touching.down = true;
    }
}

fn separate_x(a: &mut Body, b: &mut Body, depth: f32) {
    let a_left_of_b = a.position().x <= b.position().x;
    let push = if a_left_of_b { -depth } else { depth };

    match (a.is_immovable(), b.is_immovable()) {
        (false, true) => {
            a.shift(push, 0.0);
            a.velocity.x = reflect_into(a.velocity.x, push, a.bounce().x);
        }
        (true, false) => {
            b.shift(-push, 0.0);
            b.velocity.x = reflect_into(b.velocity.x, -push, b.bounce().x);
        }
        _ => {
            a.shift(push * 0.5, 0.0);
            b.shift(-push * 0.5, 0.0);
            let (va, vb) = exchange(a.velocity.x, b.velocity.x, a.bounce().x, b.bounce().x);
            a.velocity.x = va;
            b.velocity.x = vb;
        }
    }

    if a_left_of_b {
        a.touching.right = true;
        b.touching.left = true;
    } else {
        a.touching.left = true;
        b.touching.right = true;
    }
}

/// Reflects velocity that still points against the push direction.
fn reflect_into(velocity: f32, push: f32, bounce: f32) -> f32 {
    if velocity * push < 0.0 {
        -velocity * bounce
    } else {
        velocity
    }
}

/// Unit-mass exchange around the mean velocity, scaled by each bounce.
fn exchange(va: f32, vb: f32, bounce_a: f32, bounce_b: f32) -> (f32, f32) {
    let mean = (va + vb) * 0.5;
    (mean + (vb - mean) * bounce_a, mean + (va - mean) * bounce_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::physics::{BodyId, BodyKind};

    fn body(id: u32, kind: BodyKind, x: f32, y: f32, w: f32, h: f32) -> Body {
        Body::new(
            BodyId(id),
            kind,
            Vec2::new(x, y),
            Vec2::new(w, h),
            "test".to_string(),
        )
    }

    #[test]
    fn landing_on_static_pushes_up_and_flags_floor() {
        let mut ground = body(0, BodyKind::Static, 400.0, 580.0, 800.0, 64.0);
        let mut player = body(1, BodyKind::Dynamic, 100.0, 527.0, 27.0, 40.0);
        player.begin_step();
        player.set_position(Vec2::new(100.0, 530.0));
        player.set_velocity_y(120.0);
        player.set_bounce(0.2);

        assert!(separate(&mut player, &mut ground));
        assert!((player.bounds().bottom - 548.0).abs() < 0.0001);
        assert!((player.velocity().y + 24.0).abs() < 0.0001);
        assert!(player.touching().down);
        assert!(ground.touching().up);
        assert_eq!(ground.position(), Vec2::new(400.0, 580.0));
    }

    #[test]
    fn side_entry_resolves_on_x_axis() {
        let mut wall = body(0, BodyKind::Dynamic, 400.0, 500.0, 400.0, 32.0);
        wall.set_immovable(true);
        let mut player = body(1, BodyKind::Dynamic, 185.0, 528.0, 27.0, 40.0);
        player.begin_step();
        player.set_position(Vec2::new(188.0, 528.0));
        player.set_velocity_x(160.0);

        assert!(separate(&mut player, &mut wall));
        assert!((player.bounds().right - 200.0).abs() < 0.0001);
        assert!(player.touching().right);
        assert!(wall.touching().left);
        assert!(!player.touching().down);
        assert_eq!(wall.position(), Vec2::new(400.0, 500.0));
    }

    #[test]
    fn velocity_leaving_the_contact_is_kept() {
        assert_eq!(reflect_into(-50.0, -3.0, 0.2), -50.0);
        assert!((reflect_into(50.0, -3.0, 0.2) + 10.0).abs() < 0.0001);
    }

    #[test]
    fn two_immovable_bodies_never_collide() {
        let mut a = body(0, BodyKind::Static, 0.0, 0.0, 10.0, 10.0);
        let mut b = body(1, BodyKind::Static, 5.0, 0.0, 10.0, 10.0);
        assert!(!separate(&mut a, &mut b));
    }

    #[test]
    fn two_dynamic_bodies_share_the_push() {
        let mut a = body(0, BodyKind::Dynamic, 0.0, 0.0, 10.0, 10.0);
        let mut b = body(1, BodyKind::Dynamic, 8.0, 50.0, 10.0, 10.0);
        a.begin_step();
        b.begin_step();
        b.set_position(Vec2::new(8.0, 0.0));

        assert!(separate(&mut a, &mut b));
        assert!(a.bounds().overlap(&b.bounds()).is_none());
        assert!((a.position().x + 1.0).abs() < 0.0001);
        assert!((b.position().x - 9.0).abs() < 0.0001);
    }
}
