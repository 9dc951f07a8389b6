use glam::Vec3;

/// Pull `eye` back inside the skybox and above the floor.
///
/// A camera farther than `ceiling` from the origin is moved back along its
/// current direction onto the boundary; a camera below `min_height` is
/// lifted to it. Returns whether the position changed.
pub fn enforce_bounds(eye: &mut Vec3, ceiling: f32, min_height: f32) -> bool {
    let mut changed = false;
    let distance = eye.length();
    if distance > ceiling {
        *eye *= ceiling / distance;
        changed = true;
    }
    if eye.y < min_height {
        eye.y = min_height;
        changed = true;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_camera_is_pulled_back_along_direction() {
        let mut eye = Vec3::new(3000.0, 4000.0, 0.0);
        assert!(enforce_bounds(&mut eye, 2850.0, 0.5));
        assert!((eye.length() - 2850.0).abs() < 1e-2);
        assert!((eye.normalize() - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-5);
    }

    #[test]
    fn low_camera_is_lifted() {
        let mut eye = Vec3::new(10.0, -3.0, 10.0);
        assert!(enforce_bounds(&mut eye, 2850.0, 0.5));
        assert_eq!(eye, Vec3::new(10.0, 0.5, 10.0));
    }

    #[test]
    fn inside_bounds_is_untouched() {
        let mut eye = Vec3::new(5.0, 5.0, 5.0);
        assert!(!enforce_bounds(&mut eye, 2850.0, 0.5));
        assert_eq!(eye, Vec3::new(5.0, 5.0, 5.0));
    }
}
