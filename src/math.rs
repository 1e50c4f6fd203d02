/// Rotation for a drag of `distance` across a container of `height`.
///
/// Not clamped: drags longer than the container overshoot `total_deg`.
pub fn rotation_degrees(distance: f64, height: f64, total_deg: f64) -> f64 {
    (distance.abs() / height) * total_deg
}

/// Opacity of the current panel's shadow while the card is at or below the threshold.
pub fn rising_shadow(degrees: f64, threshold: f64) -> f64 {
    (degrees / threshold).clamp(0.0, 1.0)
}

/// Opacity of the candidate panel's shadow once the card is past the threshold.
pub fn falling_shadow(degrees: f64, threshold: f64) -> f64 {
    (2.0 - degrees / threshold).clamp(0.0, 1.0)
}

/// Rotation matrix around the X axis
pub fn rotation_x(degrees: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]]
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// A point of the flipping card after rotation and perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Offset from the hinge line along the card's original extent.
    /// Negative once the card has swung past the hinge.
    pub offset: f64,
    /// Perspective scale; above 1 when the point is nearer than the hinge.
    pub scale: f64,
}

/// Projects the point `distance` away from the hinge of a card rotated by `degrees`.
///
/// `viewer` is the distance from the viewer to the hinge line.
pub fn project_card_point(distance: f64, degrees: f64, viewer: f64) -> Projected {
    let [_, y, z] = multiply_matrix_vector(&rotation_x(degrees.abs()), &[0.0, distance, 0.0]);
    let depth = (viewer - z).max(f64::EPSILON);
    let scale = viewer / depth;
    Projected {
        offset: y * scale,
        scale,
    }
}
