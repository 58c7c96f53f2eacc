use egui::Pos2;

/// Distance from a point to a line segment, in screen pixels.
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Absolute vertical distance between a point and a horizontal line at `line_y`.
pub fn vertical_distance(point: Pos2, line_y: f32) -> f32 {
    (point.y - line_y).abs()
}

/// Round a price to a fixed number of decimals.
pub fn snap_price(price: f64, decimals: u32) -> f64 {
    if !price.is_finite() {
        return price;
    }
    let scale = 10f64.powi(decimals.min(12) as i32);
    (price * scale).round() / scale
}
