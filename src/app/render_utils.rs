use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

pub(crate) const VIEWBOX: Vec2 = vec2(960.0, 600.0);

const LINK_WIDTH_SCALE: f32 = 22.0;
const NODE_RADIUS_SCALE: f32 = 3.0;
const GRID_STEP: f32 = 60.0;

pub(super) fn fit_scale(rect: Rect) -> f32 {
    (rect.width() / VIEWBOX.x).min(rect.height() / VIEWBOX.y).max(0.0)
}

pub(super) fn world_to_screen(rect: Rect, world: Vec2) -> Pos2 {
    rect.min + world * fit_scale(rect)
}

pub(super) fn screen_to_world(rect: Rect, screen: Pos2) -> Vec2 {
    let scale = fit_scale(rect);
    if scale <= f32::EPSILON {
        return Vec2::ZERO;
    }
    (screen - rect.min) / scale
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));
    let extent = world_to_screen(rect, VIEWBOX);
    let step = GRID_STEP * fit_scale(rect);
    if step < 4.0 {
        return;
    }

    let mut x = rect.left();
    while x <= extent.x + 0.5 {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, extent.y)], stroke);
        x += step;
    }

    let mut y = rect.top();
    while y <= extent.y + 0.5 {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(extent.x, y)], stroke);
        y += step;
    }
}

pub(super) fn node_radius(n_appears: f64) -> f32 {
    let radius = NODE_RADIUS_SCALE * (n_appears as f32).ln();
    if radius.is_finite() { radius.max(0.0) } else { 0.0 }
}

pub(super) fn link_stroke_width(proportion_coappearances: Option<f64>) -> f32 {
    match proportion_coappearances {
        Some(proportion) if proportion > 0.0 => LINK_WIDTH_SCALE * (proportion as f32).sqrt(),
        _ => 0.0,
    }
}

pub(super) fn parse_css_color(raw: &str) -> Option<Color32> {
    let value = raw.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(body) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts = body.split(',').map(str::trim).collect::<Vec<_>>();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let r = parse_channel(parts[0])?;
        let g = parse_channel(parts[1])?;
        let b = parse_channel(parts[2])?;
        let a = match parts.get(3) {
            Some(alpha) => {
                let alpha = alpha.parse::<f32>().ok()?;
                (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
            }
            None => 255,
        };
        return Some(Color32::from_rgba_unmultiplied(r, g, b, a));
    }

    named_color(&value)
}

fn parse_channel(raw: &str) -> Option<u8> {
    if let Some(percent) = raw.strip_suffix('%') {
        let percent = percent.trim().parse::<f32>().ok()?;
        return Some((percent.clamp(0.0, 100.0) * 2.55).round() as u8);
    }
    let value = raw.parse::<f32>().ok()?;
    Some(value.clamp(0.0, 255.0).round() as u8)
}

fn parse_hex(hex: &str) -> Option<Color32> {
    let digit = |index: usize| u8::from_str_radix(hex.get(index..index + 1)?, 16).ok();
    let pair = |index: usize| u8::from_str_radix(hex.get(index..index + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color32::from_rgb(
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
        )),
        6 => Some(Color32::from_rgb(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color32> {
    let rgb = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "pink" => (255, 192, 203),
        "steelblue" => (70, 130, 180),
        _ => return None,
    };
    Some(Color32::from_rgb(rgb.0, rgb.1, rgb.2))
}
