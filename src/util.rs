use eframe::egui::{Vec2, vec2};

pub fn title_case(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    let mut previous_is_letter = false;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            output.push(ch);
            previous_is_letter = false;
        }
    }
    output
}

pub fn fallback_direction(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214 + 0.11) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_character_names() {
        assert_eq!(title_case("charlie brown"), "Charlie Brown");
        assert_eq!(title_case("pig-pen"), "Pig-Pen");
        assert_eq!(title_case("LUCY"), "Lucy");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn fallback_direction_is_unit_length() {
        for (a, b) in [(0, 1), (3, 7), (12, 2)] {
            let direction = fallback_direction(a, b);
            assert!((direction.length() - 1.0).abs() < 1e-4);
        }
    }
}
