//! Color mapping for depth-profile scatter plots.

use plotters::prelude::{ColorMap, RGBColor, ViridisRGB};

/// Viridis color for a normalized value. Values outside 0.0 to 1.0 are
/// clamped and non-finite values map to the low end.
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    ViridisRGB.get_color_normalized(t, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(254, 232, 37));
    }

    #[test]
    fn test_viridis_brightens_towards_the_top() {
        let low = viridis(0.25);
        let high = viridis(0.75);
        assert!(high.1 > low.1);
    }

    #[test]
    fn test_viridis_clamps_out_of_range() {
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }
}
