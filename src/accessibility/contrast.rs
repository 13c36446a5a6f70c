//! WCAG contrast between a node and its parent surface.

use palette::{LinSrgb, Srgb};

use crate::config::ContrastConfig;
use crate::types::{Color, ContrastResult, DesignNode};

/// WCAG relative luminance of an sRGB colour (alpha ignored).
pub fn relative_luminance(color: &Color) -> f64 {
    let linear: LinSrgb<f64> = Srgb::new(color.r, color.g, color.b).into_linear();
    0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
}

pub fn contrast_ratio(a: &Color, b: &Color) -> f64 {
    let (la, lb) = (relative_luminance(a), relative_luminance(b));
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    (light + 0.05) / (dark + 0.05)
}

pub fn check_colors(
    foreground: &Color,
    background: &Color,
    config: &ContrastConfig,
) -> ContrastResult {
    let ratio = contrast_ratio(foreground, background);
    let meets_aa = ratio >= config.aa;
    let warning = (!meets_aa).then(|| {
        format!(
            "contrast {:.2}:1 between {} and {} is below the WCAG AA minimum of {}:1",
            ratio,
            foreground.to_hex(),
            background.to_hex(),
            config.aa
        )
    });
    ContrastResult {
        ratio,
        foreground: foreground.to_hex(),
        background: background.to_hex(),
        meets_aa,
        meets_aaa: ratio >= config.aaa,
        warning,
    }
}

/// Contrast of the node's solid fill against its parent's; `None` unless
/// both resolve to a solid colour.
pub fn check(
    node: &DesignNode,
    parent: Option<&DesignNode>,
    config: &ContrastConfig,
) -> Option<ContrastResult> {
    let foreground = node.solid_fill()?;
    let background = parent?.solid_fill()?;
    Some(check_colors(&foreground, &background, config))
}
