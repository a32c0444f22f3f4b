//! CLI output formatting for the `classify` command.
//!
//! # Output Format
//!
//! ```text
//! beach.jpg
//!     Type: Photographic-looking Image
//!     Confidence: Medium
//!     Subtype: Likely Real Photo
//!     Reasons
//!         Complex real-world texture
//!         Photographic noise pattern
//!         Subtype: Likely Real Photo
//!     Features
//!         noise variance         2514.37
//!         entropy                  7.412
//!         edge density             0.087
//!         straight edge ratio      0.214
//!         unique color ratio       0.638
//!         color saturation         81.20
//! ```
//!
//! `format_report` returns lines for testability and `print_report` writes
//! them to stdout. Format functions are pure.

use crate::features::FeatureVector;
use crate::report::ClassificationResult;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn feature_line(name: &str, value: String) -> String {
    format!("{}{:<20}{:>10}", indent(2), name, value)
}

/// Format a classification report.
///
/// `features` is optional so a verdict can be shown on its own.
pub fn format_report(
    filename: &str,
    result: &ClassificationResult,
    features: Option<&FeatureVector>,
) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(if filename.is_empty() {
        "(unnamed)".to_string()
    } else {
        filename.to_string()
    });
    lines.push(format!("{}Type: {}", indent(1), result.image_type));
    lines.push(format!("{}Confidence: {:?}", indent(1), result.confidence));
    if let Some(subtype) = &result.subtype {
        lines.push(format!("{}Subtype: {}", indent(1), subtype));
    }

    lines.push(format!("{}Reasons", indent(1)));
    for reason in &result.reason {
        lines.push(format!("{}{}", indent(2), reason));
    }

    if let Some(f) = features {
        lines.push(format!("{}Features", indent(1)));
        lines.push(feature_line("noise variance", format!("{:.2}", f.noise_variance)));
        lines.push(feature_line("entropy", format!("{:.3}", f.entropy)));
        lines.push(feature_line("edge density", format!("{:.3}", f.edge_density)));
        lines.push(feature_line(
            "straight edge ratio",
            format!("{:.3}", f.straight_edge_ratio),
        ));
        lines.push(feature_line(
            "unique color ratio",
            format!("{:.3}", f.unique_color_ratio),
        ));
        lines.push(feature_line(
            "color saturation",
            format!("{:.2}", f.color_saturation),
        ));
    }

    lines
}

/// Print a classification report to stdout.
pub fn print_report(
    filename: &str,
    result: &ClassificationResult,
    features: Option<&FeatureVector>,
) {
    for line in format_report(filename, result, features) {
        println!("{}", line);
    }
}
