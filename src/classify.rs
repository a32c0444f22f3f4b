//! The decision cascade.
//!
//! An ordered table of rules, evaluated top to bottom; the first rule whose
//! predicate holds decides the verdict and nothing after it is evaluated.
//! Order is part of the contract: the predicates overlap, and an image that
//! satisfies several of them gets the label of the earliest one.
//!
//! | # | Predicate | Label | Confidence |
//! |---|---|---|---|
//! | 1 | straight > 0.55, edges > 0.14, noise < 300 | Screenshot / UI / Text Image | High |
//! | 2 | colors < 0.02, entropy < 5.4, noise < 280 | Digital Illustration / Artwork | High |
//! | 3 | saturation > 130, noise < 360 | Poster / Wallpaper / Stylized Art | High |
//! | 4 | entropy > 6.0, noise > 380 | Photographic-looking Image | Medium |
//! | 5 | otherwise | Unknown / Mixed | Low |
//!
//! Rules 1–4 neither partition the feature space nor are disjoint; the
//! fallback absorbs everything they miss.

use crate::features::FeatureVector;
use serde::Serialize;

/// Coarse image category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Screenshot,
    Illustration,
    Poster,
    Photographic,
    Unknown,
}

impl ImageType {
    pub fn label(self) -> &'static str {
        match self {
            ImageType::Screenshot => "Screenshot / UI / Text Image",
            ImageType::Illustration => "Digital Illustration / Artwork",
            ImageType::Poster => "Poster / Wallpaper / Stylized Art",
            ImageType::Photographic => "Photographic-looking Image",
            ImageType::Unknown => "Unknown / Mixed",
        }
    }
}

/// Confidence tier, fixed per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Refinement of the photographic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSubtype {
    Cinematic,
    RealPhoto,
}

impl PhotoSubtype {
    pub fn label(self) -> &'static str {
        match self {
            PhotoSubtype::Cinematic => "Cinematic / Stylized Frame",
            PhotoSubtype::RealPhoto => "Likely Real Photo",
        }
    }

    fn from_features(f: &FeatureVector) -> Self {
        if f.color_saturation > 110.0 {
            PhotoSubtype::Cinematic
        } else {
            PhotoSubtype::RealPhoto
        }
    }
}

/// One row of the cascade.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub image_type: ImageType,
    pub confidence: Confidence,
    pub matches: fn(&FeatureVector) -> bool,
    pub reasons: &'static [&'static str],
    /// Refines the label and adds a `Subtype: ...` reason when present.
    pub subtype: Option<fn(&FeatureVector) -> PhotoSubtype>,
}

fn looks_like_screenshot(f: &FeatureVector) -> bool {
    f.straight_edge_ratio > 0.55 && f.edge_density > 0.14 && f.noise_variance < 300.0
}

fn looks_like_illustration(f: &FeatureVector) -> bool {
    f.unique_color_ratio < 0.02 && f.entropy < 5.4 && f.noise_variance < 280.0
}

fn looks_like_poster(f: &FeatureVector) -> bool {
    f.color_saturation > 130.0 && f.noise_variance < 360.0
}

fn looks_photographic(f: &FeatureVector) -> bool {
    f.entropy > 6.0 && f.noise_variance > 380.0
}

/// Rules 1–4, in evaluation order.
pub static CASCADE: [Rule; 4] = [
    Rule {
        image_type: ImageType::Screenshot,
        confidence: Confidence::High,
        matches: looks_like_screenshot,
        reasons: &[
            "Strong horizontal and vertical edges",
            "Text/UI-like structure",
            "Low natural noise",
        ],
        subtype: None,
    },
    Rule {
        image_type: ImageType::Illustration,
        confidence: Confidence::High,
        matches: looks_like_illustration,
        reasons: &[
            "Flat or stylized color regions",
            "Low texture randomness",
            "Painterly or drawn appearance",
        ],
        subtype: None,
    },
    Rule {
        image_type: ImageType::Poster,
        confidence: Confidence::High,
        matches: looks_like_poster,
        reasons: &[
            "Highly saturated colors",
            "Stylized lighting",
            "Enhanced or artistic appearance",
        ],
        subtype: None,
    },
    Rule {
        image_type: ImageType::Photographic,
        confidence: Confidence::Medium,
        matches: looks_photographic,
        reasons: &["Complex real-world texture", "Photographic noise pattern"],
        subtype: Some(PhotoSubtype::from_features),
    },
];

/// Applied when no rule in [`CASCADE`] matches.
pub static FALLBACK: Rule = Rule {
    image_type: ImageType::Unknown,
    confidence: Confidence::Low,
    matches: |_| true,
    reasons: &["Conflicting visual characteristics"],
    subtype: None,
};

/// Outcome of the cascade for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub image_type: ImageType,
    pub confidence: Confidence,
    pub reasons: Vec<String>,
    pub subtype: Option<PhotoSubtype>,
}

/// The rule that decides `features`.
pub fn matching_rule(features: &FeatureVector) -> &'static Rule {
    CASCADE
        .iter()
        .find(|rule| (rule.matches)(features))
        .unwrap_or(&FALLBACK)
}

/// Run the cascade.
pub fn classify(features: &FeatureVector) -> Verdict {
    let rule = matching_rule(features);
    let subtype = rule.subtype.map(|refine| refine(features));

    let mut reasons: Vec<String> = rule.reasons.iter().map(|r| r.to_string()).collect();
    if let Some(s) = subtype {
        reasons.push(format!("Subtype: {}", s.label()));
    }

    Verdict {
        image_type: rule.image_type,
        confidence: rule.confidence,
        reasons,
        subtype,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A vector that matches no rule.
    fn neutral() -> FeatureVector {
        FeatureVector {
            noise_variance: 330.0,
            entropy: 5.7,
            edge_density: 0.05,
            straight_edge_ratio: 0.2,
            unique_color_ratio: 0.1,
            color_saturation: 60.0,
        }
    }

    #[test]
    fn neutral_vector_falls_through() {
        let v = classify(&neutral());
        assert_eq!(v.image_type, ImageType::Unknown);
        assert_eq!(v.confidence, Confidence::Low);
        assert_eq!(v.reasons, vec!["Conflicting visual characteristics"]);
        assert_eq!(v.subtype, None);
    }

    #[test]
    fn screenshot_rule() {
        let f = FeatureVector {
            straight_edge_ratio: 0.8,
            edge_density: 0.2,
            noise_variance: 150.0,
            ..neutral()
        };
        let v = classify(&f);
        assert_eq!(v.image_type, ImageType::Screenshot);
        assert_eq!(v.confidence, Confidence::High);
        assert_eq!(
            v.reasons,
            vec![
                "Strong horizontal and vertical edges",
                "Text/UI-like structure",
                "Low natural noise",
            ]
        );
    }

    #[test]
    fn first_match_wins_over_illustration() {
        // Satisfies rules 1 and 2 simultaneously.
        let f = FeatureVector {
            straight_edge_ratio: 0.9,
            edge_density: 0.3,
            noise_variance: 100.0,
            unique_color_ratio: 0.001,
            entropy: 2.0,
            color_saturation: 200.0,
        };
        assert!(looks_like_screenshot(&f) && looks_like_illustration(&f));
        assert_eq!(classify(&f).image_type, ImageType::Screenshot);
    }

    #[test]
    fn illustration_beats_poster() {
        let f = FeatureVector {
            unique_color_ratio: 0.01,
            entropy: 3.0,
            noise_variance: 200.0,
            color_saturation: 220.0,
            ..neutral()
        };
        assert!(looks_like_poster(&f));
        let v = classify(&f);
        assert_eq!(v.image_type, ImageType::Illustration);
        assert_eq!(v.reasons[0], "Flat or stylized color regions");
    }

    #[test]
    fn poster_rule() {
        let f = FeatureVector {
            color_saturation: 140.0,
            noise_variance: 350.0,
            ..neutral()
        };
        let v = classify(&f);
        assert_eq!(v.image_type, ImageType::Poster);
        assert_eq!(v.confidence, Confidence::High);
        assert_eq!(v.reasons.len(), 3);
    }

    #[test]
    fn photographic_real_photo_subtype() {
        let f = FeatureVector {
            entropy: 7.2,
            noise_variance: 2500.0,
            color_saturation: 80.0,
            ..neutral()
        };
        let v = classify(&f);
        assert_eq!(v.image_type, ImageType::Photographic);
        assert_eq!(v.confidence, Confidence::Medium);
        assert_eq!(v.subtype, Some(PhotoSubtype::RealPhoto));
        assert_eq!(
            v.reasons,
            vec![
                "Complex real-world texture",
                "Photographic noise pattern",
                "Subtype: Likely Real Photo",
            ]
        );
    }

    #[test]
    fn photographic_cinematic_subtype() {
        let f = FeatureVector {
            entropy: 7.2,
            noise_variance: 2500.0,
            color_saturation: 125.0,
            ..neutral()
        };
        let v = classify(&f);
        assert_eq!(v.subtype, Some(PhotoSubtype::Cinematic));
        assert_eq!(v.reasons[2], "Subtype: Cinematic / Stylized Frame");
    }

    #[test]
    fn saturated_but_noisy_is_not_a_poster() {
        // Saturation alone is not enough once noise reaches 360.
        let f = FeatureVector {
            color_saturation: 200.0,
            noise_variance: 360.0,
            ..neutral()
        };
        assert_eq!(classify(&f).image_type, ImageType::Unknown);
    }

    #[test]
    fn thresholds_are_strict() {
        let at_edge = FeatureVector {
            straight_edge_ratio: 0.55,
            edge_density: 0.2,
            noise_variance: 100.0,
            ..neutral()
        };
        assert!(!looks_like_screenshot(&at_edge));

        let at_edge = FeatureVector {
            entropy: 6.0,
            noise_variance: 1000.0,
            ..neutral()
        };
        assert!(!looks_photographic(&at_edge));

        let cinematic_edge = FeatureVector {
            entropy: 6.5,
            noise_variance: 1000.0,
            color_saturation: 110.0,
            ..neutral()
        };
        assert_eq!(classify(&cinematic_edge).subtype, Some(PhotoSubtype::RealPhoto));
    }

    #[test]
    fn every_verdict_has_reasons() {
        let grid = [0.0, 0.01, 0.3, 0.6, 1.0];
        for &ratio in &grid {
            for &noise in &[0.0, 250.0, 350.0, 500.0] {
                for &entropy in &[1.0, 5.0, 6.5] {
                    let f = FeatureVector {
                        noise_variance: noise,
                        entropy,
                        edge_density: ratio,
                        straight_edge_ratio: ratio,
                        unique_color_ratio: ratio,
                        color_saturation: ratio * 255.0,
                    };
                    let v = classify(&f);
                    assert!(!v.reasons.is_empty(), "{f:?}");
                }
            }
        }
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(ImageType::Screenshot.label(), "Screenshot / UI / Text Image");
        assert_eq!(ImageType::Illustration.label(), "Digital Illustration / Artwork");
        assert_eq!(ImageType::Poster.label(), "Poster / Wallpaper / Stylized Art");
        assert_eq!(ImageType::Photographic.label(), "Photographic-looking Image");
        assert_eq!(ImageType::Unknown.label(), "Unknown / Mixed");
    }
}
