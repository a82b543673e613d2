use super::*;

#[test]
fn default_is_bilinear() {
    assert_eq!(
        RenderingHints::default().resolve().interpolation,
        Interpolation::Bilinear
    );
}

#[test]
fn explicit_interpolation_wins() {
    let hints = RenderingHints {
        interpolation: Some(Interpolation::NearestNeighbor),
        antialias: Some(AntialiasHint::On),
        quality: Some(QualityHint::Quality),
    };
    assert_eq!(hints.resolve().interpolation, Interpolation::NearestNeighbor);
}

#[test]
fn antialias_beats_quality() {
    let hints = RenderingHints {
        interpolation: None,
        antialias: Some(AntialiasHint::Off),
        quality: Some(QualityHint::Quality),
    };
    assert_eq!(hints.resolve().interpolation, Interpolation::NearestNeighbor);

    let hints = RenderingHints {
        antialias: Some(AntialiasHint::On),
        ..hints
    };
    assert_eq!(hints.resolve().interpolation, Interpolation::Bilinear);
}

#[test]
fn quality_is_last_resort() {
    let quality = RenderingHints {
        quality: Some(QualityHint::Quality),
        ..RenderingHints::default()
    };
    assert_eq!(quality.resolve().interpolation, Interpolation::Bicubic);
    let speed = RenderingHints {
        quality: Some(QualityHint::Speed),
        ..RenderingHints::default()
    };
    assert_eq!(speed.resolve().interpolation, Interpolation::NearestNeighbor);
}

#[test]
fn window_lengths_match_box_modes() {
    assert_eq!(Interpolation::NearestNeighbor.window_length(), None);
    assert_eq!(Interpolation::Bilinear.window_length(), Some(2));
    assert_eq!(Interpolation::Bicubic.window_length(), Some(4));
    assert_eq!(Interpolation::CubicConvolution.window_length(), None);
}

#[test]
fn hints_deserialize_with_missing_fields() {
    let hints: RenderingHints = serde_json::from_str(r#"{"quality":"speed"}"#).unwrap();
    assert_eq!(hints.quality, Some(QualityHint::Speed));
    assert_eq!(hints.interpolation, None);
    let hints: RenderingHints =
        serde_json::from_str(r#"{"interpolation":"nearest_neighbor"}"#).unwrap();
    assert_eq!(hints.resolve().interpolation, Interpolation::NearestNeighbor);
}
