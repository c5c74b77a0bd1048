use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WatermarkError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WatermarkError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn precondition_errors_name_the_parameter() {
    assert!(WatermarkError::MissingMark.to_string().contains("mark"));
    assert!(WatermarkError::Opacity(1.5).to_string().contains("opacity"));
    assert!(WatermarkError::Opacity(1.5).to_string().contains("1.5"));
    assert!(WatermarkError::ScaleRatio(0.0).to_string().contains("scale_ratio"));
}

#[test]
fn only_preconditions_are_out_of_range() {
    assert!(WatermarkError::MissingMark.is_out_of_range());
    assert!(WatermarkError::Opacity(-0.1).is_out_of_range());
    assert!(WatermarkError::ScaleRatio(-1.0).is_out_of_range());
    assert!(!WatermarkError::validation("x").is_out_of_range());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WatermarkError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
