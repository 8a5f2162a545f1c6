#[test]
fn vendored_font_fixture_exists() {
    assert!(std::path::Path::new("tests/data/fonts/DejaVuSans.ttf").is_file());
    assert!(std::path::Path::new("tests/data/fonts/LICENSE.txt").is_file());
}

#[test]
fn config_relative_font_path_renders_a_caption() {
    let dir = std::path::PathBuf::from("target").join("font_fixture");
    std::fs::create_dir_all(&dir).unwrap();
    let font = std::fs::canonicalize("tests/data/fonts/DejaVuSans.ttf").unwrap();
    std::fs::copy(&font, dir.join("caption.ttf")).unwrap();

    let cfg_path = dir.join("anim.json");
    std::fs::write(
        &cfg_path,
        r##"{ "width": 80, "height": 40, "colors": ["#ff0000", "#0000ff"],
             "text": "Hi", "font": "caption.ttf", "font_size": 24 }"##,
    )
    .unwrap();

    let cfg = pixfade::AnimationConfig::load(&cfg_path).unwrap();
    let state = pixfade::AnimationState::from_config(&cfg).unwrap();
    assert!(state.has_caption());
    let mask = state.caption_mask().unwrap();
    assert!(!mask.is_empty());
}
