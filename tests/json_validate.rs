use molmovie::MovieConfig;

#[test]
fn json_fixture_validates() {
    let s = include_str!("data/seven_scenes.json");
    let config: MovieConfig = serde_json::from_str(s).unwrap();
    config.validate().unwrap();
    assert_eq!(config.setup.len(), 2);
    assert_eq!(config.scenes.len(), 7);
    assert!(config.scenes[6].camera.is_none());
    assert_eq!(config.produce["frame_count"], 350);
}

#[test]
fn config_survives_a_json_roundtrip() {
    let s = include_str!("data/seven_scenes.json");
    let config: MovieConfig = serde_json::from_str(s).unwrap();
    let again: MovieConfig = serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(again.scenes[3].key, "4");
    assert_eq!(again.scenes[3].objects[0].actions, config.scenes[3].objects[0].actions);
}
