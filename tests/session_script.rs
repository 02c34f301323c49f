use std::fs;

use paint_plugin_host::plugins::BasicModule;
use paint_plugin_host::{Color, Host, HostConfig, HostError, Image, PixelBuffer, ScriptError, SessionScript};

const SCRIPT: &str = r##"{
    "steps": [
        {"op": "foreground", "color": "#FF0000"},
        {"op": "slide", "index": 0, "value": 3},
        {"op": "event", "event": {"type": "MousePressed", "data": {"x": 2, "y": 2, "button": "Left"}}},
        {"op": "event", "event": {"type": "MouseReleased", "data": {"x": 2, "y": 2, "button": "Left"}}},
        {"op": "click", "text": "Invert"},
        {"op": "event", "event": {"type": "MousePressed", "data": {"x": 7, "y": 7, "button": "Right"}}},
        {"op": "event", "event": {"type": "MouseReleased", "data": {"x": 7, "y": 7, "button": "Right"}}}
    ]
}"##;

#[test]
fn test_script_drives_builtin_plugins() {
    let mut host = Host::new(HostConfig::default());
    host.load_module(&BasicModule).unwrap();
    let mut image = PixelBuffer::new(8, 8, Color::WHITE).unwrap();

    SessionScript::from_json_str(SCRIPT)
        .unwrap()
        .run(&mut host, &mut image)
        .unwrap();

    // Pencil drew a red 3x3 square, the eyedropper sampled colors back into the
    // context, and the armed filter inverted the whole image on the last press.
    assert_eq!(host.context().bg_color(), Color::WHITE);
    assert_eq!(image.get_pixel(2, 2).unwrap(), Color::RED.inverted());
    assert_eq!(image.get_pixel(0, 0).unwrap(), Color::WHITE.inverted());
    assert_eq!(host.context().fg_color(), Color::RED);
}

#[test]
fn test_script_and_config_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("session.json");
    let config_path = dir.path().join("host.json");
    fs::write(&script_path, SCRIPT).unwrap();
    fs::write(&config_path, r##"{"foreground": "#00FF00FF"}"##).unwrap();

    let config = HostConfig::load(&config_path).unwrap();
    assert_eq!(config.foreground, Color::GREEN);
    let script = SessionScript::load(&script_path).unwrap();
    assert_eq!(script.steps.len(), 7);
}

#[test]
fn test_script_stops_on_host_errors() {
    let mut host = Host::default();
    host.load_module(&BasicModule).unwrap();
    let mut image = PixelBuffer::new(4, 4, Color::WHITE).unwrap();

    let script = SessionScript::from_json_str(r#"{"steps": [{"op": "slide", "index": 0, "value": 99}]}"#).unwrap();
    match script.run(&mut host, &mut image) {
        Err(ScriptError::Host {
            step: 0,
            source: HostError::SliderOutOfRange { value: 99, .. },
        }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_missing_script_file() {
    assert!(matches!(
        SessionScript::load("/definitely/not/here.json"),
        Err(ScriptError::Read(_))
    ));
}
