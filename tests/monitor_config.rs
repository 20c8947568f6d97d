use std::sync::Mutex;

use tempfile::NamedTempFile;

use handwatch::MonitorConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "HANDWATCH_CONFIG",
        "HANDWATCH_DEVICE",
        "HANDWATCH_SCREENSHOT_DIR",
        "HANDWATCH_ALERT_INTERVAL_SECS",
        "HANDWATCH_PERSON_MODEL",
        "HANDWATCH_HAND_MODEL",
        "HANDWATCH_FONT",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "camera": {
            "device": "/dev/video2",
            "target_fps": 15,
            "width": 800,
            "height": 600,
            "mirror": false
        },
        "alert": {
            "interval_secs": 3.5
        },
        "models": {
            "person": "models/ssd.onnx",
            "hand": "models/hand.onnx"
        },
        "screenshot_dir": "evidence",
        "font_path": "fonts/label.ttf"
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("HANDWATCH_CONFIG", file.path());
    std::env::set_var("HANDWATCH_DEVICE", "stub://override");
    std::env::set_var("HANDWATCH_ALERT_INTERVAL_SECS", "1.25");

    let cfg = MonitorConfig::load().expect("load config");

    assert_eq!(cfg.camera.device, "stub://override");
    assert_eq!(cfg.camera.target_fps, 15);
    assert_eq!(cfg.camera.width, 800);
    assert_eq!(cfg.camera.height, 600);
    assert!(!cfg.camera.mirror);
    assert_eq!(cfg.alert_interval_secs, 1.25);
    assert_eq!(cfg.screenshot_dir, "evidence");
    assert_eq!(cfg.person_model.unwrap().to_str().unwrap(), "models/ssd.onnx");
    assert_eq!(cfg.hand_model.unwrap().to_str().unwrap(), "models/hand.onnx");
    assert_eq!(cfg.font_path.unwrap().to_str().unwrap(), "fonts/label.ttf");

    clear_env();
}

#[test]
fn defaults_apply_without_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = MonitorConfig::load().expect("load defaults");

    assert_eq!(cfg.camera.device, "/dev/video0");
    assert_eq!(cfg.camera.target_fps, 10);
    assert_eq!(cfg.camera.width, 640);
    assert_eq!(cfg.camera.height, 480);
    assert!(cfg.camera.mirror);
    assert_eq!(cfg.alert_interval_secs, 2.0);
    assert_eq!(cfg.screenshot_dir, "screenshots");
    assert!(cfg.person_model.is_none());
    assert!(cfg.hand_model.is_none());

    clear_env();
}

#[test]
fn rejects_nonsense_alert_interval() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("HANDWATCH_ALERT_INTERVAL_SECS", "0");
    assert!(MonitorConfig::load().is_err());

    std::env::set_var("HANDWATCH_ALERT_INTERVAL_SECS", "not-a-number");
    assert!(MonitorConfig::load().is_err());

    clear_env();
}
