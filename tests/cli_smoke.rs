use std::path::PathBuf;

use pixfade::{AnimationConfig, Direction, Rgb8};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_pixfade")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "pixfade.exe"
            } else {
                "pixfade"
            });
            p
        })
}

fn write_config(dir: &std::path::Path) -> PathBuf {
    let mut cfg = AnimationConfig::new(
        24,
        16,
        vec![Rgb8::new(255, 0, 0), Rgb8::new(0, 0, 255)],
    );
    cfg.scale = 4;
    cfg.direction = Direction::Right;
    cfg.frame_delay_ms = 200.0;

    let path = dir.join("anim.json");
    let f = std::fs::File::create(&path).unwrap();
    serde_json::to_writer_pretty(f, &cfg).unwrap();
    path
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke_frame");
    std::fs::create_dir_all(&dir).unwrap();
    let cfg_path = write_config(&dir);
    let out_path = dir.join("out.png");
    let _ = std::fs::remove_file(&out_path);

    let status = std::process::Command::new(exe())
        .args(["frame", "--config"])
        .arg(&cfg_path)
        .args(["--at-ms", "1000", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out_path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (24, 16));
    // Sweeping right: the left edge already shows the current color.
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(23, 0).0, [0, 0, 255, 255]);
}

#[test]
fn cli_render_writes_gif_with_overrides() {
    let dir = PathBuf::from("target").join("cli_smoke_render");
    std::fs::create_dir_all(&dir).unwrap();
    let cfg_path = write_config(&dir);
    let out_path = dir.join("out.gif");
    let _ = std::fs::remove_file(&out_path);

    let output = std::process::Command::new(exe())
        .args(["render", "--config"])
        .arg(&cfg_path)
        .args(["--color", "#00ff00", "--color", "#000000", "--color", "ffffff"])
        .args(["--direction", "up", "--out"])
        .arg(&out_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Combining frames: 100%"), "{stderr}");
    assert!(stderr.contains("MB"), "{stderr}");

    let bytes = std::fs::read(&out_path).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
}

#[test]
fn cli_rejects_bad_color() {
    let status = std::process::Command::new(exe())
        .args(["frame", "--color", "#12345", "--out", "target/never.png"])
        .status()
        .unwrap();
    assert!(!status.success());
}
