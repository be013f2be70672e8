use fluidfield::{AnalysisRecorder, FieldMetrics, FieldSnapshot, FluidField, ImageExporter, export_snapshot_json};
use glam::Vec2;
use std::fs;

fn stirred_field() -> FluidField {
    let mut field = FluidField::new(24, 24).unwrap();
    field.update(
        |f| {
            for x in 8..16 {
                f.set_density(x, 12, 80.0);
                f.set_velocity(x, 12, Vec2::new(40.0, 10.0));
            }
        },
        |_| {},
    );
    field
}

#[test]
fn test_metrics_on_still_field() {
    let mut field = FluidField::new(10, 10).unwrap();
    field.update(
        |f| {
            f.set_density(2, 2, 80.0);
            f.set_density(7, 3, 40.0);
        },
        |_| {},
    );

    let snapshot = field.snapshot().unwrap();
    let metrics = FieldMetrics::analyze(&snapshot, 1);

    assert_eq!(metrics.frame, 1);
    assert!((metrics.total_density - 6.0).abs() < 1e-5);
    assert!((metrics.max_density - 4.0).abs() < 1e-5);
    assert!((metrics.avg_density - 0.06).abs() < 1e-6);
    assert_eq!(metrics.max_velocity, 0.0);
    assert_eq!(metrics.total_kinetic_energy, 0.0);
    assert_eq!(metrics.velocity_divergence, 0.0);
}

#[test]
fn test_metrics_track_flow() {
    let field = stirred_field();
    let metrics = FieldMetrics::analyze(&field.snapshot().unwrap(), 0);

    assert!(metrics.total_density > 0.0);
    assert!(metrics.max_velocity > 0.0);
    assert!(metrics.total_kinetic_energy > 0.0);
}

#[test]
fn test_recorder_history_and_jsonl() {
    let mut field = stirred_field();
    let mut recorder = AnalysisRecorder::new();

    for frame in 0..5 {
        field.update(|_| {}, |_| {});
        recorder.record_frame(&field.snapshot().unwrap(), frame);
    }
    recorder.log_trends();

    assert_eq!(recorder.metrics_history.len(), 5);
    let first = &recorder.metrics_history[0];
    let last = &recorder.metrics_history[4];
    assert!(last.total_density < first.total_density);

    let mut out = Vec::new();
    recorder.write_jsonl(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);

    let parsed: FieldMetrics = serde_json::from_str(lines[4]).unwrap();
    assert_eq!(parsed.frame, 4);
    assert_eq!(parsed.total_density, last.total_density);
}

#[test]
fn test_png_and_json_export() {
    let field = stirred_field();
    let snapshot = field.snapshot().unwrap();

    let dir = std::env::temp_dir().join(format!("fluidfield_export_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let exporter = ImageExporter::new(96, 96);
    let density_path = dir.join("density.png");
    let velocity_path = dir.join("velocity.png");
    exporter.export_density_png(&snapshot, &density_path).unwrap();
    exporter.export_velocity_png(&snapshot, &velocity_path).unwrap();

    let density = image::open(&density_path).unwrap();
    assert_eq!((density.width(), density.height()), (96, 96));
    assert!(density.to_luma8().pixels().any(|p| p.0[0] > 0));
    assert!(velocity_path.exists());

    let json_path = dir.join("snapshot.json");
    export_snapshot_json(&snapshot, &json_path).unwrap();
    let restored: FieldSnapshot =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(restored.width, 24);
    assert_eq!(restored.density.len(), 24 * 24);

    fs::remove_dir_all(&dir).unwrap();
}
