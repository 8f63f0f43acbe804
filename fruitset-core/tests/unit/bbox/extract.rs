use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "fruitset_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn square_mask(w: u32, h: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    for y in y0..y0 + side {
        for x in x0..x0 + side {
            mask.put_pixel(x, y, image::Luma([255]));
        }
    }
    mask
}

#[test]
fn known_square_yields_the_expected_label_line() {
    let tmp = temp_dir("bbox_square");
    let masks = tmp.join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    // 10x10 square at (5,5) in a 100x100 mask: extents 5..=14.
    square_mask(100, 100, 5, 5, 10)
        .save(masks.join("a-0-AppleGreenHalf1.png"))
        .unwrap();

    let summary = extract_sample_bboxes(&tmp).unwrap();
    assert_eq!(summary.label_files, 1);
    assert_eq!(summary.boxes_written, 1);
    assert_eq!(summary.unresolved_classes, 0);

    let label = tmp.file_name().unwrap().to_str().unwrap().to_string() + ".txt";
    let text = std::fs::read_to_string(tmp.join(label)).unwrap();
    assert_eq!(text, "0 0.095000 0.095000 0.090000 0.090000\n");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn denormalized_box_matches_the_sprite_rectangle() {
    let tmp = temp_dir("bbox_roundtrip");
    let masks = tmp.join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    square_mask(64, 64, 12, 20, 8)
        .save(masks.join("a-0-LemonWhole1.png"))
        .unwrap();

    extract_sample_bboxes(&tmp).unwrap();
    let label = tmp.file_name().unwrap().to_str().unwrap().to_string() + ".txt";
    let text = std::fs::read_to_string(tmp.join(label)).unwrap();
    let fields: Vec<f64> = text
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse().unwrap())
        .collect();
    let (cx, cy, w, h) = (fields[0] * 64.0, fields[1] * 64.0, fields[2] * 64.0, fields[3] * 64.0);

    // Inclusive-pixel extents put everything within 1px of the drawn rect.
    assert!((cx - 16.0).abs() <= 1.0, "cx {cx}");
    assert!((cy - 24.0).abs() <= 1.0, "cy {cy}");
    assert!((w - 8.0).abs() <= 1.0, "w {w}");
    assert!((h - 8.0).abs() <= 1.0, "h {h}");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn empty_masks_contribute_no_line() {
    let tmp = temp_dir("bbox_empty");
    let masks = tmp.join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    GrayImage::new(16, 16)
        .save(masks.join("a-0-LemonWhole1.png"))
        .unwrap();

    let summary = extract_sample_bboxes(&tmp).unwrap();
    assert_eq!(summary.boxes_written, 0);
    assert_eq!(summary.empty_masks, 1);
    assert_eq!(summary.label_files, 1);

    let label = tmp.file_name().unwrap().to_str().unwrap().to_string() + ".txt";
    assert_eq!(std::fs::read_to_string(tmp.join(label)).unwrap(), "");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn unknown_class_is_written_with_id_minus_one() {
    let tmp = temp_dir("bbox_unknown");
    let masks = tmp.join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    square_mask(16, 16, 2, 2, 4)
        .save(masks.join("a-0-Blueberry1.png"))
        .unwrap();

    let summary = extract_sample_bboxes(&tmp).unwrap();
    assert_eq!(summary.boxes_written, 1);
    assert_eq!(summary.unresolved_classes, 1);

    let label = tmp.file_name().unwrap().to_str().unwrap().to_string() + ".txt";
    let text = std::fs::read_to_string(tmp.join(label)).unwrap();
    assert!(text.starts_with("-1 "), "got {text:?}");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn merged_bomb_mask_resolves_to_the_bomb_class() {
    let tmp = temp_dir("bbox_bomb");
    let masks = tmp.join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    square_mask(16, 16, 1, 1, 4)
        .save(masks.join("x-x-bomb.png"))
        .unwrap();

    extract_sample_bboxes(&tmp).unwrap();
    let label = tmp.file_name().unwrap().to_str().unwrap().to_string() + ".txt";
    let text = std::fs::read_to_string(tmp.join(label)).unwrap();
    assert!(text.starts_with("20 "), "got {text:?}");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn folders_without_masks_are_skipped() {
    let tmp = temp_dir("bbox_no_masks");
    std::fs::create_dir_all(&tmp).unwrap();

    let summary = extract_sample_bboxes(&tmp).unwrap();
    assert_eq!(summary.skipped_samples, 1);
    assert_eq!(summary.label_files, 0);

    std::fs::remove_dir_all(&tmp).ok();
}
