use std::path::Path;

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

const KEY: [u8; 3] = [252, 180, 191];

fn keyed_layer(w: u32, h: u32, x0: u32, y0: u32, side: u32, rgb: [u8; 3]) -> image::RgbaImage {
    let mut img = image::RgbaImage::from_pixel(w, h, image::Rgba([KEY[0], KEY[1], KEY[2], 255]));
    for y in y0..y0 + side {
        for x in x0..x0 + side {
            img.put_pixel(x, y, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
        }
    }
    img
}

fn write_fixture(root: &Path, resources: &Path) {
    let raw = root.join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::create_dir_all(resources).unwrap();

    image::RgbaImage::from_pixel(16, 16, image::Rgba([40, 40, 40, 255]))
        .save(resources.join("background.png"))
        .unwrap();
    image::RgbaImage::from_pixel(2, 2, image::Rgba([90, 90, 90, 255]))
        .save(resources.join("splash_blob.png"))
        .unwrap();
    image::RgbaImage::from_pixel(16, 16, image::Rgba([0, 0, 0, 0]))
        .save(resources.join("foreground.png"))
        .unwrap();

    // One valid group with no terminal layer, one gapped group.
    keyed_layer(16, 16, 2, 2, 4, [200, 0, 0])
        .save(raw.join("f1-0-AppleGreenHalf1.png"))
        .unwrap();
    let mut layer1 = keyed_layer(16, 16, 2, 2, 4, [200, 0, 0]);
    for y in 9..13 {
        for x in 9..13 {
            layer1.put_pixel(x, y, image::Rgba([0, 200, 0, 255]));
        }
    }
    layer1.save(raw.join("f1-1-AppleGreenHalf2.png")).unwrap();
    keyed_layer(16, 16, 0, 0, 2, [1, 1, 1])
        .save(raw.join("f2-0-LemonWhole1.png"))
        .unwrap();
    keyed_layer(16, 16, 4, 4, 2, [1, 1, 1])
        .save(raw.join("f2-2-LemonWhole2.png"))
        .unwrap();
}

#[test]
fn full_run_produces_the_yolo_layout() {
    let tmp = temp_dir("run_full");
    let resources = tmp.join("resources");
    write_fixture(&tmp, &resources);

    let config = PipelineConfig {
        dataset_root: tmp.clone(),
        resource_dir: resources,
        chroma_key: KEY,
        max_splashes: 2,
        split: crate::SplitRatios::default(),
        seed: Some(7),
    };
    let summary = run_pipeline(&config, PipelineOpts::default()).unwrap();

    assert_eq!(summary.sort.samples, vec!["img_0".to_string()]);
    assert_eq!(summary.sort.rejected_groups, 1);
    // Two numbered layers plus the synthesized terminal placeholder.
    assert_eq!(summary.segment.segmented_layers, 2);
    assert_eq!(summary.masks.masks_written, 2);
    assert_eq!(summary.composite.images_written, 1);
    assert_eq!(summary.bboxes.boxes_written, 2);
    assert_eq!(
        summary.organize.train + summary.organize.val + summary.organize.test,
        1
    );

    let sample = tmp.join("data").join("img_0");
    assert!(sample.join("x-x-EntireFrame.png").is_file());
    assert!(sample.join("masks").join("f1-0-AppleGreenHalf1.png").is_file());
    assert!(sample.join("img_0.png").is_file());
    assert!(sample.join("img_0.txt").is_file());
    assert!(tmp.join("YOLOformat").join("data.yaml").is_file());

    // The gapped f2 group never reaches a sample folder.
    assert!(tmp.join("raw").join("f2-0-LemonWhole1.png").is_file());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn seeded_runs_are_reproducible() {
    let tmp_a = temp_dir("run_seed_a");
    let tmp_b = temp_dir("run_seed_b");
    for tmp in [&tmp_a, &tmp_b] {
        write_fixture(tmp, &tmp.join("resources"));
        let config = PipelineConfig {
            dataset_root: tmp.clone(),
            resource_dir: tmp.join("resources"),
            chroma_key: KEY,
            max_splashes: 3,
            split: crate::SplitRatios::default(),
            seed: Some(99),
        };
        run_pipeline(&config, PipelineOpts::default()).unwrap();
    }

    let image_a = std::fs::read(tmp_a.join("data").join("img_0").join("img_0.png")).unwrap();
    let image_b = std::fs::read(tmp_b.join("data").join("img_0").join("img_0.png")).unwrap();
    assert_eq!(image_a, image_b);

    std::fs::remove_dir_all(&tmp_a).ok();
    std::fs::remove_dir_all(&tmp_b).ok();
}

#[test]
fn missing_raw_directory_is_fatal() {
    let tmp = temp_dir("run_missing_raw");
    let resources = tmp.join("resources");
    std::fs::create_dir_all(&resources).unwrap();

    let config = PipelineConfig {
        dataset_root: tmp.clone(),
        resource_dir: resources.clone(),
        chroma_key: KEY,
        max_splashes: 1,
        split: crate::SplitRatios::default(),
        seed: Some(1),
    };
    // Placeholder present, raw/ absent.
    image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 0]))
        .save(resources.join("foreground.png"))
        .unwrap();
    let err = run_pipeline(&config, PipelineOpts::default()).unwrap_err();
    assert!(matches!(err, crate::FruitsetError::MissingDirectory(_)));

    std::fs::remove_dir_all(&tmp).ok();
}
