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

#[test]
fn keyed_pixels_become_transparent() {
    let tmp = temp_dir("chroma_keyed");
    let sample = tmp.join("img_0");
    std::fs::create_dir_all(&sample).unwrap();

    let mut img = image::RgbaImage::from_pixel(3, 1, image::Rgba([252, 180, 191, 255]));
    img.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
    // Off-by-one from the key color: must survive (exact match only).
    img.put_pixel(2, 0, image::Rgba([252, 180, 192, 255]));
    let layer = sample.join("f1-0-LemonWhole.png");
    img.save(&layer).unwrap();

    let summary = segment_samples(&tmp, KEY).unwrap();
    assert_eq!(summary.segmented_layers, 1);

    let img = image::open(&layer).unwrap().into_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 255]);
    assert_eq!(img.get_pixel(2, 0).0, [252, 180, 192, 255]);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn terminal_and_non_capture_files_are_untouched() {
    let tmp = temp_dir("chroma_skip");
    let sample = tmp.join("img_0");
    std::fs::create_dir_all(&sample).unwrap();

    let keyed = image::RgbaImage::from_pixel(2, 2, image::Rgba([252, 180, 191, 255]));
    let terminal = sample.join("f1-x-EntireFrame.png");
    keyed.save(&terminal).unwrap();
    let composite = sample.join("img_0.png");
    keyed.save(&composite).unwrap();

    let summary = segment_samples(&tmp, KEY).unwrap();
    assert_eq!(summary.segmented_layers, 0);
    assert_eq!(summary.skipped_files, 2);

    for path in [&terminal, &composite] {
        let img = image::open(path).unwrap().into_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [252, 180, 191, 255]);
    }

    std::fs::remove_dir_all(&tmp).ok();
}
