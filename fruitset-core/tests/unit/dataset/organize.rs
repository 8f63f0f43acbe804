use rand::SeedableRng;
use rand::rngs::StdRng;

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

// The organizer only copies; the pair files never get decoded.
fn write_samples(data_dir: &Path, count: usize) {
    for i in 0..count {
        let sample = data_dir.join(format!("img_{i}"));
        std::fs::create_dir_all(&sample).unwrap();
        std::fs::write(sample.join(format!("img_{i}.png")), b"png").unwrap();
        std::fs::write(sample.join(format!("img_{i}.txt")), b"0 0.5 0.5 0.1 0.1\n").unwrap();
    }
}

fn split_images(yolo_dir: &Path, split: &str) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(yolo_dir.join("images").join(split))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn split_counts_follow_the_floored_ratios() {
    let tmp = temp_dir("organize_counts");
    let data = tmp.join("data");
    let yolo = tmp.join("YOLOformat");
    write_samples(&data, 10);

    let mut rng = StdRng::seed_from_u64(3);
    let summary = organize_dataset(&data, &yolo, SplitRatios::default(), &mut rng).unwrap();

    // floor(0.7*10)=7, floor(0.15*10)=1, remainder 2.
    assert_eq!(
        summary,
        OrganizeSummary {
            train: 7,
            val: 1,
            test: 2
        }
    );
    assert_eq!(split_images(&yolo, "train").len(), 7);
    assert_eq!(split_images(&yolo, "val").len(), 1);
    assert_eq!(split_images(&yolo, "test").len(), 2);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn every_pair_lands_in_exactly_one_split() {
    let tmp = temp_dir("organize_exactly_once");
    let data = tmp.join("data");
    let yolo = tmp.join("YOLOformat");
    write_samples(&data, 9);

    let mut rng = StdRng::seed_from_u64(11);
    organize_dataset(&data, &yolo, SplitRatios::default(), &mut rng).unwrap();

    let mut all = Vec::new();
    for split in ["train", "val", "test"] {
        for name in split_images(&yolo, split) {
            // Each image's label travels to the matching labels split.
            let stem = name.strip_suffix(".png").unwrap();
            assert!(
                yolo.join("labels")
                    .join(split)
                    .join(format!("{stem}.txt"))
                    .is_file()
            );
            all.push(name);
        }
    }
    all.sort();
    let expected: Vec<String> = (0..9).map(|i| format!("img_{i}.png")).collect();
    let mut expected = expected;
    expected.sort();
    assert_eq!(all, expected);

    // Source pairs are copied, not moved.
    assert!(data.join("img_0").join("img_0.png").is_file());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn seeded_shuffles_reproduce() {
    let tmp = temp_dir("organize_seeded");
    let data = tmp.join("data");
    write_samples(&data, 8);

    let yolo_a = tmp.join("a");
    let yolo_b = tmp.join("b");
    let mut rng_a = StdRng::seed_from_u64(42);
    let mut rng_b = StdRng::seed_from_u64(42);
    organize_dataset(&data, &yolo_a, SplitRatios::default(), &mut rng_a).unwrap();
    organize_dataset(&data, &yolo_b, SplitRatios::default(), &mut rng_b).unwrap();

    for split in ["train", "val", "test"] {
        assert_eq!(split_images(&yolo_a, split), split_images(&yolo_b, split));
    }

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn images_without_labels_are_not_collected() {
    let tmp = temp_dir("organize_unpaired");
    let data = tmp.join("data");
    let yolo = tmp.join("YOLOformat");
    write_samples(&data, 2);
    // Layer images without a same-stem label never become pairs.
    std::fs::write(data.join("img_0").join("a-0-LemonWhole1.png"), b"png").unwrap();

    let mut rng = StdRng::seed_from_u64(5);
    let summary = organize_dataset(&data, &yolo, SplitRatios::default(), &mut rng).unwrap();
    assert_eq!(summary.train + summary.val + summary.test, 2);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn invalid_ratios_abort_before_touching_disk() {
    let tmp = temp_dir("organize_bad_ratios");
    let data = tmp.join("data");
    let yolo = tmp.join("YOLOformat");
    write_samples(&data, 1);

    let mut rng = StdRng::seed_from_u64(0);
    let ratios = SplitRatios {
        train: 0.9,
        val: 0.2,
    };
    let err = organize_dataset(&data, &yolo, ratios, &mut rng).unwrap_err();
    assert!(matches!(err, crate::FruitsetError::Validation(_)));
    assert!(!yolo.exists());

    std::fs::remove_dir_all(&tmp).ok();
}
