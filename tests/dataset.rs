mod common;

use common::init_logging;
use common::synthetic_scene::{Scene, HEIGHT, PLANE_DEPTH, WIDTH};
use depth_fusion::dataset::{read_camera_file, read_csv_map, write_csv_map, Dataset, DatasetLayout};
use depth_fusion::pointcloud::{back_project_result, write_ply};
use depth_fusion::{DatasetError, DepthFuser, FusionParams};
use std::fs;
use std::path::Path;

fn write_scene(root: &Path, scene: &Scene) {
    for dir in ["depth_maps", "conf_maps", "cams"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    for v in 0..scene.depth.len() {
        write_csv_map(&scene.depth[v], &root.join(format!("depth_maps/{v:04}.csv"))).unwrap();
        write_csv_map(&scene.confidence[v], &root.join(format!("conf_maps/{v:04}.csv"))).unwrap();
        fs::write(
            root.join(format!("cams/{v:08}_cam.txt")),
            scene.camera_file(v),
        )
        .unwrap();
    }
    fs::write(
        root.join("pair.txt"),
        "3\n0\n2 1 100.0 2 50.0\n1\n2 0 100.0 2 100.0\n2\n2 1 50.0 0 20.0\n",
    )
    .unwrap();
}

#[test]
fn csv_maps_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/map.csv");
    let scene = Scene::plane(&[0.9]).with_ripples();
    let mut map = scene.depth[0].clone();
    map.set(3, 4, -1.0);
    map.set(5, 6, 0.123_456_79);
    write_csv_map(&map, &path).unwrap();
    let back = read_csv_map(&path).unwrap();
    assert_eq!(back.dims(), (WIDTH, HEIGHT));
    assert_eq!(back.data, map.data);
}

#[test]
fn camera_file_matches_in_memory_camera() {
    let dir = tempfile::tempdir().unwrap();
    let scene = Scene::plane(&[0.9, 0.9]);
    let path = dir.path().join("cam.txt");
    fs::write(&path, scene.camera_file(1)).unwrap();
    let (camera, range) = read_camera_file(&path).unwrap();
    assert_eq!(camera.center(), scene.cameras[1].center());
    assert_eq!(camera.intrinsics(), scene.cameras[1].intrinsics());
    assert_eq!(range.min, 425.0);
}

#[test]
fn loads_fuses_and_writes_a_dataset() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let scene = Scene::plane(&[0.9, 0.8, 0.85]);
    write_scene(dir.path(), &scene);

    let layout = DatasetLayout {
        max_supporting: 1,
        ..DatasetLayout::default()
    };
    let dataset = Dataset::load(dir.path(), &layout).unwrap();
    assert_eq!(dataset.num_views(), 3);
    assert!(dataset.images.is_none());
    assert_eq!(dataset.views.supporting(1), Some(&[1, 0][..]));

    let inputs = dataset.inputs().unwrap();
    let fuser = DepthFuser::new(FusionParams::default()).unwrap();
    let output = fuser.fuse_view(&inputs, &dataset.views, 0).unwrap();
    assert_eq!(output.report.supporting_views(), vec![0, 1]);
    assert_eq!(output.report.holes_remaining, 0);

    let points = back_project_result(&output.result, inputs.camera(0), dataset.image(0));
    assert_eq!(points.len(), WIDTH * HEIGHT);
    assert!(points.iter().all(|p| (p.position[2] - PLANE_DEPTH).abs() < 1e-2));

    let ply = dir.path().join("out/0000_points.ply");
    write_ply(&ply, &points).unwrap();
    let text = fs::read_to_string(&ply).unwrap();
    assert!(text.starts_with("ply\nformat ascii 1.0\n"));
    assert!(text.contains(&format!("element vertex {}\n", WIDTH * HEIGHT)));
    assert_eq!(text.lines().count(), 11 + WIDTH * HEIGHT);
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Dataset::load(dir.path(), &DatasetLayout::default()).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[test]
fn mismatched_view_counts_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let scene = Scene::plane(&[0.9, 0.8, 0.85]);
    write_scene(dir.path(), &scene);
    fs::remove_file(dir.path().join("conf_maps/0002.csv")).unwrap();
    let err = Dataset::load(dir.path(), &DatasetLayout::default()).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::Fusion(depth_fusion::FusionError::ViewCountMismatch { confidence: 2, .. })
    ));
}
