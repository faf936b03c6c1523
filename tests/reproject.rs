mod common;

use common::init_logging;
use common::synthetic_scene::{camera_at, Scene, HEIGHT, PLANE_DEPTH, WIDTH};
use depth_fusion::fusion::reproject_view;
use depth_fusion::image::ImageF32;

#[test]
fn translated_view_shifts_by_one_pixel() {
    init_logging();
    let mut scene = Scene::plane(&[0.9, 0.5]);
    for x in 0..WIDTH {
        for y in 0..HEIGHT {
            scene.confidence[1].set(x, y, 0.2 + 0.01 * x as f32);
        }
    }
    let buffer = reproject_view(
        1,
        &scene.depth[1],
        &scene.confidence[1],
        &scene.cameras[1],
        &scene.cameras[0],
        None,
    );

    assert_eq!(buffer.samples, (WIDTH - 1) * HEIGHT);
    let row = 7;
    assert_eq!(buffer.at(row * WIDTH), (0.0, 0.0));
    for x in 0..WIDTH - 1 {
        let (d, c) = buffer.at(row * WIDTH + x + 1);
        assert_eq!(d, PLANE_DEPTH);
        assert_eq!(c, scene.confidence[1].get(x, row));
    }
}

#[test]
fn nearer_surface_wins_a_shared_pixel() {
    init_logging();
    let reference = camera_at(0.0);
    let source = camera_at(2.0);
    let mut depth = ImageF32::new(WIDTH, HEIGHT);
    let mut conf = ImageF32::new(WIDTH, HEIGHT);
    // At depth 512 the source shifts by one pixel, at 256 by two: both land
    // on reference column 6.
    depth.set(5, 3, 512.0);
    conf.set(5, 3, 0.9);
    depth.set(4, 3, 256.0);
    conf.set(4, 3, 0.4);

    let buffer = reproject_view(1, &depth, &conf, &source, &reference, Some(0.1));
    assert_eq!(buffer.samples, 1);
    assert_eq!(buffer.at(3 * WIDTH + 6), (256.0, 0.4));
}

#[test]
fn points_outside_the_reference_frustum_are_dropped() {
    init_logging();
    let reference = camera_at(0.0);
    // 64 pixels of parallax at depth 512 pushes every sample off the grid.
    let far = camera_at(128.0);
    let depth = ImageF32::filled(WIDTH, HEIGHT, PLANE_DEPTH);
    let conf = ImageF32::filled(WIDTH, HEIGHT, 0.9);
    let buffer = reproject_view(2, &depth, &conf, &far, &reference, None);
    assert_eq!(buffer.samples, 0);
    assert!(buffer.depth.data.iter().all(|&d| d == 0.0));
}
