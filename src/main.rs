use depth_fusion::config::{load_config, FusionRunConfig};
use depth_fusion::dataset::{write_csv_map, Dataset};
use depth_fusion::diagnostics::{elapsed_ms, RunSummary};
use depth_fusion::fusion::{DepthFuser, FusionOutput};
use depth_fusion::image::io::{save_confidence_png, save_depth_png, write_json_file};
use depth_fusion::pointcloud::{back_project_result, merge_point_clouds, write_ply, ColoredPoint};
use log::info;
use std::env;
use std::error::Error;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: depth_fusion <config.json>".to_string()
}

fn run() -> Result<(), Box<dyn Error>> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let dataset = Dataset::load(&config.data_root, &config.dataset_layout())?;
    let inputs = dataset.inputs()?;
    let fuser = DepthFuser::new(config.params.clone())?;
    info!(
        "{} views, {}x{}, {} worker threads",
        inputs.num_views(),
        inputs.width(),
        inputs.height(),
        fuser.num_threads()
    );

    let total_start = Instant::now();
    let mut summary = RunSummary::default();
    let mut clouds = Vec::new();
    for reference in config.references(dataset.num_views()) {
        let output = fuser.fuse_view(&inputs, &dataset.views, reference)?;
        let points = back_project_result(
            &output.result,
            inputs.camera(reference),
            dataset.image(reference),
        );
        write_outputs(&config, &output, &points)?;
        summary.points_written += points.len();
        if config.output.merged_ply.is_some() {
            clouds.push(points);
        }
        summary.views.push(output.report);
    }

    if let Some(path) = &config.output.merged_ply {
        let merged = merge_point_clouds(clouds);
        write_ply(path, &merged)?;
        info!("wrote {} points to {}", merged.len(), path.display());
    }
    summary.total_ms = elapsed_ms(total_start);
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &summary)?;
    }
    info!(
        "fused {} views in {:.1} ms",
        summary.views.len(),
        summary.total_ms
    );
    Ok(())
}

fn write_outputs(
    config: &FusionRunConfig,
    output: &FusionOutput,
    points: &[ColoredPoint],
) -> Result<(), Box<dyn Error>> {
    let dir = &config.output.dir;
    let stem = format!("{:04}", output.result.reference);
    write_ply(&dir.join(format!("{stem}_points.ply")), points)?;
    if config.output.export_csv {
        write_csv_map(&output.result.depth, &dir.join(format!("{stem}_depth_fused.csv")))?;
        write_csv_map(
            &output.result.confidence,
            &dir.join(format!("{stem}_conf_fused.csv")),
        )?;
    }
    if config.output.export_png {
        save_depth_png(&output.result.depth, &dir.join(format!("{stem}_depth_fused.png")))?;
        save_confidence_png(
            &output.result.confidence,
            &dir.join(format!("{stem}_conf_fused.png")),
        )?;
    }
    Ok(())
}
