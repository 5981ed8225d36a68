use std::path::PathBuf;

use clap::Parser;
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio,
};

use trackvisu::error::Error;
use trackvisu::{IconConfig, TrackingResult, VideoVisu};

#[derive(Parser, Debug)]
#[command(name = "overlay", about = "Burns trash tracking results into a video")]
struct Args {
    /// Source video
    #[arg(long, value_name = "PATH")]
    video: PathBuf,
    /// Tracking result as produced by the tracker (JSON)
    #[arg(long, value_name = "PATH")]
    tracking: PathBuf,
    /// Annotated output video
    #[arg(long, value_name = "PATH")]
    output: PathBuf,
    /// Icon cache directory (defaults to ~/.mot/resources)
    #[arg(long, value_name = "DIR")]
    icons_dir: Option<PathBuf>,
    /// Where missing icons are downloaded from
    #[arg(long, value_name = "URL")]
    icons_url: Option<String>,
    #[arg(long, default_value = "mp4v")]
    fourcc: String,
    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

fn fourcc(code: &str) -> Result<i32, Error> {
    let c = code.as_bytes();
    if c.len() != 4 {
        return Err(Error::InvalidInput(format!(
            "fourcc must have 4 characters, got `{}`",
            code
        )));
    }

    Ok(videoio::VideoWriter::fourcc(
        c[0] as _, c[1] as _, c[2] as _, c[3] as _,
    )?)
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut icon_config = IconConfig::default();
    if let Some(dir) = args.icons_dir {
        icon_config.cache_dir = dir;
    }
    if let Some(url) = args.icons_url {
        icon_config.base_url = url;
    }
    let icons = icon_config.load()?;

    let result = TrackingResult::load(&args.tracking)?;

    let video = args.video.to_string_lossy();
    let mut cam = videoio::VideoCapture::from_file(&video, videoio::CAP_ANY)?;
    if !cam.is_opened()? {
        return Err(Error::InvalidInput(format!("unable to open video {}", video)));
    }

    let fps = cam.get(videoio::CAP_PROP_FPS)?;
    let width = cam.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
    let height = cam.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
    log::info!("{}: {}x{} @ {:.2} fps", video, width, height, fps);

    let visu = VideoVisu::new(&result, &icons, width, height, fps)?;

    let mut writer = videoio::VideoWriter::new(
        &args.output.to_string_lossy(),
        fourcc(&args.fourcc)?,
        fps,
        core::Size::new(width as i32, height as i32),
        true,
    )?;

    let mut frame = Mat::default();
    let mut frame_idx = 0i64;

    loop {
        if args.max_frames.map_or(false, |max| frame_idx as u64 >= max) {
            break;
        }

        if !cam.read(&mut frame)? || frame.cols() == 0 || frame.rows() == 0 {
            break;
        }

        visu.draw_frame(&mut frame, frame_idx)?;
        writer.write(&frame)?;

        frame_idx += 1;
        if frame_idx % 500 == 0 {
            log::debug!("{} frames written", frame_idx);
        }
    }

    writer.release()?;
    log::info!(
        "wrote {} frames to {:?}, final counts {:?}",
        frame_idx,
        args.output,
        visu.index().final_counts()
    );

    Ok(())
}
