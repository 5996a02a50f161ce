//! Final video mux: PNG frame sequence + clipped audio -> H.264/AAC MP4.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Tolerance, in milliseconds, allowed between the muxed output's duration
/// and the requested clip duration.
const DURATION_TOLERANCE_MS: i64 = 200;

/// Mux a directory of lexicographically-sorted PNG frames (named so that
/// string order equals frame order, e.g. `frame_000000.png`) with `audio_path`
/// into a single H.264/AAC MP4 at `output`.
pub async fn mux_frames_and_audio(
    frame_pattern: impl AsRef<Path>,
    audio_path: impl AsRef<Path>,
    output: impl AsRef<Path>,
    fps: u32,
    clip_duration_ms: i64,
) -> MediaResult<()> {
    let frame_pattern = frame_pattern.as_ref();
    let audio_path = audio_path.as_ref();
    let output = output.as_ref();

    info!(
        "muxing frames {} + audio {} -> {}",
        frame_pattern.display(),
        audio_path.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(frame_pattern, output)
        .input_arg("-framerate")
        .input_arg(fps.to_string())
        .input_arg("-f")
        .input_arg("image2")
        .output_arg("-i")
        .output_arg(audio_path.to_string_lossy().to_string())
        .video_codec("libx264")
        .output_arg("-pix_fmt")
        .output_arg("yuv420p")
        .audio_codec("aac")
        .output_arg("-shortest")
        .output_arg("-movflags")
        .output_arg("+faststart");

    FfmpegRunner::new().run(&cmd).await?;

    validate_output(output, clip_duration_ms).await
}

async fn validate_output(output: &Path, clip_duration_ms: i64) -> MediaResult<()> {
    let metadata = tokio::fs::metadata(output)
        .await
        .map_err(|e| MediaError::OutputInvalid(format!("output file missing after mux: {e}")))?;
    if metadata.len() == 0 {
        return Err(MediaError::OutputInvalid("output file is empty".to_string()));
    }

    let info = probe_video(output).await.map_err(|e| MediaError::OutputInvalid(e.to_string()))?;

    if info.video_stream_count != 1 {
        return Err(MediaError::OutputInvalid(format!(
            "expected exactly one video stream, found {}",
            info.video_stream_count
        )));
    }
    if info.audio_stream_count != 1 {
        return Err(MediaError::OutputInvalid(format!(
            "expected exactly one audio stream, found {}",
            info.audio_stream_count
        )));
    }

    let actual_ms = (info.duration * 1000.0).round() as i64;
    let delta = (actual_ms - clip_duration_ms).abs();
    if delta > DURATION_TOLERANCE_MS {
        return Err(MediaError::OutputInvalid(format!(
            "muxed duration {actual_ms}ms differs from expected {clip_duration_ms}ms by {delta}ms, exceeding {DURATION_TOLERANCE_MS}ms tolerance"
        )));
    }

    Ok(())
}
