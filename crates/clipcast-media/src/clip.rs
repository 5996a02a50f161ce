//! Byte-accurate audio clipping.

use std::path::Path;
use tracing::info;

use clipcast_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::progress::FfmpegProgress;

/// Cut `[start_ms, end_ms)` out of `input` into `output`, re-encoding to a
/// single-stream audio file at `encoding`'s codec/bitrate.
///
/// Uses `FfmpegCommand::seek_accurate` (output-side `-ss`/`-to`) rather than
/// input-side seeking: input seek before `-i` snaps to the nearest keyframe,
/// which is not acceptable when the source has sparse keyframes and the cut
/// must land on an exact sample boundary.
pub async fn clip_audio<P, F>(
    input: P,
    output: P,
    start_ms: i64,
    end_ms: i64,
    encoding: &EncodingConfig,
    progress_callback: F,
) -> MediaResult<()>
where
    P: AsRef<Path>,
    F: Fn(FfmpegProgress) + Send + 'static,
{
    let input = input.as_ref();
    let output = output.as_ref();
    let start_secs = start_ms as f64 / 1000.0;
    let end_secs = end_ms as f64 / 1000.0;

    info!(
        "clipping audio: {} -> {} [{:.3}s, {:.3}s)",
        input.display(),
        output.display(),
        start_secs,
        end_secs
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek_accurate(start_secs, end_secs)
        .output_arg("-vn")
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate);

    FfmpegRunner::new().run_with_progress(&cmd, progress_callback).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_audio_is_async_and_compiles() {
        // Exercised end-to-end in clipcast-worker's pipeline tests, which have
        // a real ffmpeg binary available; this module only owns the command
        // shape, covered by command::tests::accurate_seek_places_ss_and_to_after_input.
        let _ = clip_audio::<&Path, fn(FfmpegProgress)>;
    }
}
