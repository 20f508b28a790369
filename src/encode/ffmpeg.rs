use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SceneError, SceneResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Opaque backdrop the frames are composited over (RGB used, alpha ignored).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Overwriting MP4 output to `out_path` over black.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Sink that pipes opaque RGBA frames into a system `ffmpeg` producing H.264 MP4.
///
/// `begin` checks the output, spawns the encoder and starts draining its stderr on a thread so a
/// chatty encoder never blocks on a full pipe. `end` closes stdin and reports a failed exit along
/// with whatever the encoder printed.
#[derive(Debug)]
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`; nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
            opaque: Vec::new(),
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> SceneResult<()> {
        validate_mp4_config(&cfg)?;
        prepare_output(&self.opts)?;
        if !is_ffmpeg_on_path() {
            return Err(SceneError::encode(
                "mp4 output needs `ffmpeg` on PATH and none was found",
            ));
        }

        let encoder = Encoder::spawn(encoder_command(&self.opts, &cfg))?;
        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps.as_f64(),
            "ffmpeg started"
        );

        self.opaque = vec![0; cfg.width as usize * cfg.height as usize * 4];
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SceneResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg.as_ref(), self.encoder.as_mut()) else {
            return Err(SceneError::encode("ffmpeg sink is not running"));
        };
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(SceneError::encode(format!(
                "frame {} pushed after frame {}",
                idx.0,
                self.last_idx.map_or(0, |l| l.0)
            )));
        }
        check_frame_size(cfg, frame)?;

        flatten_over_bg(&mut self.opaque, &frame.data, self.opts.bg_rgba)?;
        encoder.write(&self.opaque)?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> SceneResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| SceneError::encode("ffmpeg sink is not running"))?;
        self.cfg = None;
        encoder.finish()?;
        tracing::debug!(out = %self.opts.out_path.display(), "ffmpeg finished");
        Ok(())
    }
}

/// A spawned encoder process with its stdin open and stderr being collected.
#[derive(Debug)]
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
}

impl Encoder {
    fn spawn(mut cmd: Command) -> SceneResult<Self> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SceneError::encode(format!("spawn ffmpeg: {e}")))?;

        let (Some(stdin), Some(mut err_pipe)) = (child.stdin.take(), child.stderr.take()) else {
            // Both pipes were requested above; a missing one leaves nothing to talk to.
            let _ = child.kill();
            return Err(SceneError::encode("ffmpeg pipes unavailable"));
        };
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            err_pipe.read_to_end(&mut buf).map(|_| buf)
        });
        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> SceneResult<()> {
        self.stdin
            .write_all(bytes)
            .map_err(|e| SceneError::encode(format!("write frame to ffmpeg: {e}")))
    }

    fn finish(self) -> SceneResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
        } = self;
        drop(stdin);

        let status = child
            .wait()
            .map_err(|e| SceneError::encode(format!("wait for ffmpeg: {e}")))?;
        let log = match stderr.join() {
            Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).trim().to_owned(),
            Ok(Err(e)) => format!("<stderr unreadable: {e}>"),
            Err(_) => "<stderr reader panicked>".to_owned(),
        };
        if status.success() {
            if !log.is_empty() {
                tracing::warn!(%log, "ffmpeg reported errors but exited cleanly");
            }
            Ok(())
        } else {
            Err(SceneError::encode(format!("ffmpeg exited with {status}: {log}")))
        }
    }
}

/// Full `ffmpeg` invocation for `cfg`-sized rawvideo on stdin.
///
/// Input is straight RGBA at `num/den` frames per second; output is audio-less libx264 in
/// yuv420p with the index moved to the front of the file.
fn encoder_command(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg(if opts.overwrite { "-y" } else { "-n" })
        .args(["-loglevel", "error"])
        .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
        .arg("-s")
        .arg(format!("{}x{}", cfg.width, cfg.height))
        .arg("-r")
        .arg(format!("{}/{}", cfg.fps.num, cfg.fps.den))
        .args(["-i", "pipe:0", "-an"])
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
        .args(["-movflags", "+faststart"])
        .arg(&opts.out_path);
    cmd
}

/// Check a sink configuration against what libx264 with yuv420p accepts.
pub(crate) fn validate_mp4_config(cfg: &SinkConfig) -> SceneResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(SceneError::validation("fps must be non-zero"));
    }
    match (cfg.width, cfg.height) {
        (0, _) | (_, 0) => Err(SceneError::validation(format!(
            "mp4 frame size {}x{} is empty",
            cfg.width, cfg.height
        ))),
        (w, h) if w % 2 != 0 || h % 2 != 0 => Err(SceneError::validation(format!(
            "mp4 frame size {w}x{h} must be even in both dimensions for yuv420p"
        ))),
        _ => Ok(()),
    }
}

fn prepare_output(opts: &FfmpegSinkOpts) -> SceneResult<()> {
    ensure_parent_dir(&opts.out_path)?;
    if !opts.overwrite && opts.out_path.exists() {
        return Err(SceneError::validation(format!(
            "output file '{}' already exists",
            opts.out_path.display()
        )));
    }
    Ok(())
}

/// Composite premultiplied `src` over the opaque `bg` colour into `dst`.
fn flatten_over_bg(dst: &mut [u8], src: &[u8], bg: [u8; 4]) -> SceneResult<()> {
    if dst.len() != src.len() || src.len() % 4 != 0 {
        return Err(SceneError::validation(format!(
            "cannot flatten {} rgba bytes into {}",
            src.len(),
            dst.len()
        )));
    }
    for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let uncovered = 255 - u16::from(px[3]);
        for ((o, &s), &b) in out.iter_mut().zip(&px[..3]).zip(&bg[..3]) {
            *o = (u16::from(s) + mul_div255_u16(u16::from(b), uncovered)).min(255) as u8;
        }
        out[3] = 255;
    }
    Ok(())
}

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent_dir(path: &Path) -> SceneResult<()> {
    use anyhow::Context as _;

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Whether `ffmpeg -version` runs successfully from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
