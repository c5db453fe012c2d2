//! CLI binary for pdf2podcast.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, renders the workflow on the terminal and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2podcast::{
    download_audio, write_summary, ClientConfig, CopyOutcome, PdfFile, ResultView, StatusKind,
    StatusLine, SubmissionController, SubmitOutcome, Surface, SystemClipboard,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Terminal surface using indicatif ─────────────────────────────────────────

/// Renders status lines on stderr and the advisory progress as a bar.
///
/// The bar is created lazily when a submission starts and cleared once the
/// outcome is known, so status lines before and after it print normally.
struct TerminalSurface {
    quiet: bool,
    show_bar: bool,
    bar: Option<ProgressBar>,
}

impl TerminalSurface {
    fn new(quiet: bool, show_bar: bool) -> Self {
        Self {
            quiet,
            show_bar,
            bar: None,
        }
    }

    fn start_bar() -> ProgressBar {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}%  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    fn println(&self, line: String) {
        match self.bar {
            Some(ref bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

impl Surface for TerminalSurface {
    fn show_status(&mut self, status: &StatusLine) {
        // Errors are reported by main, once, with context.
        if self.quiet || status.kind == StatusKind::Error {
            return;
        }
        let line = match status.kind {
            StatusKind::Info => format!("{} {}", cyan("◆"), status.text),
            StatusKind::Success => format!("{} {}", green("✔"), bold(&status.text)),
            StatusKind::Error => format!("{} {}", red("✘"), red(&status.text)),
        };
        self.println(line);
    }

    fn show_progress(&mut self, percent: Option<u8>) {
        match percent {
            Some(p) if self.show_bar => {
                let bar = self.bar.get_or_insert_with(Self::start_bar);
                bar.set_position(u64::from(p));
                if p >= 100 {
                    bar.finish_and_clear();
                    self.bar = None;
                }
            }
            Some(_) => {}
            None => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    fn show_result(&mut self, view: &ResultView) {
        if self.quiet {
            return;
        }
        let audio = view
            .download_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| view.audio_url.clone());
        self.println(format!(
            "   {} words  /  {} characters  →  {}",
            dim(&view.stats.words.to_string()),
            dim(&view.stats.characters.to_string()),
            bold(&audio),
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert against a local service (http://127.0.0.1:5000)
  pdf2podcast paper.pdf

  # Remote service, save the audio and the summary
  pdf2podcast --server https://podcasts.example.com paper.pdf \
      --audio-out paper.mp3 --summary-out paper.txt

  # JSON output (summary, stats, audio reference)
  pdf2podcast --json paper.pdf > result.json

  # Copy the summary to the clipboard
  pdf2podcast --copy paper.pdf

SERVICE CONTRACT:
  POST {server}{endpoint}   multipart/form-data, file in field "pdfFile"
  2xx  {"summary": "...", "audioUrl": "..."}
  else {"error": "..."}     (any other body: "Server error (HTTP n)")

ENVIRONMENT VARIABLES:
  PDF2PODCAST_SERVER       Service base URL
  PDF2PODCAST_ENDPOINT     Conversion endpoint path
  PDF2PODCAST_MAX_SIZE_MB  Upload ceiling in MB (0 disables the check)
  PDF2PODCAST_TIMEOUT      Request timeout in seconds (0 waits indefinitely)
  RUST_LOG                 Override log filter (e.g. pdf2podcast=debug)
"#;

/// Turn a PDF into a podcast: a text summary and an audio file.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2podcast",
    version,
    about = "Turn a PDF into a podcast: a text summary and an audio file",
    long_about = "Upload a PDF to a PDF-to-podcast conversion service and print the summary \
it returns, along with the location of the generated audio. Optionally downloads the audio, \
saves the summary and copies it to the clipboard.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Conversion service base URL.
    #[arg(long, env = "PDF2PODCAST_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Conversion endpoint path on the service.
    #[arg(long, env = "PDF2PODCAST_ENDPOINT", default_value = "/api/process-pdf")]
    endpoint: String,

    /// Maximum upload size in MB (0 disables the check).
    #[arg(long, env = "PDF2PODCAST_MAX_SIZE_MB", default_value_t = 50)]
    max_size_mb: u64,

    /// Download the generated audio to this file.
    #[arg(long, env = "PDF2PODCAST_AUDIO_OUT")]
    audio_out: Option<PathBuf>,

    /// Write the summary to this file.
    #[arg(long, env = "PDF2PODCAST_SUMMARY_OUT")]
    summary_out: Option<PathBuf>,

    /// Output the result view as JSON instead of plain text.
    #[arg(long, env = "PDF2PODCAST_JSON")]
    json: bool,

    /// Copy the summary to the system clipboard.
    #[arg(long)]
    copy: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PODCAST_NO_PROGRESS")]
    no_progress: bool,

    /// Request timeout in seconds (0 waits indefinitely).
    #[arg(long, env = "PDF2PODCAST_TIMEOUT", default_value_t = 0)]
    timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PODCAST_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PODCAST_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar and status lines carry the user-facing feedback;
    // library INFO logs only appear when the bar is off.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let surface = TerminalSurface::new(cli.quiet || cli.json, show_progress);
    let controller =
        SubmissionController::with_http(config, surface).context("Failed to set up client")?;

    // ── Select ───────────────────────────────────────────────────────────
    let file = PdfFile::from_path(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    controller
        .select(Some(file))
        .map_err(|reason| anyhow::anyhow!(reason.user_message()))
        .with_context(|| format!("Cannot submit {}", cli.input.display()))?;

    // ── Submit ───────────────────────────────────────────────────────────
    let start = Instant::now();
    let result = match controller.submit().await {
        SubmitOutcome::Succeeded(result) => result,
        SubmitOutcome::Failed(e) => {
            anyhow::bail!("Error: {}", e.message());
        }
        SubmitOutcome::Skipped(reason) => {
            anyhow::bail!("Submission skipped: {reason}");
        }
    };
    let elapsed_ms = start.elapsed().as_millis();

    let view = controller
        .last_result()
        .unwrap_or_else(|| ResultView::new(&result, None));

    // ── Print ────────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&view).context("Failed to serialise result")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(view.summary.as_bytes())
            .context("Failed to write to stdout")?;
        if !view.summary.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    // ── Optional outputs ─────────────────────────────────────────────────
    if let Some(ref path) = cli.summary_out {
        write_summary(&result, path)
            .await
            .context("Failed to save summary")?;
        if !cli.quiet {
            eprintln!("{} summary  →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    if let Some(ref path) = cli.audio_out {
        let bytes = download_audio(&result, path, controller.config())
            .await
            .context("Failed to download audio")?;
        if !cli.quiet {
            eprintln!(
                "{} audio    →  {}  {}",
                green("✔"),
                bold(&path.display().to_string()),
                dim(&format!("{bytes} bytes")),
            );
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!("   {}", dim(&format!("{elapsed_ms}ms total")));
    }

    // ── Clipboard (last: may hold the process open) ─────────────────────
    if cli.copy {
        let clipboard = SystemClipboard::until_replaced();
        if cfg!(target_os = "linux") && !cli.quiet {
            eprintln!(
                "{} keeping the summary on the clipboard until it is replaced {}",
                cyan("◆"),
                dim("(Ctrl-C to stop)"),
            );
        }
        // The copy blocks this thread until another owner takes over.
        let outcome = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(controller.copy_summary(&clipboard))
        });
        match outcome {
            CopyOutcome::Copied => {}
            CopyOutcome::NothingToCopy => eprintln!("{} nothing to copy", cyan("⚠")),
            CopyOutcome::Failed(reason) => {
                eprintln!("{} could not copy summary: {}", cyan("⚠"), dim(&reason))
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let max_file_size = match cli.max_size_mb {
        0 => None,
        mb => Some(mb.saturating_mul(1024 * 1024)),
    };
    let timeout = match cli.timeout {
        0 => None,
        secs => Some(secs),
    };

    ClientConfig::builder()
        .base_url(cli.server.clone())
        .endpoint(cli.endpoint.clone())
        .max_file_size(max_file_size)
        .request_timeout_secs(timeout)
        // No button to revert in a terminal; the status line is enough.
        .copy_feedback_ms(0)
        .build()
        .context("Invalid configuration")
}
