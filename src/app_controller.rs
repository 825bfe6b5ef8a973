use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::alignment::{self, AlignedSequence};
use crate::app_config::Config;
use crate::content;
use crate::emitters::image_layout::{EstimatedMetrics, write_layout_descriptors};
use crate::emitters::raster::{GlyphRenderer, render_images};
use crate::emitters::{OutputFormat, phonetic_track, styled_track, timeline};
use crate::file_utils::FileManager;
use crate::timing;

// @module: Application controller for subtitle conversion

/// One conversion from a timing track and a content track to an output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    // @field: Target format
    pub format: OutputFormat,

    // @field: SRT timing track
    pub timing: PathBuf,

    // @field: JSON content track
    pub content: PathBuf,

    // @field: Output file, or output directory for images
    pub output: PathBuf,

    // @field: Raster artifacts referenced by a timeline
    pub images_dir: Option<PathBuf>,

    // @field: Write layout descriptors instead of PNG images
    pub layout_only: bool,
}

impl ConversionJob {
    pub fn new(format: OutputFormat, timing: impl Into<PathBuf>, content: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            format,
            timing: timing.into(),
            content: content.into(),
            output: output.into(),
            images_dir: None,
            layout_only: false,
        }
    }

    pub fn with_images_dir(mut self, images_dir: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(images_dir.into());
        self
    }

    pub fn with_layout_only(mut self, layout_only: bool) -> Self {
        self.layout_only = layout_only;
        self
    }
}

/// Result of a single conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Files written by the emitter
    Written(Vec<PathBuf>),
    /// Output already present and overwriting was not requested
    Skipped(PathBuf),
}

/// Counts reported at the end of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle conversion
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load both tracks and align them
    pub fn load(&self, timing_path: &Path, content_path: &Path) -> Result<AlignedSequence> {
        let intervals = timing::read_timing_track(timing_path)
            .with_context(|| format!("load: timing track {}", timing_path.display()))?;
        let markup = content::read_content_track(content_path)
            .with_context(|| format!("load: content track {}", content_path.display()))?;

        let units = content::parse_units(&markup);
        debug!("Loaded {} intervals and {} content units", intervals.len(), units.len());
        Ok(alignment::align(units, intervals))
    }

    /// Run one conversion: load, parse, align, emit and write
    pub fn convert(&self, job: &ConversionJob, force_overwrite: bool) -> Result<ConversionOutcome> {
        let start_time = Instant::now();

        if !force_overwrite && Self::output_exists(job)? {
            warn!(
                "Skipping, output already exists (use -f to force overwrite): {}",
                job.output.display()
            );
            return Ok(ConversionOutcome::Skipped(job.output.clone()));
        }

        let sequence = self.load(&job.timing, &job.content)?;
        let written = self
            .emit(job, &sequence)
            .with_context(|| format!("{}: {}", job.format.stage(), job.output.display()))?;

        info!(
            "Success: {} ({} entries, {})",
            job.output.display(),
            sequence.len(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(ConversionOutcome::Written(written))
    }

    fn emit(&self, job: &ConversionJob, sequence: &AlignedSequence) -> Result<Vec<PathBuf>> {
        let render = &self.config.render;

        match job.format {
            OutputFormat::Ass => {
                let ass = styled_track::emit_styled_track(sequence, render)?;
                FileManager::write_to_file(&job.output, &ass)?;
                Ok(vec![job.output.clone()])
            }
            OutputFormat::Romaji => {
                let srt = phonetic_track::emit_phonetic_track(sequence)?;
                FileManager::write_to_file(&job.output, &srt)?;
                Ok(vec![job.output.clone()])
            }
            OutputFormat::Images if job.layout_only => {
                write_layout_descriptors(sequence, render, &EstimatedMetrics, &job.output)
            }
            OutputFormat::Images => {
                let renderer = GlyphRenderer::load(&render.font)?;
                render_images(sequence, render, &renderer, &job.output)
            }
            OutputFormat::Timeline => {
                let images_dir = job
                    .images_dir
                    .as_deref()
                    .ok_or_else(|| anyhow!("A timeline needs an images directory"))?;
                let artifacts = timeline::discover_artifacts(images_dir)?;
                let xml = timeline::emit_timeline(sequence, &artifacts, render)?;
                FileManager::write_to_file(&job.output, &xml)?;
                Ok(vec![job.output.clone()])
            }
        }
    }

    fn output_exists(job: &ConversionJob) -> Result<bool> {
        match job.format {
            OutputFormat::Images => {
                if !FileManager::dir_exists(&job.output) {
                    return Ok(false);
                }
                let extension = if job.layout_only { "json" } else { "png" };
                Ok(!FileManager::find_files(&job.output, extension)?.is_empty())
            }
            _ => Ok(FileManager::file_exists(&job.output)),
        }
    }

    /// Convert a plain text markup file into a JSON content track
    pub fn prepare(&self, input: &Path, force_overwrite: bool) -> Result<ConversionOutcome> {
        if !FileManager::file_exists(input) {
            return Err(anyhow!("Input file does not exist: {}", input.display()));
        }

        let output = content::converted_path(input);
        if FileManager::file_exists(&output) && !force_overwrite {
            warn!(
                "Skipping, output already exists (use -f to force overwrite): {}",
                output.display()
            );
            return Ok(ConversionOutcome::Skipped(output));
        }

        let written = content::prepare_content_track(input)
            .with_context(|| format!("prepare: {}", input.display()))?;
        Ok(ConversionOutcome::Written(vec![written]))
    }

    /// One job per `X.json` content track in `input_dir` that has a sibling `X.srt`
    pub fn plan_batch(&self, format: OutputFormat, input_dir: &Path, output_dir: &Path, layout_only: bool) -> Result<Vec<ConversionJob>> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {}", input_dir.display()));
        }

        let mut jobs = Vec::new();
        for content_path in FileManager::find_files(input_dir, "json")? {
            let timing_path = content_path.with_extension("srt");
            if !FileManager::file_exists(&timing_path) {
                debug!("No timing track for {}, skipping", content_path.display());
                continue;
            }

            let stem = content_path.file_stem().unwrap_or_default().to_string_lossy().to_string();
            let images_dir = output_dir.join(&stem);
            let output = match format {
                OutputFormat::Ass => FileManager::generate_output_path(&content_path, output_dir, None, "ass"),
                OutputFormat::Romaji => FileManager::generate_output_path(&content_path, output_dir, Some("romaji"), "srt"),
                OutputFormat::Images => images_dir.clone(),
                OutputFormat::Timeline => FileManager::generate_output_path(&content_path, output_dir, None, "xml"),
            };

            let mut job = ConversionJob::new(format, timing_path, &content_path, output).with_layout_only(layout_only);
            if format == OutputFormat::Timeline {
                job = job.with_images_dir(images_dir);
            }
            jobs.push(job);
        }

        Ok(jobs)
    }

    /// Convert every content track of a directory, running jobs in parallel
    ///
    /// A failing job is logged and counted; it does not stop the others.
    pub async fn run_batch(
        &self,
        format: OutputFormat,
        input_dir: PathBuf,
        output_dir: PathBuf,
        layout_only: bool,
        force_overwrite: bool,
    ) -> Result<BatchSummary> {
        let start_time = Instant::now();

        let jobs = self.plan_batch(format, &input_dir, &output_dir, layout_only)?;
        if jobs.is_empty() {
            return Err(anyhow!(
                "No content tracks with a matching timing track found in directory: {}",
                input_dir.display()
            ));
        }
        FileManager::ensure_dir(&output_dir)?;

        let progress_bar = ProgressBar::new(jobs.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message(format!("Converting to {}", format));

        let concurrency = self.config.batch.concurrency.max(1);
        let results: Vec<(PathBuf, Result<ConversionOutcome>)> = stream::iter(jobs.into_iter().map(|job| {
            let controller = self.clone();
            let pb = progress_bar.clone();
            async move {
                let content_path = job.content.clone();
                let result = tokio::task::spawn_blocking(move || controller.convert(&job, force_overwrite))
                    .await
                    .map_err(|e| anyhow!("Conversion task failed: {}", e))
                    .and_then(|r| r);
                pb.inc(1);
                (content_path, result)
            }
        }))
        .buffer_unordered(concurrency)
        .collect()
        .await;

        progress_bar.finish_and_clear();

        let mut summary = BatchSummary::default();
        for (content_path, result) in results {
            match result {
                Ok(ConversionOutcome::Written(_)) => summary.converted += 1,
                Ok(ConversionOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", content_path.display(), e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Batch complete in {}: {} converted, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            summary.converted,
            summary.skipped,
            summary.failed
        );
        Ok(summary)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
