//! Terminal progress for download batches.
//!
//! Implements `DownloadEventEmitterPort`. On a terminal it draws an overall
//! bar with result counters plus one line per running track; otherwise it
//! prints one plain line per event.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use console::{Term, style};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use spdl_core::utils::format_size;
use spdl_core::{DownloadEvent, DownloadEventEmitterPort, Track};

const MAX_LABEL: usize = 40;
const TICK: Duration = Duration::from_millis(120);

/// Download event renderer for the terminal.
#[derive(Clone)]
pub struct ProgressEmitter {
    inner: Arc<Mutex<ProgressRender>>,
}

enum ProgressRender {
    Fancy(FancyProgress),
    Plain,
}

impl ProgressEmitter {
    /// Create an emitter, drawing bars only when stdout is a terminal.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::with_render(ProgressRender::Fancy(FancyProgress::new()))
        } else {
            Self::plain()
        }
    }

    /// Create an emitter that prints plain lines.
    pub fn plain() -> Self {
        Self::with_render(ProgressRender::Plain)
    }

    fn with_render(render: ProgressRender) -> Self {
        Self {
            inner: Arc::new(Mutex::new(render)),
        }
    }
}

impl Default for ProgressEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadEventEmitterPort for ProgressEmitter {
    fn emit(&self, event: DownloadEvent) {
        let mut render = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *render {
            ProgressRender::Fancy(fancy) => fancy.handle(&event),
            ProgressRender::Plain => {
                if let Some(line) = plain_line(&event) {
                    println!("{line}");
                }
            }
        }
    }

    fn clone_box(&self) -> Box<dyn DownloadEventEmitterPort> {
        Box::new(self.clone())
    }
}

// ============================================================================
// Fancy Terminal Progress (indicatif)
// ============================================================================

struct FancyProgress {
    multi: MultiProgress,
    overall: Option<ProgressBar>,
    tracks: HashMap<String, TrackBar>,
    counters: Counters,
}

struct TrackBar {
    bar: ProgressBar,
    label: String,
    has_length: bool,
}

impl FancyProgress {
    fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stdout()),
            overall: None,
            tracks: HashMap::new(),
            counters: Counters::default(),
        }
    }

    fn handle(&mut self, event: &DownloadEvent) {
        self.counters.record(event);

        match event {
            DownloadEvent::BatchStarted { total, .. } => {
                let len = u64::try_from(*total).unwrap_or(u64::MAX);
                let bar = self.multi.add(ProgressBar::new(len));
                bar.set_style(template(
                    "{spinner:.green} [{pos}/{len}] [{bar:30.cyan/blue}] {msg} ETA {eta}",
                ));
                bar.set_message(self.counters.message());
                bar.enable_steady_tick(TICK);
                self.overall = Some(bar);
            }
            DownloadEvent::TrackStarted {
                index,
                total,
                track,
            } => {
                let bar = match &self.overall {
                    Some(overall) => self.multi.insert_before(overall, ProgressBar::new_spinner()),
                    None => self.multi.add(ProgressBar::new_spinner()),
                };
                bar.set_style(template("  {spinner:.cyan} {msg}"));
                let label = format!("[{index}/{total}] {}", format_label(&track.display_name()));
                bar.set_message(label.clone());
                bar.enable_steady_tick(TICK);
                self.tracks.insert(
                    track.track_key(),
                    TrackBar {
                        bar,
                        label,
                        has_length: false,
                    },
                );
            }
            DownloadEvent::SourceAttempt {
                track,
                source,
                attempt,
                max_attempts,
            } => {
                if let Some(entry) = self.tracks.get(&track.track_key()) {
                    let retry = if *attempt > 1 {
                        format!(" (attempt {attempt}/{max_attempts})")
                    } else {
                        String::new()
                    };
                    entry.bar.set_message(format!(
                        "{} {} {source}{retry}",
                        entry.label,
                        source.icon()
                    ));
                }
            }
            DownloadEvent::TrackProgress {
                track,
                downloaded,
                total,
                ..
            } => {
                if let Some(entry) = self.tracks.get_mut(&track.track_key()) {
                    if *total > 0 {
                        if !entry.has_length {
                            entry.bar.set_style(
                                template(
                                    "  {msg} [{bar:25.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
                                )
                                .progress_chars("█▓░"),
                            );
                            entry.has_length = true;
                        }
                        entry.bar.set_length(*total);
                        entry.bar.set_position((*downloaded).min(*total));
                    }
                }
            }
            DownloadEvent::TrackCompleted { track, .. }
            | DownloadEvent::TrackSkipped { track, .. }
            | DownloadEvent::TrackFailed { track, .. } => {
                self.finish_track(track);
                if let Some(line) = outcome_line(event) {
                    self.multi.println(line).ok();
                }
                if let Some(overall) = &self.overall {
                    overall.inc(1);
                    overall.set_message(self.counters.message());
                }
            }
            DownloadEvent::BatchFinished { .. } => {
                for (_, entry) in self.tracks.drain() {
                    entry.bar.finish_and_clear();
                    self.multi.remove(&entry.bar);
                }
                if let Some(overall) = self.overall.take() {
                    overall.finish_and_clear();
                    self.multi.remove(&overall);
                }
            }
        }
    }

    fn finish_track(&mut self, track: &Track) {
        if let Some(entry) = self.tracks.remove(&track.track_key()) {
            entry.bar.finish_and_clear();
            self.multi.remove(&entry.bar);
        }
    }
}

fn template(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

// ============================================================================
// Shared formatting
// ============================================================================

/// Running result counts shown next to the overall bar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counters {
    completed: usize,
    failed: usize,
    skipped: usize,
}

impl Counters {
    fn record(&mut self, event: &DownloadEvent) {
        match event {
            DownloadEvent::TrackCompleted { .. } => self.completed += 1,
            DownloadEvent::TrackFailed { .. } => self.failed += 1,
            DownloadEvent::TrackSkipped { .. } => self.skipped += 1,
            _ => {}
        }
    }

    fn message(self) -> String {
        format!("✓ {}  ✗ {}  ⊙ {}", self.completed, self.failed, self.skipped)
    }
}

fn format_label(raw: &str) -> String {
    if raw.chars().count() <= MAX_LABEL {
        return raw.to_string();
    }
    let mut buf: String = raw.chars().take(MAX_LABEL - 1).collect();
    buf.push('…');
    buf
}

/// Line printed when a track finishes.
fn outcome_line(event: &DownloadEvent) -> Option<String> {
    match event {
        DownloadEvent::TrackCompleted {
            track,
            source,
            size,
            ..
        } => Some(format!(
            "{} {} {} {source} ({})",
            style("✓").green(),
            track.display_name(),
            source.icon(),
            format_size(*size)
        )),
        DownloadEvent::TrackSkipped { track, size, .. } => Some(format!(
            "{} {} (already downloaded, {})",
            style("⊙").yellow(),
            track.display_name(),
            format_size(*size)
        )),
        DownloadEvent::TrackFailed { track, error } => Some(format!(
            "{} {}: {error}",
            style("✗").red(),
            track.display_name()
        )),
        _ => None,
    }
}

/// Line printed for an event when stdout is not a terminal.
fn plain_line(event: &DownloadEvent) -> Option<String> {
    match event {
        DownloadEvent::BatchStarted { total, sources, .. } => {
            let names: Vec<&str> = sources.iter().map(|s| s.as_str()).collect();
            Some(format!(
                "Downloading {total} track(s) using {}",
                names.join(", ")
            ))
        }
        DownloadEvent::TrackStarted {
            index,
            total,
            track,
        } => Some(format!("[{index}/{total}] {}", track.display_name())),
        DownloadEvent::SourceAttempt {
            source,
            attempt,
            max_attempts,
            ..
        } => Some(format!("  trying {source} ({attempt}/{max_attempts})")),
        DownloadEvent::TrackProgress { .. } | DownloadEvent::BatchFinished { .. } => None,
        _ => outcome_line(event),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use spdl_core::SourceKind;
    use uuid::Uuid;

    fn track() -> Track {
        Track::new("Title", "Artist", "Album")
    }

    #[test]
    fn test_counters() {
        let mut counters = Counters::default();
        counters.record(&DownloadEvent::TrackCompleted {
            track: track(),
            source: SourceKind::Jamendo,
            path: PathBuf::from("a.flac"),
            size: 10,
        });
        counters.record(&DownloadEvent::TrackFailed {
            track: track(),
            error: "x".to_string(),
        });
        counters.record(&DownloadEvent::TrackSkipped {
            track: track(),
            path: PathBuf::from("b.flac"),
            size: 10,
        });
        counters.record(&DownloadEvent::TrackStarted {
            index: 1,
            total: 3,
            track: track(),
        });

        assert_eq!(
            counters,
            Counters {
                completed: 1,
                failed: 1,
                skipped: 1
            }
        );
        assert_eq!(counters.message(), "✓ 1  ✗ 1  ⊙ 1");
    }

    #[test]
    fn test_plain_lines() {
        let started = plain_line(&DownloadEvent::TrackStarted {
            index: 2,
            total: 5,
            track: track(),
        });
        assert_eq!(started.as_deref(), Some("[2/5] Artist - Title"));

        let completed = plain_line(&DownloadEvent::TrackCompleted {
            track: track(),
            source: SourceKind::Youtube,
            path: PathBuf::from("a.mp3"),
            size: 1_572_864,
        })
        .unwrap();
        assert!(completed.contains("Artist - Title"));
        assert!(completed.contains("youtube"));
        assert!(completed.contains("1.5MB"));

        let failed = plain_line(&DownloadEvent::TrackFailed {
            track: track(),
            error: "Download cancelled".to_string(),
        })
        .unwrap();
        assert!(failed.contains("Download cancelled"));

        assert!(
            plain_line(&DownloadEvent::TrackProgress {
                track: track(),
                source: SourceKind::Jamendo,
                downloaded: 1,
                total: 2,
            })
            .is_none()
        );
    }

    #[test]
    fn test_plain_batch_started_lists_sources() {
        let line = plain_line(&DownloadEvent::BatchStarted {
            run_id: Uuid::new_v4(),
            total: 3,
            sources: vec![SourceKind::Jamendo, SourceKind::Youtube],
        })
        .unwrap();
        assert_eq!(line, "Downloading 3 track(s) using jamendo, youtube");
    }

    #[test]
    fn test_format_label_truncates_long() {
        assert_eq!(format_label("Artist - Title"), "Artist - Title");
        let long = "a".repeat(50);
        let label = format_label(&long);
        assert_eq!(label.chars().count(), MAX_LABEL);
        assert!(label.ends_with('…'));
    }

    #[test]
    fn test_plain_emitter_handles_every_event() {
        let emitter = ProgressEmitter::plain();
        emitter.emit(DownloadEvent::TrackStarted {
            index: 1,
            total: 1,
            track: track(),
        });
        let boxed = emitter.clone_box();
        boxed.emit(DownloadEvent::TrackFailed {
            track: track(),
            error: "x".to_string(),
        });
    }
}
