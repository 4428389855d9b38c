//! Clipmark - interval editor for recorded sessions
//!
//! Entry point and main application loop.
//!
//! Usage: `clipmark <recording> [--clips FILE] [--config FILE] [--duration SECS]`

use anyhow::{bail, Context, Result};
use clipmark_audio::{ClockBackend, MediaSource};
use clipmark_core::EditorConfig;
use clipmark_timeline::{Clip, ClipFile};
use clipmark_ui::{
    apply_actions, show_clip_list, show_timeline, show_transport_bar, ClipListState,
    EditorSession, Theme, TimelineState,
};
use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Length used when neither the command line nor metadata says otherwise.
const DEFAULT_DURATION_SECS: f64 = 300.0;

#[derive(Debug, Default)]
struct Args {
    recording: String,
    clips: Option<PathBuf>,
    config: Option<PathBuf>,
    duration: Option<f64>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--clips" => parsed.clips = Some(args.next().context("--clips needs a path")?.into()),
                "--config" => {
                    parsed.config = Some(args.next().context("--config needs a path")?.into())
                }
                "--duration" => {
                    let value = args.next().context("--duration needs seconds")?;
                    parsed.duration = Some(
                        value
                            .parse()
                            .with_context(|| format!("invalid duration {:?}", value))?,
                    );
                }
                flag if flag.starts_with("--") => bail!("unknown option {}", flag),
                _ if parsed.recording.is_empty() => parsed.recording = arg,
                _ => bail!("unexpected argument {}", arg),
            }
        }
        if parsed.recording.is_empty() {
            bail!("usage: clipmark <recording> [--clips FILE] [--config FILE] [--duration SECS]");
        }
        Ok(parsed)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    info!("Clipmark starting...");

    let config = match &args.config {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    let seeds = match &args.clips {
        Some(path) if path.exists() => {
            ClipFile::load_from_file(path)
                .with_context(|| format!("loading clips {}", path.display()))?
                .clips
        }
        Some(path) => {
            info!("clip file {} does not exist yet", path.display());
            Vec::new()
        }
        None => Vec::new(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 640.0])
            .with_title("Clipmark"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "Clipmark",
        options,
        Box::new(move |cc| Ok(Box::new(ClipmarkApp::new(cc, args, config, seeds)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}

struct ClipmarkApp {
    session: EditorSession,
    clips_path: Option<PathBuf>,
    timeline: TimelineState,
    clip_list: ClipListState,
    status: Option<String>,
}

impl ClipmarkApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        args: Args,
        config: EditorConfig,
        seeds: Vec<Clip>,
    ) -> Self {
        Theme::apply(&cc.egui_ctx);
        let duration = args.duration.unwrap_or(DEFAULT_DURATION_SECS);
        let source = MediaSource::new(args.recording).with_duration_hint(duration);
        let session = EditorSession::new(
            Box::new(ClockBackend::new(duration)),
            source,
            seeds,
            config,
        );
        Self {
            session,
            clips_path: args.clips,
            timeline: TimelineState::default(),
            clip_list: ClipListState::default(),
            status: None,
        }
    }

    fn save(&mut self) {
        let file = self.session.to_clip_file();
        let Some(path) = &self.clips_path else {
            warn!("no --clips path given; {} clips not saved", file.clips.len());
            self.status = Some("No clip file to save to".into());
            return;
        };
        match file.save_to_file(path) {
            Ok(()) => {
                info!(count = file.clips.len(), "saved clips to {}", path.display());
                self.status = Some(format!("Saved {} clips", file.clips.len()));
            }
            Err(e) => {
                error!("failed to save clips: {}", e);
                self.status = Some(format!("Save failed: {}", e));
            }
        }
    }

    /// Re-read the clip file, e.g. after another tool changed it.
    fn reload(&mut self) {
        let Some(path) = &self.clips_path else {
            self.status = Some("No clip file to reload".into());
            return;
        };
        if !path.exists() {
            self.status = Some(format!("{} does not exist yet", path.display()));
            return;
        }
        match ClipFile::load_from_file(path) {
            Ok(file) => {
                self.session.refresh_clips(file.clips);
                let count = self.session.clips().len();
                info!(count, "reloaded clips from {}", path.display());
                self.status = Some(format!("Reloaded {} clips", count));
            }
            Err(e) => {
                error!("failed to reload clips: {}", e);
                self.status = Some(format!("Reload failed: {}", e));
            }
        }
    }
}

impl eframe::App for ClipmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let outcome = self.session.poll(now);
        if let Some(id) = &outcome.created {
            info!(id = %id, "clip created from marked range");
        }

        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S)) {
            self.save();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save").clicked() {
                        self.save();
                        ui.close_menu();
                    }
                    if ui.button("Reload clips").clicked() {
                        self.reload();
                        ui.close_menu();
                    }
                    if ui.button("Discard changes and quit").clicked() {
                        self.session.cancel();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    ui.separator();
                    if ui.button("Save and quit").clicked() {
                        self.save();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                if let Some(status) = &self.status {
                    ui.label(egui::RichText::new(status).color(Theme::t2()));
                }
            });
        });

        egui::SidePanel::right("clip_list")
            .resizable(true)
            .default_width(300.0)
            .frame(Theme::panel_frame())
            .show(ctx, |ui| {
                let snapshot = self.session.snapshot();
                let actions = show_clip_list(ui, &snapshot, &mut self.clip_list);
                apply_actions(&mut self.session, &mut self.clip_list, actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(source) = self.session.transport().source() {
                ui.heading(&source.uri);
            }
            ui.add_space(Theme::SPACE_SM);
            show_transport_bar(ui, &mut self.session);
            ui.add_space(Theme::SPACE_SM);
            show_timeline(ui, &mut self.session, &mut self.timeline, now);
        });
    }
}
