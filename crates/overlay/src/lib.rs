//! Wayland layer-shell overlay for `sysgraph`.
//!
//! Owns the Iced application loop and wires together the background work:
//! - Sampling scheduler (CPU, memory, disk) → graph invalidation
//! - Config file watcher (live reload on change)
//! - Ctrl-C / SIGINT → graceful shutdown
//!
//! Sampling never runs on the Iced thread: the monitor's scheduler executes
//! every tick on Tokio's blocking pool and only forwards the list of
//! refreshed kinds here.

use futures::channel::mpsc::Sender;
use iced::{
    widget::{column, container},
    Element, Length, Subscription, Task,
};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use std::time::Duration;
use sysgraph_config::{default_path, load as load_config, load_or_default, ConfigWatcher, Edge, MonitorConfig};
use sysgraph_core::{event::Message as AppMessage, MetricKind};
use sysgraph_renderer::GraphLayout;
use sysgraph_theme::Theme;
use sysgraph_widgets::{GraphWidget, MonitorWidget};
use tracing::{info, warn};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the overlay.  Returns when the window closes or on Ctrl-C.
pub fn run() -> iced_layershell::Result {
    let config = load_or_default(default_path());
    let window = &config.window;

    application(Overlay::new, Overlay::namespace, Overlay::update, Overlay::view)
        .subscription(Overlay::subscription)
        .style(Overlay::style)
        .settings(Settings {
            layer_settings: LayerShellSettings {
                size: Some((window.width, window.height)),
                exclusive_zone: 0, // float above windows, reserve nothing
                anchor: edge_to_anchor(window.edge),
                layer: Layer::Overlay,
                margin: edge_to_margin(window.edge, window.margin),
                ..Default::default()
            },
            ..Default::default()
        })
        .run()
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
///
/// `#[to_layer_message]` injects layer-shell control variants (AnchorChange,
/// SizeChange, etc.).  Those are handled by the backend and never reach
/// `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    /// Propagate a core event-bus message.
    App(AppMessage),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Overlay {
    config:  MonitorConfig,
    theme:   Theme,
    layout:  GraphLayout,
    monitor: MonitorWidget,
    graphs:  Vec<GraphWidget>,
}

impl Overlay {
    fn new() -> (Self, Task<Message>) {
        let config  = load_or_default(default_path());
        let theme   = Theme::from_config(&config);
        let layout  = GraphLayout::from_config(&config, &theme);
        let monitor = MonitorWidget::from_config(&config);
        let graphs  = layout.graphs.iter().cloned().map(GraphWidget::new).collect();

        // The scheduler must be spawned on Iced's Tokio executor, so the
        // monitor is started from inside the task that relays its output.
        let sampling = Task::run(sample_stream(monitor.clone()), Message::App);

        let overlay = Self {
            config,
            theme,
            layout,
            monitor,
            graphs,
        };

        (overlay, sampling)
    }

    fn namespace() -> String {
        String::from("sysgraph")
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(msg) => self.handle_app(msg),
            // Layer-shell injected variants handled by the backend.
            _ => Task::none(),
        }
    }

    fn handle_app(&mut self, msg: AppMessage) -> Task<Message> {
        match msg {
            AppMessage::SamplesUpdated(kinds) => {
                for graph in self.graphs.iter_mut().filter(|g| kinds.contains(&g.kind())) {
                    graph.invalidate();
                }
            }
            AppMessage::ConfigReloaded => match load_config(default_path()) {
                Ok(cfg) => {
                    info!("Config reloaded");
                    self.apply_config(cfg);
                }
                Err(e) => warn!("Config reload failed: {e}"),
            },
            AppMessage::Shutdown => {
                info!("Shutting down");
                self.monitor.stop();
                return iced::exit();
            }
        }
        Task::none()
    }

    /// Apply the visual parts of a reloaded config.  Sampler settings and
    /// newly added metric kinds need a restart.
    fn apply_config(&mut self, cfg: MonitorConfig) {
        if cfg.sampler.interval_ms != self.config.sampler.interval_ms
            || cfg.sampler.capacity != self.config.sampler.capacity
            || cfg.sampler.cpu_window_ms != self.config.sampler.cpu_window_ms
            || cfg.sampler.timeout_ms != self.config.sampler.timeout_ms
            || cfg.sampler.disk_mount != self.config.sampler.disk_mount
        {
            info!("Sampler settings changed; they take effect after a restart");
        }

        self.theme  = Theme::from_config(&cfg);
        self.layout = GraphLayout::from_config(&cfg, &self.theme);

        let tracked = self.monitor.kinds();
        let untracked: Vec<MetricKind> = self
            .layout
            .graphs
            .iter()
            .map(|g| g.kind)
            .filter(|k| !tracked.contains(k))
            .collect();
        if !untracked.is_empty() {
            warn!("Graphs for {untracked:?} are not sampled until restart");
        }

        self.graphs = self.layout.graphs.iter().cloned().map(GraphWidget::new).collect();
        self.config = cfg;
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let graphs = self.graphs.iter().map(|g| {
            g.view(&self.monitor, &self.theme, self.layout.x_scale)
                .map(Message::App)
        });

        let stack = column(graphs)
            .spacing(f32::from(self.theme.gap))
            .width(Length::Fill)
            .height(Length::Fill);

        container(stack)
            .padding(self.theme.padding)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            Subscription::run(config_stream),
            Subscription::run(signal_stream),
        ])
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        let bg = self.theme.background.with_alpha(self.config.window.opacity);
        iced::theme::Style {
            background_color: bg.to_iced(),
            text_color: self.theme.foreground.to_iced(),
        }
    }
}

// ── Streams ───────────────────────────────────────────────────────────────────

/// Starts the monitor and relays each "kinds refreshed" notification.
fn sample_stream(monitor: MonitorWidget) -> impl iced::futures::Stream<Item = AppMessage> {
    iced::stream::channel(4, move |mut sender: Sender<AppMessage>| async move {
        let mut rx = monitor.start();

        while let Some(kinds) = rx.recv().await {
            // A dropped notification is covered by the next tick's redraw.
            let _ = sender.try_send(AppMessage::SamplesUpdated(kinds));
        }

        warn!("Sampling stopped; graphs will no longer update");
    })
}

/// Watches `~/.config/sysgraph/sysgraph.toml` and sends `ConfigReloaded`.
fn config_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        let (watcher, mut rx) = ConfigWatcher::spawn(default_path());
        info!("Watching {} for changes", watcher.path().display());

        while rx.recv().await.is_some() {
            let _ = sender.try_send(Message::App(AppMessage::ConfigReloaded));
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Turns Ctrl-C into a graceful `Shutdown`.
fn signal_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = sender.try_send(Message::App(AppMessage::Shutdown));
            }
            Err(e) => warn!("Cannot listen for Ctrl-C: {e}"),
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A single-edge anchor centres the surface along that edge.
fn edge_to_anchor(edge: Edge) -> Anchor {
    match edge {
        Edge::Left  => Anchor::Left,
        Edge::Right => Anchor::Right,
    }
}

/// Layer-shell margins are `(top, right, bottom, left)`.
fn edge_to_margin(edge: Edge, margin: i32) -> (i32, i32, i32, i32) {
    match edge {
        Edge::Left  => (0, 0, 0, margin),
        Edge::Right => (0, margin, 0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_applies_to_anchored_edge_only() {
        assert_eq!(edge_to_margin(Edge::Left, 12), (0, 0, 0, 12));
        assert_eq!(edge_to_margin(Edge::Right, 12), (0, 12, 0, 0));
    }

    #[test]
    fn anchor_matches_edge() {
        assert_eq!(edge_to_anchor(Edge::Left), Anchor::Left);
        assert_eq!(edge_to_anchor(Edge::Right), Anchor::Right);
    }
}
