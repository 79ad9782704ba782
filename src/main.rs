#![windows_subsystem = "windows"]

mod canvas;
mod perf;
mod settings;
mod workspace;

use gpui::*;
use gpui_component::{Root, Theme, ThemeRegistry};
use gpui_component_assets::Assets;
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;
use workspace::Workspace;
use settings::AppSettings;

/// Returns the directory containing the executable.
pub fn get_app_root() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.to_path_buf();
        }
    }
    PathBuf::from(".")
}

// Define Global Actions
actions!(global, [
    TogglePerfOverlay,
    UndoAction,
    RedoAction,
    ClearCanvasAction,
    ZoomInAction,
    ZoomOutAction,
    ResetZoomAction
]);

#[derive(Parser, Debug)]
#[command(name = "OneSketch")]
#[command(version)]
#[command(about = "A sketching canvas with a live performance overlay", long_about = None)]
struct Cli {
    /// Show the performance overlay on startup
    #[arg(long)]
    perf: bool,
}

fn main() {
    // Initialize tracing for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into())
        )
        .init();

    let args = Cli::parse();
    let settings = AppSettings::load();

    let options = WindowOptions {
        window_bounds: Some(settings.window_bounds()),
        ..Default::default()
    };

    Application::new().with_assets(Assets).run(move |cx: &mut App| {
        // Initialize gpui-component (required before using components)
        gpui_component::init(cx);

        // Load themes and set the configured theme
        let theme_name = SharedString::from(settings.theme.clone());
        if let Err(err) = ThemeRegistry::watch_dir(
            get_app_root().join("assets/themes"),
            cx,
            move |cx| {
                if let Some(theme) = ThemeRegistry::global(cx)
                    .themes()
                    .get(&theme_name)
                    .cloned()
                {
                    Theme::global_mut(cx).apply_config(&theme);
                }
            }
        ) {
            warn!(error = %err, "Failed to watch themes directory");
        }

        cx.bind_keys([
            KeyBinding::new("alt-p", TogglePerfOverlay, None),
            KeyBinding::new("ctrl-z", UndoAction, None),
            KeyBinding::new("ctrl-shift-z", RedoAction, None),
            KeyBinding::new("ctrl-y", RedoAction, None), // Alternate Redo
            KeyBinding::new("ctrl-n", ClearCanvasAction, None),
            KeyBinding::new("ctrl-=", ZoomInAction, None),
            KeyBinding::new("ctrl--", ZoomOutAction, None),
            KeyBinding::new("ctrl-0", ResetZoomAction, None),
        ]);

        let show_perf = args.perf;
        let opened = cx.open_window(options, move |window, cx| {
            let workspace = cx.new(|cx| {
                let mut ws = Workspace::new(cx, &settings);
                ws.focus(window);
                if show_perf {
                    ws.open_perf_overlay(window, cx);
                }
                ws
            });

            // Wrap in Root - this MUST be the top-level view in the window
            cx.new(|cx| Root::new(workspace.clone(), window, cx))
        });

        match opened {
            Ok(window) => {
                window.update(cx, |_root, _window, cx| cx.activate(true)).ok();
            }
            Err(err) => {
                warn!(error = %err, "Failed to create main window");
                cx.quit();
            }
        }
    });
}
