use std::process::ExitCode;

use canvas::color::Color;
use canvas::consts::PALETTE;
use canvas::input::{Buttons, StrokeInput};
use canvas::mapper::{Point, Rect};
use canvas::preview::render_text;
use clap::{Parser, Subcommand};
use pixelboard::cache::{Credentials, FileStore, LocalCache};
use pixelboard::config::AppConfig;
use pixelboard::error::ErrorCode;
use pixelboard::services::artifact::Artifact;
use pixelboard::services::editor::{Editor, EditorError};
use pixelboard::store::StoreError;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "pixelboard", about = "Paint a pixel grid and publish it to a GitHub-backed gallery")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save store credentials.
    Setup {
        #[arg(long, env = "PIXELBOARD_TOKEN", hide_env_values = true)]
        token: String,
        #[arg(long, env = "PIXELBOARD_OWNER")]
        owner: String,
        #[arg(long, env = "PIXELBOARD_REPO")]
        repo: String,
        #[arg(long)]
        branch: Option<String>,
    },
    /// Print the current grid.
    Show,
    /// Reallocate the grid, discarding its cells.
    Resize { width: usize, height: usize },
    /// Fill the grid with the default color.
    Clear,
    /// Select the paint color (`#rgb` or `#rrggbb`).
    Color { color: Color },
    /// Paint one stroke through `col,row` points in cell units.
    Stroke {
        #[arg(required = true, value_parser = parse_point)]
        points: Vec<Point>,
    },
    /// Publish the grid and make it the active display.
    Export,
    /// List gallery artifacts, newest first.
    Gallery,
    /// Show the active display.
    Display,
    /// Make an existing artifact the active display.
    SetDisplay { path: String },
    /// Load an artifact into the editor.
    Load { path: String },
    /// Delete an artifact from the gallery.
    Delete { path: String },
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("expected col,row: {raw}"))?;
    let coord = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("bad coordinate {v:?}: {e}"));
    Ok(Point::new(coord(x)?, coord(y)?))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    if let Err(e) = dotenvy::dotenv() {
        debug!(error = %e, "no .env loaded");
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    debug!(cache_dir = %config.cache_dir.display(), "config loaded");

    let cache = LocalCache::new(FileStore::new(&config.cache_dir));
    let mut editor = Editor::open(cache, config.store);

    match run(&mut editor, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

async fn run(editor: &mut Editor, command: Command) -> Result<(), EditorError> {
    match command {
        Command::Setup { token, owner, repo, branch } => {
            editor.configure_store(&Credentials { token, owner, repo, branch })?;
            println!("store configured");
        }
        Command::Show => {
            let grid = editor.grid();
            print!("{}", render_text(grid));
            let palette: Vec<String> = PALETTE.iter().map(|(name, color)| format!("{name} {color}")).collect();
            println!("{}x{}  selected {}  palette: {}", grid.width(), grid.height(), grid.selected_color(), palette.join(", "));
        }
        Command::Resize { width, height } => {
            editor.resize_grid(width, height)?;
            println!("grid is now {width}x{height}");
        }
        Command::Clear => editor.clear(),
        Command::Color { color } => {
            editor.select_color(color);
            println!("selected {color}");
        }
        Command::Stroke { points } => stroke(editor, &points),
        Command::Export => {
            let artifact = editor.export_current_grid().await?;
            info!(path = %artifact.path, "exported");
            println!("exported {} and set as display", artifact.path);
            if let Some(url) = &artifact.url {
                println!("view at {url}");
            }
        }
        Command::Gallery => {
            for artifact in editor.refresh_gallery().await? {
                println!("{}", describe(artifact));
            }
        }
        Command::Display => match editor.current_display().await? {
            Some(artifact) => {
                println!("{}", describe(&artifact));
                print!("{}", render_text(&artifact.to_grid()?));
            }
            None => println!("no display set"),
        },
        Command::SetDisplay { path } => {
            let artifact = find(editor, &path).await?;
            editor.set_active(&artifact).await?;
            println!("display now shows {path}");
        }
        Command::Load { path } => {
            let artifact = editor.load_from_store(&path).await?;
            println!("loaded {}", artifact.path);
        }
        Command::Delete { path } => {
            let artifact = find(editor, &path).await?;
            editor.delete_from_gallery(&artifact).await?;
            println!("deleted {path}");
        }
    }
    Ok(())
}

/// Drive one stroke with the grid mapped one unit per cell.
#[allow(clippy::cast_precision_loss)]
fn stroke(editor: &mut Editor, points: &[Point]) {
    let (width, height) = (editor.grid().width(), editor.grid().height());
    editor.set_surface_bounds(Rect::new(0.0, 0.0, width as f64, height as f64));

    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut painted = editor.on_stroke_start(*first).len();
    for point in rest {
        painted += editor.on_stroke_move(*point, Buttons::PRIMARY).len();
    }
    editor.on_stroke_end(*points.last().unwrap_or(first));
    println!("painted {painted} cell(s)");
}

/// Current gallery entry for `path`, so deletes carry a fresh version token.
async fn find(editor: &mut Editor, path: &str) -> Result<Artifact, EditorError> {
    editor
        .refresh_gallery()
        .await?
        .iter()
        .find(|a| a.path == path)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(path.to_owned()).into())
}

fn describe(artifact: &Artifact) -> String {
    let created = artifact.created_at.format(&Rfc3339).unwrap_or_else(|_| artifact.created_at.to_string());
    format!("{}  {}x{}  {created}", artifact.path, artifact.width, artifact.height)
}
