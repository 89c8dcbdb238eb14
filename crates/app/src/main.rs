use std::{fs, path::Path};

use api_types::category::{MoveRequest, MoveScript};
use engine::{CategoryBoard, MoveEvent};
use settings::MoveInput;

use crate::error::Result;

mod error;
mod render;
mod settings;
mod store;

fn main() -> Result<()> {
    let settings = settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledger_tree={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let forest_path = Path::new(&settings.app.forest_path);
    let forest = store::load_forest(forest_path)?;
    let (bucket, requests) = read_requests(settings.input, &settings.app.bucket)?;
    let mut board = CategoryBoard::new(forest, &bucket)?;
    if settings.app.persist {
        tracing::info!("persisting moves to {}", forest_path.display());
        board.add_sink(Box::new(store::JsonFileSink::new(forest_path)));
    }

    let applied = replay(&mut board, &requests)?;
    tracing::info!(
        requested = requests.len(),
        applied,
        revision = board.revision(),
        "moves replayed"
    );

    let snapshot = board.snapshot();
    if let Some(bucket) = snapshot.bucket(board.active_bucket()) {
        print!("{}", render::render_bucket(bucket));
    }
    Ok(())
}

/// Collect the drags to replay and the bucket they apply to. A script's own
/// bucket wins over the configured one.
fn read_requests(input: MoveInput, configured: &str) -> Result<(String, Vec<MoveRequest>)> {
    match input {
        MoveInput::None => Ok((configured.to_string(), Vec::new())),
        MoveInput::Single { source, target } => Ok((
            configured.to_string(),
            vec![MoveRequest { source, target }],
        )),
        MoveInput::Script(path) => {
            let script: MoveScript = serde_json::from_str(&fs::read_to_string(path)?)?;
            let bucket = script.bucket.unwrap_or_else(|| configured.to_string());
            Ok((bucket, script.moves))
        }
    }
}

/// Feed each request to the board as one finished drag. Returns how many
/// of them changed the forest.
fn replay(board: &mut CategoryBoard, requests: &[MoveRequest]) -> Result<usize> {
    let mut applied = 0;
    for request in requests {
        let outcome = board.handle_drop(MoveEvent::new(request.source, request.target))?;
        if !outcome.is_noop() {
            applied += 1;
        }
    }
    Ok(applied)
}
