use std::sync::Arc;

use sketchpad::config::HistoryConfig;
use sketchpad::history::HistoryView;
use sketchpad::keys::KeyCombo;
use sketchpad::session::{DrawingSession, KeyDisposition};
use sketchpad::sketch::{DEFAULT_SIZE, Point, Sketch};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: draw x,y .. | erase x,y .. | pen | eraser | color <hex> | width <n> | undo | redo | key <combo> | status | quit";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = HistoryConfig::from_env();
    let sketch = Sketch::open(DEFAULT_SIZE, DEFAULT_SIZE);
    let surface = sketch.as_ref().ok().cloned();
    let mut session = DrawingSession::open(move || sketch, config);

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "" => {}
            "draw" => gesture(&session, surface.as_ref(), args, false),
            "erase" => gesture(&session, surface.as_ref(), args, true),
            "pen" => session.select_pen(),
            "eraser" => session.select_eraser(),
            "color" => session.select_color(args.trim()),
            "width" => match args.trim().parse::<f64>() {
                Ok(width) if width > 0.0 => session.select_width(width),
                _ => println!("width must be a positive number"),
            },
            "undo" => println!("{:?}", session.undo().await),
            "redo" => println!("{:?}", session.redo().await),
            "key" => press(&session, args).await,
            "status" => print_status(&session, surface.as_ref()),
            "quit" | "exit" => break,
            _ => println!("{HELP}"),
        }
    }

    session.teardown();
    Ok(())
}

fn gesture(session: &DrawingSession, surface: Option<&Arc<Sketch>>, args: &str, erase: bool) {
    let Some(sketch) = surface else {
        println!("no drawing surface");
        return;
    };
    let points: Option<Vec<Point>> = args.split_whitespace().map(parse_point).collect();
    let Some(points) = points.filter(|p| !p.is_empty()) else {
        println!("expected points as x,y");
        return;
    };
    if erase {
        session.select_eraser();
    } else {
        session.select_pen();
    }
    sketch.gesture(&points);
}

fn parse_point(raw: &str) -> Option<Point> {
    let (x, y) = raw.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

async fn press(session: &DrawingSession, args: &str) {
    let combo = match args.parse::<KeyCombo>() {
        Ok(combo) => combo,
        Err(e) => {
            println!("{e}");
            return;
        }
    };
    match session.handle_key(&combo) {
        KeyDisposition::Ignored => println!("ignored"),
        KeyDisposition::Handled { shortcut, restore: None } => println!("{shortcut:?}: no history"),
        KeyDisposition::Handled { shortcut, restore: Some(task) } => match task.await {
            Ok(outcome) => println!("{shortcut:?}: {outcome:?}"),
            Err(e) => println!("{shortcut:?}: task failed: {e}"),
        },
    }
}

fn print_status(session: &DrawingSession, surface: Option<&Arc<Sketch>>) {
    let HistoryView { can_undo, can_redo, restoring, len, cursor, closed } = session.view();
    let strokes = surface.map_or(0, |s| s.strokes().len());
    println!(
        "entries={len} cursor={cursor:?} undo={can_undo} redo={can_redo} restoring={restoring} closed={closed} strokes={strokes} tool={:?}",
        session.active_tool()
    );
}
