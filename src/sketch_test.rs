#![allow(clippy::float_cmp)]

use std::sync::{Arc, Mutex};

use super::*;
use crate::tools::RED;

fn recorder(sketch: &Sketch) -> Arc<Mutex<Vec<SurfaceEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    sketch.subscribe(Arc::new(move |event: SurfaceEvent| sink.lock().unwrap().push(event)));
    seen
}

fn line(from: f64, to: f64) -> Vec<Point> {
    let mut points = Vec::new();
    let mut x = from;
    while x <= to {
        points.push(Point::new(x, 0.0));
        x += 5.0;
    }
    points
}

fn erasable_stroke(sketch: &Sketch, points: &[Point]) -> ObjectId {
    sketch.gesture(points);
    let id = sketch.strokes().last().unwrap().id;
    sketch.set_erasable(id, true);
    id
}

// =============================================================================
// open / dispose
// =============================================================================

#[test]
fn open_rejects_zero_size() {
    assert!(matches!(Sketch::open(0, 100), Err(SurfaceError::Initialization(_))));
    assert!(Sketch::open(DEFAULT_SIZE, DEFAULT_SIZE).is_ok());
}

#[test]
fn new_sketch_is_empty_and_drawing() {
    let sketch = Sketch::open(DEFAULT_SIZE, DEFAULT_SIZE).unwrap();
    assert!(sketch.strokes().is_empty());
    assert!(sketch.drawing_mode());
    assert_eq!(sketch.brush(), Brush::default());
    assert_eq!(sketch.size(), (DEFAULT_SIZE, DEFAULT_SIZE));
}

#[test]
fn dispose_twice_fails() {
    let sketch = Sketch::open(10, 10).unwrap();
    assert!(sketch.dispose().is_ok());
    assert!(sketch.is_disposed());
    assert!(matches!(sketch.dispose(), Err(SurfaceError::Teardown(_))));
}

#[test]
fn dispose_drops_listeners() {
    let sketch = Sketch::open(10, 10).unwrap();
    let seen = recorder(&sketch);
    sketch.dispose().unwrap();
    sketch.gesture(&line(0.0, 10.0));
    assert!(seen.lock().unwrap().is_empty());
}

// =============================================================================
// gestures
// =============================================================================

#[test]
fn pen_gesture_adds_stroke_and_emits_sequence() {
    let sketch = Sketch::open(100, 100).unwrap();
    sketch.set_brush(&Brush::pen(RED, 20.0));
    let seen = recorder(&sketch);

    sketch.gesture(&line(0.0, 20.0));

    let strokes = sketch.strokes();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].color, RED);
    assert_eq!(strokes[0].width, 20.0);
    assert!(!strokes[0].erasable);
    assert_eq!(
        *seen.lock().unwrap(),
        [
            SurfaceEvent::PointerDown,
            SurfaceEvent::ObjectAdded(strokes[0].id),
            SurfaceEvent::StrokeCompleted,
            SurfaceEvent::PointerUp,
        ]
    );
}

#[test]
fn gesture_ignored_outside_drawing_mode() {
    let sketch = Sketch::open(100, 100).unwrap();
    sketch.set_drawing_mode(false);
    sketch.gesture(&line(0.0, 20.0));
    assert!(sketch.strokes().is_empty());
}

#[test]
fn empty_gesture_is_ignored() {
    let sketch = Sketch::open(100, 100).unwrap();
    let seen = recorder(&sketch);
    sketch.gesture(&[]);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn eraser_trims_and_removes_erasable_strokes() {
    let sketch = Sketch::open(100, 100).unwrap();
    let long = erasable_stroke(&sketch, &line(0.0, 100.0));
    let short = erasable_stroke(&sketch, &[Point::new(50.0, 0.0)]);
    sketch.set_brush(&Brush::eraser());
    let seen = recorder(&sketch);

    sketch.gesture(&[Point::new(50.0, 0.0)]);

    let strokes = sketch.strokes();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].id, long);
    assert!(strokes[0].points.iter().all(|p| (p.x - 50.0).abs() > 10.0));
    assert_eq!(
        *seen.lock().unwrap(),
        [
            SurfaceEvent::PointerDown,
            SurfaceEvent::ObjectModified(long),
            SurfaceEvent::ObjectRemoved(short),
            SurfaceEvent::EraseCompleted,
            SurfaceEvent::PointerUp,
        ]
    );
}

#[test]
fn eraser_skips_non_erasable_strokes() {
    let sketch = Sketch::open(100, 100).unwrap();
    sketch.gesture(&line(0.0, 10.0));
    sketch.set_brush(&Brush::eraser());
    sketch.gesture(&line(0.0, 10.0));
    assert_eq!(sketch.strokes()[0].points.len(), 3);
}

// =============================================================================
// codec
// =============================================================================

#[tokio::test]
async fn capture_restore_round_trip() {
    let sketch = Sketch::open(100, 100).unwrap();
    sketch.gesture(&line(0.0, 10.0));
    let token = sketch.capture().unwrap();
    let before = sketch.strokes();

    sketch.gesture(&line(20.0, 30.0));
    assert_eq!(sketch.strokes().len(), 2);

    sketch.restore(&token).await.unwrap();
    assert_eq!(sketch.strokes(), before);
    assert_eq!(sketch.capture().unwrap(), token);
}

#[tokio::test]
async fn restore_emits_object_added_per_stroke() {
    let sketch = Sketch::open(100, 100).unwrap();
    sketch.gesture(&line(0.0, 10.0));
    sketch.gesture(&line(20.0, 30.0));
    let token = sketch.capture().unwrap();
    let seen = recorder(&sketch);

    sketch.clear();
    sketch.restore(&token).await.unwrap();

    let events = seen.lock().unwrap().clone();
    let removed = events.iter().filter(|e| matches!(e, SurfaceEvent::ObjectRemoved(_))).count();
    let added = events.iter().filter(|e| matches!(e, SurfaceEvent::ObjectAdded(_))).count();
    assert_eq!(removed, 2);
    assert_eq!(added, 2);
}

#[tokio::test]
async fn restore_rejects_malformed_token() {
    let sketch = Sketch::open(100, 100).unwrap();
    let err = sketch.restore(&Token::from("not json")).await.unwrap_err();
    assert!(matches!(err, CodecError::Decode(_)));
}

#[tokio::test]
async fn restore_after_dispose_is_rejected() {
    let sketch = Sketch::open(100, 100).unwrap();
    let token = sketch.capture().unwrap();
    sketch.dispose().unwrap();
    assert!(matches!(sketch.restore(&token).await, Err(CodecError::Rejected(_))));
}

#[test]
fn listeners_can_call_back_into_sketch() {
    let sketch = Sketch::open(100, 100).unwrap();
    let weak = Arc::downgrade(&sketch);
    sketch.subscribe(Arc::new(move |event: SurfaceEvent| {
        if let (SurfaceEvent::ObjectAdded(id), Some(sketch)) = (event, weak.upgrade()) {
            sketch.set_erasable(id, true);
            let _ = sketch.capture();
        }
    }));

    sketch.gesture(&line(0.0, 10.0));
    assert!(sketch.strokes()[0].erasable);
}

#[test]
fn unsubscribe_removes_listener() {
    let sketch = Sketch::open(100, 100).unwrap();
    let id = sketch.subscribe(Arc::new(|_: SurfaceEvent| {}));
    assert!(sketch.unsubscribe(id));
    assert!(!sketch.unsubscribe(id));
}
