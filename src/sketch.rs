//! In-memory freehand document implementing the codec and surface boundaries.
//!
//! DESIGN
//! ======
//! A `Sketch` owns a list of strokes and the current brush. Gestures mutate
//! the stroke list and then emit the same event sequence a canvas engine
//! would: pointer-down, per-object notifications, a completion event, and
//! pointer-up. Snapshots are the JSON form of the stroke list.
//!
//! Events are collected while the document lock is held and delivered after
//! it is released, so listeners may call straight back into the sketch
//! (capture, `set_erasable`) without deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::codec::{SnapshotCodec, Token};
use crate::error::{CodecError, SurfaceError};
use crate::surface::{DocumentSurface, EventListener, ListenerId, ObjectId, SurfaceEvent};
use crate::tools::{Brush, ToolKind};

pub const DEFAULT_SIZE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn within(self, other: Point, radius: f64) -> bool {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy <= radius * radius
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: ObjectId,
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
    /// Only erasable strokes are affected by the eraser.
    #[serde(default)]
    pub erasable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SketchDoc {
    strokes: Vec<Stroke>,
}

struct SketchInner {
    doc: SketchDoc,
    brush: Brush,
    drawing_mode: bool,
    disposed: bool,
    renders: u64,
}

pub struct Sketch {
    width: u32,
    height: u32,
    inner: Mutex<SketchInner>,
    listeners: Mutex<Vec<(ListenerId, EventListener)>>,
    next_listener: AtomicU64,
}

impl Sketch {
    /// Create an empty sketch in drawing mode with the default pen.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Initialization`] for a zero-sized surface.
    pub fn open(width: u32, height: u32) -> Result<Arc<Self>, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::Initialization(format!("invalid surface size {width}x{height}")));
        }
        Ok(Arc::new(Self {
            width,
            height,
            inner: Mutex::new(SketchInner {
                doc: SketchDoc::default(),
                brush: Brush::default(),
                drawing_mode: true,
                disposed: false,
                renders: 0,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }))
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn strokes(&self) -> Vec<Stroke> {
        self.lock().doc.strokes.clone()
    }

    #[must_use]
    pub fn brush(&self) -> Brush {
        self.lock().brush.clone()
    }

    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.lock().renders
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// Apply one pointer gesture with the current brush.
    ///
    /// Ignored when drawing mode is off, the sketch is disposed, or `points`
    /// is empty.
    pub fn gesture(&self, points: &[Point]) {
        let events = {
            let mut inner = self.lock();
            if inner.disposed || !inner.drawing_mode || points.is_empty() {
                return;
            }
            match inner.brush.kind {
                ToolKind::Pen => draw_stroke(&mut inner, points),
                ToolKind::Eraser => erase_along(&mut inner, points),
            }
        };
        self.emit(&events);
    }

    fn lock(&self) -> MutexGuard<'_, SketchInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, events: &[SurfaceEvent]) {
        let listeners: Vec<EventListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for event in events {
            for listener in &listeners {
                listener(*event);
            }
        }
    }
}

fn draw_stroke(inner: &mut SketchInner, points: &[Point]) -> Vec<SurfaceEvent> {
    let stroke = Stroke {
        id: Uuid::new_v4(),
        points: points.to_vec(),
        color: inner.brush.color.clone(),
        width: inner.brush.width,
        erasable: false,
    };
    let id = stroke.id;
    inner.doc.strokes.push(stroke);
    vec![
        SurfaceEvent::PointerDown,
        SurfaceEvent::ObjectAdded(id),
        SurfaceEvent::StrokeCompleted,
        SurfaceEvent::PointerUp,
    ]
}

fn erase_along(inner: &mut SketchInner, path: &[Point]) -> Vec<SurfaceEvent> {
    let radius = inner.brush.width / 2.0;
    let mut events = vec![SurfaceEvent::PointerDown];

    inner.doc.strokes.retain_mut(|stroke| {
        if !stroke.erasable {
            return true;
        }
        let before = stroke.points.len();
        stroke
            .points
            .retain(|p| !path.iter().any(|e| p.within(*e, radius)));
        if stroke.points.is_empty() {
            events.push(SurfaceEvent::ObjectRemoved(stroke.id));
            false
        } else {
            if stroke.points.len() != before {
                events.push(SurfaceEvent::ObjectModified(stroke.id));
            }
            true
        }
    });

    events.push(SurfaceEvent::EraseCompleted);
    events.push(SurfaceEvent::PointerUp);
    events
}

#[async_trait::async_trait]
impl SnapshotCodec for Sketch {
    fn capture(&self) -> Result<Token, CodecError> {
        let inner = self.lock();
        serde_json::to_string(&inner.doc)
            .map(Token::from)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    async fn restore(&self, token: &Token) -> Result<(), CodecError> {
        // Loading is asynchronous in real engines; let other work interleave.
        tokio::task::yield_now().await;

        let doc: SketchDoc = serde_json::from_str(token.as_str()).map_err(|e| CodecError::Decode(e.to_string()))?;
        let events = {
            let mut inner = self.lock();
            if inner.disposed {
                return Err(CodecError::Rejected("surface disposed".into()));
            }
            let events: Vec<SurfaceEvent> = doc
                .strokes
                .iter()
                .map(|s| SurfaceEvent::ObjectAdded(s.id))
                .collect();
            inner.doc = doc;
            events
        };
        debug!(objects = events.len(), "sketch restored");
        self.emit(&events);
        Ok(())
    }
}

impl DocumentSurface for Sketch {
    fn clear(&self) {
        let events: Vec<SurfaceEvent> = {
            let mut inner = self.lock();
            inner
                .doc
                .strokes
                .drain(..)
                .map(|s| SurfaceEvent::ObjectRemoved(s.id))
                .collect()
        };
        self.emit(&events);
    }

    fn render(&self) {
        self.lock().renders += 1;
    }

    fn set_drawing_mode(&self, enabled: bool) {
        self.lock().drawing_mode = enabled;
    }

    fn drawing_mode(&self) -> bool {
        self.lock().drawing_mode
    }

    fn set_brush(&self, brush: &Brush) {
        self.lock().brush = brush.clone();
    }

    fn set_erasable(&self, id: ObjectId, erasable: bool) {
        let mut inner = self.lock();
        if let Some(stroke) = inner.doc.strokes.iter_mut().find(|s| s.id == id) {
            stroke.erasable = erasable;
        }
    }

    fn subscribe(&self, listener: EventListener) -> ListenerId {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn dispose(&self) -> Result<(), SurfaceError> {
        let mut inner = self.lock();
        if inner.disposed {
            return Err(SurfaceError::Teardown("sketch already disposed".into()));
        }
        inner.disposed = true;
        inner.drawing_mode = false;
        drop(inner);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "sketch_test.rs"]
mod tests;
