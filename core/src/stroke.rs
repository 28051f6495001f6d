//! Stroke capture.
//!
//! A `StrokeModel` accumulates pen input into an ordered list of strokes.
//! Points are appended to the open stroke while the pen moves; the stroke is
//! committed to the model when the pen is released and never changes again.
//! Only committed strokes are looked up, saved, or counted by `is_empty()`.

/// A pixel coordinate recorded from the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// One pen-down to pen-up path, in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at the pen-down position.
    pub fn starting_at(point: Point) -> Self {
        Stroke {
            points: vec![point],
        }
    }

    /// Build a stroke from already recorded points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Stroke { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn push(&mut self, point: Point) {
        self.points.push(point);
    }
}

/// All strokes drawn for the current character, plus the annotate display hint.
#[derive(Debug, Clone, Default)]
pub struct StrokeModel {
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    annotate: bool,
}

impl StrokeModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pen pressed: open a new stroke.
    ///
    /// A stroke still open (pen-up never arrived) is committed first so the
    /// drawing order is kept.
    pub fn begin_stroke(&mut self, point: Point) {
        self.end_stroke();
        self.current = Some(Stroke::starting_at(point));
    }

    /// Pen moved: append to the open stroke.
    /// Returns false when no stroke is open.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        match self.current.as_mut() {
            Some(stroke) => {
                stroke.push(point);
                true
            }
            None => false,
        }
    }

    /// Pen released: commit the open stroke.
    /// Returns true if a stroke was committed.
    pub fn end_stroke(&mut self) -> bool {
        match self.current.take() {
            Some(stroke) => {
                self.strokes.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Append a complete stroke.
    pub fn push_stroke(&mut self, stroke: Stroke) {
        self.end_stroke();
        self.strokes.push(stroke);
    }

    /// Committed strokes in drawing order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// The stroke being drawn, if the pen is down.
    pub fn current_stroke(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// True when there is nothing to look up or save.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Drop every stroke, including one still being drawn.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
    }

    pub fn annotate(&self) -> bool {
        self.annotate
    }

    pub fn set_annotate(&mut self, annotate: bool) {
        self.annotate = annotate;
    }

    /// Flip the annotate flag and return the new value.
    pub fn toggle_annotate(&mut self) -> bool {
        self.annotate = !self.annotate;
        self.annotate
    }
}
