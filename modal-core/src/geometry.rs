//! Placement math for the dialog inside its overlay.

/// Minimum gap kept between the dialog and the overlay edges.
pub const EDGE_PADDING: f64 = 12.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bounding box in client coordinates, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Offset of this rect's origin relative to `container`'s origin.
    pub fn offset_within(&self, container: &Rect) -> Point {
        Point::new(self.x - container.x, self.y - container.y)
    }
}

/// Explicit `left`/`top` of the dialog inside the overlay, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Browser-style rounding: halves round towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Center `dialog` in `container`, never closer than [`EDGE_PADDING`] to
/// the top-left edges.
pub fn centered(container: Size, dialog: Size) -> Position {
    Position::new(
        EDGE_PADDING.max(round_half_up((container.width - dialog.width) / 2.0)),
        EDGE_PADDING.max(round_half_up((container.height - dialog.height) / 2.0)),
    )
}

/// Clamp one axis into `[EDGE_PADDING, container - dialog - EDGE_PADDING]`.
///
/// When the dialog is larger than the container the upper bound collapses
/// to zero and wins over the padding.
fn clamp_axis(candidate: f64, container: f64, dialog: f64) -> f64 {
    let max = (container - dialog - EDGE_PADDING).max(0.0);
    candidate.max(EDGE_PADDING).min(max)
}

pub fn clamp_to_container(candidate: Position, container: Size, dialog: Size) -> Position {
    Position::new(
        clamp_axis(candidate.left, container.width, dialog.width),
        clamp_axis(candidate.top, container.height, dialog.height),
    )
}

/// Everything a drag gesture needs to remember from its pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOrigin {
    pub pointer: Point,
    pub dialog: Point,
    pub container: Size,
    pub dialog_size: Size,
}

impl DragOrigin {
    /// Clamped dialog position for the pointer now at `pointer`.
    pub fn position_for(&self, pointer: Point) -> Position {
        let dx = pointer.x - self.pointer.x;
        let dy = pointer.y - self.pointer.y;
        let candidate = Position::new(
            round_half_up(self.dialog.x + dx),
            round_half_up(self.dialog.y + dy),
        );
        clamp_to_container(candidate, self.container, self.dialog_size)
    }
}
