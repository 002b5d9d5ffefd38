//! Core types for spark-core.
//!
//! Plain value types shared by the style descriptor, the retained tree and
//! the layout engine. All geometry is integer pixels.

use bitflags::bitflags;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Sum of all four channels.
    ///
    /// This is what the structural hash sees of a text color, so two colors
    /// with the same channel sum are indistinguishable to reconciliation.
    #[inline]
    pub const fn channel_sum(&self) -> i32 {
        self.r as i32 + self.g as i32 + self.b as i32 + self.a as i32
    }

    /// Pack into `0xRRGGBBAA`.
    #[inline]
    pub const fn packed(&self) -> u32 {
        ((self.r as u8 as u32) << 24)
            | ((self.g as u8 as u32) << 16)
            | ((self.b as u8 as u32) << 8)
            | (self.a as u8 as u32)
    }

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

// =============================================================================
// Sizing
// =============================================================================

/// Per-axis sizing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Sizing {
    /// Use the explicit size, clamped to min/max.
    Fixed = 0,
    /// Take a share of whatever the parent has left over.
    FillRemaining = 1,
    /// Shrink or grow to the measured content.
    #[default]
    FitContent = 2,
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub const fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Order in which a container sequences its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FlowDirection {
    #[default]
    LeftToRight = 0,
    RightToLeft = 1,
    TopToBottom = 2,
    BottomToTop = 3,
}

impl FlowDirection {
    /// Main axis of the flow.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            FlowDirection::LeftToRight | FlowDirection::RightToLeft => Axis::Horizontal,
            FlowDirection::TopToBottom | FlowDirection::BottomToTop => Axis::Vertical,
        }
    }

    /// Whether children are walked last-to-first.
    #[inline]
    pub const fn is_reverse(self) -> bool {
        matches!(self, FlowDirection::RightToLeft | FlowDirection::BottomToTop)
    }
}

bitflags! {
    /// Centering flags for a container's children.
    ///
    /// The flag for the cross axis always applies when there is slack; the
    /// main-axis flag only applies when the container has a single child.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Center: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const BOTH = Self::X.bits() | Self::Y.bits();
    }
}

impl Center {
    /// Whether children are centered along `axis`.
    #[inline]
    pub fn on(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Center::X),
            Axis::Vertical => self.contains(Center::Y),
        }
    }
}

// =============================================================================
// Edges
// =============================================================================

/// Four-sided spacing (margins, padding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Edges {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Edges {
    pub const ZERO: Self = Self::all(0);

    /// Same value on every side.
    pub const fn all(v: i32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// `horizontal` on left/right, `vertical` on top/bottom.
    pub const fn symmetric(horizontal: i32, vertical: i32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Left + right.
    #[inline]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Top + bottom.
    #[inline]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Leading edge along `axis` (left or top).
    #[inline]
    pub const fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Trailing edge along `axis` (right or bottom).
    #[inline]
    pub const fn end(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }

    /// Both edges along `axis`.
    #[inline]
    pub const fn sum(&self, axis: Axis) -> i32 {
        self.start(axis) + self.end(axis)
    }
}

// =============================================================================
// Rect
// =============================================================================

/// Resolved position and size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-size rectangle at the given origin.
    pub const fn zero_at(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, 0)
    }

    /// True if the point lies inside (right/bottom edges exclusive).
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    /// Shrink by `edges`. Size may go negative; callers treat that as degenerate.
    pub const fn inset(&self, edges: Edges) -> Rect {
        Rect {
            x: self.x + edges.left,
            y: self.y + edges.top,
            width: self.width - edges.horizontal(),
            height: self.height - edges.vertical(),
        }
    }

    /// Size along `axis`.
    #[inline]
    pub const fn size(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Origin along `axis`.
    #[inline]
    pub const fn origin(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Build a rect from main/cross components.
    #[inline]
    pub const fn from_axes(
        main: Axis,
        main_pos: i32,
        cross_pos: i32,
        main_size: i32,
        cross_size: i32,
    ) -> Rect {
        match main {
            Axis::Horizontal => Rect::new(main_pos, cross_pos, main_size, cross_size),
            Axis::Vertical => Rect::new(cross_pos, main_pos, cross_size, main_size),
        }
    }
}

// =============================================================================
// Node Kinds
// =============================================================================

/// Node type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum NodeKind {
    #[default]
    Container = 0,
    Rect = 1,
    Image = 2,
    Text = 3,
}

impl NodeKind {
    /// Only containers may hold children.
    #[inline]
    pub const fn is_leaf(self) -> bool {
        !matches!(self, NodeKind::Container)
    }
}

/// Horizontal justification of wrapped text lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TextAlign {
    #[default]
    Start = 0,
    Center = 1,
    End = 2,
}

// =============================================================================
// Tests
// =============================================================================
