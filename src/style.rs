//! Style Descriptor - the inert per-node property bundle.
//!
//! A `Style` carries sizing, spacing, colors, text properties and callback
//! handles for one node. It has no tree-structural pointers and is cheap to
//! clone: strings are `Rc<str>` and callbacks are `Rc<dyn Fn>`.
//!
//! # Example
//!
//! ```ignore
//! use spark_core::{Style, Rgba, Edges};
//!
//! let header = Style::row()
//!     .fill_width()
//!     .fixed_height(40)
//!     .padding(Edges::symmetric(8, 4))
//!     .background(Rgba::GRAY);
//! ```

use std::fmt;
use std::rc::Rc;

use crate::types::{Axis, Center, Edges, FlowDirection, Rgba, Sizing, TextAlign};

// =============================================================================
// Callback Types
// =============================================================================

/// Click callback (Rc for shared ownership in closures).
pub type ClickCallback = Rc<dyn Fn()>;

/// Hover callback; receives `true` on enter and `false` on leave.
pub type HoverCallback = Rc<dyn Fn(bool)>;

// =============================================================================
// Style
// =============================================================================

/// Per-node style descriptor.
#[derive(Clone)]
pub struct Style {
    /// Opaque identifier used by `find_by_id`.
    pub id: Option<Rc<str>>,

    pub width_sizing: Sizing,
    pub height_sizing: Sizing,
    /// Explicit width, used by `Sizing::Fixed`.
    pub width: i32,
    /// Explicit height, used by `Sizing::Fixed`.
    pub height: i32,
    pub min_width: i32,
    pub min_height: i32,
    /// Maximum width (0 = unbounded).
    pub max_width: i32,
    /// Maximum height (0 = unbounded).
    pub max_height: i32,

    pub margin: Edges,
    pub padding: Edges,
    pub flow: FlowDirection,
    pub center: Center,

    pub background: Rgba,
    pub border_color: Rgba,
    pub border_width: i32,
    pub radius: i32,

    /// Text content (Text leaves).
    pub text: Option<Rc<str>>,
    /// Image path (Image leaves).
    pub image: Option<Rc<str>>,
    pub font_size: i32,
    /// Line height (0 = same as font size).
    pub line_height: i32,
    pub wrap: bool,
    pub justify: TextAlign,
    pub text_color: Rgba,

    pub on_click: Option<ClickCallback>,
    pub on_hover: Option<HoverCallback>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            id: None,
            width_sizing: Sizing::FitContent,
            height_sizing: Sizing::FitContent,
            width: 0,
            height: 0,
            min_width: 0,
            min_height: 0,
            max_width: 0,
            max_height: 0,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            flow: FlowDirection::LeftToRight,
            center: Center::empty(),
            background: Rgba::TRANSPARENT,
            border_color: Rgba::TRANSPARENT,
            border_width: 0,
            radius: 0,
            text: None,
            image: None,
            font_size: 16,
            line_height: 0,
            wrap: true,
            justify: TextAlign::Start,
            text_color: Rgba::WHITE,
            on_click: None,
            on_hover: None,
        }
    }
}

struct DebugifyOption<'a, T>(&'a Option<T>);
impl<T> fmt::Debug for DebugifyOption<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_some() {
            write!(f, "Some(..)")
        } else {
            write!(f, "None")
        }
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Style")
            .field("id", &self.id)
            .field("width_sizing", &self.width_sizing)
            .field("height_sizing", &self.height_sizing)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("min", &(self.min_width, self.min_height))
            .field("max", &(self.max_width, self.max_height))
            .field("margin", &self.margin)
            .field("padding", &self.padding)
            .field("flow", &self.flow)
            .field("center", &self.center)
            .field("background", &self.background)
            .field("text", &self.text)
            .field("image", &self.image)
            .field("font_size", &self.font_size)
            .field("text_color", &self.text_color)
            .field("on_click", &DebugifyOption(&self.on_click))
            .field("on_hover", &DebugifyOption(&self.on_hover))
            .finish_non_exhaustive()
    }
}

impl Style {
    /// A left-to-right container style.
    pub fn row() -> Self {
        Self::default()
    }

    /// A top-to-bottom container style.
    pub fn column() -> Self {
        Self {
            flow: FlowDirection::TopToBottom,
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Per-axis accessors (used by the layout engine)
    // -------------------------------------------------------------------------

    #[inline]
    pub fn sizing(&self, axis: Axis) -> Sizing {
        match axis {
            Axis::Horizontal => self.width_sizing,
            Axis::Vertical => self.height_sizing,
        }
    }

    #[inline]
    pub fn explicit(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    #[inline]
    pub fn min(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }

    #[inline]
    pub fn max(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.max_width,
            Axis::Vertical => self.max_height,
        }
    }

    /// Clamp `value` to this style's min/max on `axis`.
    ///
    /// Max wins over min when they conflict, and the result is never negative.
    pub fn clamp(&self, axis: Axis, value: i32) -> i32 {
        let mut v = value.max(self.min(axis));
        let max = self.max(axis);
        if max > 0 && v > max {
            v = max;
        }
        v.max(0)
    }

    /// Effective line height for text.
    #[inline]
    pub fn effective_line_height(&self) -> i32 {
        if self.line_height > 0 {
            self.line_height
        } else {
            self.font_size.max(0)
        }
    }

    /// Compare every visual field, ignoring callbacks.
    pub fn visual_eq(&self, other: &Style) -> bool {
        self.id == other.id
            && self.width_sizing == other.width_sizing
            && self.height_sizing == other.height_sizing
            && self.width == other.width
            && self.height == other.height
            && self.min_width == other.min_width
            && self.min_height == other.min_height
            && self.max_width == other.max_width
            && self.max_height == other.max_height
            && self.margin == other.margin
            && self.padding == other.padding
            && self.flow == other.flow
            && self.center == other.center
            && self.background == other.background
            && self.border_color == other.border_color
            && self.border_width == other.border_width
            && self.radius == other.radius
            && self.text == other.text
            && self.image == other.image
            && self.font_size == other.font_size
            && self.line_height == other.line_height
            && self.wrap == other.wrap
            && self.justify == other.justify
            && self.text_color == other.text_color
    }

    // -------------------------------------------------------------------------
    // Builder methods
    // -------------------------------------------------------------------------

    pub fn id(mut self, id: impl Into<Rc<str>>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Fixed size on both axes.
    pub fn fixed(self, width: i32, height: i32) -> Self {
        self.fixed_width(width).fixed_height(height)
    }

    pub fn fixed_width(mut self, width: i32) -> Self {
        self.width_sizing = Sizing::Fixed;
        self.width = width;
        self
    }

    pub fn fixed_height(mut self, height: i32) -> Self {
        self.height_sizing = Sizing::Fixed;
        self.height = height;
        self
    }

    /// Fill remaining space on both axes.
    pub fn fill(self) -> Self {
        self.fill_width().fill_height()
    }

    pub fn fill_width(mut self) -> Self {
        self.width_sizing = Sizing::FillRemaining;
        self
    }

    pub fn fill_height(mut self) -> Self {
        self.height_sizing = Sizing::FillRemaining;
        self
    }

    /// Fit content on both axes.
    pub fn fit(mut self) -> Self {
        self.width_sizing = Sizing::FitContent;
        self.height_sizing = Sizing::FitContent;
        self
    }

    pub fn min_size(mut self, width: i32, height: i32) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    pub fn max_size(mut self, width: i32, height: i32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    pub fn margin(mut self, margin: Edges) -> Self {
        self.margin = margin;
        self
    }

    pub fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    pub fn flow(mut self, flow: FlowDirection) -> Self {
        self.flow = flow;
        self
    }

    pub fn center(mut self, center: Center) -> Self {
        self.center = center;
        self
    }

    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    pub fn border(mut self, width: i32, color: Rgba) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }

    pub fn radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    pub fn text(mut self, content: impl Into<Rc<str>>) -> Self {
        self.text = Some(content.into());
        self
    }

    pub fn image(mut self, path: impl Into<Rc<str>>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn font(mut self, size: i32, line_height: i32) -> Self {
        self.font_size = size;
        self.line_height = line_height;
        self
    }

    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn justify(mut self, justify: TextAlign) -> Self {
        self.justify = justify;
        self
    }

    pub fn text_color(mut self, color: Rgba) -> Self {
        self.text_color = color;
        self
    }

    pub fn on_click(mut self, f: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    pub fn on_hover(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_hover = Some(Rc::new(f));
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
