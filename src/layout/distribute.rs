//! Distribution - assign a Rect to every child, top-down.
//!
//! Per container:
//!
//! 1. Widths are resolved before heights, whichever axis is main. A FitContent
//!    child's height is then measured at the width it was just given, all the
//!    way down its subtree, so wrapped text inside a card grows the card.
//! 2. FillRemaining children split what is left on the main axis:
//!    `remaining = available - Σ fixed/fit - Σ margins - Σ fill padding`.
//!    Each gets `remaining / n`, and the first `remaining % n` get one more
//!    pixel, so nothing drifts.
//! 3. A cursor walks the children in flow order (last-to-first for reverse
//!    flows) and places them. Cross-axis centering applies when there is
//!    slack; main-axis centering only when there is a single child.
//! 4. Recurse into each child.
//!
//! A container with no usable content area collapses every child to a
//! zero-size rect at its content origin and still recurses.

use tracing::{trace, warn};

use crate::engine::{NodeId, RetainedTree};
use crate::error::Result;
use crate::types::{Axis, NodeKind, Rect, Sizing};
use super::measure::Measurer;
use super::text_measure::{FontMetrics, TextMeasure};

/// One child's resolved extent inside its parent.
#[derive(Debug, Clone, Copy)]
struct Slot {
    id: NodeId,
    width: i32,
    height: i32,
}

impl Slot {
    fn size(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    fn size_mut(&mut self, axis: Axis) -> &mut i32 {
        match axis {
            Axis::Horizontal => &mut self.width,
            Axis::Vertical => &mut self.height,
        }
    }
}

/// Lay out the children of `container`, whose own rect is already set.
pub fn layout_children(
    tree: &mut RetainedTree,
    container: NodeId,
    measure: &dyn TextMeasure,
) -> Result<()> {
    let mut measurer = Measurer::new(measure);
    layout_node(tree, container, &mut measurer)
}

/// Resolve `root` against `viewport`, then lay out everything below it.
///
/// Fixed uses the explicit size, FillRemaining takes the viewport (minus
/// margins) and FitContent takes the measured minimum. A FitContent height
/// is measured at the width just resolved.
pub fn layout_root(
    tree: &mut RetainedTree,
    root: NodeId,
    viewport: Rect,
    measure: &dyn TextMeasure,
) -> Result<()> {
    let mut measurer = Measurer::new(measure);
    let style = &tree.expect_node(root)?.style;
    let margin = style.margin;

    let width = match style.width_sizing {
        Sizing::Fixed => style.clamp(Axis::Horizontal, style.explicit(Axis::Horizontal)),
        Sizing::FillRemaining => {
            style.clamp(Axis::Horizontal, viewport.width - margin.horizontal())
        }
        Sizing::FitContent => measurer.min(tree, root, Axis::Horizontal),
    };
    let height = match style.height_sizing {
        Sizing::Fixed => style.clamp(Axis::Vertical, style.explicit(Axis::Vertical)),
        Sizing::FillRemaining => style.clamp(Axis::Vertical, viewport.height - margin.vertical()),
        Sizing::FitContent => fit_height(tree, &mut measurer, root, width),
    };

    let rect = Rect::new(viewport.x + margin.left, viewport.y + margin.top, width, height);
    trace!(?root, ?rect, "root resolved");
    tree.set_rect(root, rect);
    layout_node(tree, root, &mut measurer)
}

fn layout_node(tree: &mut RetainedTree, container: NodeId, measurer: &mut Measurer) -> Result<()> {
    let node = tree.expect_node(container)?;
    if node.children.is_empty() {
        return Ok(());
    }

    let style = &node.style;
    let flow = style.flow;
    let center = style.center;
    let content = node.rect.inset(style.padding);
    let children: Vec<NodeId> = node
        .children
        .iter()
        .filter_map(|&c| tree.resolve(c))
        .collect();

    if content.width <= 0 || content.height <= 0 {
        if content.width < 0 || content.height < 0 {
            warn!(?container, ?content, "padding exceeds container, collapsing children");
        }
        for &child in &children {
            tree.set_rect(child, Rect::zero_at(content.x, content.y));
            layout_node(tree, child, measurer)?;
        }
        return Ok(());
    }

    let main = flow.axis();
    let cross = main.cross();
    let mut slots: Vec<Slot> = children
        .iter()
        .map(|&id| Slot { id, width: 0, height: 0 })
        .collect();

    // Widths first, then heights, so text can reflow at its resolved width.
    for axis in [Axis::Horizontal, Axis::Vertical] {
        if axis == main {
            resolve_main(tree, measurer, &mut slots, main, content.size(main));
        } else {
            resolve_cross(tree, measurer, &mut slots, cross, content.size(cross));
        }
    }

    // Placement.
    let used: i32 = slots
        .iter()
        .map(|s| s.size(main) + margin_sum(tree, s.id, main))
        .sum();
    let mut cursor = content.origin(main);
    if slots.len() == 1 && center.on(main) && content.size(main) > used {
        cursor += (content.size(main) - used) / 2;
    }

    let order: Box<dyn Iterator<Item = &Slot>> = if flow.is_reverse() {
        Box::new(slots.iter().rev())
    } else {
        Box::new(slots.iter())
    };

    let mut placed = Vec::with_capacity(slots.len());
    for slot in order {
        let margin = tree.expect_node(slot.id)?.style.margin;
        let main_size = slot.size(main);
        let cross_size = slot.size(cross);

        let main_pos = cursor + margin.start(main);
        cursor = main_pos + main_size + margin.end(main);

        let mut cross_pos = content.origin(cross) + margin.start(cross);
        let slack = content.size(cross) - cross_size - margin.sum(cross);
        if center.on(cross) && slack > 0 {
            cross_pos += slack / 2;
        }

        placed.push((slot.id, Rect::from_axes(main, main_pos, cross_pos, main_size, cross_size)));
    }

    for (id, rect) in placed {
        tree.set_rect(id, rect);
        layout_node(tree, id, measurer)?;
    }
    Ok(())
}

fn margin_sum(tree: &RetainedTree, id: NodeId, axis: Axis) -> i32 {
    tree.node(id).map_or(0, |n| n.style.margin.sum(axis))
}

/// Height `id` needs once it has been given `width`.
///
/// Wrapping text reflows at `width`. A container resolves its children's
/// widths exactly as distribution will, then stacks their heights at those
/// widths, so text nested at any depth pushes its ancestors' siblings down.
fn fit_height(tree: &RetainedTree, measurer: &mut Measurer, id: NodeId, width: i32) -> i32 {
    if let Some(hit) = measurer.height_at(id, width) {
        return hit;
    }
    let Some(node) = tree.node(id) else {
        return 0;
    };

    let style = &node.style;
    let height = match (style.height_sizing, node.kind) {
        (Sizing::Fixed, _) => style.clamp(Axis::Vertical, style.explicit(Axis::Vertical)),
        (_, NodeKind::Text) if style.wrap => {
            let content = style.text.as_deref().unwrap_or("");
            let extent = measurer
                .text()
                .measure(content, Some(width), FontMetrics::of(style));
            style.clamp(Axis::Vertical, extent.height)
        }
        (_, NodeKind::Container) => {
            let inner = width - style.padding.horizontal();
            let children: Vec<NodeId> = node
                .children
                .iter()
                .filter_map(|&c| tree.resolve(c))
                .collect();
            if children.is_empty() || inner <= 0 {
                measurer.min(tree, id, Axis::Vertical)
            } else {
                let stacked = stacked_height(tree, measurer, &children, style.flow.axis(), inner);
                style.clamp(Axis::Vertical, stacked + style.padding.vertical())
            }
        }
        _ => measurer.min(tree, id, Axis::Vertical),
    };

    measurer.store_height_at(id, width, height);
    height
}

/// Children's heights (plus vertical margins) at the widths they would get
/// from a content box `inner` wide: summed in a column, maxed in a row.
fn stacked_height(
    tree: &RetainedTree,
    measurer: &mut Measurer,
    children: &[NodeId],
    main: Axis,
    inner: i32,
) -> i32 {
    let mut slots: Vec<Slot> = children
        .iter()
        .map(|&id| Slot { id, width: 0, height: 0 })
        .collect();
    match main {
        Axis::Horizontal => resolve_main(tree, measurer, &mut slots, Axis::Horizontal, inner),
        Axis::Vertical => resolve_cross(tree, measurer, &mut slots, Axis::Horizontal, inner),
    }

    let mut total = 0;
    for slot in &slots {
        let extent = fit_height(tree, measurer, slot.id, slot.width)
            + margin_sum(tree, slot.id, Axis::Vertical);
        match main {
            Axis::Vertical => total += extent,
            Axis::Horizontal => total = total.max(extent),
        }
    }
    total
}

fn resolve_cross(
    tree: &RetainedTree,
    measurer: &mut Measurer,
    slots: &mut [Slot],
    axis: Axis,
    available: i32,
) {
    for slot in slots.iter_mut() {
        let Some(node) = tree.node(slot.id) else {
            continue;
        };
        let style = &node.style;
        let size = match style.sizing(axis) {
            Sizing::Fixed => style.clamp(axis, style.explicit(axis)),
            Sizing::FillRemaining => style.clamp(axis, available - style.margin.sum(axis)),
            Sizing::FitContent => match axis {
                Axis::Vertical => fit_height(tree, measurer, slot.id, slot.width),
                Axis::Horizontal => measurer.min(tree, slot.id, axis),
            },
        };
        *slot.size_mut(axis) = size;
    }
}

fn resolve_main(
    tree: &RetainedTree,
    measurer: &mut Measurer,
    slots: &mut [Slot],
    axis: Axis,
    available: i32,
) {
    let mut taken = 0;
    let mut fill = Vec::new();

    for (i, slot) in slots.iter_mut().enumerate() {
        let Some(node) = tree.node(slot.id) else {
            continue;
        };
        let style = &node.style;
        taken += style.margin.sum(axis);
        let size = match style.sizing(axis) {
            Sizing::Fixed => style.clamp(axis, style.explicit(axis)),
            Sizing::FitContent => match axis {
                Axis::Vertical => fit_height(tree, measurer, slot.id, slot.width),
                Axis::Horizontal => measurer.min(tree, slot.id, axis),
            },
            Sizing::FillRemaining => {
                let padding = style.padding.sum(axis);
                taken += padding;
                fill.push((i, padding));
                continue;
            }
        };
        taken += size;
        *slot.size_mut(axis) = size;
    }

    if fill.is_empty() {
        return;
    }

    let remaining = (available - taken).max(0);
    let n = fill.len() as i32;
    let share = remaining / n;
    let extra = remaining % n;
    trace!(remaining, fill = n, share, extra, "distributing remaining space");

    for (k, (i, padding)) in fill.into_iter().enumerate() {
        let bonus = i32::from((k as i32) < extra);
        *slots[i].size_mut(axis) = share + bonus + padding;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Child;
    use crate::layout::MonospaceMeasure;
    use crate::style::Style;
    use crate::types::{Center, Edges, FlowDirection};

    fn setup() -> (RetainedTree, MonospaceMeasure) {
        (RetainedTree::default(), MonospaceMeasure::new(100))
    }

    fn add(tree: &mut RetainedTree, parent: NodeId, kind: NodeKind, style: Style) -> NodeId {
        let id = tree.create_node(kind, style);
        tree.append_child(parent, Child::Owned(id)).unwrap();
        id
    }

    fn root(tree: &mut RetainedTree, style: Style, rect: Rect) -> NodeId {
        let id = tree.create_node(NodeKind::Container, style);
        tree.set_rect(id, rect);
        id
    }

    #[test]
    fn test_fill_even_split() {
        let (mut tree, m) = setup();
        let row = root(&mut tree, Style::row().fixed(300, 50), Rect::new(0, 0, 300, 50));
        let kids: Vec<_> = (0..3)
            .map(|_| add(&mut tree, row, NodeKind::Rect, Style::default().fill()))
            .collect();

        layout_children(&mut tree, row, &m).unwrap();

        assert_eq!(tree.rect(kids[0]), Rect::new(0, 0, 100, 50));
        assert_eq!(tree.rect(kids[1]), Rect::new(100, 0, 100, 50));
        assert_eq!(tree.rect(kids[2]), Rect::new(200, 0, 100, 50));
    }

    #[test]
    fn test_fill_remainder_goes_first() {
        let (mut tree, m) = setup();
        let row = root(&mut tree, Style::row(), Rect::new(0, 0, 302, 10));
        let kids: Vec<_> = (0..3)
            .map(|_| add(&mut tree, row, NodeKind::Rect, Style::default().fill_width()))
            .collect();

        layout_children(&mut tree, row, &m).unwrap();

        let widths: Vec<_> = kids.iter().map(|&k| tree.rect(k).width).collect();
        assert_eq!(widths, vec![101, 101, 100]);
    }

    #[test]
    fn test_fixed_and_fit_take_space_first() {
        let (mut tree, m) = setup();
        let row = root(&mut tree, Style::row(), Rect::new(0, 0, 100, 10));
        let fixed = add(&mut tree, row, NodeKind::Rect, Style::default().fixed_width(30));
        let text = add(&mut tree, row, NodeKind::Text, Style::default().text("ab").font(10, 10));
        let fill = add(
            &mut tree,
            row,
            NodeKind::Rect,
            Style::default().fill_width().margin(Edges::symmetric(5, 0)),
        );

        layout_children(&mut tree, row, &m).unwrap();

        assert_eq!(tree.rect(fixed).width, 30);
        assert_eq!(tree.rect(text).width, 20);
        assert_eq!(tree.rect(fill).width, 40);
        assert_eq!(tree.rect(fill).x, 55);
    }

    #[test]
    fn test_fill_padding_added_back() {
        let (mut tree, m) = setup();
        let row = root(&mut tree, Style::row(), Rect::new(0, 0, 100, 10));
        let a = add(
            &mut tree,
            row,
            NodeKind::Container,
            Style::row().fill_width().padding(Edges::symmetric(10, 0)),
        );
        let b = add(&mut tree, row, NodeKind::Rect, Style::default().fill_width());

        layout_children(&mut tree, row, &m).unwrap();

        // remaining = 100 - 20 = 80, split 40/40, padding added back to `a`
        assert_eq!(tree.rect(a).width, 60);
        assert_eq!(tree.rect(b).width, 40);
    }

    #[test]
    fn test_overflow_clamps_fill_to_zero() {
        let (mut tree, m) = setup();
        let row = root(&mut tree, Style::row(), Rect::new(0, 0, 50, 10));
        add(&mut tree, row, NodeKind::Rect, Style::default().fixed_width(80));
        let fill = add(&mut tree, row, NodeKind::Rect, Style::default().fill_width());

        layout_children(&mut tree, row, &m).unwrap();
        assert_eq!(tree.rect(fill).width, 0);
    }

    #[test]
    fn test_reverse_flow_places_last_child_first() {
        let (mut tree, m) = setup();
        let row = root(
            &mut tree,
            Style::row().flow(FlowDirection::RightToLeft),
            Rect::new(0, 0, 100, 10),
        );
        let a = add(&mut tree, row, NodeKind::Rect, Style::default().fixed_width(10));
        let b = add(&mut tree, row, NodeKind::Rect, Style::default().fixed_width(20));

        layout_children(&mut tree, row, &m).unwrap();

        assert_eq!(tree.rect(b).x, 0);
        assert_eq!(tree.rect(a).x, 20);
    }

    #[test]
    fn test_cross_centering() {
        let (mut tree, m) = setup();
        let row = root(
            &mut tree,
            Style::row().center(Center::Y),
            Rect::new(0, 0, 100, 40),
        );
        let a = add(&mut tree, row, NodeKind::Rect, Style::default().fixed(10, 10));
        let b = add(&mut tree, row, NodeKind::Rect, Style::default().fixed(10, 20));

        layout_children(&mut tree, row, &m).unwrap();

        assert_eq!(tree.rect(a).y, 15);
        assert_eq!(tree.rect(b).y, 10);
    }

    #[test]
    fn test_single_child_centers_on_both_axes() {
        let (mut tree, m) = setup();
        let row = root(
            &mut tree,
            Style::row().center(Center::BOTH),
            Rect::new(0, 0, 100, 50),
        );
        let a = add(&mut tree, row, NodeKind::Rect, Style::default().fixed(20, 10));

        layout_children(&mut tree, row, &m).unwrap();
        assert_eq!(tree.rect(a), Rect::new(40, 20, 20, 10));
    }

    #[test]
    fn test_main_centering_ignored_with_siblings() {
        let (mut tree, m) = setup();
        let row = root(&mut tree, Style::row().center(Center::X), Rect::new(0, 0, 100, 10));
        let a = add(&mut tree, row, NodeKind::Rect, Style::default().fixed(10, 10));
        add(&mut tree, row, NodeKind::Rect, Style::default().fixed(10, 10));

        layout_children(&mut tree, row, &m).unwrap();
        assert_eq!(tree.rect(a).x, 0);
    }

    #[test]
    fn test_padding_offsets_content() {
        let (mut tree, m) = setup();
        let col = root(
            &mut tree,
            Style::column().padding(Edges::all(5)),
            Rect::new(10, 10, 100, 100),
        );
        let a = add(&mut tree, col, NodeKind::Rect, Style::default().fill());

        layout_children(&mut tree, col, &m).unwrap();
        assert_eq!(tree.rect(a), Rect::new(15, 15, 90, 90));
    }

    #[test]
    fn test_degenerate_container_collapses_descendants() {
        let (mut tree, m) = setup();
        let row = root(
            &mut tree,
            Style::row().padding(Edges::all(10)),
            Rect::new(0, 0, 15, 15),
        );
        let inner = add(&mut tree, row, NodeKind::Container, Style::row().fixed(50, 50));
        let leaf = add(&mut tree, inner, NodeKind::Rect, Style::default().fixed(5, 5));

        layout_children(&mut tree, row, &m).unwrap();

        assert_eq!(tree.rect(inner), Rect::new(10, 10, 0, 0));
        assert_eq!(tree.rect(leaf), Rect::new(10, 10, 0, 0));
    }

    #[test]
    fn test_vertical_text_reflows_at_resolved_width() {
        let (mut tree, m) = setup();
        let col = root(&mut tree, Style::column(), Rect::new(0, 0, 80, 200));
        let text = add(
            &mut tree,
            col,
            NodeKind::Text,
            Style::default().text("hello world").font(10, 12).fill_width(),
        );
        let below = add(&mut tree, col, NodeKind::Rect, Style::default().fill());

        layout_children(&mut tree, col, &m).unwrap();

        assert_eq!(tree.rect(text).height, 24);
        assert_eq!(tree.rect(below).y, 24);
        assert_eq!(tree.rect(below).height, 176);
    }

    #[test]
    fn test_nested_text_grows_its_container() {
        let (mut tree, m) = setup();
        let col = root(&mut tree, Style::column(), Rect::new(0, 0, 80, 200));
        let card = add(
            &mut tree,
            col,
            NodeKind::Container,
            Style::column().fill_width().padding(Edges::all(2)),
        );
        let text = add(
            &mut tree,
            card,
            NodeKind::Text,
            Style::default().text("hello world").font(10, 12).fill_width(),
        );
        let below = add(&mut tree, col, NodeKind::Rect, Style::default().fill());

        layout_children(&mut tree, col, &m).unwrap();

        // 76 wide inside the card, so "hello world" takes two lines.
        assert_eq!(tree.rect(card), Rect::new(0, 0, 80, 28));
        assert_eq!(tree.rect(text), Rect::new(2, 2, 76, 24));
        assert_eq!(tree.rect(below), Rect::new(0, 28, 80, 172));
    }

    #[test]
    fn test_row_takes_tallest_wrapped_child() {
        let (mut tree, m) = setup();
        let col = root(&mut tree, Style::column(), Rect::new(0, 0, 100, 100));
        let row = add(&mut tree, col, NodeKind::Container, Style::row().fill_width());
        add(&mut tree, row, NodeKind::Rect, Style::default().fixed(30, 5));
        let text = add(
            &mut tree,
            row,
            NodeKind::Text,
            Style::default().text("aaa bbb ccc").font(10, 10).fill_width(),
        );

        layout_children(&mut tree, col, &m).unwrap();

        // The text gets 70 of the row's 100: "aaa bbb" fits, "ccc" wraps.
        assert_eq!(tree.rect(text).height, 20);
        assert_eq!(tree.rect(row).height, 20);
    }

    #[test]
    fn test_layout_root_against_viewport() {
        let (mut tree, m) = setup();
        let r = tree.create_node(NodeKind::Container, Style::column().fill());
        let a = add(&mut tree, r, NodeKind::Rect, Style::default().fill());

        layout_root(&mut tree, r, Rect::new(0, 0, 640, 480), &m).unwrap();

        assert_eq!(tree.rect(r), Rect::new(0, 0, 640, 480));
        assert_eq!(tree.rect(a), Rect::new(0, 0, 640, 480));
    }

    #[test]
    fn test_layout_root_fit_ignores_viewport() {
        let (mut tree, m) = setup();
        let r = tree.create_node(NodeKind::Container, Style::row().padding(Edges::all(1)));
        add(&mut tree, r, NodeKind::Rect, Style::default().fixed(10, 4));
        add(&mut tree, r, NodeKind::Rect, Style::default().fixed(6, 8));

        layout_root(&mut tree, r, Rect::new(0, 0, 640, 480), &m).unwrap();
        assert_eq!(tree.rect(r), Rect::new(0, 0, 18, 10));
    }

    #[test]
    fn test_stale_container_is_error() {
        let (mut tree, m) = setup();
        let r = tree.create_node(NodeKind::Container, Style::row());
        tree.destroy_node(r);
        assert!(layout_children(&mut tree, r, &m).is_err());
    }
}
