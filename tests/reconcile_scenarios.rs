//! Reconciliation scenarios driven through `Builder` and `Runtime`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use spark_core::{
    reconcile, spawn_task, Builder, Child, Component, DescTree, DrawableBackend, DrawableId,
    NodeId, NodeKind, Rect, RetainedTree, Rgba, Runtime, RuntimeConfig, Style,
};

fn setup() -> Runtime {
    Runtime::new(RuntimeConfig {
        viewport: Rect::new(0, 0, 400, 300),
        advance_percent: 100,
    })
}

fn owned(tree: &RetainedTree, node: NodeId) -> Vec<NodeId> {
    tree.children(node)
        .iter()
        .filter_map(|c| match c {
            Child::Owned(id) => Some(*id),
            Child::Borrowed(_) => None,
        })
        .collect()
}

/// Sidebar plus a list whose length and label color are driven from outside.
#[derive(Clone)]
struct Screen {
    items: Rc<Cell<usize>>,
    color: Rc<Cell<Rgba>>,
    clicks: Rc<Cell<u32>>,
}

impl Screen {
    fn new() -> Self {
        Self {
            items: Rc::new(Cell::new(2)),
            color: Rc::new(Cell::new(Rgba::RED)),
            clicks: Rc::new(Cell::new(0)),
        }
    }
}

impl Component for Screen {
    fn describe(&self, ui: &mut Builder) {
        ui.container(Style::row().fill(), |ui| {
            ui.container(Style::column().fixed_width(100).fill_height().id("sidebar"), |ui| {
                ui.text("Menu", Style::default());
                ui.text("Settings", Style::default());
            });
            ui.container(Style::column().fill().id("list"), |ui| {
                ui.text("Title", Style::default().text_color(self.color.get()).id("title"));
                for i in 0..self.items.get() {
                    let clicks = self.clicks.clone();
                    ui.rect(
                        Style::default()
                            .fill_width()
                            .fixed_height(20)
                            .id(format!("item-{i}"))
                            .on_click(move || clicks.set(clicks.get() + 1)),
                    );
                }
            });
        });
    }
}

fn mounted(screen: &Screen) -> (Runtime, spark_core::ComponentId) {
    let mut rt = setup();
    let id = rt.mount(screen.clone());
    rt.set_root(id).unwrap();
    rt.update().unwrap();
    (rt, id)
}

#[test]
fn identical_pass_preserves_every_node() {
    let screen = Screen::new();
    let (mut rt, id) = mounted(&screen);
    let stats = rt.tree().stats();
    let sidebar = rt.find_by_id("sidebar").unwrap();
    let title = rt.find_by_id("title").unwrap();

    // Every pass hands out fresh on_click closures; that alone is no change.
    rt.mark_stale(id).unwrap();
    assert!(!rt.update().unwrap());

    assert_eq!(rt.tree().stats(), stats);
    assert_eq!(rt.find_by_id("sidebar"), Some(sidebar));
    assert_eq!(rt.find_by_id("title"), Some(title));
}

/// RED and BLUE have the same channel sum, so the text hash is unchanged and
/// the leaf is refreshed in place. In-place recolor is only guaranteed when the
/// sums match; any other recolor rebuilds the leaf's sibling group.
#[test]
fn recolor_updates_leaf_in_place() {
    let screen = Screen::new();
    let (mut rt, id) = mounted(&screen);
    let list = rt.find_by_id("list").unwrap();
    let before = owned(rt.tree(), list);
    let stats = rt.tree().stats();

    screen.color.set(Rgba::BLUE);
    rt.mark_stale(id).unwrap();
    assert!(rt.update().unwrap());

    assert_eq!(owned(rt.tree(), list), before);
    assert_eq!(rt.tree().stats(), stats);
    let title = rt.find_by_id("title").unwrap();
    assert_eq!(rt.tree().node(title).unwrap().style.text_color, Rgba::BLUE);
}

#[test]
fn extra_child_rebuilds_only_that_list() {
    let screen = Screen::new();
    let (mut rt, id) = mounted(&screen);
    let root = rt.component_root(id).unwrap();
    let top = owned(rt.tree(), root);
    let sidebar = rt.find_by_id("sidebar").unwrap();
    let sidebar_children = owned(rt.tree(), sidebar);
    let list = rt.find_by_id("list").unwrap();
    let old_items = owned(rt.tree(), list);
    let stats = rt.tree().stats();

    screen.items.set(3);
    rt.mark_stale(id).unwrap();
    assert!(rt.update().unwrap());

    // The list node and everything outside it survive.
    assert_eq!(owned(rt.tree(), root), top);
    assert_eq!(rt.find_by_id("list"), Some(list));
    assert_eq!(owned(rt.tree(), sidebar), sidebar_children);

    // Every old child of the list is gone, all new ones are fresh.
    let new_items = owned(rt.tree(), list);
    assert_eq!(new_items.len(), 4);
    assert!(old_items.iter().all(|&n| !rt.tree().contains(n)));
    let after = rt.tree().stats();
    assert_eq!(after.destroyed - stats.destroyed, old_items.len() as u64);
    assert_eq!(after.created - stats.created, 4);
}

#[test]
fn click_reaches_item() {
    let screen = Screen::new();
    let (rt, _) = mounted(&screen);
    let item = rt.find_by_id("item-1").unwrap();
    let r = rt.tree().rect(item);

    assert_eq!(rt.click(r.x + 1, r.y + 1), Some(item));
    assert_eq!(screen.clicks.get(), 1);
}

#[test]
fn layout_follows_rebuild() {
    let screen = Screen::new();
    let (mut rt, id) = mounted(&screen);
    let list = rt.find_by_id("list").unwrap();
    assert_eq!(rt.tree().rect(list), Rect::new(100, 0, 300, 300));

    rt.set_viewport(Rect::new(0, 0, 500, 300));
    rt.update().unwrap();
    assert_eq!(rt.tree().rect(list).width, 400);

    screen.items.set(0);
    rt.mark_stale(id).unwrap();
    rt.update().unwrap();
    assert_eq!(rt.find_by_id("item-0"), None);
}

#[test]
fn worker_marks_component_stale() {
    let screen = Screen::new();
    let (mut rt, id) = mounted(&screen);

    let handle = rt.stale_handle(id).unwrap();
    let task = spawn_task("list-loader", handle, |_| {}).unwrap();
    task.join().unwrap();

    assert!(rt.wait(Duration::from_secs(1)));
    assert!(rt.is_stale(id));
    rt.update().unwrap();
    assert!(!rt.is_stale(id));
}

/// Backend that records every call it receives.
#[derive(Clone, Default)]
struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
    next: Rc<Cell<u64>>,
}

impl DrawableBackend for Recorder {
    fn create(&mut self, kind: NodeKind, _style: &Style) -> DrawableId {
        let id = self.next.get();
        self.next.set(id + 1);
        self.log.borrow_mut().push(format!("create {kind:?}"));
        DrawableId(id)
    }

    fn update(&mut self, drawable: DrawableId, _style: &Style) {
        self.log.borrow_mut().push(format!("update {}", drawable.0));
    }

    fn destroy(&mut self, drawable: DrawableId) {
        self.log.borrow_mut().push(format!("destroy {}", drawable.0));
    }
}

#[test]
fn backend_sees_in_place_update() {
    let recorder = Recorder::default();
    let mut tree = RetainedTree::new(recorder.clone());

    let describe = |color: Rgba| -> DescTree {
        let mut ui = Builder::new();
        ui.container(Style::row(), |ui| {
            ui.text("a", Style::default().text_color(color));
        });
        ui.finish().unwrap()
    };

    let first = describe(Rgba::RED);
    let root = tree.build_from_description(&first, first.root().unwrap());
    recorder.log.borrow_mut().clear();

    let second = describe(Rgba::GREEN);
    assert!(reconcile(&mut tree, root, &second, second.root().unwrap()).unwrap());
    assert_eq!(*recorder.log.borrow(), vec!["update 1".to_string()]);
}
