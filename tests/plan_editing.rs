use floorplan_editor::command::{Command, History};
use floorplan_editor::config::EditorConfig;
use floorplan_editor::geometry::{HitTarget, hit_test};
use floorplan_editor::plan::{FloorPlan, Opening, OpeningKind, Point};
use floorplan_editor::tools::{EditorMode, Tool, ToolContext, ToolType};

// Click through the active tool the way the canvas does
fn click(tool: &mut ToolType, history: &mut History<FloorPlan>, pos: Point) {
    let config = EditorConfig::default();
    let target = hit_test(history.current(), pos);
    let ctx = ToolContext {
        plan: history.current(),
        config: &config,
        zoom: 1.0,
    };
    if let Some(edit) = tool.on_click(pos, &target, &ctx) {
        let next = edit.command.apply(history.current());
        history.set(next);
    }
}

fn empty_plan() -> FloorPlan {
    FloorPlan::new("empty", "Empty", Default::default())
}

#[test]
fn test_chained_walls_share_corners() {
    let mut history = History::new(empty_plan());
    let mut tool = EditorMode::Draw.new_tool();

    click(&mut tool, &mut history, Point::new(0.0, 0.0));
    click(&mut tool, &mut history, Point::new(200.0, 0.0));
    click(&mut tool, &mut history, Point::new(200.0, 200.0));

    let plan = history.current();
    assert_eq!(plan.walls.len(), 2);
    assert_eq!(plan.corners.len(), 3);
    assert!(plan.is_consistent());

    let middle = plan
        .corners
        .values()
        .find(|corner| corner.position() == Point::new(200.0, 0.0))
        .unwrap();
    assert_eq!(middle.wall_ids.len(), 2);
}

#[test]
fn test_click_near_existing_corner_snaps_to_it() {
    let mut history = History::new(FloorPlan::default_template());
    let mut tool = EditorMode::Draw.new_tool();

    click(&mut tool, &mut history, Point::new(250.0, 250.0));
    // 12px from c3 is outside the hit radius but inside the snap radius.
    click(&mut tool, &mut history, Point::new(412.0, 400.0));

    let plan = history.current();
    assert_eq!(plan.corners.len(), 5);
    assert_eq!(plan.walls.len(), 5);
    assert_eq!(plan.corners["c3"].wall_ids.len(), 3);
    assert!(plan.is_consistent());
}

#[test]
fn test_closing_a_loop_reuses_the_first_corner() {
    let mut history = History::new(empty_plan());
    let mut tool = EditorMode::Draw.new_tool();

    for pos in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (5.0, 3.0)] {
        click(&mut tool, &mut history, Point::new(pos.0, pos.1));
    }

    let plan = history.current();
    assert_eq!(plan.corners.len(), 3);
    assert_eq!(plan.walls.len(), 3);
    assert!(plan.corners.values().all(|corner| corner.wall_ids.len() == 2));
}

#[test]
fn test_deleting_a_corner_removes_its_walls() {
    let original = FloorPlan::default_template();
    let mut history = History::new(original.clone());
    let mut tool = EditorMode::Delete.new_tool();

    click(&mut tool, &mut history, Point::new(400.0, 400.0));

    let plan = history.current();
    assert!(!plan.corners.contains_key("c3"));
    assert_eq!(plan.walls.len(), 2);
    assert!(plan.walls.contains_key("w1"));
    assert!(plan.walls.contains_key("w4"));
    assert_eq!(plan.corners["c2"].wall_ids, vec!["w1".to_owned()]);
    assert_eq!(plan.corners["c4"].wall_ids, vec!["w4".to_owned()]);
    assert!(plan.is_consistent());

    history.undo();
    assert_eq!(history.current(), &original);
}

#[test]
fn test_deleting_a_wall_keeps_corners_and_drops_openings() {
    let mut plan = FloorPlan::default_template();
    plan.openings.insert(
        "o1".into(),
        Opening {
            id: "o1".into(),
            wall_id: "w1".into(),
            kind: OpeningKind::Door,
            distance_from_start: 50.0,
            width: 90.0,
            height: 210.0,
            properties: Default::default(),
        },
    );
    let mut history = History::new(plan);
    let mut tool = EditorMode::Delete.new_tool();

    assert_eq!(hit_test(history.current(), Point::new(250.0, 98.0)), HitTarget::Wall("w1".into()));
    click(&mut tool, &mut history, Point::new(250.0, 98.0));

    let plan = history.current();
    assert_eq!(plan.corners.len(), 4);
    assert_eq!(plan.walls.len(), 3);
    assert!(plan.openings.is_empty());
    assert!(plan.is_consistent());
}

#[test]
fn test_every_edit_is_undoable() {
    let original = FloorPlan::default_template();
    let mut history = History::new(original.clone());

    let commands = [
        Command::MoveCorner { corner_id: "c1".into(), to: Point::new(0.0, 0.0) },
        Command::DeleteWall { wall_id: "w2".into() },
        Command::DeleteCorner { corner_id: "c4".into() },
    ];
    for command in &commands {
        let next = command.apply(history.current());
        assert!(next.is_consistent(), "{} broke consistency", command.name());
        history.set(next);
    }
    assert_eq!(history.len(), 4);

    while history.can_undo() {
        history.undo();
    }
    assert_eq!(history.current(), &original);
}
