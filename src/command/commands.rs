use crate::plan::{Corner, FloorPlan, Point, Wall};

/// Edits that can be applied to a [`FloorPlan`].
///
/// Applying a command never mutates its input: [`Command::apply`] returns the
/// next plan, which is what the history stores. Commands that reference ids
/// missing from the plan leave it unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Place a corner that is not attached to any wall yet
    AddCorner(Corner),

    /// Connect two corners with a new wall
    AddWall {
        wall: Wall,
        /// Freshly placed end corner, inserted before the wall is linked
        new_corner: Option<Corner>,
    },

    /// Reposition a corner (one frame of a drag)
    MoveCorner { corner_id: String, to: Point },

    /// Remove a corner together with every wall attached to it
    DeleteCorner { corner_id: String },

    /// Remove a wall, keeping its endpoint corners
    DeleteWall { wall_id: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddCorner(_) => "Add Corner",
            Command::AddWall { .. } => "Add Wall",
            Command::MoveCorner { .. } => "Move Corner",
            Command::DeleteCorner { .. } => "Delete Corner",
            Command::DeleteWall { .. } => "Delete Wall",
        }
    }

    /// Compute the plan that results from this command.
    pub fn apply(&self, plan: &FloorPlan) -> FloorPlan {
        let mut next = plan.clone();
        let changed = match self {
            Command::AddCorner(corner) => add_corner(&mut next, corner),
            Command::AddWall { wall, new_corner } => add_wall(&mut next, wall, new_corner.as_ref()),
            Command::MoveCorner { corner_id, to } => move_corner(&mut next, corner_id, *to),
            Command::DeleteCorner { corner_id } => delete_corner(&mut next, corner_id),
            Command::DeleteWall { wall_id } => delete_wall(&mut next, wall_id),
        };

        if changed {
            next.touch();
        } else {
            log::debug!("{} left the plan unchanged", self.name());
        }
        next
    }
}

fn add_corner(plan: &mut FloorPlan, corner: &Corner) -> bool {
    if plan.corners.contains_key(&corner.id) {
        return false;
    }
    plan.corners.insert(corner.id.clone(), corner.clone());
    true
}

fn add_wall(plan: &mut FloorPlan, wall: &Wall, new_corner: Option<&Corner>) -> bool {
    if wall.start_corner_id == wall.end_corner_id || plan.walls.contains_key(&wall.id) {
        return false;
    }

    if let Some(corner) = new_corner {
        plan.corners
            .entry(corner.id.clone())
            .or_insert_with(|| corner.clone());
    }

    if !plan.corners.contains_key(&wall.start_corner_id)
        || !plan.corners.contains_key(&wall.end_corner_id)
    {
        return false;
    }

    for corner_id in [&wall.start_corner_id, &wall.end_corner_id] {
        if let Some(corner) = plan.corners.get_mut(corner_id) {
            if !corner.wall_ids.contains(&wall.id) {
                corner.wall_ids.push(wall.id.clone());
            }
        }
    }
    plan.walls.insert(wall.id.clone(), wall.clone());
    true
}

fn move_corner(plan: &mut FloorPlan, corner_id: &str, to: Point) -> bool {
    match plan.corners.get_mut(corner_id) {
        Some(corner) if corner.position() == to => false,
        Some(corner) => {
            corner.x = to.x;
            corner.y = to.y;
            true
        }
        None => false,
    }
}

fn delete_corner(plan: &mut FloorPlan, corner_id: &str) -> bool {
    let Some(corner) = plan.corners.remove(corner_id) else {
        return false;
    };

    // Back-references may be stale on imported plans, so also sweep by endpoint.
    let mut removed: Vec<String> = corner.wall_ids;
    removed.extend(
        plan.walls
            .values()
            .filter(|wall| wall.touches(corner_id))
            .map(|wall| wall.id.clone()),
    );
    for wall_id in &removed {
        plan.walls.remove(wall_id);
    }

    for corner in plan.corners.values_mut() {
        corner.wall_ids.retain(|wall_id| plan.walls.contains_key(wall_id));
    }
    remove_openings_on(plan, &removed);
    true
}

fn delete_wall(plan: &mut FloorPlan, wall_id: &str) -> bool {
    if plan.walls.remove(wall_id).is_none() {
        return false;
    }

    for corner in plan.corners.values_mut() {
        corner.wall_ids.retain(|id| id != wall_id);
    }
    remove_openings_on(plan, &[wall_id.to_owned()]);
    true
}

/// Openings cannot outlive the wall they are cut into.
fn remove_openings_on(plan: &mut FloorPlan, wall_ids: &[String]) {
    let before = plan.openings.len();
    plan.openings.retain(|_, opening| !wall_ids.contains(&opening.wall_id));
    let dropped = before - plan.openings.len();
    if dropped > 0 {
        log::info!("Removed {dropped} opening(s) attached to deleted walls");
    }
}
