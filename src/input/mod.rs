use egui::{Pos2, Response, Vec2};

mod shortcuts;
pub use shortcuts::{Shortcut, collect_shortcuts, shortcut_for};

/// Pointer activity on the drawing surface, in canvas-local screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// Press and release without moving past the drag threshold
    Click { pos: Pos2 },
    /// A drag began where the pointer was first pressed
    DragStart { pos: Pos2 },
    /// The pointer moved while held
    Drag { pos: Pos2, delta: Vec2 },
    DragEnd,
    /// Pointer moved with no button held
    Hover { pos: Pos2 },
    /// Mouse wheel; positive values scroll up
    Wheel { pos: Pos2, scroll_y: f32 },
    /// Two-finger pinch; `zoom` is the multiplicative change this frame
    Pinch { center: Pos2, zoom: f32 },
}

/// Handles converting raw egui input on the canvas into [`CanvasEvent`]s
pub fn collect_canvas_events(response: &Response) -> Vec<CanvasEvent> {
    let origin = response.rect.min;
    let local = |pos: Pos2| pos - origin.to_vec2();
    let mut events = Vec::new();

    let (press_origin, scroll_y, multi_touch) = response.ctx.input(|input| {
        (input.pointer.press_origin(), input.raw_scroll_delta.y, input.multi_touch())
    });

    if response.drag_started() {
        if let Some(pos) = press_origin.or(response.interact_pointer_pos()) {
            events.push(CanvasEvent::DragStart { pos: local(pos) });
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(CanvasEvent::Drag {
                pos: local(pos),
                delta: response.drag_delta(),
            });
        }
    }

    if response.drag_stopped() {
        events.push(CanvasEvent::DragEnd);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            events.push(CanvasEvent::Click { pos: local(pos) });
        }
    }

    if let Some(pos) = response.hover_pos() {
        if !response.dragged() {
            events.push(CanvasEvent::Hover { pos: local(pos) });
        }
        if scroll_y != 0.0 {
            events.push(CanvasEvent::Wheel { pos: local(pos), scroll_y });
        }
    }

    if let Some(touch) = multi_touch {
        if touch.zoom_delta != 1.0 {
            let center = response.hover_pos().unwrap_or(touch.start_pos);
            events.push(CanvasEvent::Pinch {
                center: local(center),
                zoom: touch.zoom_delta,
            });
        }
    }

    events
}
