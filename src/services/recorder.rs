//! Visitor that records every callback without steering the walk.

use crate::models::{Node, WalkEvent};
use crate::services::canonical::normalize_path;
use crate::services::walk::{Descend, Flow, Visitor, WalkContext};

/// Records `pre_visit`/`visit`/`post_visit` calls in order.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<WalkEvent>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[WalkEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<WalkEvent> {
        self.events
    }
}

impl Visitor for EventRecorder {
    fn pre_visit(&mut self, _ctx: &WalkContext<'_>, dir: &Node) -> Descend {
        self.events.push(WalkEvent::PreVisit(normalize_path(dir.path())));
        Descend::Into
    }

    fn visit(&mut self, _ctx: &WalkContext<'_>, file: &Node) -> Flow {
        self.events.push(WalkEvent::Visit(normalize_path(file.path())));
        Flow::Continue
    }

    fn post_visit(&mut self, _ctx: &WalkContext<'_>, dir: &Node) -> Flow {
        self.events.push(WalkEvent::PostVisit(normalize_path(dir.path())));
        Flow::Continue
    }
}
