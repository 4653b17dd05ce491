use std::{
    fmt::{Debug, Display},
    time::{Duration, Instant},
};

#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    pub nodes_settled: usize,
    pub duration: Option<Duration>,
    start_time: Option<Instant>,
}

impl SearchStats {
    pub fn init(&mut self) {
        self.nodes_settled = 0;
        self.duration = None;
        self.start_timer();
    }

    fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        if let Some(start_time) = self.start_time {
            self.duration = Some(start_time.elapsed());
        }
    }
}

impl Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stats: {} nodes settled in {:?}",
            self.nodes_settled, self.duration
        )
    }
}

#[derive(Debug, Default, Clone)]
pub struct ContractionStats {
    pub nodes_contracted: usize,
    pub shortcuts_added: usize,
    pub shortcuts_replaced: usize,
    /// Number of times a popped node was pushed back because its importance grew
    pub lazy_updates: usize,
    pub edges_removed_by_cleanup: usize,
    pub duration: Option<Duration>,
}

impl Display for ContractionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Contracted {} nodes in {:?}: {} shortcuts added, {} replaced, {} lazy updates",
            self.nodes_contracted,
            self.duration,
            self.shortcuts_added,
            self.shortcuts_replaced,
            self.lazy_updates
        )
    }
}
