//! F3 debug window.

#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub frame_count: u64,
    pub scene_label: String,
    pub transitions: u32,
    /// Pre-formatted session figures; empty outside a session.
    pub session_lines: Vec<String>,
    /// Whether a session is running and can be ended from here.
    pub session_running: bool,
}

impl DebugStats {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time_ms),
            format!("Frame: {}", self.frame_count),
            format!("Scene: {}", self.scene_label),
            format!("Transitions: {}", self.transitions),
        ];
        lines.extend(self.session_lines.iter().cloned());
        lines
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugActions {
    pub end_session: bool,
}

pub fn show_debug_window(ctx: &egui::Context, stats: &DebugStats) -> DebugActions {
    let mut actions = DebugActions::default();
    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            for line in stats.lines() {
                ui.label(line);
            }
            if stats.session_running {
                ui.separator();
                if ui.button("End session").clicked() {
                    actions.end_session = true;
                }
            }
        });
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_lines_follow_the_frame_lines() {
        let stats = DebugStats {
            fps: 59.94,
            frame_time_ms: 16.683,
            frame_count: 120,
            scene_label: "game".to_string(),
            transitions: 3,
            session_lines: vec!["Score: 7".to_string()],
            session_running: true,
        };
        let lines = stats.lines();
        assert_eq!(lines[0], "FPS: 59.9");
        assert_eq!(lines[1], "Frame time: 16.68 ms");
        assert_eq!(lines[3], "Scene: game");
        assert_eq!(lines.last().map(String::as_str), Some("Score: 7"));
    }
}
