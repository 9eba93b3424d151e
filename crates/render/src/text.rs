use std::fmt::Write;

use relay_kernel::Snapshot;

use crate::Renderer;

/// One-line run status, as shown under the playback controls.
pub fn status_line(snapshot: &Snapshot) -> String {
    match (snapshot.outcome, snapshot.current_point()) {
        (Some(outcome), _) => format!(
            "GAME OVER! Final Throws: {} | Last Player: {}",
            outcome.throws, outcome.final_holder
        ),
        (None, Some(holder)) => format!(
            "Throws: {} | Current: Player {}",
            snapshot.throws, holder.id
        ),
        (None, None) => format!("Throws: {}", snapshot.throws),
    }
}

/// Debug text renderer: status, recent throws and the point roster.
///
/// Large worlds are cut off after `max_points` entries.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    pub max_points: usize,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { max_points: 50 }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, snapshot: &Snapshot) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== {} ===", status_line(snapshot));
        let _ = writeln!(
            out,
            "Active: {}/{}",
            snapshot.active_count(),
            snapshot.points.len()
        );

        if !snapshot.history.is_empty() {
            out.push_str("Recent throws:\n");
            for t in &snapshot.history {
                let (Some(from), Some(to)) = (snapshot.points.get(t.from), snapshot.points.get(t.to))
                else {
                    continue;
                };
                let _ = writeln!(
                    out,
                    "  {} ({}, {}) -> {} ({}, {})",
                    from.id, from.position.x, from.position.y, to.id, to.position.x, to.position.y
                );
            }
        }

        for (index, p) in snapshot.points.iter().take(self.max_points).enumerate() {
            let marker = if index == snapshot.current {
                '@'
            } else if p.active {
                'o'
            } else {
                '.'
            };
            let _ = writeln!(
                out,
                "  {marker} [{}] ({}, {})",
                p.id, p.position.x, p.position.y
            );
        }
        if snapshot.points.len() > self.max_points {
            let _ = writeln!(
                out,
                "  ... {} more",
                snapshot.points.len() - self.max_points
            );
        }
        out
    }
}
