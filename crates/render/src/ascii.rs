use glam::DVec2;
use relay_kernel::Snapshot;

use crate::Renderer;
use crate::viewport::Viewport;

/// Plots a run onto a character grid.
///
/// Recent throws are drawn first as `*` trails, then points on top:
/// `.` eliminated, `o` active, `@` holder.
#[derive(Debug, Clone, Copy)]
pub struct AsciiRenderer {
    pub columns: usize,
    pub rows: usize,
}

impl AsciiRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    fn viewport(&self, snapshot: &Snapshot) -> Viewport {
        // Cells are addressed by their top-left corner, so fit into one less.
        let size = DVec2::new(
            self.columns.saturating_sub(1) as f64,
            self.rows.saturating_sub(1) as f64,
        );
        Viewport::fit(snapshot.points.iter().map(|p| p.position), size, 0.0)
    }

    fn cell(&self, screen: DVec2) -> Option<(usize, usize)> {
        let (x, y) = (screen.x.round(), screen.y.round());
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.columns && y < self.rows).then_some((x, y))
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new(60, 20)
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&self, snapshot: &Snapshot) -> String {
        if self.columns == 0 || self.rows == 0 {
            return String::new();
        }
        let view = self.viewport(snapshot);
        let mut grid = vec![vec![' '; self.columns]; self.rows];

        for t in &snapshot.history {
            let (Some(from), Some(to)) = (snapshot.points.get(t.from), snapshot.points.get(t.to))
            else {
                continue;
            };
            let a = view.to_screen(from.position);
            let b = view.to_screen(to.position);
            let samples = (b - a).abs().max_element().ceil().max(1.0) as usize;
            for i in 0..=samples {
                let p = a.lerp(b, i as f64 / samples as f64);
                if let Some((x, y)) = self.cell(p) {
                    grid[y][x] = '*';
                }
            }
        }

        for (index, p) in snapshot.points.iter().enumerate() {
            let Some((x, y)) = self.cell(view.to_screen(p.position)) else {
                continue;
            };
            grid[y][x] = if index == snapshot.current {
                '@'
            } else if p.active {
                'o'
            } else if grid[y][x] == ' ' || grid[y][x] == '*' {
                '.'
            } else {
                grid[y][x]
            };
        }

        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in grid {
            let line: String = row.into_iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}
