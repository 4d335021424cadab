use std::path::{Path, PathBuf};

use plotters::{coord::types::RangedCoordf32, prelude::*};
use tracing::info;

use fieldmap_core::pipeline::{FieldPage, PageSink};
use fieldmap_core::render::{Arrow, LogScale, RenderError};

/// Page size in pixels.
const PAGE_SIZE: (u32, u32) = (1024, 768);

/// Fraction of the shaft length taken by the arrowhead.
const HEAD_FRACTION: f32 = 0.25;

type FieldChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf32, RangedCoordf32>>;

/// Rasterizes field pages into bitmap files via plotters.
pub struct PlottersSink {
    out_dir: PathBuf,
}

impl PlottersSink {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl PageSink for PlottersSink {
    fn write_page(&mut self, page: &FieldPage<'_>) -> Result<(), RenderError> {
        let path = self.out_dir.join(&page.file_name);
        draw_page(&path, page).map_err(|err| RenderError::Backend(err.to_string()))?;
        info!(path = %path.display(), "wrote page");
        Ok(())
    }
}

fn draw_page(path: &Path, page: &FieldPage<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, PAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let grid = page.thickness;
    let x_axis = grid.x_axis;
    let y_axis = grid.y_axis;

    let mut chart = ChartBuilder::on(&root)
        .caption(page.title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_axis.min..x_axis.max, y_axis.min..y_axis.max)?;
    chart.configure_mesh().disable_x_mesh().disable_y_mesh().draw()?;

    let scale = LogScale::for_grid(grid, page.scale_floor);
    chart.draw_series((0..x_axis.bins as usize).flat_map(|ix| {
        (0..y_axis.bins as usize).map(move |iy| {
            let shade = scale.normalized(grid.value(ix, iy));
            Rectangle::new(
                [
                    (x_axis.edge(ix as i64), y_axis.edge(iy as i64)),
                    (x_axis.edge(ix as i64 + 1), y_axis.edge(iy as i64 + 1)),
                ],
                heat_color(shade).filled(),
            )
        })
    }))?;

    for arrow in &page.overlay {
        draw_arrow(&mut chart, arrow)?;
    }

    root.present()?;
    Ok(())
}

/// Dark blue through red, brightening with the value.
fn heat_color(shade: f64) -> HSLColor {
    HSLColor(2.0 / 3.0 * (1.0 - shade), 0.7, 0.15 + 0.45 * shade)
}

fn draw_arrow(
    chart: &mut FieldChart<'_, '_>,
    arrow: &Arrow,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tail, tip) = (arrow.tail, arrow.tip);

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(tail.x, tail.y), (tip.x, tip.y)],
        BLUE.stroke_width(1),
    )))?;

    if arrow.is_degenerate() {
        return Ok(());
    }

    let (dx, dy) = (tip.x - tail.x, tip.y - tail.y);
    let len = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = (dx / len, dy / len);
    let head = HEAD_FRACTION * len;
    let base = (tip.x - ux * head, tip.y - uy * head);
    let half = 0.4 * head;
    // Normal to the shaft spans the head base.
    let (px, py) = (-uy, ux);

    chart.draw_series(std::iter::once(Polygon::new(
        vec![
            (tip.x, tip.y),
            (base.0 + px * half, base.1 + py * half),
            (base.0 - px * half, base.1 - py * half),
        ],
        BLUE.filled(),
    )))?;

    Ok(())
}
