use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::dataset::{Dataset, LoadError};
use crate::grid::Grid2;
use crate::render::arrows::{sample_arrows, ArrowSettings};
use crate::render::trace::{trace_lines, TraceSettings};
use crate::render::{Arrow, RenderError, SCALE_FLOOR};

/// One dataset to render: where it lives and how to label it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub path: PathBuf,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageKind {
    Arrows,
    FieldLines,
}

/// Page file naming: `<prefix><title><suffix>` for arrow pages,
/// `<prefix>B_<title><suffix>` for field-line pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNaming {
    pub prefix: String,
    pub suffix: String,
}

impl Default for PageNaming {
    fn default() -> Self {
        Self {
            prefix: "2dfield".to_string(),
            suffix: ".png".to_string(),
        }
    }
}

impl PageNaming {
    pub fn page_name(&self, kind: PageKind, title: &str) -> String {
        let infix = match kind {
            PageKind::Arrows => "",
            PageKind::FieldLines => "B_",
        };
        format!("{}{}{}{}", self.prefix, infix, title, self.suffix)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub arrows: ArrowSettings,
    pub trace: TraceSettings,
    pub naming: PageNaming,
    /// Minimum of the thickness color scale.
    pub scale_floor: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            arrows: ArrowSettings::default(),
            trace: TraceSettings::default(),
            naming: PageNaming::default(),
            scale_floor: SCALE_FLOOR,
        }
    }
}

/// A fully laid-out page, ready for a sink to draw: the thickness color
/// map plus the overlay segments.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPage<'a> {
    pub file_name: String,
    pub title: &'a str,
    pub thickness: &'a Grid2,
    pub scale_floor: f32,
    pub overlay: Vec<Arrow>,
}

/// Consumer of rendered pages. The plotters-backed sink lives in the
/// cli crate; tests substitute a recording sink.
pub trait PageSink {
    fn write_page(&mut self, page: &FieldPage<'_>) -> Result<(), RenderError>;
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to load dataset: {0}")]
    Load(#[from] LoadError),
    #[error("failed to render page: {0}")]
    Render(#[from] RenderError),
}

/// Renders every configured dataset, strictly in order.
pub fn run(
    specs: &[DatasetSpec],
    config: &RenderConfig,
    sink: &mut dyn PageSink,
) -> Result<(), PipelineError> {
    for spec in specs {
        let dataset = Dataset::load(&spec.path, &spec.title)?;
        render_dataset(&dataset, config, sink)?;
    }
    Ok(())
}

/// Renders the two pages of one dataset: the arrow page, then the
/// field-line page.
pub fn render_dataset(
    dataset: &Dataset,
    config: &RenderConfig,
    sink: &mut dyn PageSink,
) -> Result<(), RenderError> {
    let arrows = sample_arrows(dataset, &config.arrows);
    info!(title = %dataset.title, arrows = arrows.len(), "rendering arrow page");
    sink.write_page(&FieldPage {
        file_name: config.naming.page_name(PageKind::Arrows, &dataset.title),
        title: &dataset.title,
        thickness: &dataset.thickness,
        scale_floor: config.scale_floor,
        overlay: arrows,
    })?;

    let lines = trace_lines(dataset, &config.trace);
    info!(title = %dataset.title, lines = lines.len(), "rendering field-line page");
    sink.write_page(&FieldPage {
        file_name: config.naming.page_name(PageKind::FieldLines, &dataset.title),
        title: &dataset.title,
        thickness: &dataset.thickness,
        scale_floor: config.scale_floor,
        overlay: lines
            .into_iter()
            .flat_map(|line| line.segments)
            .collect(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use crate::formats::fieldmap::{FieldMapFile, NamedGrid};
    use crate::geom::Axis;
    use ndarray::Array2;

    #[derive(Default)]
    struct RecordingSink {
        pages: Vec<(String, usize)>,
    }

    impl PageSink for RecordingSink {
        fn write_page(&mut self, page: &FieldPage<'_>) -> Result<(), RenderError> {
            self.pages.push((page.file_name.clone(), page.overlay.len()));
            Ok(())
        }
    }

    struct FailingSink;

    impl PageSink for FailingSink {
        fn write_page(&mut self, _page: &FieldPage<'_>) -> Result<(), RenderError> {
            Err(RenderError::Backend("out of ink".to_string()))
        }
    }

    fn synthetic_container() -> FieldMapFile {
        let x_axis = Axis::new(-10.0, 10.0, 10);
        let y_axis = Axis::new(-10.0, 10.0, 10);
        let grid = |v: f32| {
            Grid2::new(x_axis, y_axis, Array2::from_elem((10, 10), v))
        };
        FieldMapFile {
            group: "slice0".to_string(),
            grids: vec![
                NamedGrid { name: dataset::THICKNESS.to_string(), grid: grid(1.0) },
                NamedGrid { name: dataset::FIELD_X.to_string(), grid: grid(0.0) },
                NamedGrid { name: dataset::FIELD_Y.to_string(), grid: grid(0.0) },
                NamedGrid { name: dataset::FIELD_Z.to_string(), grid: grid(1.0) },
            ],
        }
    }

    fn synthetic_dataset() -> Dataset {
        let mut buf = Vec::new();
        synthetic_container().write_to(&mut buf).unwrap();
        Dataset::from_reader(&buf[..], "uniform").unwrap()
    }

    #[test]
    fn page_names() {
        let naming = PageNaming::default();
        assert_eq!(naming.page_name(PageKind::Arrows, "ILD"), "2dfieldILD.png");
        assert_eq!(
            naming.page_name(PageKind::FieldLines, "ILD"),
            "2dfieldB_ILD.png"
        );
    }

    #[test]
    fn renders_two_pages_per_dataset() {
        let dataset = synthetic_dataset();
        let mut sink = RecordingSink::default();
        render_dataset(&dataset, &RenderConfig::default(), &mut sink).unwrap();

        assert_eq!(sink.pages.len(), 2);
        assert_eq!(sink.pages[0].0, "2dfielduniform.png");
        assert_eq!(sink.pages[1].0, "2dfieldB_uniform.png");
        // Arrow page: one arrow per sampled bin pair.
        assert_eq!(sink.pages[0].1, 1);
        // Field-line page: the uniform horizontal field draws segments.
        assert!(sink.pages[1].1 > 0);
    }

    #[test]
    fn sink_errors_propagate() {
        let dataset = synthetic_dataset();
        let result = render_dataset(&dataset, &RenderConfig::default(), &mut FailingSink);
        assert!(matches!(result, Err(RenderError::Backend(_))));
    }

    #[test]
    fn run_loads_and_renders() {
        let dir = std::env::temp_dir().join("fieldmap-pipeline-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("uniform.fm2");
        let mut file = std::fs::File::create(&path).unwrap();
        synthetic_container().write_to(&mut file).unwrap();
        drop(file);

        let specs = [DatasetSpec {
            path: path.clone(),
            title: "uniform".to_string(),
        }];
        let mut sink = RecordingSink::default();
        run(&specs, &RenderConfig::default(), &mut sink).unwrap();
        assert_eq!(sink.pages.len(), 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn run_fails_on_missing_file() {
        let specs = [DatasetSpec {
            path: PathBuf::from("/nonexistent/no-such-dataset.fm2"),
            title: "missing".to_string(),
        }];
        let result = run(&specs, &RenderConfig::default(), &mut RecordingSink::default());
        assert!(matches!(result, Err(PipelineError::Load(_))));
    }
}
