//! The demo pipeline: generate data, fit models, probe a grid, plot

use crate::config::Config;
use crate::data::{DatasetKind, Grid, LabeledSamples, ToyGenerator};
use crate::error::Result;
use crate::models::ModelKind;
use crate::plot::{DecisionMap, Renderer};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of fitting one model on one dataset
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub dataset_index: usize,
    pub dataset: DatasetKind,
    pub model: ModelKind,
    /// Accuracy on the training samples
    pub accuracy: f64,
    pub path: PathBuf,
}

/// Runs every configured model on every configured dataset
pub struct Demo {
    config: Config,
    renderer: Box<dyn Renderer>,
}

impl Demo {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let renderer = config.plot.renderer.build(&config.plot.image);
        Ok(Self { config, renderer })
    }

    /// Use a custom renderer instead of the configured one
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// File name of the raw data plot for dataset `index`
    pub fn data_file_name(index: usize) -> String {
        format!("toydata{}.png", index)
    }

    /// File name of the decision map for `model` on dataset `index`
    pub fn map_file_name(model: ModelKind, index: usize) -> String {
        format!("{}-{}.png", model, index)
    }

    /// Generate the samples of one dataset
    pub fn generate(
        &self,
        kind: DatasetKind,
        generator: &mut ToyGenerator,
    ) -> Result<LabeledSamples> {
        let classes = kind.generate(generator, self.config.data.samples_per_class)?;
        LabeledSamples::from_classes(&classes)
    }

    /// Run the whole pipeline, returning one record per dataset/model pair
    pub fn run(&self) -> Result<Vec<RunRecord>> {
        let out_dir = &self.config.output.dir;
        std::fs::create_dir_all(out_dir)?;

        let mut generator = ToyGenerator::new(self.config.data.seed, self.config.data.noise)?;
        let mut records = Vec::new();

        for (index, &kind) in self.config.data.datasets.iter().enumerate() {
            let samples = self.generate(kind, &mut generator)?;
            info!(
                dataset = %kind,
                index,
                samples = samples.n_samples(),
                "generated toy data"
            );

            if self.config.output.save_data {
                let csv_path = out_dir.join(format!("toydata{}.csv", index));
                samples.save_csv(&csv_path)?;
                info!(path = %csv_path.display(), "saved samples");
            }

            let name = Self::data_file_name(index);
            self.renderer.scatter(&samples, &name, &out_dir.join(&name))?;

            let grid = Grid::covering(&samples.bounds()?, self.config.plot.resolution)?;
            let grid_points = grid.points();

            // Fit and probe in parallel; rendering below keeps the configured order
            let model_config = &self.config.model;
            let fitted = self
                .config
                .model
                .models
                .par_iter()
                .map(|&model_kind| -> Result<(ModelKind, f64, Vec<usize>)> {
                    let mut model = model_kind.build(model_config);
                    model.fit(&samples.features, &samples.labels)?;
                    let accuracy = model.accuracy(&samples.features, &samples.labels)?;
                    let predictions = model.predict(&grid_points)?;
                    Ok((model_kind, accuracy, predictions))
                })
                .collect::<Result<Vec<_>>>()?;

            for (model_kind, accuracy, predictions) in fitted {
                if accuracy < 0.6 {
                    warn!(model = %model_kind, dataset = %kind, accuracy, "poor training fit");
                }

                let map = DecisionMap::new(grid.clone(), predictions, samples.n_classes())?;

                let name = Self::map_file_name(model_kind, index);
                let path = out_dir.join(&name);
                let overlay = self.config.plot.overlay_samples.then_some(&samples);
                self.renderer.decision_map(&map, overlay, &name, &path)?;

                info!(
                    model = %model_kind,
                    dataset = %kind,
                    accuracy = %format!("{:.3}", accuracy),
                    path = %path.display(),
                    "decision boundary rendered"
                );

                records.push(RunRecord {
                    dataset_index: index,
                    dataset: kind,
                    model: model_kind,
                    accuracy,
                    path,
                });
            }
        }

        Ok(records)
    }
}

/// Print the run summary table
pub fn print_summary(records: &[RunRecord]) {
    println!("\n=== Training Accuracy ===\n");
    println!("{:>3} {:<8} {:<13} {:>9}  {}", "#", "Dataset", "Model", "Accuracy", "Image");
    println!("{}", "-".repeat(60));

    for record in records {
        println!(
            "{:>3} {:<8} {:<13} {:>8.2}%  {}",
            record.dataset_index,
            record.dataset.name(),
            record.model.name(),
            record.accuracy * 100.0,
            record.path.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToyError;
    use std::cell::RefCell;
    use std::path::Path;

    /// Records what would have been drawn
    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<String>>,
    }

    impl Renderer for std::rc::Rc<RecordingRenderer> {
        fn scatter(&self, samples: &LabeledSamples, title: &str, _path: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("scatter {} {}", title, samples.n_samples()));
            Ok(())
        }

        fn decision_map(
            &self,
            map: &DecisionMap,
            _overlay: Option<&LabeledSamples>,
            title: &str,
            _path: &Path,
        ) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("map {} {}", title, map.grid().len()));
            Ok(())
        }
    }

    fn small_config(dir: &Path) -> Config {
        let mut config = Config::new();
        config.data.samples_per_class = 20;
        config.plot.resolution = 8;
        config.output.dir = dir.to_path_buf();
        config
    }

    #[test]
    fn test_file_names() {
        assert_eq!(Demo::data_file_name(1), "toydata1.png");
        assert_eq!(Demo::map_file_name(ModelKind::KNeighbors, 0), "KNeighbors-0.png");
    }

    #[test]
    fn test_run_visits_every_pair_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = std::rc::Rc::new(RecordingRenderer::default());

        let demo = Demo::new(small_config(dir.path()))
            .unwrap()
            .with_renderer(Box::new(recorder.clone()));
        let records = demo.run().unwrap();

        assert_eq!(records.len(), 10);
        let calls = recorder.calls.borrow();
        assert_eq!(calls.len(), 12);
        assert_eq!(calls[0], "scatter toydata0.png 40");
        assert_eq!(calls[1], "map DecisionTree-0.png 64");
        assert_eq!(calls[6], "scatter toydata1.png 40");
        assert_eq!(calls[11], "map AdaBoost-1.png 64");
    }

    #[test]
    fn test_tree_models_memorize_training_data() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = std::rc::Rc::new(RecordingRenderer::default());
        let mut config = small_config(dir.path());
        config.model.models = vec![ModelKind::DecisionTree, ModelKind::KNeighbors];

        let records = Demo::new(config)
            .unwrap()
            .with_renderer(Box::new(recorder))
            .run()
            .unwrap();

        // Duplicate points with different labels are the only way to miss
        assert!(records.iter().all(|r| r.accuracy > 0.95));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::new();
        config.plot.resolution = 0;
        assert!(matches!(Demo::new(config), Err(ToyError::InvalidParameter(_))));
    }
}
