//! External `gnuplot` backend
//!
//! Plot data goes through a temporary file that lives only for the duration
//! of one call; the script is fed to gnuplot on stdin.

use super::{DecisionMap, ImageConfig, Renderer};
use crate::data::{LabeledSamples, Points};
use crate::error::{Result, ToyError};
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;
use tracing::debug;

/// Write one data block per class, blocks separated by two blank lines
/// so that gnuplot can address them with `index`.
pub fn write_scatter_data<W: Write>(writer: &mut W, classes: &[Points]) -> Result<()> {
    for (idx, class) in classes.iter().enumerate() {
        if idx > 0 {
            writeln!(writer)?;
            writeln!(writer)?;
        }
        for (x, y) in class.iter() {
            writeln!(writer, "{} {}", x, y)?;
        }
    }
    Ok(())
}

/// Write the map in pm3d block format: one block per x, rows sorted by y,
/// a blank line after each block. Classes are spread evenly over [-1, 1].
pub fn write_pm3d_data<W: Write>(writer: &mut W, map: &DecisionMap) -> Result<()> {
    let grid = map.grid();
    let n_classes = map.n_classes();

    for (i, x) in grid.xs().iter().enumerate() {
        for (j, y) in grid.ys().iter().enumerate() {
            let z = class_level(map.class_at(i, j), n_classes);
            writeln!(writer, "{} {} {}", x, y, z)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn class_level(class: usize, n_classes: usize) -> f64 {
    if n_classes <= 1 {
        return -1.0;
    }
    2.0 * class as f64 / (n_classes - 1) as f64 - 1.0
}

/// gnuplot single-quoted string literal
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Renders by shelling out to gnuplot
#[derive(Debug, Clone)]
pub struct GnuplotRenderer {
    config: ImageConfig,
    program: String,
}

impl GnuplotRenderer {
    pub fn new(config: ImageConfig) -> Self {
        Self {
            config,
            program: "gnuplot".to_string(),
        }
    }

    /// Use a different gnuplot executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn preamble(&self, title: &str, path: &Path) -> String {
        format!(
            "reset\nset term png size {},{}\nset out {}\nset title {}\n",
            self.config.width,
            self.config.height,
            quote(&path.display().to_string()),
            quote(title)
        )
    }

    fn temp_data(
        &self,
        fill: impl FnOnce(&mut BufWriter<&File>) -> Result<()>,
    ) -> Result<NamedTempFile> {
        let file = tempfile::Builder::new()
            .prefix("gnuplot")
            .suffix(".dat")
            .tempfile()?;
        {
            let mut writer = BufWriter::new(file.as_file());
            fill(&mut writer)?;
            writer.flush()?;
        }
        Ok(file)
    }

    /// Scatter script for a data file written by [`write_scatter_data`]
    pub fn scatter_script(
        &self,
        n_classes: usize,
        data: &Path,
        title: &str,
        path: &Path,
    ) -> String {
        let data = quote(&data.display().to_string());
        let series: Vec<String> = (0..n_classes)
            .map(|idx| {
                format!(
                    "{} index {} title 's{}' pt 6 lw 4 lc rgb '{}'",
                    data,
                    idx,
                    idx + 1,
                    hex(self.config.series_color(idx).0)
                )
            })
            .collect();

        format!("{}plot {}\n", self.preamble(title, path), series.join(", "))
    }

    /// pm3d map script for a data file written by [`write_pm3d_data`]
    pub fn map_script(
        &self,
        data: &Path,
        overlay: Option<&Path>,
        title: &str,
        path: &Path,
    ) -> String {
        let [low, high] = self.config.map_colors;
        let mut script = self.preamble(title, path);
        script.push_str("set pm3d map\nunset colorbox\n");
        script.push_str(&format!(
            "set palette defined (0 '{}', 1 '{}')\n",
            hex(low),
            hex(high)
        ));
        script.push_str("unset key\n");
        script.push_str(&format!("splot {}", quote(&data.display().to_string())));
        if let Some(overlay) = overlay {
            script.push_str(&format!(
                ", {} using 1:2:(0) with points pt 7 lc rgb 'black' nogrid",
                quote(&overlay.display().to_string())
            ));
        }
        script.push('\n');
        script
    }

    fn run(&self, script: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    ToyError::Gnuplot(format!("{} not found in PATH", self.program))
                }
                _ => ToyError::Io(e),
            })?;

        // Reap the child even when the pipe breaks before the script is written
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(script.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        if let Err(e) = written {
            return Err(ToyError::Gnuplot(format!(
                "failed to send script to {} ({}): {}",
                self.program,
                e,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if !output.status.success() {
            return Err(ToyError::Gnuplot(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Renderer for GnuplotRenderer {
    fn scatter(&self, samples: &LabeledSamples, title: &str, path: &Path) -> Result<()> {
        let classes = samples.class_points()?;
        let data = self.temp_data(|w| write_scatter_data(w, &classes))?;

        let script = self.scatter_script(classes.len(), data.path(), title, path);
        debug!(title, data = %data.path().display(), "running gnuplot scatter");
        self.run(&script)
    }

    fn decision_map(
        &self,
        map: &DecisionMap,
        overlay: Option<&LabeledSamples>,
        title: &str,
        path: &Path,
    ) -> Result<()> {
        let data = self.temp_data(|w| write_pm3d_data(w, map))?;
        let overlay_data = match overlay {
            Some(samples) => {
                let classes = samples.class_points()?;
                Some(self.temp_data(|w| write_scatter_data(w, &classes))?)
            }
            None => None,
        };

        let script = self.map_script(
            data.path(),
            overlay_data.as_ref().map(NamedTempFile::path),
            title,
            path,
        );
        debug!(title, data = %data.path().display(), "running gnuplot pm3d map");
        self.run(&script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Bounds, Grid};

    fn map() -> DecisionMap {
        let bounds = Bounds {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 2.0,
        };
        let grid = Grid::covering(&bounds, 2).unwrap();
        // rows: y=0 -> [0, 1], y=2 -> [0, 0]
        DecisionMap::new(grid, vec![0, 1, 0, 0], 2).unwrap()
    }

    #[test]
    fn test_pm3d_blocks() {
        let mut out = Vec::new();
        write_pm3d_data(&mut out, &map()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "0 0 -1\n0 2 -1\n\n1 0 1\n1 2 -1\n\n");
    }

    #[test]
    fn test_scatter_blocks() {
        let classes = vec![
            Points::new(vec![1.0], vec![2.0]),
            Points::new(vec![3.5, 4.0], vec![-1.0, 0.0]),
        ];
        let mut out = Vec::new();
        write_scatter_data(&mut out, &classes).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "1 2\n\n\n3.5 -1\n4 0\n");
    }

    #[test]
    fn test_class_levels() {
        assert_eq!(class_level(0, 2), -1.0);
        assert_eq!(class_level(1, 2), 1.0);
        assert_eq!(class_level(1, 3), 0.0);
    }

    #[test]
    fn test_scripts_reference_output_and_palette() {
        let renderer = GnuplotRenderer::new(ImageConfig::default());
        let script = renderer.map_script(
            Path::new("/tmp/g.dat"),
            None,
            "KNeighbors-0.png",
            Path::new("out/KNeighbors-0.png"),
        );

        assert!(script.contains("set out 'out/KNeighbors-0.png'"));
        assert!(script.contains("set pm3d map"));
        assert!(script.contains("'#46e0d1'"));
        assert!(script.contains("'#059297'"));
        assert!(script.contains("splot '/tmp/g.dat'"));

        let scatter = renderer.scatter_script(2, Path::new("d.dat"), "it's", Path::new("a.png"));
        assert!(scatter.contains("set title 'it''s'"));
        assert!(scatter.contains("index 1 title 's2' pt 6 lw 4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_is_reported() {
        // `true` exits without reading its stdin
        let renderer = GnuplotRenderer::new(ImageConfig::default()).with_program("true");
        let big = "set print '-'\n".repeat(200_000);

        let result = renderer.run(&big);
        assert!(matches!(result, Err(ToyError::Gnuplot(_))));
    }

    #[test]
    fn test_missing_program_reported() {
        let renderer =
            GnuplotRenderer::new(ImageConfig::default()).with_program("gnuplot-does-not-exist-42");
        let result = renderer.decision_map(&map(), None, "t", Path::new("never.png"));
        assert!(matches!(result, Err(ToyError::Gnuplot(_))));
    }
}
