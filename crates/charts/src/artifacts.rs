use crate::error::ChartError;
use crate::figure::{ChartKind, Figure};
use crate::raster::render_png;
use chrono::NaiveDateTime;
use core_types::Instrument;
use std::fs;
use std::path::{Path, PathBuf};

const KINDS: [ChartKind; 2] = [ChartKind::Price, ChartKind::Drawdown];

/// Chart image files inside one output directory.
#[derive(Debug, Clone)]
pub struct ChartArtifacts {
    dir: PathBuf,
    size: (u32, u32),
}

impl ChartArtifacts {
    pub fn new(dir: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            dir: dir.into(),
            size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `sp500_price_20240105_093000.png`
    pub fn timestamped_name(instrument: Instrument, kind: ChartKind, at: NaiveDateTime) -> String {
        format!(
            "{}_{}_{}.png",
            instrument.key(),
            kind.slug(),
            at.format("%Y%m%d_%H%M%S")
        )
    }

    /// `sp500_price.png`
    pub fn plain_name(instrument: Instrument, kind: ChartKind) -> String {
        format!("{}_{}.png", instrument.key(), kind.slug())
    }

    /// Deletes every timestamped chart of every instrument in the directory.
    ///
    /// Only names starting with `{key}_price_` or `{key}_drawdown_` are
    /// touched. A missing directory has nothing to purge.
    pub fn purge_stale(&self) -> Result<usize, ChartError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let prefixes: Vec<String> = Instrument::ALL
            .iter()
            .flat_map(|instrument| {
                KINDS
                    .iter()
                    .map(move |kind| format!("{}_{}_", instrument.key(), kind.slug()))
            })
            .collect();

        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())) {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!(removed, dir = %self.dir.display(), "Removed stale chart files.");
        }
        Ok(removed)
    }

    /// Draws `figure` to `file_name` inside the directory, creating it first.
    pub fn write(&self, figure: &Figure, file_name: &str) -> Result<PathBuf, ChartError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        render_png(figure, &path, self.size)?;
        tracing::info!(path = %path.display(), kind = figure.kind.slug(), "Wrote chart.");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn file_names() {
        assert_eq!(
            ChartArtifacts::timestamped_name(Instrument::Sp500, ChartKind::Price, at()),
            "sp500_price_20240105_093000.png"
        );
        assert_eq!(
            ChartArtifacts::timestamped_name(Instrument::Emerging, ChartKind::Drawdown, at()),
            "emerging_drawdown_20240105_093000.png"
        );
        assert_eq!(
            ChartArtifacts::plain_name(Instrument::Nasdaq100, ChartKind::Drawdown),
            "nasdaq100_drawdown.png"
        );
    }

    #[test]
    fn purge_removes_only_timestamped_charts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "sp500_price_20240101_000000.png",
            "sp500tr_drawdown_20240101_000000.png",
            "kokusai_price_20231231_235959.png",
            "sp500_price.png",
            "notes.txt",
            "dowjones_price_20240101_000000.png",
        ] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let artifacts = ChartArtifacts::new(dir.path(), (10, 10));
        assert_eq!(artifacts.purge_stale().unwrap(), 3);

        let mut left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        left.sort();
        assert_eq!(
            left,
            vec!["dowjones_price_20240101_000000.png", "notes.txt", "sp500_price.png"]
        );
    }

    #[test]
    fn purge_of_missing_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ChartArtifacts::new(dir.path().join("not-yet"), (10, 10));
        assert_eq!(artifacts.purge_stale().unwrap(), 0);
    }

    #[test]
    fn empty_figures_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = ChartArtifacts::new(dir.path(), (10, 10));
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let figure = Figure {
            kind: ChartKind::Price,
            title: String::new(),
            series_label: String::new(),
            y_axis_label: String::new(),
            points: Vec::new(),
            x_range: (day, day),
            x_ticks: Vec::new(),
            date_format: crate::axis::DateLabelFormat::FullDate,
            y_range: (0.0, 1.0),
            y_ticks: None,
            value_style: crate::figure::ValueStyle::Thousands,
        };

        let err = artifacts.write(&figure, "empty.png").unwrap_err();
        assert!(matches!(err, ChartError::EmptyFigure));
        assert!(!dir.path().join("empty.png").exists());
    }
}
