//! Shape a measurement table for Piper triangle plots.
//!
//! The output follows the column convention of common Piper plotting tools:
//! `Label`, `Color`, `Marker`, `Size`, `Alpha`, plus the ion columns `CO3` and
//! `HCO3`. Columns that already exist are never overwritten, so formatting an
//! already formatted table changes nothing.

use crate::error::{Error, Result};
use crate::style::{DEFAULT_STYLE, StyleRules};
use log::debug;
use polars::prelude::{Column, DataFrame, DataType, Float64Chunked, IntoSeries};

/// meq/L alkalinity -> mg/L bicarbonate.
pub const ALKALINITY_TO_HCO3: f64 = 61.0168;

/// Presentation settings for [`format_piper`].
#[derive(Debug, Clone)]
pub struct PiperOptions {
    /// Column copied into `Label`.
    pub label_col: String,
    /// Constant color used when `color_rules` is `None`.
    pub color: String,
    /// Constant marker used when `marker_rules` is `None`.
    pub marker: String,
    pub size: i32,
    pub alpha: f64,
    /// Multiply `Alkalinity` by [`ALKALINITY_TO_HCO3`] before renaming it to `HCO3`.
    pub convert_alkalinity: bool,
    /// Per-label colors, matched against `Label`.
    pub color_rules: Option<StyleRules>,
    /// Per-label markers, matched against `Label`.
    pub marker_rules: Option<StyleRules>,
}

impl Default for PiperOptions {
    fn default() -> Self {
        Self {
            label_col: "station".into(),
            color: "black".into(),
            marker: "o".into(),
            size: 30,
            alpha: 0.7,
            convert_alkalinity: false,
            color_rules: None,
            marker_rules: None,
        }
    }
}

/// Return a copy of `df` with the Piper presentation columns added.
///
/// Each step only runs when its target column is absent:
/// 1. `Label` <- values of `label_col`
/// 2. `Color` <- per-label rule match, or the constant color
/// 3. `Marker` <- per-label rule match, or the constant marker
/// 4. `Size`, `Alpha` <- constants
/// 5. `CO3` <- `0.0`
/// 6. `Alkalinity`, if present, is converted (when asked) and renamed to `HCO3`
///
/// ### Errors
/// - [`Error::MissingColumn`] when `Label` has to be built and `label_col` does not exist
/// - [`Error::DuplicateColumn`] when both `Alkalinity` and `HCO3` are present
/// - [`Error::NonNumeric`] when converting an `Alkalinity` column holding text
///   such as `"<0.1"`
///
/// On error the input is left untouched and nothing is returned.
pub fn format_piper(df: &DataFrame, opts: &PiperOptions) -> Result<DataFrame> {
    let mut out = df.clone();
    let n = out.height();

    if !has_column(&out, "Label") {
        let label = out
            .column(&opts.label_col)
            .map_err(|_| Error::MissingColumn(opts.label_col.clone()))?
            .clone()
            .with_name("Label".into());
        out.with_column(label)?;
    }

    if !has_column(&out, "Color") {
        let color = match &opts.color_rules {
            Some(rules) => assign_by_label(&out, rules, "Color")?,
            None => Column::new("Color".into(), vec![opts.color.clone(); n]),
        };
        out.with_column(color)?;
    }

    if !has_column(&out, "Marker") {
        let marker = match &opts.marker_rules {
            Some(rules) => assign_by_label(&out, rules, "Marker")?,
            None => Column::new("Marker".into(), vec![opts.marker.clone(); n]),
        };
        out.with_column(marker)?;
    }

    if !has_column(&out, "Size") {
        out.with_column(Column::new("Size".into(), vec![opts.size; n]))?;
    }
    if !has_column(&out, "Alpha") {
        out.with_column(Column::new("Alpha".into(), vec![opts.alpha; n]))?;
    }
    if !has_column(&out, "CO3") {
        out.with_column(Column::new("CO3".into(), vec![0.0f64; n]))?;
    }

    if has_column(&out, "Alkalinity") {
        if has_column(&out, "HCO3") {
            return Err(Error::DuplicateColumn("HCO3".into()));
        }
        if opts.convert_alkalinity {
            let raw = out.column("Alkalinity")?.as_materialized_series();
            let alk = raw.cast(&DataType::Float64)?;
            // The cast turns unparseable entries ("<0.1", "n.d.") into nulls.
            let lost = alk.null_count().saturating_sub(raw.null_count());
            if lost > 0 {
                return Err(Error::NonNumeric {
                    column: "Alkalinity".into(),
                    count: lost,
                });
            }
            let converted: Float64Chunked = alk
                .f64()?
                .into_iter()
                .map(|v| v.map(|x| x * ALKALINITY_TO_HCO3))
                .collect();
            out.with_column(converted.with_name("Alkalinity".into()).into_series())?;
        }
        out.rename("Alkalinity", "HCO3".into())?;
    } else if opts.convert_alkalinity {
        debug!("alkalinity conversion requested but no Alkalinity column present");
    }

    Ok(out)
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

// Null labels never match a rule.
fn assign_by_label(df: &DataFrame, rules: &StyleRules, name: &str) -> Result<Column> {
    let labels = df
        .column("Label")?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values: Vec<String> = labels
        .str()?
        .into_iter()
        .map(|l| l.map_or(DEFAULT_STYLE, |l| rules.assign(l)).to_string())
        .collect();
    Ok(Column::new(name.into(), values))
}
