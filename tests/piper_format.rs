use pghydro_rs::piper::{ALKALINITY_TO_HCO3, PiperOptions, format_piper};
use pghydro_rs::style::StyleRules;
use polars::df;
use polars::prelude::{DataFrame, DataType};

fn floats(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

fn sample() -> DataFrame {
    df!(
        "station" => &["Alpha-1", "Beta-2"],
        "Ca" => &[40.1, 52.3],
        "Mg" => &[8.2, 11.0],
        "Alkalinity" => &[10.0, 20.0]
    )
    .unwrap()
}

#[test]
fn formatting_twice_equals_formatting_once() {
    let opts = PiperOptions {
        color_rules: Some(StyleRules::new([("^A", "red"), ("^B", "blue")]).unwrap()),
        convert_alkalinity: true,
        ..PiperOptions::default()
    };
    let once = format_piper(&sample(), &opts).unwrap();
    let twice = format_piper(&once, &opts).unwrap();
    for col in ["Label", "Color", "Marker", "Size", "Alpha", "CO3", "HCO3"] {
        let a = once.column(col).unwrap().as_materialized_series();
        let b = twice.column(col).unwrap().as_materialized_series();
        assert!(a.equals(b), "column {col} changed on second pass");
    }
    assert_eq!(once.width(), twice.width());
}

#[test]
fn converted_alkalinity_becomes_hco3() {
    let opts = PiperOptions {
        convert_alkalinity: true,
        ..PiperOptions::default()
    };
    let out = format_piper(&sample(), &opts).unwrap();
    assert!(out.get_column_index("Alkalinity").is_none());
    let hco3 = floats(&out, "HCO3");
    assert!((hco3[0] - 610.168).abs() < 1e-9);
    assert!((hco3[1] - 1220.336).abs() < 1e-9);
    assert!((hco3[0] - 10.0 * ALKALINITY_TO_HCO3).abs() < 1e-12);
}

#[test]
fn unconverted_alkalinity_is_only_renamed() {
    let out = format_piper(&sample(), &PiperOptions::default()).unwrap();
    assert!(out.get_column_index("Alkalinity").is_none());
    assert_eq!(floats(&out, "HCO3"), [10.0, 20.0]);
}

#[test]
fn conversion_without_alkalinity_column_is_a_no_op() {
    let input = df!("station" => &["P1"], "HCO3" => &[250.0]).unwrap();
    let opts = PiperOptions {
        convert_alkalinity: true,
        ..PiperOptions::default()
    };
    let out = format_piper(&input, &opts).unwrap();
    assert_eq!(floats(&out, "HCO3"), [250.0]);
}

#[test]
fn custom_label_column_and_constants() {
    let input = df!("site" => &["S1", "S2"]).unwrap();
    let opts = PiperOptions {
        label_col: "site".into(),
        color: "tab:orange".into(),
        marker: "^".into(),
        size: 50,
        alpha: 1.0,
        ..PiperOptions::default()
    };
    let out = format_piper(&input, &opts).unwrap();
    let labels: Vec<&str> = out
        .column("Label")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(labels, ["S1", "S2"]);
    assert_eq!(floats(&out, "Size"), [50.0, 50.0]);
    assert_eq!(floats(&out, "Alpha"), [1.0, 1.0]);
    let markers: Vec<&str> = out
        .column("Marker")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(markers, ["^", "^"]);
}
