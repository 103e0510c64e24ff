use std::io::Write;

use rusty_scrub::data::clean::{clean_store, CleaningOptions};
use rusty_scrub::data::export::{export_csv, write_csv};
use rusty_scrub::data::loader::{load_file, parse_str, IngestOptions};
use rusty_scrub::data::selection::{remove_rows, SelectionSet};
use rusty_scrub::data::window::{project, to_global_indices, Window};
use rusty_scrub::data::PipelineError;
use tempfile::NamedTempFile;

fn write_fixture(contents: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    tmp.write_all(contents.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn sensor_csv(rows: usize) -> String {
    let mut text = String::from("time,reading,note\n");
    for i in 0..rows {
        let reading = match i % 10 {
            0 => "0".to_string(),
            7 => format!("-{i}"),
            _ => format!("{}.5", i % 7),
        };
        text.push_str(&format!("{i},{reading},n{i}\n"));
    }
    text
}

#[test]
fn load_file_drops_text_columns() {
    let tmp = write_fixture(&sensor_csv(20));
    let ds = load_file(tmp.path(), &IngestOptions::default()).unwrap();
    assert_eq!(ds.schema.names(), &["time".to_string(), "reading".to_string()]);
    assert_eq!(ds.rows_read, 20);
    assert_eq!(ds.store.len_of("time"), 20);
    assert!(ds.store.is_aligned());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(&dir.path().join("absent.csv"), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
}

#[test]
fn clean_select_window_export() {
    let ds = parse_str(&sensor_csv(100), &IngestOptions::default()).unwrap();
    let options = CleaningOptions {
        remove_zeros: true,
        remove_negatives: true,
        ..CleaningOptions::default()
    };

    let cleaned = clean_store(&ds.store, &options);
    // time still contains 0 at row 0
    assert_eq!(cleaned.len_of("time"), 99);
    // 10 zeros and 10 negatives gone
    assert_eq!(cleaned.len_of("reading"), 80);

    // a second pass with the same options changes nothing
    let again = clean_store(&cleaned, &options);
    assert_eq!(again.columns(), cleaned.columns());

    // the display shows rows 10..20 and the user picks its first three points
    let window = Window::new(10, 20).clamp(cleaned.len_of("time"));
    let selection = to_global_indices(window, [0, 1, 2]);
    assert_eq!(selection, SelectionSet::from([10, 11, 12]));

    let trimmed = remove_rows(&cleaned, &selection);
    assert_eq!(trimmed.len_of("time"), 96);
    assert_eq!(trimmed.len_of("reading"), 77);
    assert_eq!(project(&trimmed, "time", window), &[14.0, 15.0, 16.0, 17.0, 18.0, 19.0, 20.0, 21.0, 22.0, 23.0]);

    let text = export_csv(&trimmed, ds.schema.names()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "time,reading");
    assert_eq!(lines.len(), 97);
    // reading is shorter, so the tail rows have an empty second cell
    assert!(lines[96].ends_with(','));
}

#[test]
fn export_then_reingest_round_trips() {
    let ds = parse_str(
        "x,y,z\n1,2.25,-3\n4,0,6\n7.5,8,9\n10,11,1e3\n",
        &IngestOptions::default(),
    )
    .unwrap();
    let cleaned = clean_store(
        &ds.store,
        &CleaningOptions {
            remove_zeros: true,
            ..CleaningOptions::default()
        },
    );

    let out = NamedTempFile::new().unwrap();
    write_csv(out.path(), &cleaned, ds.schema.names()).unwrap();
    let back = load_file(out.path(), &IngestOptions::default()).unwrap();

    assert_eq!(back.schema, ds.schema);
    for name in ds.schema.names() {
        assert_eq!(back.store.column(name), cleaned.column(name), "column {name}");
    }
}

#[test]
fn large_window_projection_is_bounded() {
    let ds = parse_str(&sensor_csv(25_000), &IngestOptions::default()).unwrap();
    let total = ds.store.len_of("time");
    let window = Window::initial(total, 10_000);
    assert_eq!(project(&ds.store, "time", window).len(), 10_000);

    let last = window.pan(isize::MAX, total);
    assert_eq!(last, Window::new(15_000, 25_000));
    assert_eq!(project(&ds.store, "time", last).first(), Some(&15_000.0));
}
