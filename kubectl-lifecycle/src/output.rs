use std::{fs::File, io::prelude::*};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled, settings::Style};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Format {
  /// Table format used for writing to stdout
  #[default]
  Table,
  /// JSON format used for logging or writing to a *.json file
  Json,
}

/// Renders the rows as a table or as a JSON array
pub fn render<T: Serialize + Tabled>(rows: &[T], format: Format) -> Result<String> {
  let rendered = match format {
    Format::Json => serde_json::to_string_pretty(rows)?,
    Format::Table => {
      let mut table = Table::new(rows);
      table.with(Style::sharp());
      table.to_string()
    }
  };

  Ok(rendered)
}

/// Writes the rendered output to `filename`, or stdout when no file is given
pub fn write(rendered: &str, filename: Option<&str>) -> Result<()> {
  match filename {
    Some(filename) => {
      let mut file = File::create(filename).with_context(|| format!("Failed to create output file: {filename}"))?;
      file.write_all(rendered.as_bytes())?;
      file.write_all(b"\n")?;
    }
    None => {
      println!("{rendered}");
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Serialize, Tabled)]
  struct Row {
    name: String,
    count: i32,
  }

  fn rows() -> Vec<Row> {
    vec![Row {
      name: "coredns".to_string(),
      count: 2,
    }]
  }

  #[test]
  fn render_json() {
    let rendered = render(&rows(), Format::Json).unwrap();
    assert_eq!(rendered, "[\n  {\n    \"name\": \"coredns\",\n    \"count\": 2\n  }\n]");
  }

  #[test]
  fn render_table() {
    let rendered = render(&rows(), Format::Table).unwrap();
    assert!(rendered.contains("name"));
    assert!(rendered.contains("coredns"));
    assert!(rendered.starts_with('┌'), "sharp style table: {rendered}");
  }

  #[test]
  fn render_empty_json() {
    let empty: Vec<Row> = vec![];
    assert_eq!(render(&empty, Format::Json).unwrap(), "[]");
  }

  #[test]
  fn write_to_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("out.json");
    write("[]", path.to_str()).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
  }
}
