#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const CODES_CSV: &str = "\
ISO3166-1-Alpha-2,ISO3166-1-Alpha-3,Country
CA,CAN,Canada
US,USA,United States
FR,FRA,France
";

pub const GDP_CSV: &str = "\
Country Name,Country Code,1990,1991
Canada,CAN,1000,
United States,USA,100000,110000
Germany,DEU,500,600
";

pub const CATALOG_CSV: &str = "\
code,name
ca,Canada
us,United States
xx,Atlantis
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes the crosswalk, GDP table, catalog and a config that references
    /// them by relative path. Returns the config path.
    pub fn write_atlas(&self, codes: &str, gdp: &str, catalog: &str) -> PathBuf {
        self.write("codes.csv", codes);
        self.write("gdp.csv", gdp);
        self.write("catalog.csv", catalog);
        self.write(
            "atlas.yaml",
            r#"codes:
  source: codes.csv
  key_column: ISO3166-1-Alpha-2
  value_column: ISO3166-1-Alpha-3
gdp:
  source: gdp.csv
  key_column: Country Code
  name_column: Country Name
catalog:
  source: catalog.csv
  code_column: code
  name_column: name
"#,
        )
    }
}
