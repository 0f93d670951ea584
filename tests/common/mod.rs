//! Common test utilities for modlayer integration tests

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Wizard with one exactly-one group: "Full" sets `Core=1`, "Lite" sets
/// `Core=0`, and `extra.ini` is installed only when `Core=1`
pub const CORE_WIZARD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<config xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <moduleName>Core Mod</moduleName>
  <requiredInstallFiles>
    <file source="Core/CoreMod.esp" destination="CoreMod.esp"/>
  </requiredInstallFiles>
  <installSteps order="Explicit">
    <installStep name="Options">
      <optionalFileGroups order="Explicit">
        <group name="Variant" type="SelectExactlyOne">
          <plugins order="Explicit">
            <plugin name="Full">
              <description>Everything</description>
              <files><folder source="Full/Textures" destination="textures"/></files>
              <conditionFlags><flag name="Core">1</flag></conditionFlags>
              <typeDescriptor><type name="Recommended"/></typeDescriptor>
            </plugin>
            <plugin name="Lite">
              <files><folder source="Lite/Textures" destination="textures"/></files>
              <conditionFlags><flag name="Core">0</flag></conditionFlags>
            </plugin>
          </plugins>
        </group>
      </optionalFileGroups>
    </installStep>
  </installSteps>
  <conditionalFileInstalls>
    <patterns>
      <pattern>
        <dependencies operator="And"><flagDependency flag="Core" value="1"/></dependencies>
        <files><file source="Extras/extra.ini" destination="extra.ini"/></files>
      </pattern>
    </patterns>
  </conditionalFileInstalls>
</config>"#;

/// A scratch game with Data, overlay and downloads directories
#[allow(dead_code)]
pub struct TestGame {
    pub temp: TempDir,
    pub data: PathBuf,
    pub overlay: PathBuf,
    pub downloads: PathBuf,
}

#[allow(dead_code)]
impl TestGame {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let data = temp.path().join("Data");
        let overlay = temp.path().join("overlay");
        let downloads = temp.path().join("downloads");
        fs::create_dir_all(&data).expect("Failed to create Data");
        fs::create_dir_all(&downloads).expect("Failed to create downloads");
        Self {
            temp,
            data,
            overlay,
            downloads,
        }
    }

    /// `modlayer` pointed at this game's Data directory
    pub fn cmd(&self) -> Command {
        let mut cmd = modlayer_cmd();
        cmd.arg("--no-colors").arg("-d").arg(&self.data);
        cmd
    }

    /// `modlayer` in overlay mode
    pub fn overlay_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("-o").arg(&self.overlay);
        cmd
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data.join("modlayer-overlay.xml")
    }

    /// Build a zip package in the downloads directory
    pub fn zip(&self, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
        let path = self.downloads.join(name);
        write_zip(&path, entries);
        path
    }

    /// Package built around [`CORE_WIZARD`]
    pub fn core_package(&self, name: &str) -> PathBuf {
        self.zip(
            name,
            &[
                ("fomod/ModuleConfig.xml", CORE_WIZARD.as_bytes()),
                ("Core/CoreMod.esp", b"TES4"),
                ("Full/Textures/Sky.dds", b"full"),
                ("Lite/Textures/Sky.dds", b"lite"),
                ("Extras/extra.ini", b"[Extra]"),
            ],
        )
    }

    /// A package without a wizard that provides `files` with `content`
    pub fn loose_package(&self, name: &str, files: &[&str], content: &str) -> PathBuf {
        let entries: Vec<(&str, &[u8])> = files.iter().map(|f| (*f, content.as_bytes())).collect();
        self.zip(name, &entries)
    }

    pub fn data_file(&self, path: &str) -> PathBuf {
        self.data.join(path)
    }

    pub fn read_data(&self, path: &str) -> String {
        fs::read_to_string(self.data.join(path)).expect("Failed to read Data file")
    }

    pub fn link_target(&self, path: &str) -> Option<PathBuf> {
        fs::read_link(self.data.join(path)).ok()
    }
}

/// The real modlayer binary with no configuration leaking in from the environment
#[allow(deprecated)]
pub fn modlayer_cmd() -> Command {
    let mut cmd = Command::cargo_bin("modlayer").expect("modlayer binary");
    for var in [
        "MODLAYER_DATA",
        "MODLAYER_OVERLAY",
        "MODLAYER_LEDGER",
        "MODLAYER_PLUGINS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("Failed to create zip");
    let mut zip = zip::ZipWriter::new(file);
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        zip.write_all(data).expect("Failed to write zip entry");
    }
    zip.finish().expect("Failed to finish zip");
}
