//! TypeScript definitions for a browser front-end driving [`ReaderSession`]
//! through [`SessionCommand`]s.
//!
//! [`ReaderSession`]: crate::session::ReaderSession
//! [`SessionCommand`]: crate::session::SessionCommand

use crate::navigation::PanelState;
use crate::page::{Page, PageKind};
use crate::session::{ReaderSnapshot, SessionCommand, SessionEffect, SheetView, ThumbnailView};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<&'static str> {
    T::export_all_to(out_dir).with_context(|| format!("exporting {}", T::name()))?;
    Ok(std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or_default())
}

pub fn export_ts_bindings(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir).with_context(|| format!("listing {}", out_dir.display()))? {
        let path = entry.context("reading directory entry")?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        }
    }

    let exported = [
        export_single_type::<PageKind>(out_dir)?,
        export_single_type::<Page>(out_dir)?,
        export_single_type::<PanelState>(out_dir)?,
        export_single_type::<SheetView>(out_dir)?,
        export_single_type::<ThumbnailView>(out_dir)?,
        export_single_type::<ReaderSnapshot>(out_dir)?,
        export_single_type::<SessionCommand>(out_dir)?,
        export_single_type::<SessionEffect>(out_dir)?,
    ];

    let index_content: String = exported
        .iter()
        .map(|name| format!("export type {{ {name} }} from \"./{name}\";\n"))
        .collect();
    let index_path = out_dir.join("index.ts");
    fs::write(&index_path, index_content)
        .with_context(|| format!("writing {}", index_path.display()))?;
    tracing::info!(dir = %out_dir.display(), types = exported.len(), "Exported TS bindings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_one_file_per_type_and_an_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Stale.ts"), "old").expect("seed stale file");
        export_ts_bindings(dir.path()).expect("export bindings");

        assert!(!dir.path().join("Stale.ts").exists());
        assert!(dir.path().join("ReaderSnapshot.ts").exists());
        let index = fs::read_to_string(dir.path().join("index.ts")).expect("index");
        assert!(index.contains("export type { SessionCommand } from \"./SessionCommand\";"));
    }
}
