use crate::error::Result;
use crate::field::FieldSnapshot;
use crate::render::Renderer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub struct ImageExporter {
    renderer: Renderer,
}

impl ImageExporter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            renderer: Renderer::new(width, height),
        }
    }

    pub fn export_density_png(&self, snapshot: &FieldSnapshot, path: &Path) -> Result<()> {
        self.renderer.render_density(snapshot).save(path)?;
        Ok(())
    }

    pub fn export_velocity_png(&self, snapshot: &FieldSnapshot, path: &Path) -> Result<()> {
        self.renderer.render_velocity(snapshot).save(path)?;
        Ok(())
    }
}

/// Writes the snapshot as pretty JSON.
pub fn export_snapshot_json(snapshot: &FieldSnapshot, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, snapshot)?;
    Ok(())
}
