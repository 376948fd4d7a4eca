use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Escribe `contents` en `path` de forma atómica.
///
/// Primero vuelca todo a un archivo hermano `.tmp`, hace `fsync` y luego lo
/// renombra sobre el destino. Un lector nunca ve un archivo a medio escribir.
pub fn atomic_write(path: &Path, contents: &[u8]) -> io::Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }

  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents)?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  atomic_write(path, contents.as_bytes())
}
