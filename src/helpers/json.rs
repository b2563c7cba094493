use eyre::{Result, WrapErr, bail};
use std::path::{Path, PathBuf};

use crate::record::DepositRecord;

/// Inserts or replaces top level keys of the json object stored at `json_path`
pub fn update<T>(json_path: &Path, keyval: Vec<(&str, T)>) -> Result<()>
where
    T: serde::Serialize,
{
    let file = std::fs::File::open(json_path)
        .wrap_err_with(|| format!("{}", json_path.display()))?;
    let mut document = serde_json::from_reader::<_, serde_json::Value>(&file)?;
    let Some(obj) = document.as_object_mut() else {
        bail!("{} is not a json object", json_path.display());
    };
    for (key, val) in keyval.iter() {
        obj.insert(key.to_string(), serde_json::json!(val));
    }
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        // Add truncate or shorter names will malform our store
        // https://ddanilov.me/how-to-overwrite-a-file-in-rust
        .truncate(true)
        .open(json_path)?;
    serde_json::to_writer(&mut file, &obj)?;
    Ok(())
}

pub fn deposit_data_filename(timestamp: u64) -> String {
    format!("deposit_data-{}.json", timestamp)
}

pub fn write_deposit_data(
    dir: &Path,
    records: &[DepositRecord],
    timestamp: u64,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).wrap_err_with(|| format!("{}", dir.display()))?;
    let path = dir.join(deposit_data_filename(timestamp));
    let file = std::fs::File::create(&path).wrap_err_with(|| format!("{}", path.display()))?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(path)
}

pub fn read_deposit_data(path: &Path) -> Result<Vec<DepositRecord>> {
    let file = std::fs::File::open(path).wrap_err_with(|| format!("{}", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .wrap_err_with(|| format!("{}: not a deposit data file", path.display()))
}
