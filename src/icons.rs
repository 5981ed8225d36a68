use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use opencv::{
    core::{Mat, Vec4b},
    imgcodecs,
    prelude::*,
};

use crate::error::Error;
use crate::label::Label;

pub const DEFAULT_BASE_URL: &str = "http://files.heuritech.com/raw_files/surfrider/";

/// Class icons, one per label, loaded once and shared read-only by renderers
#[derive(Debug, Clone)]
pub struct IconSet<B> {
    icons: [B; Label::COUNT],
}

impl<B> IconSet<B> {
    /// Icons in `Label::ALL` order
    pub fn from_bitmaps(icons: [B; Label::COUNT]) -> Self {
        Self { icons }
    }

    #[inline]
    pub fn get(&self, label: Label) -> &B {
        &self.icons[label.index()]
    }
}

#[inline]
pub fn file_name(label: Label) -> &'static str {
    match label {
        Label::Bottle => "bottle.png",
        Label::Fragment => "fragment.png",
        Label::Other => "other.png",
    }
}

/// Where icons are cached on disk and fetched from when missing
#[derive(Debug, Clone)]
pub struct IconConfig {
    pub cache_dir: PathBuf,
    pub base_url: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            cache_dir: home.join(".mot").join("resources"),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl IconConfig {
    pub fn new<P: Into<PathBuf>, S: ToString>(cache_dir: P, base_url: S) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            base_url: base_url.to_string(),
        }
    }

    pub fn path(&self, label: Label) -> PathBuf {
        self.cache_dir.join(file_name(label))
    }

    pub fn url(&self, label: Label) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            file_name(label)
        )
    }

    /// Makes sure every icon is in the cache dir, downloading the missing ones.
    pub fn fetch(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.cache_dir).map_err(|err| unavailable(&self.cache_dir, err))?;

        for label in Label::ALL {
            let path = self.path(label);
            if path.is_file() {
                continue;
            }

            let url = self.url(label);
            download(&url, &path)?;
            log::info!("downloaded {} to {:?}", url, path);
        }

        Ok(())
    }

    /// Fetches and decodes the icons with their alpha channel.
    pub fn load(&self) -> Result<IconSet<Mat>, Error> {
        self.fetch()?;

        let bottle = read_icon(&self.path(Label::Bottle))?;
        let fragment = read_icon(&self.path(Label::Fragment))?;
        let other = read_icon(&self.path(Label::Other))?;

        Ok(IconSet::from_bitmaps([bottle, fragment, other]))
    }
}

fn unavailable<D: std::fmt::Display>(name: &Path, reason: D) -> Error {
    Error::ResourceUnavailable {
        name: name.display().to_string(),
        reason: reason.to_string(),
    }
}

fn download(url: &str, path: &Path) -> Result<(), Error> {
    let resp = ureq::get(url).call().map_err(|err| Error::ResourceUnavailable {
        name: url.to_string(),
        reason: err.to_string(),
    })?;

    // a partial download must never sit under the final name
    let part = path.with_extension("part");
    let res = fs::File::create(&part)
        .and_then(|mut file| io::copy(&mut resp.into_reader(), &mut file))
        .and_then(|_| fs::rename(&part, path));

    if let Err(err) = res {
        let _ = fs::remove_file(&part);
        return Err(unavailable(path, err));
    }

    Ok(())
}

/// Reads a BGRA icon; anything else counts as corrupt.
pub fn read_icon(path: &Path) -> Result<Mat, Error> {
    let name = path.to_string_lossy();
    let icon = imgcodecs::imread(&name, imgcodecs::IMREAD_UNCHANGED)
        .map_err(|err| unavailable(path, err))?;

    if icon.rows() == 0 || icon.cols() == 0 {
        return Err(unavailable(path, "cannot decode image"));
    }

    if icon.at_2d::<Vec4b>(0, 0).is_err() {
        return Err(unavailable(path, "icon has no alpha channel"));
    }

    log::debug!("icon {:?}: {}x{}", path, icon.cols(), icon.rows());

    Ok(icon)
}
