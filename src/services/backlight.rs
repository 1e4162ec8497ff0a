use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SYSFS_BACKLIGHT_ROOT: &str = "/sys/class/backlight";

#[derive(Error, Debug)]
pub enum BacklightError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unexpected contents in {}: {contents:?}", path.display())]
    Malformed { path: PathBuf, contents: String },
    #[error("Device reports a maximum brightness of zero")]
    ZeroMaximum,
}

/// Brightness reading of one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessLevel {
    pub raw: u64,
    pub max: u64,
}

impl BrightnessLevel {
    /// Rounded to the nearest whole percent
    pub fn percent(&self) -> u8 {
        if self.max == 0 {
            return 0;
        }
        let max = u128::from(self.max);
        let raw = u128::from(self.raw.min(self.max));
        ((raw * 100 + max / 2) / max) as u8
    }
}

/// A backlight device under sysfs, e.g. `intel_backlight`
#[derive(Debug, Clone)]
pub struct BacklightDevice {
    dir: PathBuf,
}

impl BacklightDevice {
    pub fn new(name: &str) -> Self {
        Self::with_root(Path::new(SYSFS_BACKLIGHT_ROOT), name)
    }

    pub fn with_root(root: &Path, name: &str) -> Self {
        Self {
            dir: root.join(name),
        }
    }

    pub fn brightness_file(&self) -> PathBuf {
        self.dir.join("brightness")
    }

    pub fn max_brightness_file(&self) -> PathBuf {
        self.dir.join("max_brightness")
    }

    pub fn read(&self) -> Result<BrightnessLevel, BacklightError> {
        let raw = read_value(&self.brightness_file())?;
        let max = read_value(&self.max_brightness_file())?;

        if max == 0 {
            return Err(BacklightError::ZeroMaximum);
        }

        Ok(BrightnessLevel { raw, max })
    }
}

fn read_value(path: &Path) -> Result<u64, BacklightError> {
    let contents = fs::read_to_string(path).map_err(|source| BacklightError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    contents
        .trim()
        .parse()
        .map_err(|_| BacklightError::Malformed {
            path: path.to_path_buf(),
            contents,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_device(brightness: &str, max: &str) -> (TempDir, BacklightDevice) {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("intel_backlight");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("brightness"), brightness).unwrap();
        fs::write(dir.join("max_brightness"), max).unwrap();
        let device = BacklightDevice::with_root(root.path(), "intel_backlight");
        (root, device)
    }

    #[test]
    fn test_read_percent() {
        let (_root, device) = fake_device("9600\n", "19200\n");
        let level = device.read().unwrap();
        assert_eq!(level, BrightnessLevel { raw: 9600, max: 19200 });
        assert_eq!(level.percent(), 50);
    }

    #[test]
    fn test_percent_rounds_and_clamps() {
        assert_eq!(BrightnessLevel { raw: 1, max: 3 }.percent(), 33);
        assert_eq!(BrightnessLevel { raw: 2, max: 3 }.percent(), 67);
        assert_eq!(BrightnessLevel { raw: 500, max: 255 }.percent(), 100);
        assert_eq!(BrightnessLevel { raw: 0, max: 0 }.percent(), 0);
    }

    #[test]
    fn test_percent_with_wide_range() {
        let max = u64::MAX / 50;
        assert_eq!(BrightnessLevel { raw: max, max }.percent(), 100);
        assert_eq!(BrightnessLevel { raw: max / 2, max }.percent(), 50);
        assert_eq!(
            BrightnessLevel {
                raw: u64::MAX,
                max: u64::MAX
            }
            .percent(),
            100
        );
    }

    #[test]
    fn test_errors() {
        let (_root, device) = fake_device("bright", "100");
        assert!(matches!(device.read(), Err(BacklightError::Malformed { .. })));

        let (_root, device) = fake_device("10", "0");
        assert!(matches!(device.read(), Err(BacklightError::ZeroMaximum)));

        let missing = BacklightDevice::with_root(Path::new("/nonexistent"), "none");
        assert!(matches!(missing.read(), Err(BacklightError::Read { .. })));
    }

    #[test]
    fn test_default_paths() {
        let device = BacklightDevice::new("intel_backlight");
        assert_eq!(
            device.brightness_file(),
            PathBuf::from("/sys/class/backlight/intel_backlight/brightness")
        );
    }
}
