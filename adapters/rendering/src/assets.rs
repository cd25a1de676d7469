//! Asset manifest parsing and the one-shot loading gate.

use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use maze_walker_core::Capabilities;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Assets the presentation layer knows how to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKey {
    /// Ground texture.
    Grass,
    /// Wall texture.
    Stone,
    /// Exit marker texture.
    Diamond,
    /// Cloud sprite.
    Cloud,
    /// Sun sprite.
    Sun,
    /// Moon sprite.
    Moon,
    /// Handheld torch model.
    Torch,
    /// Footstep loop.
    RunningAudio,
    /// Jump one-shot.
    JumpAudio,
    /// Victory one-shot.
    VictoryAudio,
    /// Night ambience loop.
    NightAudio,
    /// Rain loop.
    RainAudio,
}

impl AssetKey {
    /// Every known key in manifest order.
    pub const ALL: [AssetKey; 12] = [
        Self::Grass,
        Self::Stone,
        Self::Diamond,
        Self::Cloud,
        Self::Sun,
        Self::Moon,
        Self::Torch,
        Self::RunningAudio,
        Self::JumpAudio,
        Self::VictoryAudio,
        Self::NightAudio,
        Self::RainAudio,
    ];

    /// Name used for the key in manifest files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grass => "grass",
            Self::Stone => "stone",
            Self::Diamond => "diamond",
            Self::Cloud => "cloud",
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Torch => "torch",
            Self::RunningAudio => "running_audio",
            Self::JumpAudio => "jump_audio",
            Self::VictoryAudio => "victory_audio",
            Self::NightAudio => "night_audio",
            Self::RainAudio => "rain_audio",
        }
    }

    /// Whether the scene cannot be built without this asset.
    ///
    /// Missing optional assets only disable the feature that depends on them.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(
            self,
            Self::Grass | Self::Stone | Self::Diamond | Self::Cloud | Self::Sun | Self::Moon
        )
    }

    fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == name)
            .with_context(|| format!("unknown asset key `{name}`"))
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    assets: HashMap<String, String>,
}

/// Resolved list of asset files declared by a manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetManifest {
    entries: Vec<(AssetKey, PathBuf)>,
}

impl AssetManifest {
    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Reads and parses the manifest at `path`. Asset paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read asset manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, &base)
    }

    /// Parses manifest TOML, resolving asset paths against `base_path`.
    pub fn parse(contents: &str, base_path: &Path) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported asset manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut resolved = HashMap::new();
        for (name, relative_path) in manifest.assets {
            let key = AssetKey::parse(&name)?;
            if resolved.insert(key, base_path.join(relative_path)).is_some() {
                bail!("asset manifest contains duplicate entry for {key}");
            }
        }

        let mut entries = Vec::with_capacity(resolved.len());
        for key in AssetKey::ALL {
            match resolved.remove(&key) {
                Some(path) => entries.push((key, path)),
                None if key.is_required() => bail!("asset manifest missing entry for {key}"),
                None => {}
            }
        }

        Ok(Self { entries })
    }

    /// Path declared for `key`.
    #[must_use]
    pub fn path(&self, key: AssetKey) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, path)| path.as_path())
    }

    /// Declared entries in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetKey, &Path)> {
        self.entries
            .iter()
            .map(|(key, path)| (*key, path.as_path()))
    }
}

/// Asset bytes that finished loading before the frame loop starts.
#[derive(Clone, Debug, Default)]
pub struct LoadedAssets {
    bytes: HashMap<AssetKey, Vec<u8>>,
}

impl LoadedAssets {
    /// Reads every declared asset from disk.
    pub fn load(manifest: &AssetManifest) -> Result<Self> {
        Self::load_with(manifest, |_, path| {
            fs::read(path).with_context(|| format!("failed to read asset at {}", path.display()))
        })
    }

    /// Loads every declared asset through `loader`.
    ///
    /// Failing required assets abort loading. Failing optional assets are
    /// logged and left out, which disables the dependent capability.
    pub fn load_with(
        manifest: &AssetManifest,
        mut loader: impl FnMut(AssetKey, &Path) -> Result<Vec<u8>>,
    ) -> Result<Self> {
        let mut bytes = HashMap::new();
        for (key, path) in manifest.iter() {
            match loader(key, path) {
                Ok(data) => {
                    let _ = bytes.insert(key, data);
                }
                Err(error) if key.is_required() => {
                    return Err(error.context(format!("failed to load required asset {key}")));
                }
                Err(error) => {
                    tracing::warn!(asset = %key, error = %error, "optional asset unavailable");
                }
            }
        }
        Ok(Self { bytes })
    }

    /// Reports whether the asset finished loading.
    #[must_use]
    pub fn contains(&self, key: AssetKey) -> bool {
        self.bytes.contains_key(&key)
    }

    /// Raw bytes of a loaded asset.
    #[must_use]
    pub fn bytes(&self, key: AssetKey) -> Option<&[u8]> {
        self.bytes.get(&key).map(Vec::as_slice)
    }

    /// Number of loaded assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Reports whether nothing was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Features the loaded assets make available to the world.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            torch: self.contains(AssetKey::Torch),
        }
    }
}
