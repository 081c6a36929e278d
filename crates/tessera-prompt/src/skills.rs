//! Read-only registry of prompt templates ("skills") loaded from disk.
//!
//! Layout of a skills root:
//!
//! ```text
//! skills/
//! ├── Summarize/
//! │   ├── skprompt.txt     required, non-empty
//! │   └── config.json      optional completion + parameter metadata
//! └── Translate/
//!     └── skprompt.txt
//! ```
//!
//! Every immediate subdirectory is one named template. A broken directory
//! never aborts the load: it is logged, recorded in
//! [`SkillRegistry::skipped`] and the scan continues. The registry is built
//! once and only offers read access afterwards.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tessera_core::{
    error::{Result, TesseraError},
    generic::{FragmentRole, PromptFragment},
    schema_util::derive_schema,
    settings::CompletionSettings,
};

pub const PROMPT_FILE: &str = "skprompt.txt";
pub const CONFIG_FILE: &str = "config.json";

/// Contents of a skill's `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SkillConfig {
    pub schema: u32,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub completion: SkillCompletionConfig,
    pub input: SkillInputConfig,
}

/// Per-skill overrides of the sampling settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SkillCompletionConfig {
    pub max_tokens: Option<usize>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub stop_sequences: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SkillInputConfig {
    pub parameters: Vec<SkillParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillParameter {
    pub name: String,
    pub description: String,
    pub default_value: String,
}

/// One loaded prompt template.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillTemplate {
    name: String,
    prompt: String,
    config: SkillConfig,
}

impl SkillTemplate {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            config: SkillConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SkillConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the template stored in `dir`.
    ///
    /// # Errors
    ///
    /// [`TesseraError::FragmentLoad`] if the prompt file is missing, empty or
    /// unreadable, or if `config.json` is not valid.
    pub fn load(name: &str, dir: &Path) -> Result<Self> {
        let malformed = |reason: String| TesseraError::FragmentLoad {
            name: name.to_string(),
            path: dir.to_path_buf(),
            reason,
        };

        let prompt = fs::read_to_string(dir.join(PROMPT_FILE))
            .map_err(|err| malformed(format!("cannot read {PROMPT_FILE}: {err}")))?;
        if prompt.trim().is_empty() {
            return Err(malformed(format!("{PROMPT_FILE} is empty")));
        }

        let config_path = dir.join(CONFIG_FILE);
        let config = if config_path.is_file() {
            let raw = fs::read_to_string(&config_path)
                .map_err(|err| malformed(format!("cannot read {CONFIG_FILE}: {err}")))?;
            serde_json::from_str(&raw)
                .map_err(|err| malformed(format!("invalid {CONFIG_FILE}: {err}")))?
        } else {
            SkillConfig::default()
        };

        Ok(Self {
            name: name.to_string(),
            prompt,
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    /// The template text as a fragment of the given role.
    pub fn to_fragment(&self, role: FragmentRole) -> PromptFragment {
        PromptFragment::new(self.prompt.trim_end(), role)
    }

    /// `defaults` with every value the template's config overrides.
    pub fn completion_settings(&self, defaults: CompletionSettings) -> CompletionSettings {
        let completion = &self.config.completion;

        CompletionSettings {
            temperature: completion.temperature.unwrap_or(defaults.temperature),
            top_p: completion.top_p.unwrap_or(defaults.top_p),
            presence_penalty: completion
                .presence_penalty
                .unwrap_or(defaults.presence_penalty),
            frequency_penalty: completion
                .frequency_penalty
                .unwrap_or(defaults.frequency_penalty),
            max_tokens: completion.max_tokens.unwrap_or(defaults.max_tokens),
            stop: if completion.stop_sequences.is_empty() {
                defaults.stop
            } else {
                completion.stop_sequences.clone()
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct SkillRegistry {
    skills: BTreeMap<String, SkillTemplate>,
    skipped: Vec<TesseraError>,
}

impl SkillRegistry {
    /// Scan the immediate subdirectories of `root`, in name order.
    ///
    /// Symlinks are followed, so a linked template directory loads like any
    /// other.
    ///
    /// # Errors
    ///
    /// [`TesseraError::Io`] only if `root` itself cannot be listed. Broken
    /// entries and template directories are skipped, see [`Self::skipped`].
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut registry = Self::default();

        let mut dirs: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(root)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    registry.skip(root, unreadable(root, format!("cannot read entry: {err}")));
                    continue;
                }
            };

            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_dir() => dirs.push(path),
                Ok(_) => {}
                Err(err) => {
                    let reason = format!("cannot inspect entry: {err}");
                    registry.skip(&path, unreadable(&path, reason));
                }
            }
        }
        dirs.sort();

        for dir in dirs {
            let loaded = match dir.file_name().and_then(|name| name.to_str()) {
                Some(name) => SkillTemplate::load(name, &dir),
                None => Err(unreadable(&dir, "directory name is not valid UTF-8".to_string())),
            };

            match loaded {
                Ok(template) => {
                    tracing::info!(
                        skill = template.name(),
                        directory = %dir.display(),
                        "loaded skill"
                    );
                    registry.skills.insert(template.name.clone(), template);
                }
                Err(err) => registry.skip(&dir, err),
            }
        }

        Ok(registry)
    }

    fn skip(&mut self, path: &Path, err: TesseraError) {
        tracing::warn!(
            directory = %path.display(),
            error = %err,
            "could not load skill"
        );
        self.skipped.push(err);
    }

    pub fn get(&self, name: &str) -> Option<&SkillTemplate> {
        self.skills.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.skills.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillTemplate> {
        self.skills.values()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Load failures recorded while scanning.
    pub fn skipped(&self) -> &[TesseraError] {
        &self.skipped
    }
}

impl FromIterator<SkillTemplate> for SkillRegistry {
    fn from_iter<I: IntoIterator<Item = SkillTemplate>>(iter: I) -> Self {
        Self {
            skills: iter
                .into_iter()
                .map(|template| (template.name.clone(), template))
                .collect(),
            skipped: Vec::new(),
        }
    }
}

fn unreadable(path: &Path, reason: String) -> TesseraError {
    TesseraError::FragmentLoad {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned()),
        path: path.to_path_buf(),
        reason,
    }
}

/// JSON Schema of a skill's `config.json`.
pub fn skill_config_schema() -> serde_json::Value {
    derive_schema::<SkillConfig>()
}
