//! Tree options and their resolution into an effective build configuration.
//!
//! [`TreeOptions`] is what callers and config files provide. Folder options
//! default to their file counterparts and attribute options accept a boolean
//! sentinel, so [`TreeOptions::resolve`] computes every effective value once
//! before traversal starts. The builder only ever sees a [`BuildConfig`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{TreeError, TreeResult};

/// Default file filter: non-hidden data files, extension stripped.
pub const DEFAULT_FILE_FILTER: &str = r"^([^.].*)\.(?:json|toml|ya?ml)$";

/// Default folder filter: every non-hidden folder.
pub const DEFAULT_FOLDER_FILTER: &str = r"^([^.].*)$";

/// Key injected for `true` name attributes.
pub const DEFAULT_NAME_ATTRIBUTE: &str = "name";

/// Key injected for `true` parent attributes.
pub const DEFAULT_PARENT_ATTRIBUTE: &str = "parent";

/// Caller supplied `name -> name` function.
#[derive(Clone)]
pub struct NameFn(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl NameFn {
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, name: &str) -> String {
        (self.0)(name)
    }
}

impl fmt::Debug for NameFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NameFn(..)")
    }
}

/// Caller supplied `(folder, child) -> name` function for flattening.
#[derive(Clone)]
pub struct ComposeFn(Arc<dyn Fn(&str, &str) -> String + Send + Sync>);

impl ComposeFn {
    pub fn new(f: impl Fn(&str, &str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, folder: &str, child: &str) -> String {
        (self.0)(folder, child)
    }
}

impl fmt::Debug for ComposeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComposeFn(..)")
    }
}

/// Post-filter renaming of file and folder names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameTransform {
    /// Keep the name; used to switch off an inherited transform
    Identity,
    Uppercase,
    Lowercase,
    /// Upper-case the first character only
    Capitalize,
    #[serde(skip)]
    Custom(NameFn),
}

impl NameTransform {
    pub fn custom(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        NameTransform::Custom(NameFn::new(f))
    }

    fn into_fn(self) -> Option<NameFn> {
        match self {
            NameTransform::Identity => None,
            NameTransform::Uppercase => Some(NameFn::new(|s| s.to_uppercase())),
            NameTransform::Lowercase => Some(NameFn::new(|s| s.to_lowercase())),
            NameTransform::Capitalize => Some(NameFn::new(capitalize)),
            NameTransform::Custom(f) => Some(f),
        }
    }
}

impl FromStr for NameTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identity" | "none" => Ok(NameTransform::Identity),
            "uppercase" | "upper" => Ok(NameTransform::Uppercase),
            "lowercase" | "lower" => Ok(NameTransform::Lowercase),
            "capitalize" => Ok(NameTransform::Capitalize),
            other => Err(format!(
                "unknown name transform '{other}' (expected identity, uppercase, lowercase or capitalize)"
            )),
        }
    }
}

/// Name/parent attribute option: `true` selects the default key, a string is
/// the key itself, `false` disables injection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeOption {
    Enabled(bool),
    Key(String),
}

impl AttributeOption {
    fn resolve(&self, default_key: &str) -> Option<String> {
        match self {
            AttributeOption::Enabled(true) => Some(default_key.to_string()),
            AttributeOption::Enabled(false) => None,
            AttributeOption::Key(key) if key.is_empty() => None,
            AttributeOption::Key(key) => Some(key.clone()),
        }
    }
}

impl FromStr for AttributeOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => Ok(AttributeOption::Enabled(true)),
            "false" => Ok(AttributeOption::Enabled(false)),
            key => Ok(AttributeOption::Key(key.to_string())),
        }
    }
}

/// Options for one tree build, as supplied by callers and config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Descend into subdirectories
    pub recurse: bool,
    /// Pattern with one capture group selecting files; empty disables filtering
    pub filter_files: Option<String>,
    /// Pattern with one capture group selecting folders; empty disables filtering
    pub filter_folders: Option<String>,
    pub file_name_transform: Option<NameTransform>,
    /// Falls back to `file_name_transform` when unset
    pub folder_name_transform: Option<NameTransform>,
    pub file_name_attribute: Option<AttributeOption>,
    /// Falls back to `file_name_attribute` when unset
    pub folder_name_attribute: Option<AttributeOption>,
    pub file_parent_attribute: Option<AttributeOption>,
    /// Falls back to `file_parent_attribute` when unset
    pub folder_parent_attribute: Option<AttributeOption>,
    /// File whose mapping seeds its directory's node
    pub index_file: Option<String>,
    pub files_key: Option<String>,
    pub folders_key: Option<String>,
    pub flatten: bool,
    pub flatten_prefix: bool,
    pub flatten_camel: bool,
    pub flatten_separator: Option<String>,
    #[serde(skip)]
    pub flatten_custom: Option<ComposeFn>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            recurse: true,
            filter_files: Some(DEFAULT_FILE_FILTER.to_string()),
            filter_folders: Some(DEFAULT_FOLDER_FILTER.to_string()),
            file_name_transform: None,
            folder_name_transform: None,
            file_name_attribute: None,
            folder_name_attribute: None,
            file_parent_attribute: None,
            folder_parent_attribute: None,
            index_file: None,
            files_key: None,
            folders_key: None,
            flatten: false,
            flatten_prefix: false,
            flatten_camel: false,
            flatten_separator: None,
            flatten_custom: None,
        }
    }
}

impl TreeOptions {
    /// Compute the effective configuration.
    ///
    /// # Errors
    /// `ConfigConflict` when a filter is not a valid pattern with a capture
    /// group, when `flatten_camel` and `flatten_separator` are combined without
    /// a custom function, or when `files_key` equals `folders_key`.
    pub fn resolve(&self) -> TreeResult<BuildConfig> {
        let file_filter = compile_filter("filter_files", self.filter_files.as_deref())?;
        let folder_filter = compile_filter("filter_folders", self.filter_folders.as_deref())?;

        let file_name_transform = self.file_name_transform.clone().and_then(NameTransform::into_fn);
        let folder_name_transform = self
            .folder_name_transform
            .clone()
            .or_else(|| self.file_name_transform.clone())
            .and_then(NameTransform::into_fn);

        let file_name_attribute =
            resolve_attribute(self.file_name_attribute.as_ref(), None, DEFAULT_NAME_ATTRIBUTE);
        let folder_name_attribute = resolve_attribute(
            self.folder_name_attribute.as_ref(),
            self.file_name_attribute.as_ref(),
            DEFAULT_NAME_ATTRIBUTE,
        );
        let file_parent_attribute =
            resolve_attribute(self.file_parent_attribute.as_ref(), None, DEFAULT_PARENT_ATTRIBUTE);
        let folder_parent_attribute = resolve_attribute(
            self.folder_parent_attribute.as_ref(),
            self.file_parent_attribute.as_ref(),
            DEFAULT_PARENT_ATTRIBUTE,
        );

        let files_key = non_empty(&self.files_key);
        let folders_key = non_empty(&self.folders_key);
        if let (Some(files), Some(folders)) = (&files_key, &folders_key) {
            if files == folders {
                return Err(TreeError::ConfigConflict(format!(
                    "files_key and folders_key must differ (both are '{files}')"
                )));
            }
        }

        let flatten = if self.flatten {
            Some(self.flatten_naming()?)
        } else {
            None
        };

        Ok(BuildConfig {
            recurse: self.recurse,
            file_filter,
            folder_filter,
            file_name_transform,
            folder_name_transform,
            file_name_attribute,
            folder_name_attribute,
            file_parent_attribute,
            folder_parent_attribute,
            index_file: non_empty(&self.index_file),
            files_key,
            folders_key,
            flatten,
        })
    }

    fn flatten_naming(&self) -> TreeResult<FlattenNaming> {
        let separator = self.flatten_separator.as_ref().filter(|s| !s.is_empty());
        if let Some(custom) = &self.flatten_custom {
            return Ok(FlattenNaming::Custom(custom.clone()));
        }
        if self.flatten_camel {
            if separator.is_some() {
                return Err(TreeError::ConfigConflict(
                    "flatten_camel and flatten_separator cannot be used together; \
                     provide a custom flatten function instead"
                        .to_string(),
                ));
            }
            return Ok(FlattenNaming::Camel);
        }
        if let Some(separator) = separator {
            return Ok(FlattenNaming::Separator(separator.clone()));
        }
        if self.flatten_prefix {
            return Ok(FlattenNaming::Prefix);
        }
        Ok(FlattenNaming::Plain)
    }
}

fn resolve_attribute(
    own: Option<&AttributeOption>,
    fallback: Option<&AttributeOption>,
    default_key: &str,
) -> Option<String> {
    own.or(fallback).and_then(|opt| opt.resolve(default_key))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn compile_filter(option: &str, pattern: Option<&str>) -> TreeResult<Option<NameFilter>> {
    match pattern {
        None | Some("") => Ok(None),
        Some(pattern) => NameFilter::new(pattern)
            .map(Some)
            .map_err(|reason| TreeError::ConfigConflict(format!("{option}: {reason}"))),
    }
}

/// Filter pattern whose first capture group yields the display name.
#[derive(Debug, Clone)]
pub struct NameFilter {
    regex: Regex,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<Self, String> {
        let regex = Regex::new(pattern).map_err(|e| format!("invalid pattern '{pattern}': {e}"))?;
        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 2 {
            return Err(format!("pattern '{pattern}' has no capture group"));
        }
        Ok(Self { regex })
    }

    /// Captured display name, None when the entry does not match.
    pub fn capture<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.regex
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Naming strategy for flattened entries, highest precedence first.
#[derive(Debug, Clone)]
pub enum FlattenNaming {
    Custom(ComposeFn),
    /// folder + child with its first character upper-cased
    Camel,
    /// folder + separator + child
    Separator(String),
    /// folder + child
    Prefix,
    /// child alone
    Plain,
}

impl FlattenNaming {
    pub fn compose(&self, folder: &str, child: &str) -> String {
        match self {
            FlattenNaming::Custom(f) => f.call(folder, child),
            FlattenNaming::Camel => format!("{folder}{}", capitalize(child)),
            FlattenNaming::Separator(separator) => format!("{folder}{separator}{child}"),
            FlattenNaming::Prefix => format!("{folder}{child}"),
            FlattenNaming::Plain => child.to_string(),
        }
    }
}

/// Effective, validated configuration used by the builder.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub recurse: bool,
    pub file_filter: Option<NameFilter>,
    pub folder_filter: Option<NameFilter>,
    pub file_name_transform: Option<NameFn>,
    pub folder_name_transform: Option<NameFn>,
    pub file_name_attribute: Option<String>,
    pub folder_name_attribute: Option<String>,
    pub file_parent_attribute: Option<String>,
    pub folder_parent_attribute: Option<String>,
    pub index_file: Option<String>,
    pub files_key: Option<String>,
    pub folders_key: Option<String>,
    /// Some when flattening is enabled
    pub flatten: Option<FlattenNaming>,
}

impl BuildConfig {
    /// Display name of a file entry, None when filtered out.
    pub fn file_name(&self, raw: &str) -> Option<String> {
        let captured = apply_filter(self.file_filter.as_ref(), raw)?;
        Some(apply_transform(self.file_name_transform.as_ref(), captured))
    }

    /// Captured folder name before transformation, None when filtered out.
    pub fn folder_capture<'a>(&self, raw: &'a str) -> Option<&'a str> {
        apply_filter(self.folder_filter.as_ref(), raw)
    }

    pub fn folder_name(&self, captured: &str) -> String {
        apply_transform(self.folder_name_transform.as_ref(), captured)
    }

    pub fn injects_file_attributes(&self) -> bool {
        self.file_name_attribute.is_some() || self.file_parent_attribute.is_some()
    }
}

fn apply_filter<'a>(filter: Option<&NameFilter>, raw: &'a str) -> Option<&'a str> {
    match filter {
        Some(filter) => filter.capture(raw),
        None => Some(raw),
    }
}

fn apply_transform(transform: Option<&NameFn>, name: &str) -> String {
    match transform {
        Some(f) => f.call(name),
        None => name.to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_resolving_then_filters_data_files() {
        let config = TreeOptions::default().resolve().unwrap();

        assert_eq!(config.file_name("f.json").as_deref(), Some("f"));
        assert_eq!(config.file_name("conf.yml").as_deref(), Some("conf"));
        assert_eq!(config.file_name("a.b.toml").as_deref(), Some("a.b"));
        assert_eq!(config.file_name("README.md"), None);
        assert_eq!(config.file_name(".foldertree.toml"), None);
        assert_eq!(config.folder_capture(".git"), None);
        assert_eq!(config.folder_capture("h"), Some("h"));
        assert!(config.flatten.is_none());
    }

    #[test]
    fn given_empty_filter_when_resolving_then_filtering_disabled() {
        let options = TreeOptions {
            filter_files: Some(String::new()),
            ..TreeOptions::default()
        };

        let config = options.resolve().unwrap();

        assert_eq!(config.file_name("README.md").as_deref(), Some("README.md"));
    }

    #[test]
    fn given_filter_without_group_when_resolving_then_config_conflict() {
        let options = TreeOptions {
            filter_files: Some(r"^.+\.json$".to_string()),
            ..TreeOptions::default()
        };

        let err = options.resolve().unwrap_err();

        assert!(matches!(err, TreeError::ConfigConflict(_)));
        assert!(err.to_string().contains("capture group"));
    }

    #[test]
    fn given_invalid_pattern_when_resolving_then_config_conflict() {
        let options = TreeOptions {
            filter_folders: Some("([".to_string()),
            ..TreeOptions::default()
        };

        assert!(matches!(
            options.resolve(),
            Err(TreeError::ConfigConflict(_))
        ));
    }

    #[test]
    fn given_file_attributes_when_resolving_then_folders_inherit() {
        let options = TreeOptions {
            file_name_attribute: Some(AttributeOption::Enabled(true)),
            file_parent_attribute: Some(AttributeOption::Key("up".to_string())),
            ..TreeOptions::default()
        };

        let config = options.resolve().unwrap();

        assert_eq!(config.file_name_attribute.as_deref(), Some("name"));
        assert_eq!(config.folder_name_attribute.as_deref(), Some("name"));
        assert_eq!(config.file_parent_attribute.as_deref(), Some("up"));
        assert_eq!(config.folder_parent_attribute.as_deref(), Some("up"));
    }

    #[test]
    fn given_explicit_false_folder_attribute_when_resolving_then_override_disables() {
        let options = TreeOptions {
            file_name_attribute: Some(AttributeOption::Enabled(true)),
            folder_name_attribute: Some(AttributeOption::Enabled(false)),
            ..TreeOptions::default()
        };

        let config = options.resolve().unwrap();

        assert_eq!(config.file_name_attribute.as_deref(), Some("name"));
        assert_eq!(config.folder_name_attribute, None);
    }

    #[test]
    fn given_file_transform_when_resolving_then_folder_inherits_unless_identity() {
        let inherited = TreeOptions {
            file_name_transform: Some(NameTransform::Uppercase),
            ..TreeOptions::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(inherited.folder_name("h"), "H");

        let overridden = TreeOptions {
            file_name_transform: Some(NameTransform::Uppercase),
            folder_name_transform: Some(NameTransform::Identity),
            ..TreeOptions::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(overridden.folder_name("h"), "h");
        assert_eq!(overridden.file_name("f.json").as_deref(), Some("F"));
    }

    #[test]
    fn given_camel_and_separator_when_resolving_then_config_conflict() {
        let options = TreeOptions {
            flatten: true,
            flatten_camel: true,
            flatten_separator: Some("_".to_string()),
            ..TreeOptions::default()
        };

        assert!(matches!(
            options.resolve(),
            Err(TreeError::ConfigConflict(_))
        ));
    }

    #[test]
    fn given_camel_separator_and_custom_when_resolving_then_custom_wins() {
        let options = TreeOptions {
            flatten: true,
            flatten_camel: true,
            flatten_separator: Some("_".to_string()),
            flatten_custom: Some(ComposeFn::new(|a, b| format!("{a}x{b}"))),
            ..TreeOptions::default()
        };

        let config = options.resolve().unwrap();

        assert_eq!(config.flatten.unwrap().compose("h", "i"), "hxi");
    }

    #[test]
    fn given_same_namespace_keys_when_resolving_then_config_conflict() {
        let options = TreeOptions {
            files_key: Some("_all".to_string()),
            folders_key: Some("_all".to_string()),
            ..TreeOptions::default()
        };

        assert!(matches!(
            options.resolve(),
            Err(TreeError::ConfigConflict(_))
        ));
    }

    #[test]
    fn test_capitalize_only_touches_first_char() {
        assert_eq!(capitalize("lN"), "LN");
        assert_eq!(capitalize("index"), "Index");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_attribute_option_from_str() {
        assert_eq!(
            "true".parse::<AttributeOption>().unwrap(),
            AttributeOption::Enabled(true)
        );
        assert_eq!(
            "id".parse::<AttributeOption>().unwrap(),
            AttributeOption::Key("id".to_string())
        );
    }
}
