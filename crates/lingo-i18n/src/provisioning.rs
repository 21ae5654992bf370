//! Copying bundled default language files into the host's data directory

use crate::contract::ConfigSource;
use crate::error::{I18nError, I18nResult};
use lingo_config::LanguageSettings;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The application hosting the language files.
///
/// Bundled resources are addressed by `/`-separated paths such as
/// `languages/greetings/en.yml`.
pub trait HostApp {
    /// Directory the application may write to.
    fn data_dir(&self) -> &Path;

    /// Bytes of a bundled resource, if it exists.
    fn resource(&self, path: &str) -> Option<Cow<'static, [u8]>>;
}

/// A host whose bundled resources are plain files under a directory.
#[derive(Debug, Clone)]
pub struct DirectoryHost {
    data_dir: PathBuf,
    resource_root: PathBuf,
}

impl DirectoryHost {
    /// Host writing under `data_dir` and reading resources below `resource_root`.
    pub fn new(data_dir: impl Into<PathBuf>, resource_root: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            resource_root: resource_root.into(),
        }
    }
}

impl HostApp for DirectoryHost {
    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn resource(&self, path: &str) -> Option<Cow<'static, [u8]>> {
        let file = path
            .split('/')
            .fold(self.resource_root.clone(), |acc, segment| acc.join(segment));
        fs::read(file).ok().map(Cow::Owned)
    }
}

/// A host whose bundled resources are compiled into the binary.
///
/// ```ignore
/// #[derive(rust_embed::RustEmbed)]
/// #[folder = "resources/"]
/// struct Bundled;
///
/// let host = EmbeddedHost::<Bundled>::new("/var/lib/my-app");
/// ```
pub struct EmbeddedHost<E> {
    data_dir: PathBuf,
    _assets: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedHost<E> {
    /// Host writing under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            _assets: PhantomData,
        }
    }
}

impl<E: RustEmbed> HostApp for EmbeddedHost<E> {
    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn resource(&self, path: &str) -> Option<Cow<'static, [u8]>> {
        E::get(path).map(|file| file.data)
    }
}

/// Resource path of a bundled language file.
pub fn bundled_path(settings: &LanguageSettings, source: &ConfigSource, code: &str) -> String {
    format!(
        "{}/{}/{}.{}",
        settings.languages_dir,
        source.folder_name(),
        code,
        settings.file_extension
    )
}

/// Directory a contract's files are provisioned into.
pub fn target_dir(
    host: &dyn HostApp,
    settings: &LanguageSettings,
    source: &ConfigSource,
) -> PathBuf {
    host.data_dir()
        .join(&settings.languages_dir)
        .join(source.folder_name())
}

/// Writes every bundled language of `source` into the host's data directory.
///
/// Existing files are overwritten unconditionally, edits included. Fails on
/// the first language without a bundled resource or that cannot be written.
pub fn provision_defaults(
    host: &dyn HostApp,
    settings: &LanguageSettings,
    source: &ConfigSource,
) -> I18nResult<Vec<PathBuf>> {
    let target = target_dir(host, settings, source);
    fs::create_dir_all(&target).map_err(|err| I18nError::Provisioning {
        path: target.clone(),
        source: err,
    })?;

    let mut written = Vec::with_capacity(source.language_codes().len());
    for code in source.language_codes() {
        let resource = bundled_path(settings, source, code);
        let data = host
            .resource(&resource)
            .ok_or_else(|| I18nError::MissingBundledResource {
                resource: resource.clone(),
            })?;

        let path = target.join(format!("{}.{}", code, settings.file_extension));
        fs::write(&path, &data).map_err(|err| I18nError::Provisioning {
            path: path.clone(),
            source: err,
        })?;
        debug!("Provisioned {} from {}", path.display(), resource);
        written.push(path);
    }

    info!(
        "Provisioned {} bundled language files into {}",
        written.len(),
        target.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_common::test_utils::{create_temp_dir, language_fixtures, write_language_file};

    fn source() -> ConfigSource {
        ConfigSource::new("greetings", ["en", "es"])
    }

    #[test]
    fn test_bundled_path() {
        let settings = LanguageSettings::default();
        assert_eq!(bundled_path(&settings, &source(), "es"), "languages/greetings/es.yml");
    }

    #[test]
    fn test_directory_host_reads_nested_resources() {
        let resources = create_temp_dir();
        write_language_file(
            &resources.path().join("languages/greetings"),
            "en",
            language_fixtures::english_yaml(),
        );

        let host = DirectoryHost::new("/unused", resources.path());
        assert!(host.resource("languages/greetings/en.yml").is_some());
        assert!(host.resource("languages/greetings/fr.yml").is_none());
    }

    #[test]
    fn test_missing_resource_fails() {
        let resources = create_temp_dir();
        let data = create_temp_dir();
        write_language_file(&resources.path().join("languages/greetings"), "en", "prefix: x");

        let host = DirectoryHost::new(data.path(), resources.path());
        let err = provision_defaults(&host, &LanguageSettings::default(), &source()).unwrap_err();
        match err {
            I18nError::MissingBundledResource { resource } => {
                assert_eq!(resource, "languages/greetings/es.yml")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
