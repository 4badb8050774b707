//! Application client packaging goal.
//!
//! [`AcrMojo::execute`] archives the project's output directory, optionally
//! filters `META-INF/application-client.xml` first, and records the produced
//! JAR as the project artifact.

use crate::AcrResult;
use crate::archive::ProjectArchiver;
use crate::config::AcrConfig;
use crate::project::{Project, Session};
use acr_filtering::{
    DefaultFileFilter, FileFilter, FilterWrappers, FilteringRequest, detect_xml_file_encoding,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Deployment descriptor entry name
pub const APP_CLIENT_XML: &str = "META-INF/application-client.xml";

/// Patterns selecting the output directory content
pub const DEFAULT_INCLUDES: &[&str] = &["**/**"];

/// Patterns excluded when none are configured
pub const DEFAULT_EXCLUDES: &[&str] = &[APP_CLIENT_XML];

/// Suffix of the temporary copy made while filtering the descriptor
pub const UNFILTERED_SUFFIX: &str = ".unfiltered";

/// Builds a JavaEE application client JAR.
///
/// The file filter is a type parameter so the descriptor filtering step can
/// be replaced.
#[derive(Debug, Clone, Default)]
pub struct AcrMojo<F: FileFilter = DefaultFileFilter> {
    config: AcrConfig,
    file_filter: F,
}

impl AcrMojo<DefaultFileFilter> {
    pub fn new(config: AcrConfig) -> Self {
        Self {
            config,
            file_filter: DefaultFileFilter,
        }
    }
}

impl<F: FileFilter> AcrMojo<F> {
    /// Use a custom file filter for the deployment descriptor.
    pub fn with_file_filter(config: AcrConfig, file_filter: F) -> Self {
        Self {
            config,
            file_filter,
        }
    }

    pub fn config(&self) -> &AcrConfig {
        &self.config
    }

    pub fn file_filter(&self) -> &F {
        &self.file_filter
    }

    /// Package the project and attach the archive to its artifact.
    ///
    /// Session user properties override the `maven.acr.*` options before
    /// anything is written. Returns the path of the produced archive.
    pub fn execute(&self, project: &mut Project, session: &Session) -> AcrResult<PathBuf> {
        let mut config = self.config.clone();
        config.apply_user_properties(&session.user_properties)?;
        config.validate()?;
        let resolved = config.resolve(project);

        tracing::info!("Building JavaEE Application client: {}", resolved.jar_name);

        let jar_file = resolved.jar_file();
        let mut archiver = ProjectArchiver::new();
        archiver.set_output_file(&jar_file);
        archiver.configure_reproducible(resolved.output_timestamp.as_deref())?;

        let excludes = effective_excludes(&config.excludes);
        if resolved.output_directory.exists() {
            archiver.archiver_mut().add_directory(
                &resolved.output_directory,
                DEFAULT_INCLUDES,
                excludes.as_slice(),
            )?;
        } else {
            tracing::info!(
                "JAR will only contain the {APP_CLIENT_XML} as no content was marked for inclusion"
            );
        }

        let descriptor = resolved.output_directory.join(APP_CLIENT_XML);
        if descriptor.exists() {
            if config.filter_deployment_descriptor {
                self.filter_deployment_descriptor(&descriptor, &config, project, session)?;
            }
            archiver.archiver_mut().add_file(&descriptor, APP_CLIENT_XML)?;
        }

        archiver.create_archive(project, &config.archive)?;

        project.artifact.file = Some(jar_file.clone());
        Ok(jar_file)
    }

    /// Filter the descriptor in place through a temporary `.unfiltered` copy.
    fn filter_deployment_descriptor(
        &self,
        descriptor: &Path,
        config: &AcrConfig,
        project: &Project,
        session: &Session,
    ) -> AcrResult<()> {
        tracing::debug!("Filtering deployment descriptor.");

        let request = FilteringRequest {
            basedir: project.basedir.clone(),
            filters: config.filters.clone(),
            project_properties: project.properties.clone(),
            system_properties: session.system_properties.clone(),
            user_properties: session.user_properties.clone(),
            model_values: project.model_values(),
            escape_string: config.escape_string.clone(),
            escape_windows_paths: config.escape_backslashes_in_file_path,
        };
        let wrappers = self.file_filter.default_filter_wrappers(&request)?;

        let unfiltered = unfiltered_path(descriptor);
        fs::copy(descriptor, &unfiltered)?;

        let result = self.filter_copy(&unfiltered, descriptor, &wrappers);
        if let Err(e) = fs::remove_file(&unfiltered) {
            tracing::warn!(
                path = %unfiltered.display(),
                error = %e,
                "Failed to remove temporary descriptor copy"
            );
        }
        result
    }

    fn filter_copy(&self, from: &Path, to: &Path, wrappers: &FilterWrappers) -> AcrResult<()> {
        let encoding = detect_xml_file_encoding(from)?;
        tracing::trace!(encoding = encoding.name(), "Detected descriptor encoding");
        self.file_filter.copy_file(from, to, true, wrappers, encoding)?;
        Ok(())
    }
}

/// Configured excludes plus the descriptor, or the defaults when none are configured.
pub fn effective_excludes(configured: &[String]) -> Vec<&str> {
    if configured.is_empty() {
        return DEFAULT_EXCLUDES.to_vec();
    }
    configured
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(APP_CLIENT_XML))
        .collect()
}

fn unfiltered_path(descriptor: &Path) -> PathBuf {
    let mut name = descriptor.as_os_str().to_os_string();
    name.push(UNFILTERED_SUFFIX);
    PathBuf::from(name)
}
