/// Identity of the running application
#[derive(Debug, Clone, Copy)]
pub struct AppInfo {
    /// Display name
    pub name: &'static str,
    /// Cargo package name
    pub package: &'static str,
    pub version: &'static str,
}

/// Log the application name and version.
pub fn log_version_info(info: &AppInfo) {
    tracing::info!("{}", short_version_info(info));
    tracing::info!(
        "Built for {} ({})",
        std::env::consts::OS,
        if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        }
    );
}

pub fn short_version_info(info: &AppInfo) -> String {
    format!("{} {} ({})", info.name, info.version, info.package)
}
