use shadow_rs::shadow;

shadow!(build);

/// Log the version banner and build details at startup
pub fn log_version_info() {
    tracing::info!("{}", short_version_info());
    tracing::info!(
        "Build date: {} ({}, {})",
        build::BUILD_TIME_2822,
        build::BUILD_RUST_CHANNEL,
        build::RUST_VERSION
    );
}

/// One-line version string: package, version, branch and commit
pub fn short_version_info() -> String {
    format!(
        "{} {} ({}@{}{})",
        build::PROJECT_NAME,
        build::PKG_VERSION,
        build::BRANCH,
        build::SHORT_COMMIT,
        if build::GIT_CLEAN { "" } else { "+dirty" }
    )
}
