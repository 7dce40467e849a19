/// Build metadata embedded by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub tree_state: &'static str,
    pub built_at: &'static str,
    pub profile: &'static str,
}

pub fn current() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("CONTRACT_FORMS_BUILD_HASH").unwrap_or("unknown"),
        tree_state: option_env!("CONTRACT_FORMS_BUILD_STATUS").unwrap_or("unknown"),
        built_at: option_env!("CONTRACT_FORMS_BUILD_TIMESTAMP").unwrap_or("unknown"),
        profile: option_env!("CONTRACT_FORMS_BUILD_PROFILE").unwrap_or("unknown"),
    }
}
