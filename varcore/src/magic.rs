/// Category used when describing a derived variant (`<component> configuration <name>`).
pub const CONFIGURATION_CATEGORY: &str = "configuration";

/// Name of the environment variable containing the path to the rules manifest.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/varmeta/rules.toml` or `$HOME/.config/varmeta/rules.toml`
///  (2) on Windows: `%APPDATA%\varmeta\rules.toml`
pub const ENV_RULES_PATH: &str = "VARMETA_RULES_PATH";

/// Directory and file name of the default rules manifest.
pub const RULES_DIR_NAME: &str = "varmeta";
pub const RULES_FILE_NAME: &str = "rules.toml";
