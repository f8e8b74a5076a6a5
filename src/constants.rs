// src/constants.rs

/// Manifest names probed in the working directory, in priority order.
pub const CONVENTIONAL_COMPOSE_FILES: [&str; 2] = ["docker-compose.yml", "docker-compose.yaml"];

/// Environment variable naming an explicit manifest path.
pub const COMPOSE_FILE_ENV: &str = "DOCKHAND_COMPOSE_FILE";

/// Project-local settings file holding the persisted default manifest.
pub const SETTINGS_FILENAME: &str = ".env";

/// Key of the persisted default manifest line inside the settings file.
pub const DEFAULT_COMPOSE_KEY: &str = "COMPOSE_FILE";

/// Name of the directory under the system config dir (`~/.config/dockhand`).
pub const CONFIG_DIR_NAME: &str = "dockhand";

/// The name of the main configuration file (inside the config dir).
pub const CONFIG_FILENAME: &str = "config.toml";

/// The only affirmative answer accepted by the confirmation gate.
pub const CONFIRM_TOKEN: &str = "yes";

/// Exit code of the properties probe when none of the candidate files exist.
pub const PROBE_NOT_FOUND_CODE: i32 = 3;

/// Name of the multi-call binary itself.
pub const BINARY_NAME: &str = "dockhand";
