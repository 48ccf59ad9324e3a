use crate::config::STRUCTLINT_FILE;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# structlint configuration
#
# Paths are relative to the project root. Regex values may be left empty
# to disable the rule.

# module_name = "my_package"
# module_root_dir = "src/my_package"

[docs]
md_dir = "docs/md"
allow_additional = false
ignore = ""
file_per_class = ""
file_per_directory = ""
replace_double_underscore = false

[tests]
unit_dir = "tests/unit"
use_filename_suffix = true
allow_additional = false
ignore = "__init__|__main__"
file_per_class = ""
file_per_directory = ""
replace_double_underscore = false

[methods.builtins_order]
init = 0
property = 2
dunder = 6
classmethod = 8
normal = 10
static = 13
private = 15

[methods.custom_order]
# "def test_" = 9.5

[imports]
internal_allowed_everywhere = []
external_allowed_everywhere = []

[imports.internal_disallowed]
# "core" = ["cli"]

[imports.external_disallowed]
# "core" = ["click"]
"#;

/// Write a starter `structlint.toml` into `root`.
pub fn init_config(root: &Path, force: bool) -> Result<PathBuf> {
    let config_path = root.join(STRUCTLINT_FILE);

    if io::file_exists(&config_path) && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}
